pub mod time_math;
