use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TypesError {
    #[error("invalid sleep stage value: {0}")]
    InvalidStage(i64),
}
