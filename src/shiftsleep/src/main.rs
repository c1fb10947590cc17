#[macro_use]
extern crate log;

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Read as _, Write},
};

use anyhow::{Context, bail};
use chrono::{FixedOffset, NaiveDate, Utc};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use shiftsleep_algos::{
    DEFAULT_HISTORY_DAYS, EmptyIntervals, ReportOptions, ShiftWindowFilter, StageMapping,
    VitalsWindow, compute_fleet_reports, compute_sleep_report_with, history_range,
    summarize_device_history,
};
use shiftsleep_types::{FleetSummary, RawSample, ShiftType, SleepReport};

use crate::output::{HistoryText, ReportText, SummaryText};

mod helpers;
mod output;

#[derive(Parser)]
#[command(name = "shiftsleep")]
pub struct ShiftSleepCli {
    /// Offset the shift windows are read in, e.g. `+07:00`
    #[arg(env, long, default_value = "+00:00", global = true)]
    pub utc_offset: FixedOffset,
    #[clap(subcommand)]
    pub subcommand: ShiftSleepCommand,
}

#[derive(Subcommand)]
pub enum ShiftSleepCommand {
    ///
    /// Compute the sleep report of one device
    ///
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, env)]
        shift: Option<ShiftType>,
    },
    ///
    /// Compute reports for every device in the samples and summarize them
    ///
    Fleet {
        #[command(flatten)]
        input: InputArgs,
        /// Shift applied to devices missing from `--shifts`
        #[arg(long, env)]
        shift: Option<ShiftType>,
        /// JSON file mapping device id to shift, `-` for stdin
        #[arg(long, env)]
        shifts: Option<String>,
    },
    ///
    /// Average sleep time and quality of one device over past reports
    ///
    History {
        /// JSON file with reports or `fleet` output, `-` for stdin
        #[arg(long, env, default_value = "-")]
        reports: String,
        #[arg(long, env)]
        device: String,
        /// Last day of the range, today by default
        #[arg(long, env)]
        end: Option<NaiveDate>,
        /// Days before `--end` included in the range
        #[arg(long, env, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: u64,
        #[arg(long, env, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    ///
    /// Print the sleep window of a shift
    ///
    Window {
        #[arg(long, env)]
        date: NaiveDate,
        #[arg(long, env)]
        shift: ShiftType,
    },
    ///
    /// Generate shell completions
    ///
    Completions { shell: Shell },
}

#[derive(Args)]
pub struct InputArgs {
    /// JSON array of raw samples, `-` for stdin
    #[arg(long, env, default_value = "-")]
    pub samples: String,
    /// Date the report is for
    #[arg(long, env)]
    pub date: NaiveDate,
    #[arg(long, env, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Drop reports whose intervals were all filtered away
    #[arg(long, env)]
    pub drop_empty: bool,
    /// Do not restrict heart rate and blood oxygen to the shift window
    #[arg(long, env)]
    pub unfiltered_vitals: bool,
    #[arg(long, env, value_enum, default_value_t = Mapping::Direct)]
    pub stage_mapping: Mapping,
    /// Fuse touching intervals of the same stage
    #[arg(long, env)]
    pub merge_adjacent: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Mapping {
    Direct,
    /// Legacy motion magnitude buckets
    Magnitude,
}

impl InputArgs {
    fn options(&self, utc_offset: FixedOffset) -> ReportOptions {
        let stage_mapping = match self.stage_mapping {
            Mapping::Direct => StageMapping::Direct,
            Mapping::Magnitude => StageMapping::MotionMagnitude,
        };

        ReportOptions::default()
            .with_stage_mapping(stage_mapping)
            .with_merge_adjacent(self.merge_adjacent)
            .with_empty_intervals(if self.drop_empty {
                EmptyIntervals::Drop
            } else {
                EmptyIntervals::Retain
            })
            .with_vitals_window(if self.unfiltered_vitals {
                VitalsWindow::Unfiltered
            } else {
                VitalsWindow::Shift
            })
            .with_utc_offset(utc_offset)
    }

    fn read_samples(&self) -> anyhow::Result<Vec<RawSample>> {
        let raw = read_input(&self.samples)?;
        let samples: Vec<RawSample> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid samples in `{}`", self.samples))?;
        info!("Loaded {} samples", samples.len());
        Ok(samples)
    }
}

fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        Ok(raw)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path))
    }
}

fn main() -> anyhow::Result<()> {
    let env_file = dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = env_file {
        debug!("No .env loaded: {}", error);
    }

    let cli = ShiftSleepCli::parse();
    run(cli, &mut io::stdout().lock())
}

/// Runs one command. Only command output goes to `out`, diagnostics go to the log.
fn run<W: Write>(cli: ShiftSleepCli, out: &mut W) -> anyhow::Result<()> {
    match cli.subcommand {
        ShiftSleepCommand::Report { input, shift } => {
            let samples = input.read_samples()?;
            let options = input.options(cli.utc_offset);

            let Some(report) = compute_sleep_report_with(&samples, input.date, shift, &options)
            else {
                warn!("No sleep left for {} after shift filtering", input.date);
                return Ok(());
            };

            match input.format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
                OutputFormat::Text => write!(
                    out,
                    "{}",
                    ReportText {
                        report: &report,
                        offset: cli.utc_offset,
                    }
                )?,
            }
            Ok(())
        }
        ShiftSleepCommand::Fleet {
            input,
            shift,
            shifts,
        } => {
            if input.samples == "-" && shifts.as_deref() == Some("-") {
                bail!("`--samples` and `--shifts` cannot both read stdin");
            }

            let samples = input.read_samples()?;
            let options = input.options(cli.utc_offset);

            let shifts: BTreeMap<String, ShiftType> = match shifts {
                Some(path) => serde_json::from_str(&read_input(&path)?)
                    .with_context(|| format!("invalid shifts in `{}`", path))?,
                None => BTreeMap::new(),
            };

            let reports = compute_fleet_reports(
                &samples,
                input.date,
                |device| shifts.get(device).copied().or(shift),
                &options,
            );
            let summary = FleetSummary::from_reports(&reports);

            match input.format {
                OutputFormat::Json => {
                    let output = FleetOutput {
                        reports: &reports,
                        summary,
                    };
                    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
                }
                OutputFormat::Text => {
                    for report in &reports {
                        let text = ReportText {
                            report,
                            offset: cli.utc_offset,
                        };
                        writeln!(out, "{}", text)?;
                    }
                    write!(out, "{}", SummaryText(&summary))?;
                }
            }
            Ok(())
        }
        ShiftSleepCommand::History {
            reports,
            device,
            end,
            days,
            format,
        } => {
            let raw = read_input(&reports)?;
            let history: ReportsInput = serde_json::from_str(&raw)
                .with_context(|| format!("invalid reports in `{}`", reports))?;
            let history = history.into_reports();
            info!("Loaded {} reports", history.len());

            let end = end.unwrap_or_else(|| Utc::now().with_timezone(&cli.utc_offset).date_naive());
            let (start, end) = history_range(end, days);
            let summary = summarize_device_history(&history, &device, start, end);

            match format {
                OutputFormat::Json => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?
                }
                OutputFormat::Text => write!(out, "{}", HistoryText(&summary))?,
            }
            Ok(())
        }
        ShiftSleepCommand::Window { date, shift } => {
            match ShiftWindowFilter::window(Some(shift), date, cli.utc_offset) {
                Some(window) => writeln!(
                    out,
                    "{}: {} - {}",
                    shift,
                    window.start.with_timezone(&cli.utc_offset),
                    window.end.with_timezone(&cli.utc_offset)
                )?,
                None => writeln!(out, "{}: no sleep window, every interval counts", shift)?,
            }
            Ok(())
        }
        ShiftSleepCommand::Completions { shell } => {
            let mut command = ShiftSleepCli::command();
            clap_complete::generate(shell, &mut command, "shiftsleep", out);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct FleetOutput<'a> {
    reports: &'a [SleepReport],
    summary: FleetSummary,
}

/// Either a plain list of reports or the JSON written by `fleet`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReportsInput {
    Reports(Vec<SleepReport>),
    Fleet { reports: Vec<SleepReport> },
}

impl ReportsInput {
    fn into_reports(self) -> Vec<SleepReport> {
        match self {
            ReportsInput::Reports(reports) | ReportsInput::Fleet { reports } => reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("shiftsleep-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    fn parse(args: &[&str]) -> ShiftSleepCli {
        ShiftSleepCli::try_parse_from(std::iter::once("shiftsleep").chain(args.iter().copied()))
            .unwrap()
    }

    const SAMPLES: &str = r#"[
        {"device_id": "watch-01", "metric_type": "sleep_motion", "value": 3,
         "start_time": "2025-01-14T22:00:00Z", "end_time": "2025-01-15T04:00:00Z"},
        {"device_id": "watch-01", "metric_type": "heart_rate", "value": "58",
         "start_time": "2025-01-14T23:00:00Z", "end_time": "2025-01-14T23:01:00Z"}
    ]"#;

    #[test]
    fn cli_is_consistent() {
        ShiftSleepCli::command().debug_assert();
    }

    #[test]
    fn parse_report_command() {
        let cli = ShiftSleepCli::try_parse_from([
            "shiftsleep",
            "--utc-offset",
            "+07:00",
            "report",
            "--samples",
            "samples.json",
            "--date",
            "2025-01-15",
            "--shift",
            "night",
            "--drop-empty",
            "--stage-mapping",
            "magnitude",
        ])
        .unwrap();

        assert_eq!(cli.utc_offset, FixedOffset::east_opt(7 * 3600).unwrap());
        let ShiftSleepCommand::Report { input, shift } = cli.subcommand else {
            panic!("expected report command");
        };
        assert_eq!(shift, Some(ShiftType::Night));
        assert_eq!(input.samples, "samples.json");

        let options = input.options(cli.utc_offset);
        assert_eq!(options.empty_intervals, EmptyIntervals::Drop);
        assert_eq!(options.vitals_window, VitalsWindow::Shift);
        assert_eq!(options.stage_mapping, StageMapping::MotionMagnitude);
        assert!(!options.merge_adjacent);
    }

    #[test]
    fn unknown_shift_is_accepted() {
        let cli = ShiftSleepCli::try_parse_from([
            "shiftsleep",
            "window",
            "--date",
            "2025-01-15",
            "--shift",
            "whatever",
        ])
        .unwrap();

        let ShiftSleepCommand::Window { shift, .. } = cli.subcommand else {
            panic!("expected window command");
        };
        assert_eq!(shift, ShiftType::Other);
    }

    #[test]
    fn json_report_is_the_only_output() {
        let samples = write_temp("report.json", SAMPLES);
        let cli = parse(&[
            "report",
            "--samples",
            samples.to_str().unwrap(),
            "--date",
            "2025-01-15",
        ]);

        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        fs::remove_file(samples).unwrap();

        let report: SleepReport = serde_json::from_slice(&out).unwrap();
        assert_eq!(report.device_id, "watch-01");
        assert_eq!(report.total_sleep_time, 21_600.0);
        assert_eq!(report.heart_rate.avg, 58.0);
    }

    #[test]
    fn fleet_rejects_two_stdin_inputs() {
        let cli = parse(&[
            "fleet",
            "--samples",
            "-",
            "--shifts",
            "-",
            "--date",
            "2025-01-15",
        ]);

        let error = run(cli, &mut Vec::new()).unwrap_err();
        assert!(error.to_string().contains("both read stdin"));
    }

    #[test]
    fn fleet_reads_shifts_file() {
        let samples = write_temp("fleet-samples.json", SAMPLES);
        let shifts = write_temp("fleet-shifts.json", r#"{"watch-01": "night"}"#);
        let cli = parse(&[
            "fleet",
            "--samples",
            samples.to_str().unwrap(),
            "--shifts",
            shifts.to_str().unwrap(),
            "--date",
            "2025-01-15",
        ]);

        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        fs::remove_file(samples).unwrap();
        fs::remove_file(shifts).unwrap();

        let output: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(output["reports"][0]["shift"], "night");
        assert_eq!(output["summary"]["devices"], 1);
    }

    #[test]
    fn history_from_fleet_output() {
        let samples = write_temp("history-samples.json", SAMPLES);
        let mut fleet = Vec::new();
        let cli = parse(&[
            "fleet",
            "--samples",
            samples.to_str().unwrap(),
            "--date",
            "2025-01-15",
        ]);
        run(cli, &mut fleet).unwrap();
        fs::remove_file(samples).unwrap();

        let reports = write_temp("history-reports.json", std::str::from_utf8(&fleet).unwrap());
        let cli = parse(&[
            "history",
            "--reports",
            reports.to_str().unwrap(),
            "--device",
            "watch-01",
            "--end",
            "2025-01-16",
        ]);
        assert!(matches!(
            cli.subcommand,
            ShiftSleepCommand::History {
                days: DEFAULT_HISTORY_DAYS,
                ..
            }
        ));

        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        fs::remove_file(reports).unwrap();

        let summary: shiftsleep_types::DeviceHistorySummary =
            serde_json::from_slice(&out).unwrap();
        assert_eq!(summary.start, NaiveDate::from_ymd_opt(2025, 1, 13).unwrap());
        assert_eq!(summary.total_records, 1);
        assert_eq!(summary.average_sleep_time, 21_600.0);
    }
}
