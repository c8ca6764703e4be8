//! Top-level CLI definition and dispatch for `pds`.
//!
//! Every subcommand boots a fresh sentinel from the reference stream,
//! optionally injects a drift preset, drives the requested number of status
//! rounds, and prints the final payload (human-readable or `--json`).

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;

use crate::core::config::SentinelConfig;
use crate::core::errors::Result;
use crate::service::Sentinel;
use crate::service::status::RiskLevel;
use crate::simulator::DriftPreset;

/// PPE Drift Sentinel: drift detection and risk scoring for PPE
/// confidence streams.
#[derive(Parser)]
#[command(name = "pds", version, about)]
pub struct Cli {
    /// Emit structured JSON instead of human-readable output.
    #[arg(long, global = true)]
    pub json: bool,

    /// Inject a synthetic drift preset before running.
    #[arg(long, global = true, value_enum)]
    pub drift: Option<DriftArg>,

    /// Seed the sentinel for reproducible runs.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Load thresholds from a TOML configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI-facing drift preset names.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DriftArg {
    /// Additive sag on vest and helmet confidence.
    Medium,
    /// Multiplicative collapse across all features.
    High,
}

impl From<DriftArg> for DriftPreset {
    fn from(value: DriftArg) -> Self {
        match value {
            DriftArg::Medium => Self::Medium,
            DriftArg::High => Self::High,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run status checks and print the current risk posture.
    Status {
        /// Number of status rounds to drive before printing.
        #[arg(long, default_value_t = 1)]
        rounds: u32,
    },
    /// Print the per-feature drift report with its fingerprint.
    Report,
    /// Attribute the current drift to its most responsible feature.
    Explain,
    /// Show the retraining gate after a run of status checks.
    Forecast {
        /// Number of status rounds to drive before forecasting.
        #[arg(long, default_value_t = 7)]
        rounds: u32,
    },
    /// Recalibrate the baseline on the current stream.
    Calibrate,
    /// Toggle synthetic drift injection and show the resulting posture.
    InjectDrift {
        /// Preset to enable.
        #[arg(long, value_enum, conflicts_with = "off")]
        severity: Option<DriftArg>,
        /// Disable any active injection.
        #[arg(long)]
        off: bool,
    },
    /// Print the black-box audit log after a run of status checks.
    Logs {
        /// Number of status rounds to drive before printing.
        #[arg(long, default_value_t = 5)]
        rounds: u32,
    },
    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<()> {
    if let Command::Completions { shell } = &cli.command {
        let mut command = Cli::command();
        clap_complete::generate(*shell, &mut command, "pds", &mut std::io::stdout());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => SentinelConfig::from_path(path)?,
        None => SentinelConfig::default(),
    };
    let sentinel = match cli.seed {
        Some(seed) => Sentinel::with_seed(config, seed)?,
        None => Sentinel::new(config)?,
    };
    if let Some(preset) = cli.drift {
        sentinel.inject_drift(Some(preset.into()));
    }

    match &cli.command {
        Command::Status { rounds } => {
            let mut response = sentinel.status()?;
            for _ in 1..*rounds {
                response = sentinel.status()?;
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                let level = response
                    .risk_level
                    .map_or_else(|| "Inconclusive".to_string(), |l| l.to_string());
                let painted = match response.risk_level {
                    Some(RiskLevel::Critical) => level.as_str().red().bold(),
                    Some(RiskLevel::High) => level.as_str().red(),
                    Some(RiskLevel::Medium) => level.as_str().yellow(),
                    _ => level.as_str().green(),
                };
                println!("risk level:   {painted}");
                println!(
                    "drift score:  {}",
                    response
                        .global_drift_score
                        .map_or_else(|| "n/a".to_string(), |s| format!("{s:.1}"))
                );
                println!("risk budget:  {:.1}", response.risk_budget);
                println!("confidence:   {}", response.model_confidence.status);
                println!("action:       {}", response.action_required);
            }
        }
        Command::Report => {
            let report = sentinel.drift_report()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("signature: {}", report.drift_signature);
                for detail in &report.feature_details {
                    let flag = if detail.drift_detected { "DRIFT" } else { "ok" };
                    println!(
                        "{:>14}  {:<5}  p={:.4}  severity={}",
                        detail.feature, flag, detail.p_value, detail.severity
                    );
                }
                println!("score: {:.1}  budget: {:.1}", report.global_drift_score, report.risk_budget);
            }
        }
        Command::Explain => {
            let explain = sentinel.explainability()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&explain)?);
            } else {
                println!("top feature: {}", explain.top_driving_feature.bold());
                println!("advisory:    {}", explain.operator_message);
                for (feature, score) in &explain.all_feature_scores {
                    println!("{feature:>14}  contribution {score:.1}");
                }
            }
        }
        Command::Forecast { rounds } => {
            for _ in 0..*rounds {
                sentinel.status()?;
            }
            let forecast = sentinel.forecast();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&forecast)?);
            } else {
                let gate = if forecast.retraining_gate_open {
                    "OPEN".green().bold()
                } else {
                    "CLOSED".yellow()
                };
                println!("retraining gate: {gate}");
                println!("{}", forecast.message);
            }
        }
        Command::Calibrate => {
            let ack = sentinel.calibrate()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&ack)?);
            } else {
                println!("{}", ack.message);
                println!("risk budget restored to {:.1}", ack.new_risk_budget);
            }
        }
        Command::InjectDrift { severity, off } => {
            let preset = if *off {
                None
            } else {
                (*severity)
                    .map(DriftPreset::from)
                    .or_else(|| cli.drift.map(Into::into))
            };
            let ack = sentinel.inject_drift(preset);
            let response = sentinel.status()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{ack}");
                let level = response
                    .risk_level
                    .map_or_else(|| "Inconclusive".to_string(), |l| l.to_string());
                println!("risk level now: {level}");
            }
        }
        Command::Logs { rounds } => {
            for _ in 0..*rounds {
                sentinel.status()?;
            }
            let entries = sentinel.logs();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("no audit entries recorded");
            } else {
                for entry in &entries {
                    println!(
                        "{}  {:?}  {}  cause: {}",
                        entry.timestamp.format("%H:%M:%S"),
                        entry.level,
                        entry.action_taken,
                        entry.root_cause
                    );
                }
            }
        }
        Command::Completions { .. } => unreachable!("handled above"),
    }
    Ok(())
}
