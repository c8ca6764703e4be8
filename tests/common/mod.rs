//! Shared harness for CLI smoke tests: runs the `pds` binary and captures
//! a per-case log for post-mortem inspection.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output};

pub struct CliResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

pub fn run_cli_case(case_name: &str, args: &[&str]) -> CliResult {
    let output: Output = Command::new(env!("CARGO_BIN_EXE_pds"))
        .args(args)
        .output()
        .expect("pds binary should spawn");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    let log_dir = std::env::temp_dir().join("pds_cli_cases");
    fs::create_dir_all(&log_dir).expect("log dir should be creatable");
    let log_path = log_dir.join(format!("{case_name}.log"));
    fs::write(
        &log_path,
        format!(
            "args: {args:?}\nstatus: {:?}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}\n",
            output.status
        ),
    )
    .expect("log should be writable");

    CliResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}
