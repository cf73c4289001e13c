use std::path::PathBuf;
use std::process::ExitCode;

use broker_charts::config::Config;
use broker_charts::pipeline;

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    // Single optional argument: a JSON config. Defaults otherwise.
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let report = pipeline::run(&config)?;
    log::info!(
        "{} charts written, {} failed",
        report.written.len(),
        report.failed.len()
    );

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        for (chart, err) in &report.failed {
            eprintln!("{chart}: {err}");
        }
        Ok(ExitCode::FAILURE)
    }
}
