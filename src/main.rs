//! AstraGuard - Main Entry Point
//!
//! Trains the scorer (or loads a snapshot), runs the configured mission in
//! both response modes and exports a JSON report.

use std::process::ExitCode;
use std::sync::Arc;

use astraguard_core::constants;
use astraguard_core::logic::config::MissionConfig;
use astraguard_core::logic::model::load_snapshot;
use astraguard_core::logic::report::{save_report, MissionReport};
use astraguard_core::logic::session::MissionSession;
use astraguard_core::logic::MissionResult;

fn build_session(config: MissionConfig) -> MissionResult<MissionSession> {
    let Some(path) = constants::get_snapshot_path() else {
        return MissionSession::new(config);
    };

    if path.exists() {
        match load_snapshot(&path) {
            Ok(scorer) => return MissionSession::with_scorer(config, Arc::new(scorer)),
            Err(e) => log::warn!("Snapshot {} unusable ({}), retraining", path.display(), e),
        }
    }

    let session = MissionSession::new(config)?;
    if let Err(e) = session.save_scorer(&path) {
        log::warn!("Failed to save scorer snapshot: {}", e);
    }
    Ok(session)
}

fn run() -> MissionResult<()> {
    let config = MissionConfig::from_env()?;
    let session = build_session(config)?;

    let comparison = session.run_mission()?;

    log::info!("=== {} Mission Summary ===", constants::APP_NAME);
    for line in comparison.summary() {
        log::info!("{}", line);
    }

    let report = MissionReport::new(&session.scorer(), comparison, session.get_actions_taken());
    save_report(&report, &constants::get_report_dir())?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Mission failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
