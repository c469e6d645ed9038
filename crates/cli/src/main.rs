//! `bazaar` — replay a marketplace scenario and print the outcome as JSON lines.
//!
//! Usage: `bazaar <scenario.json>` (or set `BAZAAR_SCENARIO`).

mod runner;
mod scenario;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;

use crate::scenario::Scenario;

const SCENARIO_ENV: &str = "BAZAAR_SCENARIO";

fn main() -> anyhow::Result<()> {
    bazaar_observability::init();

    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(SCENARIO_ENV).map(PathBuf::from))
        .with_context(|| format!("usage: bazaar <scenario.json> (or set {SCENARIO_ENV})"))?;

    let scenario = Scenario::load(&path)?;
    tracing::info!(path = %path.display(), calls = scenario.calls.len(), "running scenario");

    let report = runner::run(&scenario)?;

    let mut out = io::stdout().lock();
    for call in &report.calls {
        writeln!(out, "{}", serde_json::to_string(call)?)?;
    }
    for event in &report.events {
        writeln!(out, "{}", serde_json::to_string(event)?)?;
    }
    for balance in &report.balances {
        writeln!(out, "{}", serde_json::to_string(balance)?)?;
    }
    Ok(())
}
