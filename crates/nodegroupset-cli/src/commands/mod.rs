pub mod balance;
pub mod classes;
pub mod similar;

use std::path::Path;

use anyhow::Context;
use nodegroupset::Scenario;
use tracing::debug;

pub fn load_scenario(path: &str) -> anyhow::Result<Scenario> {
    let scenario = Scenario::from_file(Path::new(path)).with_context(|| format!("loading scenario {path}"))?;
    debug!(path, groups = scenario.groups.len(), "loaded scenario");
    Ok(scenario)
}
