use nodegroupset::{BalancingProcessor, NodeGroupSetProcessor, Scenario};

use super::load_scenario;

pub fn similar(path: &str, group_id: &str, format: &str) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    let ids = similar_ids(&scenario, group_id)?;
    println!("{}", render(group_id, &ids, format)?);
    Ok(())
}

/// Ids of the groups similar to `group_id`, in scenario order.
fn similar_ids<'a>(scenario: &'a Scenario, group_id: &str) -> anyhow::Result<Vec<&'a str>> {
    let processor = BalancingProcessor::new(&scenario.config);
    let group = scenario.group(group_id)?;

    Ok(processor
        .find_similar_node_groups(group, &scenario.groups, &scenario.templates())?
        .into_iter()
        .map(|g| g.id.as_str())
        .collect())
}

fn render(group_id: &str, ids: &[&str], format: &str) -> anyhow::Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(ids)?),
        _ if ids.is_empty() => Ok(format!("no node groups similar to {group_id}")),
        _ => Ok(ids.join("\n")),
    }
}
