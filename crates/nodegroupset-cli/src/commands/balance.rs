use nodegroupset::{BalancingProcessor, NodeGroup, NodeGroupSetProcessor, ScaleUpInfo};
use serde::Serialize;

use super::load_scenario;

#[derive(Serialize)]
struct PlanEntry<'a> {
    group: &'a str,
    current_size: u32,
    new_size: u32,
    max_size: u32,
}

impl<'a, G: NodeGroup> From<&'a ScaleUpInfo<G>> for PlanEntry<'a> {
    fn from(info: &'a ScaleUpInfo<G>) -> Self {
        Self {
            group: info.group.id(),
            current_size: info.current_size,
            new_size: info.new_size,
            max_size: info.max_size,
        }
    }
}

pub fn balance(path: &str, nodes: u32, group_ids: &[String], format: &str) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    let processor = BalancingProcessor::new(&scenario.config);

    let groups = if group_ids.is_empty() {
        scenario.groups.iter().collect()
    } else {
        scenario.select(group_ids)?
    };

    let plan = processor.balance_scale_up_between_groups(&groups, nodes)?;
    let added: u32 = plan.iter().map(ScaleUpInfo::delta).sum();

    match format {
        "json" => {
            let entries: Vec<PlanEntry> = plan.iter().map(PlanEntry::from).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        _ => {
            for info in &plan {
                println!("{info}");
            }
            println!("{added} of {nodes} requested nodes planned");
        }
    }

    Ok(())
}
