use nodegroupset::{NodeTemplate, Scenario, ScenarioGroup, SimilarityMatcher};

use super::load_scenario;

pub fn classes(path: &str, format: &str) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    println!("{}", render(&class_ids(&scenario), format)?);
    Ok(())
}

/// Similarity classes of the scenario's groups, as ids.
fn class_ids(scenario: &Scenario) -> Vec<Vec<&str>> {
    let matcher = SimilarityMatcher::from_config(&scenario.config);
    let pairs: Vec<(&ScenarioGroup, &NodeTemplate)> = scenario
        .groups
        .iter()
        .map(|g| (g, &g.template))
        .collect();

    matcher
        .partition(&pairs)
        .into_iter()
        .map(|class| class.into_iter().map(|g| g.id.as_str()).collect())
        .collect()
}

fn render(classes: &[Vec<&str>], format: &str) -> anyhow::Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(classes)?),
        _ => Ok(classes
            .iter()
            .enumerate()
            .map(|(i, class)| format!("class {}: {}", i + 1, class.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
[[groups]]
id = "small-a"
min_size = 0
max_size = 5
target_size = 1
[groups.template]
name = "a"
capacity = { cpu = 1000, memory = 8589934592 }

[[groups]]
id = "large"
min_size = 0
max_size = 5
target_size = 1
[groups.template]
name = "b"
capacity = { cpu = 4000, memory = 8589934592 }

[[groups]]
id = "small-b"
min_size = 0
max_size = 5
target_size = 2
[groups.template]
name = "c"
capacity = { cpu = 1000, memory = 8589934592 }
"#;

    #[test]
    fn text_numbers_classes_in_order() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let classes = class_ids(&scenario);
        assert_eq!(classes, vec![vec!["small-a", "small-b"], vec!["large"]]);
        assert_eq!(
            render(&classes, "text").unwrap(),
            "class 1: small-a, small-b\nclass 2: large"
        );
    }

    #[test]
    fn json_is_nested_arrays() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render(&class_ids(&scenario), "json").unwrap()).unwrap();
        assert_eq!(json, serde_json::json!([["small-a", "small-b"], ["large"]]));
    }

    #[test]
    fn empty_scenario_has_no_classes() {
        let scenario = Scenario::default();
        let classes = class_ids(&scenario);
        assert!(classes.is_empty());
        assert_eq!(render(&classes, "text").unwrap(), "");
        assert_eq!(render(&classes, "json").unwrap(), "[]");
    }
}
