use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::pipeline::RunReport;
use crate::resource::{self, Resource};

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "TYPE")]
    resource_type: String,
    #[tabled(rename = "ID")]
    resource_id: String,
    #[tabled(rename = "ATTRIBUTES")]
    attributes: usize,
}

impl From<&Resource> for ResourceRow {
    fn from(resource: &Resource) -> Self {
        Self {
            resource_type: resource.resource_type.clone(),
            resource_id: resource.resource_id.clone(),
            attributes: resource.attributes.as_ref().map_or(0, |a| a.len()),
        }
    }
}

fn sorted(resources: &[Resource]) -> Vec<Resource> {
    let mut resources = resources.to_vec();
    resource::sort(&mut resources);
    resources
}

/// Resources are listed by type, then id, whatever order the pipeline left them in.
pub fn render_table(title: &str, resources: &[Resource]) -> String {
    let rows: Vec<ResourceRow> = sorted(resources).iter().map(ResourceRow::from).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    format!("{} ({})\n{}", title, resources.len(), table)
}

#[derive(Serialize)]
struct NormalizedPair {
    observed: Vec<Resource>,
    declared: Vec<Resource>,
}

pub fn render_json(observed: &[Resource], declared: &[Resource]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&NormalizedPair {
        observed: sorted(observed),
        declared: sorted(declared),
    })
}

pub fn render_report(report: &RunReport) -> String {
    let mut root = Tree::new(format!(
        "pipeline: {} removed from observed, {} added to declared",
        report.observed_removed(),
        report.declared_added()
    ));

    for stage in &report.stages {
        let label = if stage.is_noop() {
            format!("{} (no change)", stage.stage)
        } else {
            stage.stage.clone()
        };
        root.push(Tree::new(label).with_leaves([
            format!("observed: {} -> {}", stage.observed_before, stage.observed_after),
            format!("declared: {} -> {}", stage.declared_before, stage.declared_after),
        ]));
    }

    root.to_string()
}

pub fn render_stage_names(names: &[&str]) -> String {
    let mut root = Tree::new("pipeline".to_string());
    for (position, name) in names.iter().enumerate() {
        root.push(Tree::new(format!("{}. {}", position + 1, name)));
    }
    root.to_string()
}
