use crate::layout::{ChartLayout, GroupLayouts, NodeLayout, SkippedGroup};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub view: String,
    pub surfaces: Vec<SurfaceDump>,
    pub skipped: Vec<SkippedGroup>,
}

#[derive(Debug, Serialize)]
pub struct SurfaceDump {
    pub surface_id: String,
    pub group_key: Option<String>,
    pub width: f32,
    pub height: f32,
    pub translate: [f32; 2],
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub name: String,
    pub title: String,
    pub level: Option<u8>,
    pub index: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub points: Vec<[f32; 2]>,
}

fn node_dump(node: &NodeLayout) -> NodeDump {
    NodeDump {
        id: node.id.clone(),
        name: node.employee.name().to_string(),
        title: node.employee.title().to_string(),
        level: node.level,
        index: node.index,
        x: node.x,
        y: node.y,
    }
}

impl LayoutDump {
    pub fn from_chart(layout: &ChartLayout) -> Self {
        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                from: edge.from.clone(),
                to: edge.to.clone(),
                points: edge.curve_points().iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            view: "chart".to_string(),
            surfaces: vec![SurfaceDump {
                surface_id: layout.surface_id.clone(),
                group_key: None,
                width: layout.surface_width,
                height: layout.surface_height,
                translate: [layout.translate.0, layout.translate.1],
                nodes: layout.nodes.iter().map(node_dump).collect(),
                edges,
            }],
            skipped: Vec::new(),
        }
    }

    pub fn from_groups(layouts: &GroupLayouts) -> Self {
        let surfaces = layouts
            .charts
            .iter()
            .map(|chart| SurfaceDump {
                surface_id: chart.surface_id.clone(),
                group_key: Some(chart.group_key.clone()),
                width: chart.width,
                height: chart.height,
                translate: [0.0, 0.0],
                nodes: chart.nodes.iter().map(node_dump).collect(),
                edges: Vec::new(),
            })
            .collect();

        LayoutDump {
            view: "homepage".to_string(),
            surfaces,
            skipped: layouts.skipped.clone(),
        }
    }
}

pub fn write_layout_dump(path: &Path, dump: &LayoutDump) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::ir::EmployeeRecord;
    use crate::layout::compute_chart_layout;

    #[test]
    fn chart_dump_serializes_positions() {
        let boss = EmployeeRecord {
            title: Some("Managing Director".to_string()),
            ..EmployeeRecord::new("1")
        };
        let report = EmployeeRecord {
            title: Some("Director".to_string()),
            manager_employee_id: Some("1".to_string()),
            ..EmployeeRecord::new("2")
        };
        let layout = compute_chart_layout(&[boss, report], &ChartConfig::default());
        let dump = LayoutDump::from_chart(&layout);
        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["view"], "chart");
        assert_eq!(json["surfaces"][0]["nodes"][1]["y"], 380.0);
        assert_eq!(json["surfaces"][0]["edges"][0]["points"][1][1], 240.0);
    }
}
