use std::collections::HashMap;

use crate::config::ChartConfig;
use crate::ir::EmployeeRecord;

use super::hierarchy::{LEVEL_COUNT, TitleHierarchy};
use super::{ChartLayout, EdgeLayout, NodeLayout};

pub const CHART_SURFACE_ID: &str = "chart";

/// Lookup from employee id to a positioned node, built from the rendered set only.
#[derive(Debug)]
pub struct IdentityIndex<'a> {
    nodes: &'a [NodeLayout],
    by_id: HashMap<&'a str, usize>,
}

impl<'a> IdentityIndex<'a> {
    pub fn new(nodes: &'a [NodeLayout]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            // Later duplicates replace earlier ones.
            by_id.insert(node.id.as_str(), idx);
        }
        Self { nodes, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a NodeLayout> {
        self.by_id.get(id).map(|idx| &self.nodes[*idx])
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Width the widest level needs, floored at the configured minimum.
pub fn chart_width(largest_level: usize, config: &ChartConfig) -> f32 {
    (largest_level as f32 * config.min_node_spacing).max(config.min_width)
}

/// Positions of a level with `count` members.
pub fn level_positions(level: u8, count: usize, total_width: f32, config: &ChartConfig) -> Vec<(f32, f32)> {
    if count == 0 {
        return Vec::new();
    }
    let effective_width =
        (total_width - config.side_margin).max(count as f32 * config.min_node_spacing);
    let spacing = effective_width / (count as f32 + 1.0);
    let y = (level as f32 - 1.0) * config.level_height + config.level_offset_y;
    (0..count)
        .map(|idx| ((idx as f32 + 1.0) * spacing, y))
        .collect()
}

/// Manager -> report edges whose manager id resolves among `nodes`.
pub fn resolve_edges(nodes: &[NodeLayout]) -> Vec<EdgeLayout> {
    let index = IdentityIndex::new(nodes);
    nodes
        .iter()
        .filter_map(|report| {
            let manager = index.get(report.employee.manager_id()?)?;
            Some(EdgeLayout {
                from: manager.id.clone(),
                to: report.id.clone(),
                source: (manager.x, manager.y),
                target: (report.x, report.y),
            })
        })
        .collect()
}

pub fn compute_chart_layout(employees: &[EmployeeRecord], config: &ChartConfig) -> ChartLayout {
    let buckets = TitleHierarchy::bucket(employees);
    let largest = buckets.iter().map(Vec::len).max().unwrap_or(0);
    let width = chart_width(largest, config);
    let height = config.height_levels * config.level_height;

    let mut placed: Vec<Option<(f32, f32, u8, usize)>> = vec![None; employees.len()];
    for (slot, bucket) in buckets.iter().enumerate() {
        let level = (slot + 1) as u8;
        let positions = level_positions(level, bucket.len(), width, config);
        for (idx, (&record_idx, (x, y))) in bucket.iter().zip(positions).enumerate() {
            placed[record_idx] = Some((x, y, level, idx));
        }
    }

    let nodes: Vec<NodeLayout> = employees
        .iter()
        .zip(placed)
        .filter_map(|(record, position)| {
            let (x, y, level, index) = position?;
            Some(NodeLayout {
                id: record.employee_id.clone(),
                x,
                y,
                level: Some(level),
                index,
                employee: record.clone(),
            })
        })
        .collect();
    let edges = resolve_edges(&nodes);
    let unranked = employees.len() - nodes.len();

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        unranked,
        width,
        levels = LEVEL_COUNT,
        "chart layout"
    );

    ChartLayout {
        surface_id: CHART_SURFACE_ID.to_string(),
        width,
        height,
        surface_width: width + config.extra_width,
        surface_height: height + config.extra_height,
        translate: (config.translate_x, config.translate_y),
        nodes,
        edges,
        unranked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: &str, title: &str, manager: Option<&str>) -> EmployeeRecord {
        EmployeeRecord {
            title: Some(title.to_string()),
            manager_employee_id: manager.map(str::to_string),
            ..EmployeeRecord::new(id)
        }
    }

    #[test]
    fn two_level_example() {
        let employees = vec![
            employee("E1", "Managing Director", None),
            employee("E2", "Director", Some("E1")),
        ];
        let layout = compute_chart_layout(&employees, &ChartConfig::default());
        let e1 = layout.node("E1").unwrap();
        let e2 = layout.node("E2").unwrap();
        assert_eq!(e1.y, 100.0);
        assert_eq!(e2.y, 380.0);
        // width 1200 -> effective 1000 -> spacing 500
        assert_eq!(e1.x, 500.0);
        assert_eq!(e2.x, 500.0);
        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.edges[0].from, "E1");
        assert_eq!(layout.edges[0].to, "E2");
        assert_eq!(layout.edges[0].source, (e1.x, e1.y));
        assert_eq!(layout.edges[0].target, (e2.x, e2.y));
        assert_eq!(layout.surface_width, 1600.0);
        assert_eq!(layout.surface_height, 7.0 * 280.0 + 200.0);
    }

    #[test]
    fn wide_levels_drive_canvas_width() {
        let config = ChartConfig::default();
        let employees: Vec<EmployeeRecord> = (0..9)
            .map(|i| employee(&format!("A{i}"), "Analyst", None))
            .chain(std::iter::once(employee("M", "Managing Director", None)))
            .collect();
        let layout = compute_chart_layout(&employees, &config);
        assert_eq!(layout.width, 1800.0);
        // analysts: effective max(1600, 1800) = 1800, spacing 180
        let analysts: Vec<&NodeLayout> = layout.level(6).collect();
        assert_eq!(analysts.len(), 9);
        assert_eq!(analysts[0].x, 180.0);
        assert_eq!(analysts[8].x, 1620.0);
        assert!(analysts.iter().all(|n| n.y == 5.0 * 280.0 + 100.0));
        // single MD: effective 1600, spacing 800
        assert_eq!(layout.node("M").unwrap().x, 800.0);
    }

    #[test]
    fn positions_are_collision_free_within_level() {
        let positions = level_positions(3, 5, 1200.0, &ChartConfig::default());
        for window in positions.windows(2) {
            assert!(window[1].0 > window[0].0);
        }
        assert!(level_positions(3, 0, 1200.0, &ChartConfig::default()).is_empty());
    }

    #[test]
    fn unresolvable_managers_produce_no_edges() {
        let employees = vec![
            employee("1", "Director", Some("404")),
            employee("2", "Associate", Some("")),
            employee("3", "Intern", None),
            employee("4", "Analyst", Some("3")),
        ];
        let layout = compute_chart_layout(&employees, &ChartConfig::default());
        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(layout.unranked, 1);
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn manager_ids_match_exactly() {
        let padded_ref = vec![
            employee("E1", "Managing Director", None),
            employee("E2", "Director", Some(" E1 ")),
        ];
        let layout = compute_chart_layout(&padded_ref, &ChartConfig::default());
        assert!(layout.edges.is_empty());

        let padded_both = vec![
            employee(" E1", "Managing Director", None),
            employee("E2", "Director", Some(" E1")),
        ];
        let layout = compute_chart_layout(&padded_both, &ChartConfig::default());
        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.edges[0].from, " E1");
    }

    #[test]
    fn self_reference_is_a_normal_edge() {
        let employees = vec![employee("1", "Director", Some("1"))];
        let layout = compute_chart_layout(&employees, &ChartConfig::default());
        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.edges[0].source, layout.edges[0].target);
    }

    #[test]
    fn nodes_keep_input_order() {
        let employees = vec![
            employee("a", "Analyst", None),
            employee("m", "Managing Director", None),
            employee("b", "Analyst", None),
        ];
        let layout = compute_chart_layout(&employees, &ChartConfig::default());
        let ids: Vec<&str> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "m", "b"]);
        assert_eq!(layout.node("b").unwrap().index, 1);
    }

    #[test]
    fn identity_index_keeps_last_duplicate() {
        let employees = vec![employee("1", "Director", None), employee("1", "Analyst", None)];
        let layout = compute_chart_layout(&employees, &ChartConfig::default());
        let index = IdentityIndex::new(&layout.nodes);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("1").unwrap().level, Some(6));
        assert!(index.get("2").is_none());
    }

    #[test]
    fn curve_control_points_sit_on_mid_height() {
        let edge = EdgeLayout {
            from: "a".into(),
            to: "b".into(),
            source: (100.0, 100.0),
            target: (300.0, 380.0),
        };
        assert_eq!(
            edge.curve_points(),
            [(100.0, 100.0), (100.0, 240.0), (300.0, 240.0), (300.0, 380.0)]
        );
    }
}
