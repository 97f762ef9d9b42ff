use serde::Serialize;

use crate::ir::EmployeeRecord;

/// An employee placed on a surface. The input record is copied, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    /// Rank in the title hierarchy (full chart only).
    pub level: Option<u8>,
    /// Position inside the node's bucket.
    pub index: usize,
    pub employee: EmployeeRecord,
}

/// Manager -> report connection between two positioned nodes.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeLayout {
    pub from: String,
    pub to: String,
    pub source: (f32, f32),
    pub target: (f32, f32),
}

impl EdgeLayout {
    /// Start, two control points and end of the vertical S-curve.
    pub fn curve_points(&self) -> [(f32, f32); 4] {
        let (sx, sy) = self.source;
        let (tx, ty) = self.target;
        let mid_y = (sy + ty) / 2.0;
        [(sx, sy), (sx, mid_y), (tx, mid_y), (tx, ty)]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MiniChartLayout {
    pub group_key: String,
    pub surface_id: String,
    /// Position of the group key in the input mapping.
    pub index: usize,
    pub total_count: usize,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeLayout>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The raw employee list for the group was empty.
    NoEmployees,
    /// No employee carried the group's own key.
    GroupKeyMismatch,
    /// No employee with the group's key was in the valid id set.
    NoValidIds,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::NoEmployees => "no employees found",
            SkipReason::GroupKeyMismatch => "no employees found after filtering",
            SkipReason::NoValidIds => "no valid employee ids",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedGroup {
    pub group_key: String,
    pub index: usize,
    pub surface_id: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupLayouts {
    pub charts: Vec<MiniChartLayout>,
    pub skipped: Vec<SkippedGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartLayout {
    pub surface_id: String,
    /// Width the levels are spread over, before margins.
    pub width: f32,
    pub height: f32,
    pub surface_width: f32,
    pub surface_height: f32,
    pub translate: (f32, f32),
    /// Positioned nodes in input order.
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    /// Records left out because their title has no rank.
    pub unranked: usize,
}

impl ChartLayout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn level(&self, level: u8) -> impl Iterator<Item = &NodeLayout> {
        self.nodes.iter().filter(move |node| node.level == Some(level))
    }
}
