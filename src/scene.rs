//! Declarative draw commands for one drawing surface.
//!
//! Layout decides where things go; the scene decides what gets drawn there and
//! in which order. Serializing a [`Scene`] is the job of [`crate::render`].

use std::collections::HashSet;

use serde::Serialize;

use crate::config::{ChartConfig, Config, HomepageConfig, LayoutConfig};
use crate::layout::{ChartLayout, MiniChartLayout, NodeLayout, display_title};
use crate::theme::Theme;
use crate::tooltip::TooltipContent;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Fill {
    Color(String),
    /// Reference to a [`PatternDef`] by id.
    Pattern(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextRole {
    Name,
    Title,
}

/// Shapes in node-local coordinates (origin at the node center).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Primitive {
    Circle {
        r: f32,
        fill: Fill,
        stroke: String,
        stroke_width: f32,
    },
    Rect {
        rect: Rect,
        corner_radius: f32,
        fill: String,
    },
    Text {
        dy: f32,
        content: String,
        role: TextRole,
        fill: String,
        bold: bool,
    },
}

/// Avatar image fill, clipped by the circle it is applied to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternDef {
    pub id: String,
    pub href: String,
    pub size: f32,
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePath {
    pub from: String,
    pub to: String,
    pub points: [(f32, f32); 4],
    pub stroke: String,
    pub stroke_width: f32,
}

impl CurvePath {
    pub fn path_data(&self) -> String {
        let [start, c1, c2, end] = self.points;
        format!(
            "M{},{} C{},{} {},{} {},{}",
            fmt_num(start.0),
            fmt_num(start.1),
            fmt_num(c1.0),
            fmt_num(c1.1),
            fmt_num(c2.0),
            fmt_num(c2.1),
            fmt_num(end.0),
            fmt_num(end.1)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub highlighted: bool,
    pub primitives: Vec<Primitive>,
    pub hit_radius: f32,
    pub label_rect: Rect,
    pub tooltip: TooltipContent,
}

/// Pointer-sensitive region of one node, in surface coordinates.
#[derive(Debug, Clone)]
pub struct Hotspot {
    pub node_id: String,
    pub center: Point,
    pub radius: f32,
    pub label: Rect,
    pub tooltip: TooltipContent,
}

impl Hotspot {
    pub fn contains(&self, point: Point) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius || self.label.contains(point)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub surface_id: String,
    pub width: f32,
    pub height: f32,
    pub translate: (f32, f32),
    pub defs: Vec<PatternDef>,
    /// Drawn first so lines sit beneath nodes.
    pub edges: Vec<CurvePath>,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn node(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(|node| node.highlighted)
    }

    pub fn hotspots(&self) -> Vec<Hotspot> {
        let (tx, ty) = self.translate;
        self.nodes
            .iter()
            .map(|node| Hotspot {
                node_id: node.id.clone(),
                center: Point::new(node.x + tx, node.y + ty),
                radius: node.hit_radius,
                label: Rect {
                    x: node.x + tx + node.label_rect.x,
                    y: node.y + ty + node.label_rect.y,
                    width: node.label_rect.width,
                    height: node.label_rect.height,
                },
                tooltip: node.tooltip.clone(),
            })
            .collect()
    }
}

pub fn pattern_id(employee_id: &str) -> String {
    format!("img-{employee_id}")
}

pub struct SceneBuilder<'a> {
    theme: &'a Theme,
    layout: &'a LayoutConfig,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            theme: &config.theme,
            layout: &config.layout,
        }
    }

    pub fn mini_chart(&self, chart: &MiniChartLayout) -> Scene {
        let cfg = &self.layout.homepage;
        let defs = pattern_defs(&chart.nodes, cfg.image_size, cfg.image_offset);
        let nodes = chart
            .nodes
            .iter()
            .map(|node| {
                let tooltip = TooltipContent::homepage(&node.employee, &chart.group_key);
                self.mini_node(node, cfg, tooltip)
            })
            .collect();
        Scene {
            surface_id: chart.surface_id.clone(),
            width: chart.width,
            height: chart.height,
            translate: (0.0, 0.0),
            defs,
            edges: Vec::new(),
            nodes,
        }
    }

    fn mini_node(&self, node: &NodeLayout, cfg: &HomepageConfig, tooltip: TooltipContent) -> SceneNode {
        let theme = self.theme;
        let label_rect = Rect {
            x: -cfg.label_width / 2.0,
            y: cfg.label_offset_y,
            width: cfg.label_width,
            height: cfg.label_height,
        };
        let background_r = cfg.node_radius + cfg.background_padding;
        let primitives = vec![
            Primitive::Circle {
                r: background_r,
                fill: Fill::Color(theme.node_fill.clone()),
                stroke: theme.mini_node_stroke.clone(),
                stroke_width: cfg.stroke_width,
            },
            Primitive::Circle {
                r: cfg.node_radius,
                fill: Fill::Pattern(pattern_id(&node.id)),
                stroke: theme.mini_node_stroke.clone(),
                stroke_width: cfg.stroke_width,
            },
            Primitive::Rect {
                rect: label_rect,
                corner_radius: cfg.label_corner_radius,
                fill: theme.label_fill.clone(),
            },
            Primitive::Text {
                dy: cfg.name_dy,
                content: node.employee.name().to_string(),
                role: TextRole::Name,
                fill: theme.label_text_color.clone(),
                bold: true,
            },
            Primitive::Text {
                dy: cfg.title_dy,
                content: display_title(node.employee.title()).to_string(),
                role: TextRole::Title,
                fill: theme.label_text_color.clone(),
                bold: false,
            },
        ];
        SceneNode {
            id: node.id.clone(),
            x: node.x,
            y: node.y,
            highlighted: false,
            primitives,
            hit_radius: background_r,
            label_rect,
            tooltip,
        }
    }

    /// Full chart scene. At most one node (the first whose id equals
    /// `highlight`) gets the highlight styling.
    pub fn chart(&self, chart: &ChartLayout, highlight: Option<&str>) -> Scene {
        let cfg = &self.layout.chart;
        let theme = self.theme;

        let edges = chart
            .edges
            .iter()
            .map(|edge| CurvePath {
                from: edge.from.clone(),
                to: edge.to.clone(),
                points: edge.curve_points(),
                stroke: theme.link_color.clone(),
                stroke_width: cfg.link_width,
            })
            .collect();

        let mut highlight = highlight.filter(|id| !id.is_empty());
        let nodes = chart
            .nodes
            .iter()
            .map(|node| {
                let highlighted = highlight == Some(node.id.as_str());
                if highlighted {
                    highlight = None;
                }
                let tooltip = TooltipContent::chart(&node.employee, &self.layout.tooltip);
                self.chart_node(node, cfg, highlighted, tooltip)
            })
            .collect();

        Scene {
            surface_id: chart.surface_id.clone(),
            width: chart.surface_width,
            height: chart.surface_height,
            translate: chart.translate,
            defs: pattern_defs(&chart.nodes, cfg.node_radius * 2.0, 0.0),
            edges,
            nodes,
        }
    }

    fn chart_node(
        &self,
        node: &NodeLayout,
        cfg: &ChartConfig,
        highlighted: bool,
        tooltip: TooltipContent,
    ) -> SceneNode {
        let theme = self.theme;
        let label_rect = Rect {
            x: -cfg.label_width / 2.0,
            y: cfg.node_radius + cfg.label_gap,
            width: cfg.label_width,
            height: cfg.label_height,
        };
        let background_r = cfg.node_radius + cfg.background_padding;
        let (avatar_stroke, avatar_stroke_width, label_fill) = if highlighted {
            (
                theme.highlight_stroke.clone(),
                cfg.highlight_stroke_width,
                theme.highlight_fill.clone(),
            )
        } else {
            (theme.node_stroke.clone(), cfg.stroke_width, theme.label_fill.clone())
        };
        let primitives = vec![
            Primitive::Circle {
                r: background_r,
                fill: Fill::Color(theme.node_fill.clone()),
                stroke: theme.node_stroke.clone(),
                stroke_width: cfg.stroke_width,
            },
            Primitive::Circle {
                r: cfg.node_radius,
                fill: Fill::Pattern(pattern_id(&node.id)),
                stroke: avatar_stroke,
                stroke_width: avatar_stroke_width,
            },
            Primitive::Rect {
                rect: label_rect,
                corner_radius: cfg.label_corner_radius,
                fill: label_fill,
            },
            Primitive::Text {
                dy: cfg.node_radius + cfg.name_dy,
                content: node.employee.name().to_string(),
                role: TextRole::Name,
                fill: theme.label_text_color.clone(),
                bold: false,
            },
            Primitive::Text {
                dy: cfg.node_radius + cfg.title_dy,
                content: display_title(node.employee.title()).to_string(),
                role: TextRole::Title,
                fill: theme.label_text_color.clone(),
                bold: false,
            },
        ];
        SceneNode {
            id: node.id.clone(),
            x: node.x,
            y: node.y,
            highlighted,
            primitives,
            hit_radius: background_r,
            label_rect,
            tooltip,
        }
    }
}

fn pattern_defs(nodes: &[NodeLayout], size: f32, offset: f32) -> Vec<PatternDef> {
    let mut seen = HashSet::new();
    nodes
        .iter()
        .filter(|node| seen.insert(node.id.as_str()))
        .map(|node| PatternDef {
            id: pattern_id(&node.id),
            href: node.employee.avatar_href().to_string(),
            size,
            offset,
        })
        .collect()
}

/// Compact number formatting for attribute values (`500` rather than `500.00`).
pub fn fmt_num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if (rounded - rounded.round()).abs() < 0.001 {
        format!("{:.0}", rounded)
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ir::{DEFAULT_PROFILE_IMAGE, EmployeeRecord};
    use crate::layout::compute_chart_layout;

    fn employee(id: &str, title: &str, manager: Option<&str>) -> EmployeeRecord {
        EmployeeRecord {
            preferred_name: Some(format!("Person {id}")),
            title: Some(title.to_string()),
            manager_employee_id: manager.map(str::to_string),
            ..EmployeeRecord::new(id)
        }
    }

    fn chart_scene(employees: &[EmployeeRecord], highlight: Option<&str>) -> Scene {
        let config = Config::default();
        let layout = compute_chart_layout(employees, &config.layout.chart);
        SceneBuilder::new(&config).chart(&layout, highlight)
    }

    fn label_fill(node: &SceneNode) -> &str {
        node.primitives
            .iter()
            .find_map(|p| match p {
                Primitive::Rect { fill, .. } => Some(fill.as_str()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn node_primitives_are_ordered_background_to_text() {
        let scene = chart_scene(&[employee("1", "Director", None)], None);
        let node = &scene.nodes[0];
        assert!(matches!(node.primitives[0], Primitive::Circle { r, .. } if r == 42.0));
        assert!(
            matches!(&node.primitives[1], Primitive::Circle { fill: Fill::Pattern(id), .. } if id == "img-1")
        );
        assert!(matches!(node.primitives[2], Primitive::Rect { .. }));
        assert!(matches!(node.primitives[3], Primitive::Text { role: TextRole::Name, .. }));
        assert!(matches!(node.primitives[4], Primitive::Text { role: TextRole::Title, .. }));
    }

    #[test]
    fn highlight_marks_exactly_one_node() {
        let employees = vec![
            employee("1", "Director", None),
            employee("2", "Associate", Some("1")),
            employee("2", "Analyst", Some("1")),
        ];
        let scene = chart_scene(&employees, Some("2"));
        let highlighted: Vec<&SceneNode> = scene.highlighted().collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(label_fill(highlighted[0]), "#FF6347");
        assert!(matches!(
            &highlighted[0].primitives[1],
            Primitive::Circle { stroke, stroke_width, .. } if stroke == "red" && *stroke_width == 4.0
        ));
        assert_eq!(label_fill(&scene.nodes[0]), "#D4A373");
    }

    #[test]
    fn unknown_highlight_changes_nothing() {
        let employees = vec![employee("1", "Director", None)];
        let plain = chart_scene(&employees, None);
        let missing = chart_scene(&employees, Some("999"));
        assert_eq!(missing.highlighted().count(), 0);
        assert_eq!(plain.nodes[0].primitives, missing.nodes[0].primitives);
    }

    #[test]
    fn title_label_uses_display_text() {
        let scene = chart_scene(&[employee("1", "Assistant Vice President", None)], None);
        let title = scene.nodes[0]
            .primitives
            .iter()
            .find_map(|p| match p {
                Primitive::Text { role: TextRole::Title, content, .. } => Some(content.as_str()),
                _ => None,
            })
            .unwrap();
        assert_eq!(title, "Assistant VP");
    }

    #[test]
    fn avatar_falls_back_to_placeholder() {
        let mut with_image = employee("1", "Director", None);
        with_image.profile_image_url = Some("https://img/1.png".to_string());
        let scene = chart_scene(&[with_image, employee("2", "Analyst", None)], None);
        assert_eq!(scene.defs[0].href, "https://img/1.png");
        assert_eq!(scene.defs[1].href, DEFAULT_PROFILE_IMAGE);
        assert_eq!(scene.defs[1].size, 80.0);
    }

    #[test]
    fn hotspots_include_translation() {
        let scene = chart_scene(&[employee("1", "Managing Director", None)], None);
        let hotspots = scene.hotspots();
        assert_eq!(hotspots[0].center, Point::new(700.0, 150.0));
        assert!(hotspots[0].contains(Point::new(700.0, 150.0)));
        // inside the label rectangle below the disc
        assert!(hotspots[0].contains(Point::new(700.0, 150.0 + 60.0)));
        assert!(!hotspots[0].contains(Point::new(0.0, 0.0)));
    }

    #[test]
    fn curve_path_data() {
        let scene = chart_scene(
            &[employee("1", "Managing Director", None), employee("2", "Director", Some("1"))],
            None,
        );
        assert_eq!(scene.edges.len(), 1);
        assert_eq!(scene.edges[0].path_data(), "M500,100 C500,240 500,240 500,380");
    }

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(500.0), "500");
        assert_eq!(fmt_num(333.3333), "333.33");
        assert_eq!(fmt_num(-10.0), "-10");
    }
}
