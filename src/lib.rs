pub mod config;
pub mod dataset;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod location;
pub mod render;
pub mod scene;
pub mod theme;
pub mod tooltip;

#[cfg(feature = "cli")]
pub mod cli;

use serde::Serialize;

pub use config::{Config, LayoutConfig, load_config, parse_config};
pub use error::{OrgChartError, Result};
pub use ir::{EmployeeRecord, GroupData, GroupedData, parse_employees, parse_grouped};
pub use layout::{SkippedGroup, compute_chart_layout, compute_group_layouts};
pub use location::highlight_from_location;
pub use render::{render_chart_page, render_homepage, render_svg};
pub use scene::{Scene, SceneBuilder};
pub use theme::Theme;
pub use tooltip::{ChartInteraction, PointerEvent, TooltipController, TooltipHost};

#[cfg(feature = "cli")]
pub use cli::run;

/// One emitted mini chart together with the group it summarizes.
#[derive(Debug, Clone, Serialize)]
pub struct GroupChart {
    pub group_key: String,
    pub index: usize,
    pub total_count: usize,
    pub scene: Scene,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupChartsRender {
    pub charts: Vec<GroupChart>,
    /// Groups that got no surface; each was logged as a warning.
    pub skipped: Vec<SkippedGroup>,
}

/// Builds one mini chart per renderable group, targeting `mini-chart-{n}` in key order.
pub fn render_group_charts(grouped: &GroupedData, config: &Config) -> GroupChartsRender {
    let layouts = compute_group_layouts(grouped, &config.layout.homepage);
    let builder = SceneBuilder::new(config);
    let charts = layouts
        .charts
        .iter()
        .map(|chart| GroupChart {
            group_key: chart.group_key.clone(),
            index: chart.index,
            total_count: chart.total_count,
            scene: builder.mini_chart(chart),
        })
        .collect();
    GroupChartsRender {
        charts,
        skipped: layouts.skipped,
    }
}

/// Builds the full hierarchy chart on the `chart` surface.
pub fn render_full_chart(
    employees: &[EmployeeRecord],
    highlight: Option<&str>,
    config: &Config,
) -> Scene {
    let layout = compute_chart_layout(employees, &config.layout.chart);
    SceneBuilder::new(config).chart(&layout, highlight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_group_gets_no_surface() {
        let grouped = parse_grouped(r#"{ "L1": { "employees": [], "total_count": 0, "employee_ids": [] } }"#)
            .unwrap()
            .data;
        let render = render_group_charts(&grouped, &Config::default());
        assert!(render.charts.is_empty());
        assert_eq!(render.skipped.len(), 1);
        assert_eq!(render.skipped[0].surface_id, "mini-chart-1");
    }

    #[test]
    fn full_chart_end_to_end() {
        let employees = parse_employees(
            r#"[
                {"Employee ID": "E1", "Preferred Name": "Ada", "Worker Corporate Title": "Managing Director"},
                {"Employee ID": "E2", "Preferred Name": "Grace", "Worker Corporate Title": "Director",
                 "Organization Manager Employee ID": "E1", "Organization Manager": "Ada"}
            ]"#,
        )
        .unwrap()
        .data;
        let scene = render_full_chart(&employees, Some("E2"), &Config::default());
        assert_eq!(scene.surface_id, "chart");
        assert_eq!(scene.node("E1").unwrap().y, 100.0);
        assert_eq!(scene.node("E2").unwrap().y, 380.0);
        assert_eq!(scene.edges.len(), 1);
        assert_eq!((scene.edges[0].from.as_str(), scene.edges[0].to.as_str()), ("E1", "E2"));
        let e2 = scene.node("E2").unwrap();
        assert!(e2.highlighted);
        assert_eq!(e2.tooltip.value("Direct Manager"), Some("Ada"));
    }
}
