use crate::error::{OrgChartError, Result};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const NO_MATRIX_MANAGER: &str = "No Matrix Manager";

/// Geometry of the per-group mini charts on the homepage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomepageConfig {
    pub width: f32,
    pub columns: usize,
    pub row_height: f32,
    pub column_spacing: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub node_radius: f32,
    pub background_padding: f32,
    pub stroke_width: f32,
    pub label_width: f32,
    pub label_height: f32,
    pub label_offset_y: f32,
    pub label_corner_radius: f32,
    pub name_dy: f32,
    pub title_dy: f32,
    pub image_size: f32,
    pub image_offset: f32,
}

impl Default for HomepageConfig {
    fn default() -> Self {
        Self {
            width: 350.0,
            columns: 2,
            row_height: 120.0,
            column_spacing: 150.0,
            origin_x: 60.0,
            origin_y: 30.0,
            node_radius: 30.0,
            background_padding: 2.0,
            stroke_width: 2.0,
            label_width: 120.0,
            label_height: 45.0,
            label_offset_y: 40.0,
            label_corner_radius: 10.0,
            name_dy: 55.0,
            title_dy: 75.0,
            image_size: 60.0,
            image_offset: -10.0,
        }
    }
}

/// Geometry of the full hierarchy chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub min_node_spacing: f32,
    pub min_width: f32,
    pub side_margin: f32,
    pub level_height: f32,
    pub level_offset_y: f32,
    /// Canvas height in level units (six levels plus one of margin).
    pub height_levels: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub extra_width: f32,
    pub extra_height: f32,
    pub node_radius: f32,
    pub background_padding: f32,
    pub stroke_width: f32,
    pub highlight_stroke_width: f32,
    pub label_width: f32,
    pub label_height: f32,
    pub label_gap: f32,
    pub label_corner_radius: f32,
    pub name_dy: f32,
    pub title_dy: f32,
    pub link_width: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            min_node_spacing: 200.0,
            min_width: 1200.0,
            side_margin: 200.0,
            level_height: 280.0,
            level_offset_y: 100.0,
            height_levels: 7.0,
            translate_x: 200.0,
            translate_y: 50.0,
            extra_width: 400.0,
            extra_height: 200.0,
            node_radius: 40.0,
            background_padding: 2.0,
            stroke_width: 2.0,
            highlight_stroke_width: 4.0,
            label_width: 120.0,
            label_height: 60.0,
            label_gap: 5.0,
            label_corner_radius: 10.0,
            name_dy: 25.0,
            title_dy: 45.0,
            link_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TooltipConfig {
    pub offset_x: f32,
    pub offset_y: f32,
    pub padding: f32,
    pub border_radius: f32,
    pub font_size: f32,
    pub no_matrix_manager: String,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset_x: 15.0,
            offset_y: 15.0,
            padding: 12.0,
            border_radius: 8.0,
            font_size: 14.0,
            no_matrix_manager: NO_MATRIX_MANAGER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub homepage: HomepageConfig,
    pub chart: ChartConfig,
    pub tooltip: TooltipConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 2160.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    label_fill: Option<String>,
    label_text_color: Option<String>,
    highlight_fill: Option<String>,
    highlight_stroke: Option<String>,
    node_stroke: Option<String>,
    link_color: Option<String>,
    tooltip_background: Option<Vec<String>>,
    group_colors: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HomepageConfigFile {
    width: Option<f32>,
    columns: Option<usize>,
    row_height: Option<f32>,
    column_spacing: Option<f32>,
    node_radius: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartConfigFile {
    min_node_spacing: Option<f32>,
    min_width: Option<f32>,
    level_height: Option<f32>,
    node_radius: Option<f32>,
    highlight_stroke_width: Option<f32>,
    link_width: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TooltipConfigFile {
    offset_x: Option<f32>,
    offset_y: Option<f32>,
    font_size: Option<f32>,
    no_matrix_manager: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    homepage: Option<HomepageConfigFile>,
    chart: Option<ChartConfigFile>,
    tooltip: Option<TooltipConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_config(&contents)?)
}

/// Applies a JSON5 config document on top of the defaults.
pub fn parse_config(contents: &str) -> Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(name).ok_or_else(|| OrgChartError::UnknownTheme(name.to_string()))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.label_fill {
            config.theme.label_fill = v;
        }
        if let Some(v) = vars.label_text_color {
            config.theme.label_text_color = v;
        }
        if let Some(v) = vars.highlight_fill {
            config.theme.highlight_fill = v;
        }
        if let Some(v) = vars.highlight_stroke {
            config.theme.highlight_stroke = v;
        }
        if let Some(v) = vars.node_stroke {
            config.theme.node_stroke = v;
        }
        if let Some(v) = vars.link_color {
            config.theme.link_color = v;
        }
        if let Some(mut stops) = vars.tooltip_background
            && !stops.is_empty()
        {
            let start = stops.remove(0);
            let end = stops.pop().unwrap_or_else(|| start.clone());
            config.theme.tooltip_gradient_start = start;
            config.theme.tooltip_gradient_end = end;
        }
        if let Some(v) = vars.group_colors {
            config.theme.group_colors = v;
        }
    }

    if let Some(homepage) = parsed.homepage {
        if let Some(v) = homepage.width {
            config.layout.homepage.width = v;
        }
        if let Some(v) = homepage.columns {
            config.layout.homepage.columns = v.max(1);
        }
        if let Some(v) = homepage.row_height {
            config.layout.homepage.row_height = v;
        }
        if let Some(v) = homepage.column_spacing {
            config.layout.homepage.column_spacing = v;
        }
        if let Some(v) = homepage.node_radius {
            config.layout.homepage.node_radius = v;
        }
    }

    if let Some(chart) = parsed.chart {
        if let Some(v) = chart.min_node_spacing {
            config.layout.chart.min_node_spacing = v;
        }
        if let Some(v) = chart.min_width {
            config.layout.chart.min_width = v;
        }
        if let Some(v) = chart.level_height {
            config.layout.chart.level_height = v;
        }
        if let Some(v) = chart.node_radius {
            config.layout.chart.node_radius = v;
        }
        if let Some(v) = chart.highlight_stroke_width {
            config.layout.chart.highlight_stroke_width = v;
        }
        if let Some(v) = chart.link_width {
            config.layout.chart.link_width = v;
        }
    }

    if let Some(tooltip) = parsed.tooltip {
        if let Some(v) = tooltip.offset_x {
            config.layout.tooltip.offset_x = v;
        }
        if let Some(v) = tooltip.offset_y {
            config.layout.tooltip.offset_y = v;
        }
        if let Some(v) = tooltip.font_size {
            config.layout.tooltip.font_size = v;
        }
        if let Some(v) = tooltip.no_matrix_manager {
            config.layout.tooltip.no_matrix_manager = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_geometry() {
        let config = Config::default();
        assert_eq!(config.layout.homepage.width, 350.0);
        assert_eq!(config.layout.chart.level_height, 280.0);
        assert_eq!(config.layout.chart.min_width, 1200.0);
        assert_eq!(config.theme.label_fill, "#D4A373");
    }

    #[test]
    fn json5_overrides_apply() {
        let config = parse_config(
            r##"{
                // comments are fine
                theme: "modern",
                themeVariables: { labelFill: "#123456", tooltipBackground: ["#000", "#111"] },
                chart: { levelHeight: 300 },
                homepage: { columns: 0 },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.label_fill, "#123456");
        assert_eq!(config.theme.tooltip_gradient_end, "#111");
        assert_eq!(config.layout.chart.level_height, 300.0);
        assert_eq!(config.layout.homepage.columns, 1);
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(matches!(
            parse_config("{ theme: 'neon' }"),
            Err(OrgChartError::UnknownTheme(name)) if name == "neon"
        ));
    }

    #[test]
    fn rejects_malformed_config() {
        assert!(parse_config("{ theme: ").is_err());
    }
}
