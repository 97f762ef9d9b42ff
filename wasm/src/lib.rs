use orgchart_renderer::{
    Config, OrgChartError, Theme, parse_employees, parse_grouped, render_full_chart, render_group_charts,
    render_homepage, render_svg,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgChartRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

fn build_config(options: OrgChartRenderOptions) -> Result<Config, String> {
    let mut config = Config::default();
    if let Some(name) = options.theme.as_deref() {
        let theme = Theme::by_name(name).ok_or_else(|| OrgChartError::UnknownTheme(name.to_string()).to_string())?;
        config.render.background = theme.background.clone();
        config.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    Ok(config)
}

fn parse_options(options_json: Option<String>) -> Result<Config, JsValue> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<OrgChartRenderOptions>(&raw)
            .map_err(|error| JsValue::from_str(&error.to_string()))?,
        None => OrgChartRenderOptions::default(),
    };
    build_config(options).map_err(|error| JsValue::from_str(&error))
}

fn full_chart_svg(employees_json: &str, highlight: Option<&str>, config: &Config) -> Result<String, String> {
    let employees = parse_employees(employees_json).map_err(|error| error.to_string())?;
    let scene = render_full_chart(&employees.data, highlight, config);
    Ok(render_svg(&scene, &config.theme))
}

fn group_charts_html(grouped_json: &str, config: &Config) -> Result<String, String> {
    let grouped = parse_grouped(grouped_json).map_err(|error| error.to_string())?;
    let render = render_group_charts(&grouped.data, config);
    Ok(render_homepage(&render, config))
}

/// Renders the full hierarchy chart for a JSON array of employee rows.
#[wasm_bindgen]
pub fn render_full_chart_svg(
    employees_json: &str,
    highlight: Option<String>,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let config = parse_options(options_json)?;
    full_chart_svg(employees_json, highlight.as_deref(), &config).map_err(|error| JsValue::from_str(&error))
}

/// Renders the homepage document for a grouped JSON mapping.
#[wasm_bindgen]
pub fn render_group_charts_html(grouped_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json)?;
    group_charts_html(grouped_json, &config).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{OrgChartRenderOptions, build_config, full_chart_svg, group_charts_html};

    #[test]
    fn renders_highlighted_chart() {
        let employees = r#"[
            {"Employee ID": "1", "Preferred Name": "Boss", "Worker Corporate Title": "Managing Director"},
            {"Employee ID": "2", "Preferred Name": "Report", "Worker Corporate Title": "Director",
             "Organization Manager Employee ID": "1"}
        ]"#;
        let config = build_config(OrgChartRenderOptions::default()).expect("default options");
        let svg = full_chart_svg(employees, Some("2"), &config).expect("chart should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Boss"));
        assert!(svg.contains("#FF6347"));
    }

    #[test]
    fn renders_group_containers() {
        let grouped = r#"{
            "Markets": {
                "employees": [{"Employee ID": "1", "Worker Corporate Title": "Director", "UBR Level 8": "Markets"}],
                "total_count": 3,
                "employee_ids": ["1"]
            }
        }"#;
        let options = OrgChartRenderOptions {
            theme: Some("modern".to_string()),
            ..Default::default()
        };
        let html = group_charts_html(grouped, &build_config(options).expect("modern theme")).expect("homepage should render");

        assert!(html.contains("id=\"mini-chart-1\""));
        assert!(html.contains("3 employees"));
    }

    #[test]
    fn rejects_non_array_input() {
        let config = build_config(OrgChartRenderOptions::default()).expect("default options");
        assert!(full_chart_svg("{\"rows\": 1}", None, &config).is_err());
    }

    #[test]
    fn rejects_unknown_theme_option() {
        let options = OrgChartRenderOptions {
            theme: Some("neon".to_string()),
            ..Default::default()
        };
        let error = build_config(options).unwrap_err();
        assert!(error.contains("unknown theme: neon"));
    }
}
