use crate::config::{Config, RenderConfig, TooltipConfig};
use crate::scene::{Fill, Point, Primitive, Scene, SceneNode, TextRole, fmt_num};
use crate::theme::Theme;
use crate::tooltip::{TooltipContent, TooltipHost, TooltipRow};
use crate::GroupChartsRender;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

pub fn render_svg(scene: &Scene, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = fmt_num(scene.width);
    let height = fmt_num(scene.height);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" data-surface=\"{}\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        escape_xml(&scene.surface_id)
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    svg.push_str("<defs>");
    for def in &scene.defs {
        let href = escape_xml(&def.href);
        svg.push_str(&format!(
            "<pattern id=\"{}\" patternUnits=\"objectBoundingBox\" width=\"1\" height=\"1\"><image href=\"{href}\" xlink:href=\"{href}\" width=\"{size}\" height=\"{size}\" x=\"{offset}\" y=\"{offset}\"/></pattern>",
            escape_xml(&def.id),
            size = fmt_num(def.size),
            offset = fmt_num(def.offset),
        ));
    }
    svg.push_str("</defs>");

    let (tx, ty) = scene.translate;
    svg.push_str(&format!(
        "<g transform=\"translate({}, {})\">",
        fmt_num(tx),
        fmt_num(ty)
    ));

    for edge in &scene.edges {
        svg.push_str(&format!(
            "<path class=\"link\" data-from=\"{}\" data-to=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            escape_xml(&edge.from),
            escape_xml(&edge.to),
            edge.path_data(),
            escape_xml(&edge.stroke),
            fmt_num(edge.stroke_width)
        ));
    }

    for node in &scene.nodes {
        svg.push_str(&node_svg(node, theme));
    }

    svg.push_str("</g></svg>");
    svg
}

fn node_svg(node: &SceneNode, theme: &Theme) -> String {
    let class = if node.highlighted { "node highlighted" } else { "node" };
    let mut out = format!(
        "<g class=\"{class}\" data-employee-id=\"{}\" transform=\"translate({}, {})\">",
        escape_xml(&node.id),
        fmt_num(node.x),
        fmt_num(node.y)
    );
    out.push_str(&format!(
        "<title>{}</title>",
        escape_xml(&node.tooltip.to_plain_text())
    ));

    for primitive in &node.primitives {
        match primitive {
            Primitive::Circle {
                r,
                fill,
                stroke,
                stroke_width,
            } => {
                let fill = match fill {
                    Fill::Color(color) => escape_xml(color),
                    Fill::Pattern(id) => format!("url(#{})", escape_xml(id)),
                };
                out.push_str(&format!(
                    "<circle r=\"{}\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    fmt_num(*r),
                    escape_xml(stroke),
                    fmt_num(*stroke_width)
                ));
            }
            Primitive::Rect {
                rect,
                corner_radius,
                fill,
            } => {
                out.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"{radius}\" ry=\"{radius}\"/>",
                    fmt_num(rect.x),
                    fmt_num(rect.y),
                    fmt_num(rect.width),
                    fmt_num(rect.height),
                    escape_xml(fill),
                    radius = fmt_num(*corner_radius)
                ));
            }
            Primitive::Text {
                dy,
                content,
                role,
                fill,
                bold,
            } => {
                let class = match role {
                    TextRole::Name => "employee-name",
                    TextRole::Title => "employee-title",
                };
                let weight = if *bold { " font-weight=\"bold\"" } else { "" };
                out.push_str(&format!(
                    "<text dy=\"{}\" text-anchor=\"middle\" class=\"{class}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"{weight}>{}</text>",
                    fmt_num(*dy),
                    escape_xml(&theme.font_family),
                    fmt_num(theme.font_size),
                    escape_xml(fill),
                    escape_xml(content)
                ));
            }
        }
    }

    out.push_str("</g>");
    out
}

/// Floating panel markup for a tooltip at `position` (page coordinates).
pub fn tooltip_panel_html(
    content: &TooltipContent,
    position: Point,
    theme: &Theme,
    config: &TooltipConfig,
) -> String {
    let mut html = format!(
        "<div class=\"tooltip\" data-employee-id=\"{}\" style=\"position: absolute; background: linear-gradient(135deg, {}, {}); border-radius: {}px; padding: {}px; color: {}; font-size: {}px; box-shadow: 0px 4px 8px rgba(0, 0, 0, 0.2); left: {}px; top: {}px\">",
        escape_xml(&content.employee_id),
        escape_xml(&theme.tooltip_gradient_start),
        escape_xml(&theme.tooltip_gradient_end),
        fmt_num(config.border_radius),
        fmt_num(config.padding),
        escape_xml(&theme.tooltip_text_color),
        fmt_num(config.font_size),
        fmt_num(position.x),
        fmt_num(position.y)
    );
    for row in &content.rows {
        match row {
            TooltipRow::Heading(text) => {
                html.push_str(&format!("<p><strong>{}</strong></p>", escape_xml(text)));
            }
            TooltipRow::Field {
                label,
                value,
                strong: true,
            } => {
                html.push_str(&format!(
                    "<p><strong>{label}:</strong> {}</p>",
                    escape_xml(value)
                ));
            }
            TooltipRow::Field { label, value, .. } => {
                html.push_str(&format!("<p>{label}: {}</p>", escape_xml(value)));
            }
            TooltipRow::Divider => html.push_str("<hr>"),
        }
    }
    html.push_str("</div>");
    html
}

/// Tooltip host that keeps live panels as HTML fragments, keyed by panel id.
#[derive(Debug, Clone)]
pub struct HtmlTooltipHost {
    theme: Theme,
    config: TooltipConfig,
    next_id: u64,
    panels: BTreeMap<u64, (TooltipContent, Point)>,
}

impl HtmlTooltipHost {
    pub fn new(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            config: config.layout.tooltip.clone(),
            next_id: 0,
            panels: BTreeMap::new(),
        }
    }

    /// Markup of every live panel, oldest first.
    pub fn panels_html(&self) -> Vec<String> {
        self.panels
            .values()
            .map(|(content, position)| {
                tooltip_panel_html(content, *position, &self.theme, &self.config)
            })
            .collect()
    }
}

impl TooltipHost for HtmlTooltipHost {
    type Panel = u64;

    fn create_panel(&mut self, content: &TooltipContent, position: Point) -> u64 {
        self.next_id += 1;
        self.panels.insert(self.next_id, (content.clone(), position));
        self.next_id
    }

    fn move_panel(&mut self, panel: &u64, position: Point) {
        if let Some(entry) = self.panels.get_mut(panel) {
            entry.1 = position;
        }
    }

    fn remove_panel(&mut self, panel: u64) {
        self.panels.remove(&panel);
    }
}

const PAGE_STYLE: &str = "body { font-family: Arial, Helvetica, sans-serif; margin: 24px; } \
.groups { display: flex; flex-wrap: wrap; gap: 24px; } \
.group h3 { margin: 0 0 8px 0; padding: 8px 12px; border-radius: 8px; color: #333; } \
.group .count { margin: 0 0 8px 0; color: #555; }";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{PAGE_STYLE}</style></head><body>{body}</body></html>",
        escape_xml(title)
    )
}

/// Homepage document: one container per group key, in key order. Skipped
/// groups keep their heading but their container stays empty.
pub fn render_homepage(render: &GroupChartsRender, config: &Config) -> String {
    let mut sections: Vec<(usize, String)> = Vec::new();
    for chart in &render.charts {
        sections.push((
            chart.index,
            group_section(
                chart.index,
                &chart.group_key,
                Some(chart.total_count),
                Some(render_svg(&chart.scene, &config.theme)),
                &config.theme,
            ),
        ));
    }
    for skipped in &render.skipped {
        sections.push((
            skipped.index,
            group_section(skipped.index, &skipped.group_key, None, None, &config.theme),
        ));
    }
    sections.sort_by_key(|(index, _)| *index);

    let mut body = String::from("<div class=\"groups\">");
    for (_, section) in sections {
        body.push_str(&section);
    }
    body.push_str("</div>");
    page("Organization overview", &body)
}

fn group_section(
    index: usize,
    group_key: &str,
    total_count: Option<usize>,
    svg: Option<String>,
    theme: &Theme,
) -> String {
    let mut out = format!(
        "<section class=\"group\"><h3 style=\"background: {}\">{}</h3>",
        escape_xml(theme.group_color(index)),
        escape_xml(group_key)
    );
    if let Some(total) = total_count {
        out.push_str(&format!("<p class=\"count\">{total} employees</p>"));
    }
    out.push_str(&format!(
        "<div id=\"{}\">{}</div></section>",
        crate::layout::mini_chart_surface_id(index),
        svg.unwrap_or_default()
    ));
    out
}

/// Full chart document with the scene inside its `chart` container.
pub fn render_chart_page(scene: &Scene, title: &str, config: &Config) -> String {
    let body = format!(
        "<h2>{}</h2><div id=\"{}\">{}</div>",
        escape_xml(title),
        escape_xml(&scene.surface_id),
        render_svg(scene, &config.theme)
    );
    page(title, &body)
}

pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(1600.0, 2160.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid default canvas size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.trim().strip_prefix('#')?;
    let (r, g, b) = match hex.len() {
        6 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            (digit(0)?, digit(1)?, digit(2)?)
        }
        _ => return None,
    };
    Some(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255))
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
