use serde::{Deserialize, Serialize};

const GROUP_COLORS: [&str; 6] = ["#FFD700", "#FF8C00", "#48C9B0", "#F39C12", "#9B59B6", "#3498DB"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub label_fill: String,
    pub label_text_color: String,
    pub highlight_fill: String,
    pub highlight_stroke: String,
    pub node_fill: String,
    pub node_stroke: String,
    pub mini_node_stroke: String,
    pub link_color: String,
    pub tooltip_gradient_start: String,
    pub tooltip_gradient_end: String,
    pub tooltip_text_color: String,
    pub group_colors: Vec<String>,
}

impl Theme {
    /// The look of the original dashboard.
    pub fn classic() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            font_size: 12.0,
            background: "#FFFFFF".to_string(),
            label_fill: "#D4A373".to_string(),
            label_text_color: "white".to_string(),
            highlight_fill: "#FF6347".to_string(),
            highlight_stroke: "red".to_string(),
            node_fill: "white".to_string(),
            node_stroke: "#333".to_string(),
            mini_node_stroke: "#ccc".to_string(),
            link_color: "#ccc".to_string(),
            tooltip_gradient_start: "#FFD700".to_string(),
            tooltip_gradient_end: "#FF8C00".to_string(),
            tooltip_text_color: "#333".to_string(),
            group_colors: GROUP_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            background: "#FFFFFF".to_string(),
            label_fill: "#3B4A63".to_string(),
            label_text_color: "#F8FAFF".to_string(),
            highlight_fill: "#D9480F".to_string(),
            highlight_stroke: "#D9480F".to_string(),
            node_fill: "#FFFFFF".to_string(),
            node_stroke: "#7A8AA6".to_string(),
            mini_node_stroke: "#C7D2E5".to_string(),
            link_color: "#C7D2E5".to_string(),
            tooltip_gradient_start: "#F8FAFF".to_string(),
            tooltip_gradient_end: "#EEF2F8".to_string(),
            tooltip_text_color: "#1C2430".to_string(),
            group_colors: GROUP_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Accent color for the group at `index`, cycling through the palette.
    pub fn group_color(&self, index: usize) -> &str {
        if self.group_colors.is_empty() {
            return self.label_fill.as_str();
        }
        self.group_colors[index % self.group_colors.len()].as_str()
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
