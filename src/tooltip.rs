use serde::Serialize;

use crate::config::TooltipConfig;
use crate::ir::EmployeeRecord;
use crate::scene::{Hotspot, Point, Scene};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TooltipRow {
    Heading(String),
    Field {
        label: &'static str,
        value: String,
        strong: bool,
    },
    Divider,
}

/// What a tooltip panel shows for one employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub employee_id: String,
    pub rows: Vec<TooltipRow>,
}

fn field(label: &'static str, value: Option<&str>) -> TooltipRow {
    TooltipRow::Field {
        label,
        value: value.unwrap_or_default().to_string(),
        strong: false,
    }
}

fn base_rows(record: &EmployeeRecord) -> Vec<TooltipRow> {
    vec![
        TooltipRow::Heading(record.name().to_string()),
        field("Employee ID", Some(record.employee_id.as_str())),
        field("Email", record.email.as_deref()),
        field("Title", record.title.as_deref()),
        field("City", record.city.as_deref()),
        field("Cost Center", record.cost_center.as_deref()),
    ]
}

impl TooltipContent {
    /// Homepage panel: common fields plus manager name and the group as division.
    pub fn homepage(record: &EmployeeRecord, group_key: &str) -> Self {
        let mut rows = base_rows(record);
        rows.push(field("Manager", record.manager_name.as_deref()));
        rows.push(field("Division (UBR Level)", Some(group_key)));
        Self {
            employee_id: record.employee_id.clone(),
            rows,
        }
    }

    /// Full chart panel: common fields plus direct manager, manager id and matrix manager.
    pub fn chart(record: &EmployeeRecord, config: &TooltipConfig) -> Self {
        let mut rows = base_rows(record);
        rows.push(TooltipRow::Divider);
        rows.push(TooltipRow::Field {
            label: "Direct Manager",
            value: record.manager_name.clone().unwrap_or_default(),
            strong: true,
        });
        rows.push(field("Manager ID", record.manager_employee_id.as_deref()));
        let matrix = record
            .matrix_manager_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(config.no_matrix_manager.as_str());
        rows.push(TooltipRow::Field {
            label: "Matrix Manager",
            value: matrix.to_string(),
            strong: true,
        });
        Self {
            employee_id: record.employee_id.clone(),
            rows,
        }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows.iter().find_map(|row| match row {
            TooltipRow::Field { label: l, value, .. } if *l == label => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn to_plain_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            match row {
                TooltipRow::Heading(text) => lines.push(text.clone()),
                TooltipRow::Field { label, value, .. } => lines.push(format!("{label}: {value}")),
                TooltipRow::Divider => lines.push("--".to_string()),
            }
        }
        lines.join("\n")
    }
}

/// The drawing environment that owns floating panels.
pub trait TooltipHost {
    type Panel;

    fn create_panel(&mut self, content: &TooltipContent, position: Point) -> Self::Panel;
    fn move_panel(&mut self, panel: &Self::Panel, position: Point);
    fn remove_panel(&mut self, panel: Self::Panel);
}

struct ActivePanel<P> {
    panel: P,
    employee_id: String,
}

/// Owns at most one live tooltip panel on its host.
pub struct TooltipController<H: TooltipHost> {
    host: H,
    active: Option<ActivePanel<H::Panel>>,
    offset: (f32, f32),
}

impl<H: TooltipHost> TooltipController<H> {
    pub fn new(host: H, config: &TooltipConfig) -> Self {
        Self {
            host,
            active: None,
            offset: (config.offset_x, config.offset_y),
        }
    }

    fn place(&self, pointer: Point) -> Point {
        Point::new(pointer.x + self.offset.0, pointer.y + self.offset.1)
    }

    /// Replaces any live panel with a new one for `content`.
    pub fn show(&mut self, content: &TooltipContent, pointer: Point) {
        self.hide();
        let panel = self.host.create_panel(content, self.place(pointer));
        self.active = Some(ActivePanel {
            panel,
            employee_id: content.employee_id.clone(),
        });
    }

    pub fn move_to(&mut self, pointer: Point) {
        let position = self.place(pointer);
        if let Some(active) = &self.active {
            self.host.move_panel(&active.panel, position);
        }
    }

    pub fn hide(&mut self) {
        if let Some(active) = self.active.take() {
            self.host.remove_panel(active.panel);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_employee(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.employee_id.as_str())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(mut self) -> H {
        self.hide();
        self.host
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Enter { node_id: String, position: Point },
    Move { position: Point },
    Leave,
}

/// Wires pointer input on a scene to its tooltip controller.
pub struct ChartInteraction<H: TooltipHost> {
    hotspots: Vec<Hotspot>,
    controller: TooltipController<H>,
    hovered: Option<usize>,
}

impl<H: TooltipHost> ChartInteraction<H> {
    pub fn new(scene: &Scene, host: H, config: &TooltipConfig) -> Self {
        Self {
            hotspots: scene.hotspots(),
            controller: TooltipController::new(host, config),
            hovered: None,
        }
    }

    pub fn dispatch(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Enter { node_id, position } => {
                let Some(idx) = self.hotspots.iter().position(|h| h.node_id == node_id) else {
                    return;
                };
                self.enter(idx, position);
            }
            PointerEvent::Move { position } => {
                if self.hovered.is_some() {
                    self.controller.move_to(position);
                }
            }
            PointerEvent::Leave => {
                self.hovered = None;
                self.controller.hide();
            }
        }
    }

    /// Hit-tests a raw pointer position and emits the implied enter/move/leave.
    pub fn pointer_at(&mut self, position: Point) {
        // Later nodes are drawn on top, so they win overlaps.
        let hit = self.hotspots.iter().rposition(|h| h.contains(position));
        match (hit, self.hovered) {
            (Some(idx), Some(current)) if idx == current => self.controller.move_to(position),
            (Some(idx), _) => self.enter(idx, position),
            (None, Some(_)) => self.dispatch(PointerEvent::Leave),
            (None, None) => {}
        }
    }

    fn enter(&mut self, idx: usize, position: Point) {
        self.hovered = Some(idx);
        let content = self.hotspots[idx].tooltip.clone();
        self.controller.show(&content, position);
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.map(|idx| self.hotspots[idx].node_id.as_str())
    }

    pub fn controller(&self) -> &TooltipController<H> {
        &self.controller
    }
}
