use std::collections::HashSet;

use crate::config::HomepageConfig;
use crate::ir::{EmployeeRecord, GroupData, GroupedData};

use super::{GroupLayouts, MiniChartLayout, NodeLayout, SkipReason, SkippedGroup};

pub fn mini_chart_surface_id(index: usize) -> String {
    format!("mini-chart-{}", index + 1)
}

/// Records of `group` that carry `group_key` themselves and are listed in the
/// group's valid ids, in input order.
pub fn resolve_group<'a>(
    group_key: &str,
    group: &'a GroupData,
) -> Result<Vec<&'a EmployeeRecord>, SkipReason> {
    if group.employees.is_empty() {
        return Err(SkipReason::NoEmployees);
    }

    let same_group: Vec<&EmployeeRecord> = group
        .employees
        .iter()
        .filter(|record| record.group_key() == Some(group_key))
        .collect();
    if same_group.is_empty() {
        return Err(SkipReason::GroupKeyMismatch);
    }

    let valid: HashSet<&str> = group.employee_ids.iter().map(String::as_str).collect();
    let members: Vec<&EmployeeRecord> = same_group
        .into_iter()
        .filter(|record| valid.contains(record.employee_id.as_str()))
        .collect();
    if members.is_empty() {
        return Err(SkipReason::NoValidIds);
    }
    Ok(members)
}

/// Grid cell origin of the `index`-th member.
pub fn grid_position(index: usize, config: &HomepageConfig) -> (f32, f32) {
    let columns = config.columns.max(1);
    let column = index % columns;
    let row = index / columns;
    (
        config.origin_x + column as f32 * config.column_spacing,
        row as f32 * config.row_height + config.origin_y,
    )
}

/// Canvas height: one row per `columns` members, never less than a single row.
pub fn mini_chart_height(count: usize, config: &HomepageConfig) -> f32 {
    let rows = count.div_ceil(config.columns.max(1));
    config.row_height.max(config.row_height * rows as f32)
}

pub fn compute_group_layouts(grouped: &GroupedData, config: &HomepageConfig) -> GroupLayouts {
    let mut layouts = GroupLayouts::default();

    for (index, (group_key, group)) in grouped.iter().enumerate() {
        let surface_id = mini_chart_surface_id(index);
        let members = match resolve_group(group_key, group) {
            Ok(members) => members,
            Err(reason) => {
                tracing::warn!(
                    group = %group_key,
                    surface = %surface_id,
                    "{} for UBR level: {group_key}",
                    reason.describe()
                );
                layouts.skipped.push(SkippedGroup {
                    group_key: group_key.clone(),
                    index,
                    surface_id,
                    reason,
                });
                continue;
            }
        };

        let nodes: Vec<NodeLayout> = members
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                let (x, y) = grid_position(idx, config);
                NodeLayout {
                    id: record.employee_id.clone(),
                    x,
                    y,
                    level: None,
                    index: idx,
                    employee: record.clone(),
                }
            })
            .collect();

        // Sized from the members that survive both filters, so every drawn row fits.
        let height = mini_chart_height(nodes.len(), config);
        tracing::debug!(group = %group_key, nodes = nodes.len(), height, "mini chart layout");
        layouts.charts.push(MiniChartLayout {
            group_key: group_key.clone(),
            surface_id,
            index,
            total_count: group.total_count,
            width: config.width,
            height,
            nodes,
        });
    }

    layouts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, key: &str) -> EmployeeRecord {
        EmployeeRecord {
            group_level_key: Some(key.to_string()),
            ..EmployeeRecord::new(id)
        }
    }

    fn group(employees: Vec<EmployeeRecord>, ids: &[&str]) -> GroupData {
        GroupData {
            total_count: employees.len(),
            employees,
            employee_ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[test]
    fn grid_positions_fill_two_columns() {
        let config = HomepageConfig::default();
        assert_eq!(grid_position(0, &config), (60.0, 30.0));
        assert_eq!(grid_position(1, &config), (210.0, 30.0));
        assert_eq!(grid_position(2, &config), (60.0, 150.0));
        assert_eq!(grid_position(5, &config), (210.0, 270.0));
    }

    #[test]
    fn height_grows_by_row() {
        let config = HomepageConfig::default();
        assert_eq!(mini_chart_height(0, &config), 120.0);
        assert_eq!(mini_chart_height(1, &config), 120.0);
        assert_eq!(mini_chart_height(2, &config), 120.0);
        assert_eq!(mini_chart_height(3, &config), 240.0);
        assert_eq!(mini_chart_height(7, &config), 480.0);
    }

    #[test]
    fn member_needs_group_key_and_valid_id() {
        let data = group(
            vec![
                member("1", "Markets"),
                member("2", "Treasury"),
                member("3", "Markets"),
                member("4", "Markets"),
            ],
            &["1", "2", "4"],
        );
        let members = resolve_group("Markets", &data).unwrap();
        let ids: Vec<&str> = members.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn skip_reasons() {
        let empty = group(Vec::new(), &[]);
        assert_eq!(resolve_group("L1", &empty).unwrap_err(), SkipReason::NoEmployees);

        let mismatched = group(vec![member("1", "Other")], &["1"]);
        assert_eq!(
            resolve_group("L1", &mismatched).unwrap_err(),
            SkipReason::GroupKeyMismatch
        );

        let invalid = group(vec![member("1", "L1")], &["9"]);
        assert_eq!(resolve_group("L1", &invalid).unwrap_err(), SkipReason::NoValidIds);
    }

    #[test]
    fn surfaces_follow_key_order_including_skipped_groups() {
        let mut grouped = GroupedData::new();
        grouped.insert("L1".to_string(), group(Vec::new(), &[]));
        grouped.insert(
            "L2".to_string(),
            group(vec![member("1", "L2"), member("2", "L2"), member("3", "L2")], &["1", "2", "3"]),
        );
        let layouts = compute_group_layouts(&grouped, &HomepageConfig::default());
        assert_eq!(layouts.skipped.len(), 1);
        assert_eq!(layouts.skipped[0].surface_id, "mini-chart-1");
        assert_eq!(layouts.charts.len(), 1);
        let chart = &layouts.charts[0];
        assert_eq!(chart.surface_id, "mini-chart-2");
        assert_eq!(chart.width, 350.0);
        assert_eq!(chart.height, 240.0);
        assert_eq!(chart.nodes.len(), 3);
        assert_eq!((chart.nodes[2].x, chart.nodes[2].y), (60.0, 150.0));
    }
}
