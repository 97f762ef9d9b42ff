//! Shaping of raw report rows into the inputs of the two chart views.

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{OrgChartError, Result};
use crate::ir::{EmployeeRecord, GroupData, GroupedData};
use crate::layout::TitleHierarchy;

/// Pseudo-division selected by cost center rather than group key.
pub const CCAR_DIVISION: &str = "CCAR";
const CCAR_COST_CENTER: &str = "ccar team";
const CONTINGENT_WORKER: &str = "contingent worker";
const MANAGER_ID_LEN: usize = 7;

static NON_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").unwrap());
static CONTINGENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^contingent worker\s*/\s*person of interest$").unwrap());

fn digits(value: &str) -> String {
    NON_DIGIT_RE.replace_all(value, "").into_owned()
}

/// Capitalizes the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Drops the leading code token of a group label (`"8123 Markets"` -> `"Markets"`).
pub fn strip_group_code(value: &str) -> String {
    match value.split_once(' ') {
        Some((_, rest)) => rest.to_string(),
        None => value.to_string(),
    }
}

fn or_placeholder(value: Option<String>, placeholder: &str) -> Option<String> {
    Some(value.unwrap_or_else(|| placeholder.to_string()))
}

pub fn normalize_record(mut record: EmployeeRecord) -> EmployeeRecord {
    record.employee_id = digits(&record.employee_id);
    record.title = Some(match record.title.take() {
        Some(title) => title_case(title.trim()),
        None => "No Title".to_string(),
    });
    record.manager_employee_id = record
        .manager_employee_id
        .take()
        .map(|id| digits(&id).chars().take(MANAGER_ID_LEN).collect::<String>())
        .filter(|id| !id.is_empty());
    record.group_level_key = Some(match record.group_level_key.take() {
        Some(key) => strip_group_code(&key),
        None => "Unknown".to_string(),
    });
    record.worker_type = Some(match record.worker_type.take() {
        Some(kind) => {
            let kind = kind.trim();
            if CONTINGENT_RE.is_match(kind) {
                CONTINGENT_WORKER.to_string()
            } else {
                kind.to_lowercase()
            }
        }
        None => "unknown".to_string(),
    });
    record.preferred_name = or_placeholder(record.preferred_name, "Not Available");
    record.email = or_placeholder(record.email, "No Email Provided");
    record.city = or_placeholder(record.city, "Unknown City");
    record.cost_center = or_placeholder(record.cost_center, "Not Assigned");
    record.manager_name = or_placeholder(record.manager_name, "No Manager");
    record.manager_email = or_placeholder(record.manager_email, "No Email");
    record.matrix_manager_name = or_placeholder(record.matrix_manager_name, "No Matrix Manager");
    record
}

/// Normalizes every record, dropping the ones whose id has no digits left.
pub fn normalize_records(records: Vec<EmployeeRecord>) -> Vec<EmployeeRecord> {
    records
        .into_iter()
        .filter_map(|record| {
            let original = record.employee_id.clone();
            let record = normalize_record(record);
            if record.employee_id.is_empty() {
                tracing::warn!(employee_id = %original, "dropping record without a numeric employee id");
                return None;
            }
            Some(record)
        })
        .collect()
}

pub fn is_contingent(record: &EmployeeRecord) -> bool {
    record.worker_type.as_deref() == Some(CONTINGENT_WORKER)
}

fn is_ccar(record: &EmployeeRecord) -> bool {
    record
        .cost_center
        .as_deref()
        .is_some_and(|center| center.to_lowercase().contains(CCAR_COST_CENTER))
}

fn unique_group_keys(records: &[EmployeeRecord]) -> IndexSet<&str> {
    records.iter().filter_map(EmployeeRecord::group_key).collect()
}

/// Group keys in first-seen order, followed by the CCAR pseudo-division.
pub fn division_names(records: &[EmployeeRecord]) -> Vec<String> {
    let mut names: Vec<String> = unique_group_keys(records)
        .into_iter()
        .map(str::to_string)
        .collect();
    names.push(CCAR_DIVISION.to_string());
    names
}

/// Homepage input: per group, its directors (or most senior members when it
/// has none), the group's headcount and the ids allowed on its mini chart.
pub fn group_summaries(records: &[EmployeeRecord]) -> GroupedData {
    let staff: Vec<&EmployeeRecord> = records.iter().filter(|r| !is_contingent(r)).collect();
    let mut grouped = GroupedData::new();

    for key in staff.iter().filter_map(|r| r.group_key()).collect::<IndexSet<&str>>() {
        let level: Vec<&EmployeeRecord> = staff
            .iter()
            .copied()
            .filter(|r| r.group_key() == Some(key))
            .collect();

        let mut leaders: Vec<&EmployeeRecord> = level
            .iter()
            .copied()
            .filter(|r| matches!(TitleHierarchy::rank_of(r), Some(1 | 2)))
            .collect();
        if leaders.is_empty()
            && let Some(best) = level.iter().filter_map(|r| TitleHierarchy::rank_of(r)).min()
        {
            leaders = level
                .iter()
                .copied()
                .filter(|r| TitleHierarchy::rank_of(r) == Some(best))
                .collect();
        }

        grouped.insert(
            key.to_string(),
            GroupData {
                employee_ids: leaders.iter().map(|r| r.employee_id.clone()).collect(),
                employees: leaders.into_iter().cloned().collect(),
                total_count: level.len(),
            },
        );
    }
    grouped
}

fn division_members<'a>(records: &'a [EmployeeRecord], division: &str) -> Vec<&'a EmployeeRecord> {
    records
        .iter()
        .filter(|r| !is_contingent(r))
        .filter(|r| {
            if division == CCAR_DIVISION {
                is_ccar(r)
            } else {
                r.group_key() == Some(division)
            }
        })
        .collect()
}

fn rank_order(a: &EmployeeRecord, b: &EmployeeRecord) -> Ordering {
    match (TitleHierarchy::rank_of(a), TitleHierarchy::rank_of(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Full chart input for one division, most senior titles first.
pub fn division_chart(records: &[EmployeeRecord], division: &str) -> Result<Vec<EmployeeRecord>> {
    if division != CCAR_DIVISION && !unique_group_keys(records).contains(division) {
        return Err(OrgChartError::UnknownDivision(division.to_string()));
    }

    let mut members: Vec<EmployeeRecord> = division_members(records, division)
        .into_iter()
        .cloned()
        .collect();
    if members.is_empty() {
        return Err(OrgChartError::EmptyDivision(division.to_string()));
    }

    let missing = members.iter().filter(|r| r.title.is_none()).count();
    if missing > 0 {
        return Err(OrgChartError::MissingTitles {
            division: division.to_string(),
            count: missing,
        });
    }

    members.sort_by(rank_order);
    Ok(members)
}

/// Manager display name -> names of their direct reports within a division.
pub fn manager_roster(records: &[EmployeeRecord], division: &str) -> IndexMap<String, Vec<String>> {
    let division = if division.contains(CCAR_DIVISION) {
        CCAR_DIVISION
    } else {
        division
    };
    let mut by_manager: IndexMap<Option<&str>, (String, Vec<String>)> = IndexMap::new();
    for record in division_members(records, division) {
        let entry = by_manager.entry(record.manager_id()).or_insert_with(|| {
            let name = record.manager_name.clone().unwrap_or_else(|| "No Manager".to_string());
            (name, Vec::new())
        });
        entry.1.push(record.name().to_string());
    }

    let mut roster = IndexMap::new();
    for (_, (manager, reports)) in by_manager {
        roster.insert(manager, reports);
    }
    roster
}
