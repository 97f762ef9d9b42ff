use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{OrgChartError, Result};

/// Placeholder avatar used when a record carries no `profile_image`.
pub const DEFAULT_PROFILE_IMAGE: &str = "/static/img/dummy-profile.png";

/// One employee row as delivered by the data source.
///
/// Field names follow the report columns exactly (case and spacing sensitive).
/// Only `Employee ID` is required; every display field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "Employee ID", deserialize_with = "required_string")]
    pub employee_id: String,
    #[serde(
        rename = "Preferred Name",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_name: Option<String>,
    #[serde(
        rename = "Worker Corporate Title",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        rename = "Email - Work",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        rename = "Location Address - City",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<String>,
    #[serde(
        rename = "Cost Center Name",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_center: Option<String>,
    #[serde(
        rename = "Organization Manager",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_name: Option<String>,
    #[serde(
        rename = "Organization Manager Employee ID",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_employee_id: Option<String>,
    #[serde(
        rename = "Organization Manager Email",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_email: Option<String>,
    #[serde(
        rename = "Matrix Manager",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub matrix_manager_name: Option<String>,
    #[serde(
        rename = "UBR Level 8",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_level_key: Option<String>,
    #[serde(
        rename = "Worker Type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub worker_type: Option<String>,
    #[serde(
        rename = "profile_image",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_image_url: Option<String>,
}

impl EmployeeRecord {
    pub fn new(id: &str) -> Self {
        Self {
            employee_id: id.to_string(),
            ..Default::default()
        }
    }

    /// Manager reference usable for edge lookup, matched verbatim against ids.
    /// Blank values count as absent.
    pub fn manager_id(&self) -> Option<&str> {
        self.manager_employee_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    pub fn avatar_href(&self) -> &str {
        self.profile_image_url
            .as_deref()
            .filter(|href| !href.trim().is_empty())
            .unwrap_or(DEFAULT_PROFILE_IMAGE)
    }

    pub fn name(&self) -> &str {
        self.preferred_name.as_deref().unwrap_or("")
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn group_key(&self) -> Option<&str> {
        self.group_level_key.as_deref()
    }
}

/// Pre-grouped homepage data for one group key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupData {
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
    #[serde(default, alias = "totalCount")]
    pub total_count: usize,
    #[serde(default, alias = "employeeIds", deserialize_with = "lenient_string_vec")]
    pub employee_ids: Vec<String>,
}

/// Group key -> group data, in document order of the keys.
pub type GroupedData = IndexMap<String, GroupData>;

/// An input row that could not become an [`EmployeeRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub data: T,
    pub rejected: Vec<RejectedRow>,
}

/// Converts raw rows into typed records, flagging rows without an employee id
/// instead of letting them flow into rendering.
pub fn ingest_records(rows: Vec<Value>) -> Ingested<Vec<EmployeeRecord>> {
    let mut data = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<EmployeeRecord>(row) {
            Ok(record) if record.employee_id.trim().is_empty() => {
                rejected.push(RejectedRow {
                    index,
                    reason: "empty Employee ID".to_string(),
                });
            }
            Ok(record) => data.push(record),
            Err(err) => rejected.push(RejectedRow {
                index,
                reason: err.to_string(),
            }),
        }
    }
    for row in &rejected {
        tracing::warn!(row = row.index, reason = %row.reason, "rejected employee row");
    }
    Ingested { data, rejected }
}

/// Parses a flat employee list. Accepts either a bare array of rows or an
/// object carrying the rows under `all_employees`.
pub fn parse_employees(input: &str) -> Result<Ingested<Vec<EmployeeRecord>>> {
    let value: Value = serde_json::from_str(input)?;
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("all_employees") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(OrgChartError::UnexpectedShape {
                    expected: "an array of employee rows",
                });
            }
        },
        _ => {
            return Err(OrgChartError::UnexpectedShape {
                expected: "an array of employee rows",
            });
        }
    };
    Ok(ingest_records(rows))
}

#[derive(Deserialize)]
struct RawGroupData {
    #[serde(default)]
    employees: Vec<Value>,
    #[serde(default, alias = "totalCount")]
    total_count: usize,
    #[serde(default, alias = "employeeIds", deserialize_with = "lenient_string_vec")]
    employee_ids: Vec<String>,
}

/// Parses the homepage mapping `{ group key: { employees, total_count, employee_ids } }`,
/// keeping the key order of the document.
pub fn parse_grouped(input: &str) -> Result<Ingested<GroupedData>> {
    let raw: IndexMap<String, Option<RawGroupData>> = serde_json::from_str(input)?;
    let mut data = GroupedData::new();
    let mut rejected = Vec::new();
    for (key, group) in raw {
        let group = group.unwrap_or(RawGroupData {
            employees: Vec::new(),
            total_count: 0,
            employee_ids: Vec::new(),
        });
        let ingested = ingest_records(group.employees);
        rejected.extend(ingested.rejected);
        data.insert(
            key,
            GroupData {
                employees: ingested.data,
                total_count: group.total_count,
                employee_ids: group.employee_ids,
            },
        );
    }
    Ok(Ingested { data, rejected })
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 1e15) {
                Some(format!("{}", f as i64))
            } else {
                Some(n.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_string))
}

fn required_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer)?.ok_or_else(|| D::Error::custom("Employee ID is null"))
}

fn lenient_string_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.into_iter().filter_map(value_to_string).collect())
}
