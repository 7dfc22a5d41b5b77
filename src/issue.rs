// Issue model and the conversion from YouTrack's custom-field payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field selector sent with every issue query. It asks YouTrack for the
/// custom fields together with the nested `name`, `presentation` and
/// `minutes` attributes the conversion below reads.
pub const ISSUE_FIELDS: &str = "$type,created,customFields($type,id,name,value($type,id,name,presentation,minutes)),description,id,idReadable,numberInProject,project($type,id,name,shortName),reporter($type,id,login,ringId),resolved,summary,updated";

/// Time already booked on an issue, as reported by the `Spent time` field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpentTime {
    pub minutes: u64,
    pub presentation: String,
}

/// A tracker ticket reduced to the attributes the CLI displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub assignees: Vec<String>,
    pub state: String,
    pub sizing: Option<String>,
    pub spent_time: Option<SpentTime>,
    pub created: i64,
    pub updated: i64,
}

impl Issue {
    pub fn is_assigned_to(&self, user: &str) -> bool {
        self.assignees.iter().any(|a| a == user)
    }
}

/// Raw issue as returned by `/api/issues`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IssueSchema {
    pub id_readable: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub updated: i64,
}

#[derive(Deserialize, Debug)]
pub struct CustomField {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

fn value_name(value: &Value) -> Option<String> {
    value.get("name").and_then(Value::as_str).map(str::to_string)
}

impl IssueSchema {
    /// Flattens the custom fields. Returns `None` when the issue carries no
    /// `State` field; such issues are not shown.
    pub fn into_issue(self) -> Option<Issue> {
        let mut assignees = Vec::new();
        let mut state = None;
        let mut sizing = None;
        let mut spent_time = None;

        for field in self.custom_fields {
            match field.name.as_str() {
                "Assignee" => match &field.value {
                    Value::Array(values) => assignees.extend(values.iter().filter_map(value_name)),
                    single => assignees.extend(value_name(single)),
                },
                "State" => state = value_name(&field.value),
                "Ticket sizing" => sizing = value_name(&field.value),
                "Spent time" => spent_time = serde_json::from_value(field.value).ok(),
                _ => {}
            }
        }

        Some(Issue {
            id: self.id_readable,
            summary: self.summary,
            description: self.description,
            assignees,
            state: state?,
            sizing,
            spent_time,
            created: self.created,
            updated: self.updated,
        })
    }
}
