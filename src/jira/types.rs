use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Issue {
    /// Plain text of a field. Missing and null fields are empty, rich text
    /// (Atlassian document format) is flattened to its text nodes, option
    /// fields give their selected value.
    pub fn field_text(&self, field: &str) -> String {
        self.fields.get(field).map(value_text).unwrap_or_default()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Object(doc) if doc.contains_key("content") => {
            let blocks = doc
                .get("content")
                .and_then(|c| c.as_array())
                .map(Vec::as_slice)
                .unwrap_or_default();
            blocks
                .iter()
                .map(|block| {
                    let mut text = String::new();
                    collect_text(block, &mut text);
                    text
                })
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        }
        // select, user and component fields
        Value::Object(option) => match ["value", "name", "displayName"]
            .iter()
            .find_map(|k| option.get(*k).and_then(Value::as_str))
        {
            Some(text) => text.to_string(),
            None => value.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn collect_text(node: &Value, out: &mut String) {
    if let Some(text) = node.get("text").and_then(|t| t.as_str()) {
        out.push_str(text);
    }
    if let Some(children) = node.get("content").and_then(|c| c.as_array()) {
        for child in children {
            collect_text(child, out);
        }
    }
}

/// A release ("version" in Jira terms) of a project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Version {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub released: bool,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionPage {
    #[serde(default)]
    pub values: Vec<Version>,
    /// Absent when the server answers in a single page.
    pub is_last: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVersion {
    pub name: String,
    pub description: String,
    pub project_id: u64,
    pub archived: bool,
    pub released: bool,
    pub release_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixVersionUpdate {
    pub fields: FixVersionFields,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixVersionFields {
    pub fix_versions: Vec<VersionName>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionName {
    pub name: String,
}

impl FixVersionUpdate {
    pub fn new(version: &str) -> Self {
        Self {
            fields: FixVersionFields {
                fix_versions: vec![VersionName {
                    name: version.to_string(),
                }],
            },
        }
    }
}
