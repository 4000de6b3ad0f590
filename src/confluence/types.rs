use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ContentSearch {
    #[serde(default)]
    pub results: Vec<PageRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageRef {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// A page fetched with `expand=body.storage`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    pub body: Option<PageBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBody {
    pub storage: Storage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    pub value: String,
    pub representation: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub last_updated: VersionNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VersionNumber {
    pub number: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpaceKey {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ancestor {
    pub id: String,
}

/// Create/update request body for a page stored in storage format.
#[derive(Debug, Clone, Serialize)]
pub struct PagePayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub space: SpaceKey,
    pub ancestors: Vec<Ancestor>,
    pub body: PageBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionNumber>,
}

impl PagePayload {
    pub fn new(title: &str, space_key: &str, parent_id: &str, html: String) -> Self {
        Self {
            kind: "page",
            title: title.to_string(),
            space: SpaceKey {
                key: space_key.to_string(),
            },
            ancestors: vec![Ancestor {
                id: parent_id.to_string(),
            }],
            body: PageBody {
                storage: Storage {
                    value: html,
                    representation: "storage".to_string(),
                },
            },
            version: None,
        }
    }

    pub fn with_version(mut self, number: u64) -> Self {
        self.version = Some(VersionNumber { number });
        self
    }
}
