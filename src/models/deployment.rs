use serde::{Deserialize, Serialize};

/// Lifecycle state carried in the `type` field of a Vercel deployment webhook.
///
/// Unrecognized strings are kept verbatim in `Unknown` so the event still
/// parses and can be answered as "not handled".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Created,
    Succeeded,
    Failed,
    Promoted,
    Unknown(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Created => "deployment.created",
            EventType::Succeeded => "deployment.succeeded",
            EventType::Failed => "deployment.failed",
            EventType::Promoted => "deployment.promoted",
            EventType::Unknown(raw) => raw,
        }
    }
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "deployment.created" => EventType::Created,
            "deployment.succeeded" => EventType::Succeeded,
            "deployment.failed" => EventType::Failed,
            "deployment.promoted" => EventType::Promoted,
            _ => EventType::Unknown(raw),
        }
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        match t {
            EventType::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound deployment webhook body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: Option<i64>,
    pub payload: DeploymentPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentPayload {
    pub deployment: Deployment,
    #[serde(default)]
    pub project: Project,
    #[serde(default)]
    pub team: Option<EntityRef>,
    #[serde(default)]
    pub user: Option<EntityRef>,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub inspector_url: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Bare `{ "id": ... }` reference used for team and user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
}
