use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Task payload accepted by every `/gpt/{agent}` controller.
///
/// `data` is deliberately untyped: each persona interprets the keys it
/// understands (e.g. `lead` for LEADAI, `post` for CONVERTAI) and echoes the
/// rest back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPayload {
    #[serde(default = "default_brand")]
    pub brand: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,

    pub intent: String,

    #[serde(default)]
    pub data: Map<String, Value>,
}

fn default_brand() -> String {
    "bff".into()
}

impl TaskPayload {
    /// Look up a key in the task data.
    pub fn data_value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
