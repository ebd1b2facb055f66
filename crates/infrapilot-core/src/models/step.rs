//! Step model definition and related functionality.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StepStatus;

/// One unit of planned infrastructure work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    /// Identifier, unique within the plan
    pub id: String,

    /// Human-readable label, also the key for tool resolution
    pub name: String,

    /// Free-text description of the step
    pub description: String,

    /// Backend capability invoked by this step
    pub tool_id: String,

    /// Parameters passed opaquely to the backend tool
    #[serde(default)]
    pub parameters: Map<String, Value>,

    /// Ids of steps that must complete first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Backend estimate of how long the step takes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,

    /// Current status of the step
    #[serde(default)]
    pub status: StepStatus,

    /// Backend payload (only set once status = Completed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ExecutionStep {
    /// Creates a pending step with no parameters or dependencies.
    pub fn new(id: impl Into<String>, name: impl Into<String>, tool_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            tool_id: tool_id.into(),
            parameters: Map::new(),
            depends_on: Vec::new(),
            estimated_duration: None,
            status: StepStatus::Pending,
            result: None,
        }
    }
}
