//! Wire format exchanged with the backend agent.
//!
//! Plan requests are plain JSON over HTTP; the execution stream carries one
//! outbound envelope followed by inbound messages tagged by `type`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::models::{Credentials, ExecutionStep, StepStatus};

/// Body of the plan-generation request.
#[derive(Debug, Serialize)]
pub struct PlanRequestBody<'a> {
    pub request: &'a str,
    pub dry_run: bool,
}

/// Success body of the plan-generation request, before normalization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlanResponse {
    #[serde(default)]
    pub request: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub execution_plan: Option<Vec<RawStep>>,
}

/// A plan step as the backend sends it; every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStep {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "toolId")]
    pub mcp_tool: Option<String>,
    #[serde(default)]
    pub tool_parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub estimated_duration: Option<String>,
    #[serde(default)]
    pub depends_on: Option<Vec<String>>,
}

/// The single envelope sent when the execution stream opens.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteEnvelope<'a> {
    pub execution_id: &'a str,
    pub credentials: &'a Credentials,
    pub execution_plan: Vec<WireStep<'a>>,
}

/// A step in the shape the executor expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStep<'a> {
    pub id: &'a str,
    pub mcp_tool: &'a str,
    pub tool_parameters: &'a Map<String, Value>,
    pub depends_on: &'a [String],
}

impl<'a> From<&'a ExecutionStep> for WireStep<'a> {
    fn from(step: &'a ExecutionStep) -> Self {
        Self {
            id: &step.id,
            mcp_tool: &step.tool_id,
            tool_parameters: &step.parameters,
            depends_on: &step.depends_on,
        }
    }
}

impl<'a> ExecuteEnvelope<'a> {
    pub fn new(
        execution_id: &'a str,
        credentials: &'a Credentials,
        steps: &'a [ExecutionStep],
    ) -> Self {
        Self {
            execution_id,
            credentials,
            execution_plan: steps.iter().map(WireStep::from).collect(),
        }
    }
}

/// Messages received on the execution stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    ExecutionStarted {
        #[serde(default, rename = "executionId", deserialize_with = "lenient_string")]
        execution_id: Option<String>,
    },
    ExecutionProgress(StepProgress),
    ExecutionCompleted(CompletionMessage),
    Error {
        #[serde(default, deserialize_with = "lenient_string")]
        message: Option<String>,
    },
    /// Any tag this client does not act on
    #[serde(other)]
    Other,
}

/// Payload of an `execution_progress` message.
///
/// Log-style progress messages carry only `message`; status updates carry
/// `stepId` and `status`. `status` is kept as sent, since the backend also
/// uses it for free-text summaries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepProgress {
    #[serde(default, deserialize_with = "lenient_string")]
    pub step_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

impl StepProgress {
    /// The step status named by `status`, or the unrecognized label.
    pub fn step_status(&self) -> Option<Result<StepStatus, String>> {
        self.status.as_deref().map(str::parse::<StepStatus>)
    }
}

/// Payload of an `execution_completed` message.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionMessage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub execution_id: Option<String>,
    #[serde(default)]
    pub architecture: Option<Value>,
    #[serde(default)]
    pub outputs: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

impl CompletionMessage {
    /// Top-level field, falling back to the same field nested under `result`.
    pub fn field(&self, name: &str) -> Option<Value> {
        let top = match name {
            "architecture" => self.architecture.as_ref(),
            "outputs" => self.outputs.as_ref(),
            _ => None,
        };
        top.or_else(|| self.result.as_ref().and_then(|result| result.get(name)))
            .filter(|value| !value.is_null())
            .cloned()
    }
}

/// Reads an optional string field; any other JSON value counts as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}
