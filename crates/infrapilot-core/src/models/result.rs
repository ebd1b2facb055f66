//! Execution results and terminal outcomes.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ExecutionPlan, ExecutionStatus};
use crate::error::ExecutionError;

/// Summary produced when the backend confirms completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Identifier of the execution attempt
    pub execution_id: String,

    /// Overall status
    pub status: ExecutionStatus,

    /// Architecture description returned by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<Value>,

    /// Outputs returned by the backend, or the per-step results collected
    /// during the run when the backend sent none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Value>,

    /// Final backend message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// When the client assembled the result (UTC)
    pub timestamp: Timestamp,
}

/// How an execution attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The backend sent a structured completion event
    Completed(ExecutionResult),

    /// The stream closed right after the soft-completion hint, without a
    /// structured completion event
    CompletedUnconfirmed,

    /// The attempt failed
    Failed(ExecutionError),

    /// The caller closed the handle
    Cancelled,
}

impl ExecutionOutcome {
    /// Whether the attempt counts as successful.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ExecutionOutcome::Completed(_) | ExecutionOutcome::CompletedUnconfirmed
        )
    }

    /// Overall status, if the attempt reached a terminal state on its own.
    pub fn status(&self) -> Option<ExecutionStatus> {
        match self {
            ExecutionOutcome::Completed(result) => Some(result.status),
            ExecutionOutcome::CompletedUnconfirmed => Some(ExecutionStatus::Success),
            ExecutionOutcome::Failed(_) => Some(ExecutionStatus::Failed),
            ExecutionOutcome::Cancelled => None,
        }
    }
}

/// Everything known about an attempt once its task has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub execution_id: String,
    pub outcome: ExecutionOutcome,
    /// Plan state at the end of the attempt
    pub plan: ExecutionPlan,
    /// Results collected per step id as progress events arrived
    pub step_results: BTreeMap<String, Value>,
}
