//! Status enumerations for plans and steps.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of step statuses.
///
/// Steps only move forward: `Pending` may advance to any other status,
/// `InProgress` may advance to a terminal status, and the terminal statuses
/// `Completed` and `Failed` never change again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum StepStatus {
    /// Step has not started yet
    #[default]
    Pending,

    /// Step is being executed by the backend
    InProgress,

    /// Step finished successfully
    Completed,

    /// Step finished with an error
    Failed,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "inprogress" | "in_progress" => Ok(StepStatus::InProgress),
            "completed" => Ok(StepStatus::Completed),
            "failed" => Ok(StepStatus::Failed),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl TryFrom<String> for StepStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl StepStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }

    /// Whether moving from `self` to `next` advances the step.
    ///
    /// Same-status updates are not advances; they are reported as unchanged
    /// by the reconciler.
    pub fn can_advance_to(&self, next: StepStatus) -> bool {
        match (self, next) {
            (StepStatus::Pending, StepStatus::Pending) => false,
            (StepStatus::Pending, _) => true,
            (StepStatus::InProgress, next) => next.is_terminal(),
            (StepStatus::Completed | StepStatus::Failed, _) => false,
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use infrapilot_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// assert_eq!(StepStatus::Failed.with_icon(), "✗ Failed");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓ Completed",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Pending => "○ Pending",
            StepStatus::Failed => "✗ Failed",
        }
    }
}

/// Overall status reported in an execution result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// All steps were executed
    Success,

    /// The execution stopped on an error
    Failed,
}

impl ExecutionStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failed => "failed",
        }
    }
}
