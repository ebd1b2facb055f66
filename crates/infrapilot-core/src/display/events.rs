//! One-line rendering of execution events.

use std::fmt;

use serde_json::Value;

use crate::session::ExecutionEvent;

impl fmt::Display for ExecutionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionEvent::Status(line) => write!(f, "{line}"),
            ExecutionEvent::Progress(raw) => {
                let step = raw.get("stepId").and_then(Value::as_str);
                let message = raw.get("message").and_then(Value::as_str);
                match (step, message) {
                    (Some(step), Some(message)) => write!(f, "[{step}] {message}"),
                    (None, Some(message)) => write!(f, "{message}"),
                    (Some(step), None) => write!(f, "[{step}] progress"),
                    (None, None) => write!(f, "progress: {raw}"),
                }
            }
            ExecutionEvent::StepUpdated { step_id, status } => {
                write!(f, "- `{step_id}`: {}", status.with_icon())
            }
            ExecutionEvent::Completed(Some(result)) => {
                write!(f, "**Execution {} finished: {}**", result.execution_id, result.status)
            }
            ExecutionEvent::Completed(None) => {
                write!(f, "**Execution finished** (the backend sent no final result)")
            }
            ExecutionEvent::Failed(error) => write!(f, "**Error:** {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{error::ExecutionError, models::StepStatus};

    #[test]
    fn test_progress_lines() {
        let event =
            ExecutionEvent::Progress(json!({"stepId": "step-1", "message": "Creating key pair"}));
        assert_eq!(event.to_string(), "[step-1] Creating key pair");

        let event =
            ExecutionEvent::Progress(json!({"message": "All plan steps executed successfully."}));
        assert_eq!(event.to_string(), "All plan steps executed successfully.");
    }

    #[test]
    fn test_terminal_lines() {
        let updated = ExecutionEvent::StepUpdated {
            step_id: "step-1".to_string(),
            status: StepStatus::Failed,
        };
        assert_eq!(updated.to_string(), "- `step-1`: ✗ Failed");

        let failed = ExecutionEvent::Failed(ExecutionError::UnexpectedClose);
        assert!(failed.to_string().contains("Connection closed unexpectedly."));
    }
}
