//! Plan request operations for the PilotClient.

use log::{debug, info};
use serde_json::Value;

use super::PilotClient;
use crate::{
    error::{PilotError, Result},
    models::ExecutionPlan,
    normalize::normalize_plan,
    wire::{PlanRequestBody, RawPlanResponse},
};

const UNKNOWN_SERVER_ERROR: &str = "Unknown server error";

impl PilotClient {
    /// Requests a plan for `instruction` and normalizes the response.
    ///
    /// A single attempt is made; failures are returned to the caller as-is.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::PlanRequest` for a non-success status, with the
    /// backend's diagnostic text
    /// Returns `PilotError::InvalidResponse` if a success body is not a plan
    /// Returns `PilotError::Http` if the request could not be sent
    pub async fn request_plan(&self, instruction: &str, dry_run: bool) -> Result<ExecutionPlan> {
        info!("Requesting execution plan (dry_run: {dry_run})");

        let mut request = self.http.post(self.plan_url.clone()).json(&PlanRequestBody {
            request: instruction,
            dry_run,
        });
        if let Some(auth) = self.auth.known() {
            request = auth.apply_headers(request);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("Plan endpoint returned {status}: {body}");
            return Err(
                PilotError::plan_request(Some(status.as_u16())).with_message(error_detail(&body))
            );
        }

        let raw: RawPlanResponse = serde_json::from_str(&body)
            .map_err(|e| PilotError::invalid_response(format!("body is not a plan: {e}")))?;
        let plan = normalize_plan(raw, instruction, dry_run, &self.tools)?;

        info!("Received plan '{}' with {} steps", plan.action, plan.steps.len());
        Ok(plan)
    }
}

/// Best available diagnostic text from an error response body.
pub(crate) fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let detail = ["detail", "message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(describe));
        if let Some(detail) = detail {
            return detail;
        }
    }

    let text = body.trim();
    if text.is_empty() {
        UNKNOWN_SERVER_ERROR.to_string()
    } else {
        text.to_string()
    }
}

fn describe(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ["error", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .or_else(|| Some(value.to_string())),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        assert_eq!(error_detail(r#"{"detail": "boom"}"#), "boom");
    }

    #[test]
    fn test_detail_object() {
        assert_eq!(
            error_detail(
                r#"{"detail": {"error": "Field 'request' is required in the request body."}}"#
            ),
            "Field 'request' is required in the request body."
        );
        assert_eq!(error_detail(r#"{"detail": {"code": 7}}"#), r#"{"code":7}"#);
    }

    #[test]
    fn test_other_fields() {
        assert_eq!(error_detail(r#"{"message": "quota exceeded"}"#), "quota exceeded");
        assert_eq!(error_detail(r#"{"error": "Unauthorized"}"#), "Unauthorized");
    }

    #[test]
    fn test_text_and_empty_bodies() {
        assert_eq!(error_detail("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_detail(""), UNKNOWN_SERVER_ERROR);
        assert_eq!(error_detail("   "), UNKNOWN_SERVER_ERROR);
    }
}
