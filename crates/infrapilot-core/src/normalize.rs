//! Normalization of backend plan responses into [`ExecutionPlan`]s.

use std::collections::HashSet;

use crate::{
    error::{PilotError, Result},
    models::{ExecutionPlan, ExecutionStep, PlanMode, StepStatus},
    tools::ToolCatalog,
    wire::{RawPlanResponse, RawStep},
};

const DEFAULT_DESCRIPTION: &str = "No description";

/// Builds a canonical plan from a raw plan response.
///
/// Missing step ids and names get positional fallbacks (`step-N`, `Step N`,
/// 1-based), tools are resolved through `catalog`, and every step starts out
/// pending.
///
/// # Errors
///
/// Returns `PilotError::InvalidResponse` if the response has no
/// `executionPlan`, and `PilotError::InvalidPlan` if two steps end up with
/// the same id.
pub fn normalize_plan(
    raw: RawPlanResponse,
    instruction: &str,
    dry_run: bool,
    catalog: &ToolCatalog,
) -> Result<ExecutionPlan> {
    let raw_steps = raw
        .execution_plan
        .ok_or_else(|| PilotError::invalid_response("missing 'executionPlan'"))?;

    let steps = raw_steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| normalize_step(step, index + 1, catalog))
        .collect::<Vec<_>>();

    let mut seen = HashSet::new();
    for step in &steps {
        if !seen.insert(step.id.as_str()) {
            return Err(PilotError::InvalidPlan {
                reason: format!("duplicate step id '{}'", step.id),
            });
        }
    }

    Ok(ExecutionPlan {
        request: instruction.to_string(),
        mode: raw
            .mode
            .filter(|mode| !mode.is_empty())
            .map(PlanMode::from)
            .unwrap_or_else(|| PlanMode::from_dry_run(dry_run)),
        confidence: raw
            .confidence
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0))
            .unwrap_or(0.0),
        action: raw.action.unwrap_or_default(),
        reasoning: raw.reasoning.unwrap_or_default(),
        steps,
    })
}

fn normalize_step(raw: RawStep, position: usize, catalog: &ToolCatalog) -> ExecutionStep {
    let id = non_empty(raw.id).unwrap_or_else(|| format!("step-{position}"));
    let name = non_empty(raw.name).unwrap_or_else(|| format!("Step {position}"));
    let tool_id = catalog.resolve(raw.mcp_tool.as_deref(), &name);
    let description = non_empty(raw.description).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    ExecutionStep {
        id,
        name,
        description,
        tool_id,
        parameters: raw.tool_parameters.unwrap_or_default(),
        depends_on: raw.depends_on.unwrap_or_default(),
        estimated_duration: raw.estimated_duration,
        status: StepStatus::Pending,
        result: None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
