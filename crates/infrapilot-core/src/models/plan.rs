//! Plan model definition and related functionality.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ExecutionStep, StepStatus};

/// Execution mode of a plan.
///
/// The backend may mirror an arbitrary label; anything other than the two
/// known modes is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlanMode {
    /// Steps are simulated, nothing is applied
    DryRun,
    /// Steps are applied to real infrastructure
    Live,
    /// Any other label sent by the backend
    Other(String),
}

impl PlanMode {
    /// Mode implied by the dry-run flag of a request.
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            PlanMode::DryRun
        } else {
            PlanMode::Live
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PlanMode::DryRun => "dry-run",
            PlanMode::Live => "live",
            PlanMode::Other(label) => label,
        }
    }
}

impl From<String> for PlanMode {
    fn from(label: String) -> Self {
        match label.as_str() {
            "dry-run" | "dry_run" => PlanMode::DryRun,
            "live" => PlanMode::Live,
            _ => PlanMode::Other(label),
        }
    }
}

impl From<PlanMode> for String {
    fn from(mode: PlanMode) -> Self {
        match mode {
            PlanMode::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized representation of an AI-generated plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionPlan {
    /// Original natural-language instruction
    pub request: String,

    /// Dry-run, live, or a backend label
    pub mode: PlanMode,

    /// Planner confidence in [0, 1]
    pub confidence: f64,

    /// Short symbolic label for the inferred intent
    pub action: String,

    /// Planner explanation
    pub reasoning: String,

    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<ExecutionStep>,
}

impl ExecutionPlan {
    /// Looks up a step by id.
    pub fn step(&self, id: &str) -> Option<&ExecutionStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub(crate) fn step_mut(&mut self, id: &str) -> Option<&mut ExecutionStep> {
        self.steps.iter_mut().find(|step| step.id == id)
    }

    /// Number of steps in the given status.
    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|step| step.status == status).count()
    }

    /// Whether every step reached a terminal status.
    pub fn is_settled(&self) -> bool {
        self.steps.iter().all(|step| step.status.is_terminal())
    }
}
