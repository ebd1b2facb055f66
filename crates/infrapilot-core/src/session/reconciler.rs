//! Merging step-status updates into a plan.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{ExecutionPlan, StepStatus};

/// What applying one update did to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The step moved forward
    Advanced { from: StepStatus, to: StepStatus },
    /// The step already had this status
    Unchanged,
    /// No step with this id exists in the plan
    UnknownStep,
    /// The update would move the step backwards or out of a terminal status
    Rejected { from: StepStatus, to: StepStatus },
}

/// Owns a plan during execution and applies status updates to it.
#[derive(Debug, Clone)]
pub struct PlanReconciler {
    plan: ExecutionPlan,
    results: BTreeMap<String, Value>,
}

impl PlanReconciler {
    pub fn new(plan: ExecutionPlan) -> Self {
        Self {
            plan,
            results: BTreeMap::new(),
        }
    }

    /// Applies a status update for `step_id`.
    ///
    /// Any non-null `result` for a known step is recorded in
    /// [`results`](Self::results); it is stored on the step itself only when
    /// the step advances to `Completed`.
    pub fn apply(
        &mut self,
        step_id: &str,
        status: StepStatus,
        result: Option<Value>,
    ) -> Reconciliation {
        let Some(step) = self.plan.step_mut(step_id) else {
            return Reconciliation::UnknownStep;
        };

        let result = result.filter(|value| !value.is_null());
        if let Some(value) = &result {
            self.results.insert(step_id.to_string(), value.clone());
        }

        let from = step.status;
        if from == status {
            return Reconciliation::Unchanged;
        }
        if !from.can_advance_to(status) {
            return Reconciliation::Rejected { from, to: status };
        }

        step.status = status;
        if status == StepStatus::Completed {
            step.result = result;
        }
        Reconciliation::Advanced { from, to: status }
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    /// Results collected so far, keyed by step id.
    pub fn results(&self) -> &BTreeMap<String, Value> {
        &self.results
    }

    pub fn into_parts(self) -> (ExecutionPlan, BTreeMap<String, Value>) {
        (self.plan, self.results)
    }
}
