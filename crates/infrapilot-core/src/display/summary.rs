//! End-of-run summary.

use std::fmt;

use crate::models::{ExecutionReport, StepStatus};

/// Step counts and outcome of a finished execution.
pub struct RunSummary<'a>(pub &'a ExecutionReport);

impl RunSummary<'_> {
    /// (total, completed, failed, pending or in progress)
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let plan = &self.0.plan;
        let total = plan.steps.len();
        let completed = plan.count(StepStatus::Completed);
        let failed = plan.count(StepStatus::Failed);
        (total, completed, failed, total - completed - failed)
    }
}

impl fmt::Display for RunSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (total, completed, failed, remaining) = self.counts();
        writeln!(f, "## Summary")?;
        writeln!(f)?;
        writeln!(f, "- Execution: {}", self.0.execution_id)?;
        writeln!(f, "- Outcome: {}", self.0.outcome)?;
        writeln!(f, "- Steps: {completed}/{total} completed")?;
        if failed > 0 {
            writeln!(f, "- Failed: {failed}")?;
        }
        if remaining > 0 {
            writeln!(f, "- Not finished: {remaining}")?;
        }
        Ok(())
    }
}
