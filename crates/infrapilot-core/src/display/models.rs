//! Display implementations for domain models.

use std::fmt;

use jiff::tz::TimeZone;
use serde_json::{Map, Value};

use crate::models::{
    ExecutionOutcome, ExecutionPlan, ExecutionResult, ExecutionStatus, ExecutionStep, StepStatus,
};

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.action.is_empty() {
            "Execution plan"
        } else {
            self.action.as_str()
        };
        writeln!(f, "# {title}")?;
        writeln!(f)?;

        writeln!(f, "- Request: {}", self.request)?;
        writeln!(f, "- Mode: {}", self.mode)?;
        writeln!(f, "- Confidence: {:.0}%", self.confidence * 100.0)?;

        if !self.reasoning.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.reasoning)?;
        }

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this plan.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            write!(f, "{}", Steps(&self.steps))?;
        }

        Ok(())
    }
}

/// Numbered list of steps, in execution order.
pub struct Steps<'a>(pub &'a [ExecutionStep]);

impl fmt::Display for Steps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.0.iter().enumerate() {
            step.fmt_step(f, Some(index + 1))?;
        }
        Ok(())
    }
}

impl ExecutionStep {
    fn fmt_step(&self, f: &mut fmt::Formatter<'_>, position: Option<usize>) -> fmt::Result {
        match position {
            Some(n) => writeln!(f, "### {n}. {} ({})", self.name, self.status.with_icon())?,
            None => writeln!(f, "### {} ({})", self.name, self.status.with_icon())?,
        }
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;

        writeln!(f, "- ID: `{}`", self.id)?;
        writeln!(f, "- Tool: `{}`", self.tool_id)?;
        if !self.depends_on.is_empty() {
            writeln!(f, "- Depends on: {}", self.depends_on.join(", "))?;
        }
        if let Some(duration) = &self.estimated_duration {
            writeln!(f, "- Estimated duration: {duration}")?;
        }
        if !self.parameters.is_empty() {
            writeln!(f, "- Parameters: {}", inline_map(&self.parameters))?;
        }
        if let (StepStatus::Completed, Some(result)) = (self.status, &self.result) {
            writeln!(f, "- Result: {result}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for ExecutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_step(f, None)
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Execution {}: {}", self.execution_id, self.status)?;
        writeln!(f)?;
        writeln!(
            f,
            "- Finished: {}",
            self.timestamp
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )?;
        if let Some(message) = &self.message {
            writeln!(f, "- Message: {message}")?;
        }

        for (title, value) in [("Architecture", &self.architecture), ("Outputs", &self.outputs)] {
            if let Some(value) = value {
                writeln!(f, "\n## {title}\n")?;
                writeln!(f, "```json")?;
                writeln!(f, "{}", serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?)?;
                writeln!(f, "```")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Completed(_) => f.write_str("completed"),
            ExecutionOutcome::CompletedUnconfirmed => {
                f.write_str("completed (the backend sent no final result)")
            }
            ExecutionOutcome::Failed(error) => write!(f, "failed: {error}"),
            ExecutionOutcome::Cancelled => f.write_str("cancelled"),
        }
    }
}

fn inline_map(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}={s}"),
            other => format!("{key}={other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
