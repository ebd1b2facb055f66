//! Execution stream protocol.
//!
//! One execution attempt is driven by a single loop: the transport turns
//! WebSocket frames into [`Inbound`] values, and [`ExecutionSession`]
//! consumes them in arrival order, updates the plan through the
//! [`PlanReconciler`] and publishes [`ExecutionEvent`]s to the caller.
//!
//! ```text
//! ┌─────────────┐  Inbound  ┌──────────────────┐  ExecutionEvent  ┌─────────────────┐
//! │  transport  │──────────▶│ ExecutionSession │─────────────────▶│ ExecutionHandle │
//! │ (WebSocket) │           │  + reconciler    │  plan snapshots  │    (caller)     │
//! └─────────────┘           └──────────────────┘─────────────────▶└─────────────────┘
//! ```

use jiff::Timestamp;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{mpsc, watch};

pub mod handle;
pub mod reconciler;
pub(crate) mod transport;


pub use handle::ExecutionHandle;
pub use reconciler::{PlanReconciler, Reconciliation};

use crate::{
    error::ExecutionError,
    models::{
        ExecutionOutcome, ExecutionPlan, ExecutionReport, ExecutionResult, ExecutionStatus,
        StepStatus,
    },
    wire::{CompletionMessage, InboundMessage, StepProgress},
};

/// Notifications delivered to the caller, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    /// Human-readable status line
    Status(String),
    /// A raw `execution_progress` message
    Progress(Value),
    /// A step advanced to a new status
    StepUpdated { step_id: String, status: StepStatus },
    /// The execution finished; `None` when the backend closed the stream
    /// after the soft-completion hint instead of sending a result
    Completed(Option<ExecutionResult>),
    /// The execution failed
    Failed(ExecutionError),
}

/// One unit of input from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Inbound {
    Text(String),
    Closed,
    TransportError(String),
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Finish,
}

/// State machine for one execution attempt.
pub(crate) struct ExecutionSession {
    execution_id: String,
    success_sentinel: String,
    reconciler: PlanReconciler,
    events: mpsc::UnboundedSender<ExecutionEvent>,
    plan_tx: watch::Sender<ExecutionPlan>,
    closed_explicitly: bool,
    soft_completion_hint: bool,
    outcome: Option<ExecutionOutcome>,
}

impl ExecutionSession {
    pub(crate) fn new(
        execution_id: String,
        plan: ExecutionPlan,
        success_sentinel: String,
        events: mpsc::UnboundedSender<ExecutionEvent>,
        plan_tx: watch::Sender<ExecutionPlan>,
    ) -> Self {
        Self {
            execution_id,
            success_sentinel,
            reconciler: PlanReconciler::new(plan),
            events,
            plan_tx,
            closed_explicitly: false,
            soft_completion_hint: false,
            outcome: None,
        }
    }

    pub(crate) fn execution_id(&self) -> &str {
        &self.execution_id
    }

    pub(crate) fn plan(&self) -> &ExecutionPlan {
        self.reconciler.plan()
    }

    /// Feeds one transport input through the state machine.
    pub(crate) fn handle(&mut self, inbound: Inbound) -> Flow {
        if self.outcome.is_some() {
            return Flow::Finish;
        }

        match inbound {
            Inbound::Text(text) => self.handle_text(&text),
            Inbound::Closed => self.handle_close(),
            Inbound::TransportError(message) => self.fail(ExecutionError::Transport(message)),
        }
    }

    pub(crate) fn status(&self, message: impl Into<String>) {
        self.emit(ExecutionEvent::Status(message.into()));
    }

    /// Ends the attempt with `error`.
    pub(crate) fn fail(&mut self, error: ExecutionError) -> Flow {
        if self.outcome.is_none() {
            self.emit(ExecutionEvent::Failed(error.clone()));
            self.outcome = Some(ExecutionOutcome::Failed(error));
        }
        Flow::Finish
    }

    /// Ends the attempt on behalf of the caller, without emitting anything.
    pub(crate) fn cancel(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(ExecutionOutcome::Cancelled);
        }
    }

    pub(crate) fn into_report(self) -> ExecutionReport {
        let outcome = self
            .outcome
            .unwrap_or(ExecutionOutcome::Failed(ExecutionError::UnexpectedClose));
        let (plan, step_results) = self.reconciler.into_parts();
        ExecutionReport {
            execution_id: self.execution_id,
            outcome,
            plan,
            step_results,
        }
    }

    fn emit(&self, event: ExecutionEvent) {
        // The caller may have stopped listening; the session still runs to
        // its outcome.
        let _ = self.events.send(event);
    }

    fn handle_text(&mut self, text: &str) -> Flow {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => return self.fail(ExecutionError::Protocol(e.to_string())),
        };
        debug!("Execution stream message: {value}");

        self.soft_completion_hint =
            value.get("message").and_then(Value::as_str) == Some(self.success_sentinel.as_str());

        if value.get("type").is_none() {
            return Flow::Continue;
        }

        let message = match InboundMessage::deserialize(&value) {
            Ok(message) => message,
            Err(e) => {
                warn!("Ignoring unreadable execution stream message: {e}");
                return Flow::Continue;
            }
        };

        match message {
            InboundMessage::ExecutionStarted { execution_id } => {
                let id = execution_id.as_deref().unwrap_or(&self.execution_id);
                self.status(format!("Execution {id} started"));
                Flow::Continue
            }
            InboundMessage::ExecutionProgress(progress) => {
                self.emit(ExecutionEvent::Progress(value));
                self.reconcile(progress);
                Flow::Continue
            }
            InboundMessage::ExecutionCompleted(completion) => self.complete(completion),
            InboundMessage::Error { message } => {
                self.closed_explicitly = true;
                self.fail(ExecutionError::Backend(
                    message.unwrap_or_else(|| "Execution failed".to_string()),
                ))
            }
            InboundMessage::Other => {
                debug!("Ignoring execution stream message of type {}", value["type"]);
                Flow::Continue
            }
        }
    }

    fn reconcile(&mut self, progress: StepProgress) {
        let status = match progress.step_status() {
            Some(Ok(status)) => status,
            Some(Err(label)) => {
                debug!("Ignoring progress update: {label}");
                return;
            }
            None => return,
        };
        let Some(step_id) = progress.step_id else {
            return;
        };

        match self.reconciler.apply(&step_id, status, progress.result) {
            Reconciliation::Advanced { to, .. } => {
                self.plan_tx.send_replace(self.reconciler.plan().clone());
                self.emit(ExecutionEvent::StepUpdated { step_id, status: to });
            }
            Reconciliation::Unchanged => {}
            Reconciliation::UnknownStep => {
                debug!("Ignoring progress for step '{step_id}', which is not in the plan");
            }
            Reconciliation::Rejected { from, to } => {
                warn!("Ignoring transition of step '{step_id}' from {from} to {to}");
            }
        }
    }

    fn complete(&mut self, completion: CompletionMessage) -> Flow {
        self.closed_explicitly = true;
        self.status("Execution completed successfully!");

        let results = self.reconciler.results();
        let outputs = completion.field("outputs").or_else(|| {
            (!results.is_empty()).then(|| Value::Object(results.clone().into_iter().collect()))
        });

        let result = ExecutionResult {
            execution_id: completion
                .execution_id
                .clone()
                .unwrap_or_else(|| self.execution_id.clone()),
            status: ExecutionStatus::Success,
            architecture: completion.field("architecture"),
            outputs,
            message: completion.message,
            timestamp: Timestamp::now(),
        };

        self.emit(ExecutionEvent::Completed(Some(result.clone())));
        self.outcome = Some(ExecutionOutcome::Completed(result));
        Flow::Finish
    }

    fn handle_close(&mut self) -> Flow {
        if self.closed_explicitly {
            return Flow::Finish;
        }

        if self.soft_completion_hint {
            warn!("Execution stream closed after the success message without a completion event");
            self.emit(ExecutionEvent::Completed(None));
            self.outcome = Some(ExecutionOutcome::CompletedUnconfirmed);
            Flow::Finish
        } else {
            self.fail(ExecutionError::UnexpectedClose)
        }
    }
}
