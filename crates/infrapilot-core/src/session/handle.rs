//! Caller-side handle to a running execution.

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

use super::ExecutionEvent;
use crate::{
    error::{PilotError, Result},
    models::{ExecutionPlan, ExecutionReport},
};

/// Handle to one execution attempt.
///
/// Events arrive through [`next_event`](Self::next_event) in the order the
/// backend sent them. Closing the handle, or dropping it, cancels the
/// attempt: the connection is closed and no further events are delivered.
pub struct ExecutionHandle {
    execution_id: String,
    events: mpsc::UnboundedReceiver<ExecutionEvent>,
    plan: watch::Receiver<ExecutionPlan>,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<ExecutionReport>,
    closed: bool,
}

impl ExecutionHandle {
    pub(crate) fn new(
        execution_id: String,
        events: mpsc::UnboundedReceiver<ExecutionEvent>,
        plan: watch::Receiver<ExecutionPlan>,
        cancel: oneshot::Sender<()>,
        task: JoinHandle<ExecutionReport>,
    ) -> Self {
        Self {
            execution_id,
            events,
            plan,
            cancel: Some(cancel),
            task,
            closed: false,
        }
    }

    /// Identifier sent to the backend for this attempt.
    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// Waits for the next event; `None` once the attempt is over or the
    /// handle was closed.
    pub async fn next_event(&mut self) -> Option<ExecutionEvent> {
        if self.closed {
            return None;
        }
        self.events.recv().await
    }

    /// Closes the connection. Calling this more than once has no effect.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.events.close();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Snapshot of the plan as reconciled so far.
    pub fn plan(&self) -> ExecutionPlan {
        self.plan.borrow().clone()
    }

    /// Waits for the attempt to finish and returns its report.
    ///
    /// Events not yet consumed are discarded.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::TaskJoin` if the execution task panicked.
    pub async fn wait(self) -> Result<ExecutionReport> {
        let ExecutionHandle { task, cancel, .. } = self;
        let report = task.await.map_err(|e| PilotError::TaskJoin {
            message: e.to_string(),
        })?;
        drop(cancel);
        Ok(report)
    }
}
