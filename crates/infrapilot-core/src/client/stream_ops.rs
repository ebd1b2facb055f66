//! Execution operations for the PilotClient.

use jiff::Timestamp;
use tokio::sync::{mpsc, oneshot, watch};

use super::PilotClient;
use crate::{
    models::{Credentials, ExecutionPlan},
    session::{
        transport::{self, StreamRequest},
        ExecutionHandle, ExecutionSession,
    },
};

impl PilotClient {
    /// Starts executing `plan` and returns a handle to the running attempt.
    ///
    /// Auth resolution, connecting and streaming all happen on a spawned
    /// task; failures at any stage arrive as
    /// [`ExecutionEvent::Failed`](crate::session::ExecutionEvent::Failed).
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn execute(&self, plan: ExecutionPlan, credentials: Credentials) -> ExecutionHandle {
        let execution_id = new_execution_id();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (plan_tx, plan_rx) = watch::channel(plan.clone());
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let session = ExecutionSession::new(
            execution_id.clone(),
            plan,
            self.success_sentinel.clone(),
            event_tx,
            plan_tx,
        );
        let request = StreamRequest {
            endpoint: self.stream_url.clone(),
            auth: self.auth.clone(),
            http: self.http.clone(),
            credentials,
            connect_timeout: self.connect_timeout,
        };

        let task = tokio::spawn(transport::run(session, request, cancel_rx));
        ExecutionHandle::new(execution_id, event_rx, plan_rx, cancel_tx, task)
    }
}

/// Time-derived identifier, unique per attempt.
fn new_execution_id() -> String {
    format!("exec-{}", Timestamp::now().as_millisecond())
}
