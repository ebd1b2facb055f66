//! Core library for the InfraPilot infrastructure automation client.
//!
//! This crate implements the client side of the backend agent's execution
//! protocol: requesting an AI-generated plan, streaming its execution, and
//! reconciling step progress into local plan state.
//!
//! # Architecture
//!
//! - **Plan requests** ([`client::plan_ops`]): one HTTP exchange, normalized
//!   into an [`ExecutionPlan`] by [`normalize`]
//! - **Execution stream** ([`session`]): a WebSocket connection whose frames
//!   feed a single state machine; the caller observes it through an
//!   [`ExecutionHandle`]
//! - **Reconciliation** ([`session::reconciler`]): forward-only step status
//!   updates and per-step result collection
//! - **Display** ([`display`]): markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use infrapilot_core::{Credentials, PilotClientBuilder, PilotConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PilotConfig::load(None)?;
//! let client = PilotClientBuilder::new().with_config(config).build()?;
//!
//! let plan = client.request_plan("create a t3.micro ec2 instance", true).await?;
//! let handle = client.execute(plan, Credentials::default());
//! let report = handle.wait().await?;
//! println!("{}", report.outcome);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod normalize;
pub mod session;
pub mod tools;
pub mod wire;

// Re-export commonly used types
pub use auth::{AuthSource, StreamAuth};
pub use client::{PilotClient, PilotClientBuilder};
pub use config::PilotConfig;
pub use display::{RunSummary, Steps};
pub use error::{ExecutionError, PilotError, Result};
pub use models::{
    Credentials, ExecutionOutcome, ExecutionPlan, ExecutionReport, ExecutionResult, ExecutionStatus,
    ExecutionStep, PlanMode, StepStatus,
};
pub use session::{ExecutionEvent, ExecutionHandle};
pub use tools::ToolCatalog;
