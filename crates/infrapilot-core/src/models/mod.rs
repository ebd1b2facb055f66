//! Data models for execution plans and steps.
//!
//! This module contains the domain models shared by the plan request client,
//! the execution stream client and the reconciler. Display implementations
//! live in [`crate::display`].
//!
//! # Examples
//!
//! ```rust
//! use infrapilot_core::models::{ExecutionPlan, ExecutionStep, PlanMode, StepStatus};
//!
//! let plan = ExecutionPlan {
//!     request: "create a t3.micro ec2 instance".to_string(),
//!     mode: PlanMode::DryRun,
//!     confidence: 0.9,
//!     action: "create_ec2_instance".to_string(),
//!     reasoning: String::new(),
//!     steps: vec![ExecutionStep::new("step-1", "Get latest Ubuntu AMI", "get-latest-ubuntu-ami")],
//! };
//! assert_eq!(plan.count(StepStatus::Pending), 1);
//! println!("{}", plan); // Formats with markdown headers and step list
//! ```

pub mod credentials;
pub mod plan;
pub mod result;
pub mod status;
pub mod step;


pub use credentials::Credentials;
pub use plan::{ExecutionPlan, PlanMode};
pub use result::{ExecutionOutcome, ExecutionReport, ExecutionResult};
pub use status::{ExecutionStatus, StepStatus};
pub use step::ExecutionStep;
