//! High-level client for the backend agent.
//!
//! [`PilotClient`] is the entry point for both halves of the protocol:
//!
//! - [`plan_ops`]: request a plan for an instruction and normalize it
//! - [`stream_ops`]: execute a plan over the streaming connection
//!
//! # Usage
//!
//! ```rust,no_run
//! use infrapilot_core::{models::Credentials, session::ExecutionEvent, PilotClientBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PilotClientBuilder::new().build()?;
//!
//! let plan = client.request_plan("create a t3.micro ec2 instance", true).await?;
//! println!("{}", plan);
//!
//! let mut handle = client.execute(plan, Credentials::default());
//! while let Some(event) = handle.next_event().await {
//!     if let ExecutionEvent::Status(line) = &event {
//!         println!("{line}");
//!     }
//! }
//! let report = handle.wait().await?;
//! println!("{:?}", report.outcome);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::Url;

pub mod builder;
pub mod plan_ops;
pub mod stream_ops;

pub use builder::PilotClientBuilder;

use crate::{auth::AuthSource, tools::ToolCatalog};

/// Client for the plan and execution endpoints.
#[derive(Debug, Clone)]
pub struct PilotClient {
    pub(crate) http: reqwest::Client,
    pub(crate) plan_url: Url,
    pub(crate) stream_url: Url,
    pub(crate) auth: AuthSource,
    pub(crate) tools: ToolCatalog,
    pub(crate) success_sentinel: String,
    pub(crate) connect_timeout: Duration,
}

impl PilotClient {
    /// Catalog used to resolve tools for steps that name none.
    pub fn tool_catalog(&self) -> &ToolCatalog {
        &self.tools
    }

    pub fn plan_url(&self) -> &Url {
        &self.plan_url
    }

    pub fn stream_url(&self) -> &Url {
        &self.stream_url
    }
}
