//! Markdown display for plans, results and execution events.
//!
//! Domain models implement [`std::fmt::Display`] directly; the wrappers in
//! this module cover contextual formatting such as numbered step lists and
//! end-of-run summaries. The CLI renders all of it through its terminal
//! renderer.
//!
//! - [`models`]: Display implementations for domain models
//! - [`events`]: one-line rendering of [`ExecutionEvent`](crate::session::ExecutionEvent)s
//! - [`summary`]: [`RunSummary`] for the end of an execution

pub mod events;
pub mod models;
pub mod summary;

pub use models::Steps;
pub use summary::RunSummary;
