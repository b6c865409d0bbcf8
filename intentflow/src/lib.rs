//! # Intentflow
//!
//! Turns a free-text request into an ordered workflow of tool invocations and
//! runs it.
//!
//! Intentflow provides:
//!
//! - **Rule-based planning**: URL/email extraction and bilingual keyword triggers
//!   compiled into a fixed-order [`Plan`](planner::Plan)
//! - **Sequential execution**: steps run in order and stop at the first failure
//! - **Artifact passing**: steps publish named values that later steps reference as `${name}`
//! - **Confirmation gate**: optional approval before a plan runs
//! - **Cancellation**: per-request tokens and deadlines checked before every step
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use intentflow::prelude::*;
//!
//! let engine = IntentEngine::from_config(&EngineConfig::default());
//! let ctx = RunContext::new().with_timeout(Duration::from_secs(300));
//!
//! match engine.process_interactive(&ctx, "下载视频 https://a.com/v.mp4").await? {
//!     RequestOutcome::Completed { steps } => println!("{steps} steps done"),
//!     RequestOutcome::Declined => println!("declined"),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod approval;
pub mod cancellation;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod events;
pub mod executor;
pub mod intent;
pub mod planner;
pub mod scenarios;
pub mod testing;
pub mod tools;

pub use engine::{ConfirmationPolicy, IntentEngine, RequestOutcome};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::approval::{ApprovalService, AutoApprove, Confirmer, PromptConfirmer};
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{EngineConfig, ToolsConfig};
    pub use crate::context::{ArtifactBag, RunContext};
    pub use crate::engine::{ConfirmationPolicy, IntentEngine, RequestOutcome};
    pub use crate::errors::{IntentflowError, ToolError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::executor::WorkflowExecutor;
    pub use crate::planner::{Plan, Planner, WorkflowStep};
    pub use crate::tools::{Tool, ToolOutput, ToolRegistry};
}
