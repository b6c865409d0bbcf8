//! Cooperative cancellation for workflow runs.
//!
//! The CLI owns the token for a request and cancels it on an interrupt signal;
//! the executor and tools only observe it.

mod token;

pub use token::CancellationToken;
