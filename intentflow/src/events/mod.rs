//! Event sink system for workflow progress.
//!
//! The executor and engine report progress exclusively through an
//! [`EventSink`] carried by the run context. Event types:
//!
//! | event | emitted when |
//! |---|---|
//! | `workflow.planned` | a non-empty plan was derived |
//! | `workflow.unplannable` | no plan could be derived |
//! | `workflow.declined` | the confirmation gate was refused |
//! | `workflow.started` | execution begins |
//! | `step.started` / `step.completed` / `step.failed` | per step |
//! | `workflow.cancelled` | cancellation or deadline stopped the run |
//! | `workflow.completed` | every step succeeded |

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
