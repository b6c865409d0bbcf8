//! Per-request execution context.
//!
//! This module provides:
//! - [`RunContext`], carrying cancellation, the deadline and the event sink
//! - [`ArtifactBag`], the blackboard steps use to hand named values forward

mod artifacts;
mod run;

pub use artifacts::{
    artifact_ref, ArtifactBag, CLIP_PATH, DEFAULT_MEDIA_PATH, PRIMARY_MEDIA_PATH, SUBTITLE_PATH,
    UPLOADED_URL,
};
pub use run::{RunContext, DEADLINE_EXCEEDED};
