//! Request analysis: entity extraction and keyword-triggered intent flags.
//!
//! Both stages are pure functions of the request text. Neither can fail; a
//! request that yields nothing useful simply produces empty entities and
//! all-false flags.

mod classifier;
mod extractor;

pub use classifier::{classify, IntentFlags, Trigger};
pub use extractor::{extract, ExtractedEntities};
