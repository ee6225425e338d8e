//! Application handlers.
//!
//! Command handlers that orchestrate the projection pipeline and the
//! feedback loop over the ports.

mod project_decision;
mod record_feedback;

pub use project_decision::{
    ProjectDecisionCommand, ProjectDecisionError, ProjectDecisionHandler, ProjectDecisionResult,
};
pub use record_feedback::{
    RecordFeedbackCommand, RecordFeedbackError, RecordFeedbackHandler, RecordFeedbackResult,
};
