//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Projection is read-only; recording feedback is the only write path and
//! the only thing that changes a user's adaptive settings.

pub mod handlers;

pub use handlers::{
    ProjectDecisionCommand, ProjectDecisionError, ProjectDecisionHandler, ProjectDecisionResult,
    RecordFeedbackCommand, RecordFeedbackError, RecordFeedbackHandler, RecordFeedbackResult,
};
