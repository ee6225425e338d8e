//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the decision projection domain.

mod command;
mod errors;
mod ids;
mod timestamp;
mod unit_interval;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DecisionId, FeedbackId, FragmentId, UserId};
pub use timestamp::Timestamp;
pub use unit_interval::UnitInterval;
