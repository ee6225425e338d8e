//! Feedback module - Outcome feedback and closed-loop parameter adaptation.
//!
//! Runs after a decision, independently of any projection:
//!
//! - `FeedbackRecord` / `FeedbackOutcome` - what the user reported
//! - `FeedbackStats` - per-user counts and the derived regret rate
//! - `UserAdaptiveSettings` - lambda and regret prior, versioned
//! - `FeedbackLearner` - turns a regret rate into a `LambdaAdjustment`
//!
//! # Regret Rate
//!
//! The historical regret rate is the mean of per-outcome regret signals
//! (no regret 0.0, partial regret 0.3, regret 1.0) over all feedback.

mod learner;
mod outcome;
mod settings;
mod stats;

pub use learner::{FeedbackLearner, LambdaAdjustment, LearningPolicy};
pub use outcome::{FeedbackOutcome, FeedbackRecord, MAX_NOTE_CHARS};
pub use settings::{SettingsVersion, UserAdaptiveSettings};
pub use stats::FeedbackStats;
