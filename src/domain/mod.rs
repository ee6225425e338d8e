//! Domain layer containing the projection engine and its types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `projection` - Pure scoring pipeline (fit, regret, alignment, softmax)
//! - `feedback` - Outcome feedback and lambda adaptation

pub mod feedback;
pub mod foundation;
pub mod projection;
