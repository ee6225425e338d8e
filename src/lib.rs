//! Decision Projection - Personalized Two-Option Decision Scoring
//!
//! This crate projects a choice between two options onto a user's history:
//! past thought fragments (evidence), an eight-axis value profile, and
//! adaptive settings learned from outcome feedback. Each projection yields
//! a score and probability per option, value alignment per axis, and an
//! optional breakdown of how the numbers were reached.
//!
//! # Layout
//!
//! - `domain` - Pure scoring pipeline and feedback learning
//! - `ports` - Traits for embedding providers and stores
//! - `adapters` - Mock and OpenAI embedding providers, in-memory stores
//! - `application` - Command handlers wiring ports to the domain
//! - `config` - Environment and file configuration
//! - `telemetry` - Tracing subscriber setup

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
