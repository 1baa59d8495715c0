//! Artist profile evaluation.
//!
//! For each of three dimensions (Reach, Magnitude, Impact) an LLM first
//! extracts a structured record from the free-text profile, then a second
//! call scores that record from 1 to 3 with a reason.

pub mod extraction;
pub mod literal;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod scoring;
pub mod server;
pub mod telemetry;
pub mod types;

pub use pipeline::Evaluator;
pub use types::*;
