//! Matching pipeline: tolerance evaluation, candidate generation, and
//! unique assignment resolution
//!
//! Everything in this module is pure and synchronous. The orchestrator
//! loads data, runs the pipeline, and persists the outcome; nothing here
//! touches storage.

pub mod candidates;
pub mod resolver;
pub mod tolerance;

pub use candidates::*;
pub use resolver::*;
pub use tolerance::*;
