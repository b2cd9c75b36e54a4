//! autoeval-core — Assessment engine: question bank, template composer,
//! session state machine, grading, and scoring.
//!
//! This crate defines the fundamental data model, the persistence seam, and
//! the grading logic that the rest of the autoeval system builds on.

pub mod bank;
pub mod composer;
pub mod error;
pub mod grading;
pub mod model;
pub mod parser;
pub mod report;
pub mod score;
pub mod session;
pub mod store;
