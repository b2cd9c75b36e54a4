//! autoeval-store — Storage backends behind the core `AssessmentStore` trait.
//!
//! Ships the in-memory store used by the CLI and by engine-level tests. A
//! database-backed store would implement the same trait.

mod memory;

pub use memory::MemoryStore;
