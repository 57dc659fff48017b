//! Diagnostic logging for the pruner binary.
//!
//! Structured `tracing` output goes to stderr in a pretty, compact or JSON
//! format. Operator-facing progress lines are written separately, see
//! [`crate::prune::ProgressSink`].

mod tracing_init;

pub use tracing_init::*;
