//! The animation-orchestration core.
//!
//! `orchestrator` owns the top-level phase machine; `convergence` is the
//! nested per-unit simulation behind the refinement stage; `phase` declares
//! the sequence, timings, and per-phase drive profiles they share.

/// Per-unit convergence simulation for the refinement loop.
pub mod convergence;

/// Top-level phase state machine and its per-frame driver system.
pub mod orchestrator;

/// Phase sequence, tagged timings, and stage drive profiles.
pub mod phase;
