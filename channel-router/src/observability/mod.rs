//! Observability constants shared by library, binary, and tests.
//!
//! Library code only emits `tracing` events; subscribers are installed by
//! binaries and test harnesses.

pub mod events;
pub mod fields;
