//! Test host crate for gcdlab workspace integration tests.
//!
//! See `tests/` for the end-to-end harness and pool scenarios.
