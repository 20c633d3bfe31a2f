//! Shared helpers for the tracker's integration tests.
