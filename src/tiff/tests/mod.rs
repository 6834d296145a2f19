//! Shared helpers for decoder tests
