//! Test doubles for the assertion collaborators
//!
//! Used by the crate's own tests and by downstream test suites that want to
//! exercise assertion logic without spawning a build tool.

#[cfg(any(test, debug_assertions))]
pub mod mocks;
