//! Common test utilities for doselog CLI tests.

pub mod env;

pub use env::*;
