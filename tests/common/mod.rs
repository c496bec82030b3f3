//! Common test utilities and fixtures for cdecl-extract integration tests
//!
//! This module provides:
//! - `TestRepo` builder for a scratch directory holding C sources
//! - Custom assertions for the JSON artifacts and the console report

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod test_repo;

pub use assertions::*;
pub use test_repo::TestRepo;
