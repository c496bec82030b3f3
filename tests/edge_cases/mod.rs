//! Edge cases and error handling

pub mod error_handling_tests;
