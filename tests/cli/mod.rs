//! CLI integration tests
//!
//! Run the built binary against files in a temporary directory and check
//! the artifacts, the console report and the exit status.
