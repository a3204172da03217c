//! Runtime support shared by the binary and the integration tests.

pub mod tasks;
