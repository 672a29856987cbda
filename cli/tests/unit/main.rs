//! Unit tests for the webapps CLI
//!
//! These tests use in-memory collaborators and run fast without external I/O.

mod mocks;
mod reconfigure_batch;
