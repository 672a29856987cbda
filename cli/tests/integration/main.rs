//! Integration tests for the webapps CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Every test points `WEBAPPS_CONFIG` at a temporary file so the user's
//! `~/.webapps` is never touched.

mod cli_tests;
