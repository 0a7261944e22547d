//! Integration tests for the submission store and admin view
//!
//! These tests drive the public API against real files in temp directories.

#[path = "../common/mod.rs"]
pub mod common;

pub mod admin_flow;
pub mod submission_flow;
