//! Unit tests for podinit configuration types.
//!
//! This module contains tests organised into:
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - Basic type and serialisation tests
//! - [`cli_tests`] - Command-line parsing tests
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests

mod helpers;
