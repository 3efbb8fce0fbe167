//! Unit tests for the busted SDK
//!
//! This module contains tests for various components of the SDK.

pub mod support;

pub mod config_tests;
pub mod error_tests;
