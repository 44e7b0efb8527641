//! Unit tests for the failure notifier

pub mod error_tests;
pub mod event_tests;
