//! Test modules for Pin Assist.
//!
//! This module contains the cross-component test suites:
//! - Behavioural tests for the loose dictionary, including property-based tests
//! - Configuration loading and validation tests
//! - Error reporting tests
//! - Shared strategies and fixtures

pub mod config_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{create_test_dir, key_strategy, operation_strategy, query_strategy, Operation, TestFixture};

/// Run a suite of property-based tests using the given strategy and test function.
#[macro_export]
macro_rules! run_proptest {
    ($strategy:expr, $test_fn:expr) => {
        proptest::proptest!(
            proptest::test_runner::Config::with_cases(100),
            |(value in $strategy)| {
                $test_fn(value)?;
            }
        )
    };
}
