//! Assertion helpers for test bodies.
//!
//! Each helper returns a [`TestResult`] instead of panicking, so a failed check reads `check(...)?` and becomes an
//! `Outcome::Failed` record.

use std::fmt::Debug;

use crate::errors::{TestFailure, TestResult};

/// Assert that a condition is true.
pub fn check(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(TestFailure::assertion(message))
    }
}

/// Assert that two values are equal.
pub fn check_eq<T: PartialEq + Debug>(left: T, right: T) -> TestResult {
    if left == right {
        Ok(())
    } else {
        Err(TestFailure::assertion(format!(
            "left != right\n  left:  {left:?}\n  right: {right:?}"
        )))
    }
}

/// Assert that two values are not equal.
pub fn check_ne<T: PartialEq + Debug>(left: T, right: T) -> TestResult {
    if left != right {
        Ok(())
    } else {
        Err(TestFailure::assertion(format!(
            "left == right\n  left:  {left:?}\n  right: {right:?}"
        )))
    }
}

/// Assert that two floats differ by at most `tolerance`.
pub fn check_close(left: f64, right: f64, tolerance: f64) -> TestResult {
    if (left - right).abs() <= tolerance {
        Ok(())
    } else {
        Err(TestFailure::assertion(format!(
            "{left} and {right} differ by more than {tolerance}"
        )))
    }
}

/// Explicitly fail a test with a message.
pub fn fail(message: impl Into<String>) -> TestResult {
    Err(TestFailure::assertion(message))
}
