//! Shared test utilities for crass.

pub mod fixtures;

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe, catch_unwind};
use std::time::Instant;

/// Table-driven test case structure.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
    pub should_panic: bool,
}

/// Run table-driven tests, stopping at the first case that does not match.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F) -> Result<(), String>
where
    I: Debug + Clone + RefUnwindSafe,
    E: Debug + PartialEq,
    F: Fn(I) -> E + UnwindSafe + RefUnwindSafe,
{
    for case in cases {
        let start = Instant::now();
        println!("[TEST] {} <- {:?}", case.name, case.input);

        let outcome = catch_unwind(|| test_fn(case.input.clone()));
        let elapsed = start.elapsed();

        match (outcome, case.should_panic) {
            (Err(_), true) => {
                println!("[TEST] {} panicked as expected ({elapsed:?})", case.name);
            }
            (Ok(_), true) => return Err(format!("case '{}' expected a panic", case.name)),
            (Err(_), false) => return Err(format!("case '{}' panicked", case.name)),
            (Ok(actual), false) if actual == case.expected => {
                println!("[TEST] {} passed ({elapsed:?})", case.name);
            }
            (Ok(actual), false) => {
                return Err(format!(
                    "case '{}': expected {:?}, got {:?}",
                    case.name, case.expected, actual
                ));
            }
        }
    }
    Ok(())
}
