//! End-to-end runs through `InvocationEngine`: sourcing, conversion, aggregation, naming and outcomes.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use paramrun::errors::{AggregationError, ConfigurationError, ConversionError};
use paramrun::{
    ArgType, ArgumentRow, ArgumentValue, EngineConfig, EnumFilter, EnumType, Invocation, InvocationEngine, Outcome,
    Param, ParamEnum, ProviderRegistry, RowAccessor, SourceDescriptor, TestDefinition, TestFailure, TestResult,
};

fn passes(_: &Invocation<'_>) -> TestResult {
    Ok(())
}

fn names(report: &paramrun::RunReport) -> Vec<&str> {
    report.records.iter().map(|r| r.display_name.as_str()).collect()
}

struct Planet;

impl ParamEnum for Planet {
    const NAME: &'static str = "Planet";
    const MEMBERS: &'static [&'static str] = &["Mercury", "Venus", "Earth", "Mars"];
}

// ============================================================================
// Row isolation
// ============================================================================

#[test]
fn test_conversion_error_is_confined_to_its_row() {
    let def = TestDefinition::new(
        "ints",
        vec![Param::value("n", ArgType::Int)],
        SourceDescriptor::literal(["1", "two", "3"]),
        passes,
    );
    let report = InvocationEngine::default().run(&def).unwrap();

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.records[0].outcome, Outcome::Passed);
    assert!(matches!(
        report.records[1].outcome,
        Outcome::ConversionError(ConversionError::Invalid { index: 0, .. })
    ));
    assert!(report.records[1].arguments.is_none());
    assert_eq!(report.records[2].outcome, Outcome::Passed);
    assert_eq!(report.passed(), 2);
    assert_eq!(report.failed(), 1);
}

#[test]
fn test_test_body_is_not_called_for_bad_rows() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let def = TestDefinition::new(
        "counted",
        vec![Param::value("a", ArgType::Int), Param::value("b", ArgType::Int)],
        SourceDescriptor::delimited(["1, 2", "3", "4, 5, 6", "7, 8"]),
        move |_: &Invocation<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
    );
    let report = InvocationEngine::default().run(&def).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        report.records[1].outcome,
        Outcome::ConversionError(ConversionError::ColumnCount { expected: 2, actual: 1 })
    );
    assert_eq!(
        report.records[2].outcome,
        Outcome::ConversionError(ConversionError::ColumnCount { expected: 2, actual: 3 })
    );
}

#[test]
fn test_assertion_and_error_outcomes_are_distinct() {
    fn body(inv: &Invocation<'_>) -> TestResult {
        match inv.get::<String>(0)?.as_str() {
            "ok" => Ok(()),
            "fail" => Err(TestFailure::assertion("expected ok")),
            other => Err(TestFailure::error(format!("cannot handle {other}"))),
        }
    }
    let def = TestDefinition::new(
        "outcomes",
        vec![Param::value("word", ArgType::Str)],
        SourceDescriptor::literal(["ok", "fail", "boom"]),
        body,
    );
    let report = InvocationEngine::default().run(&def).unwrap();
    let statuses: Vec<&str> = report.records.iter().map(|r| r.outcome.status()).collect();
    assert_eq!(statuses, vec!["PASSED", "FAILED", "ERROR"]);
    assert_eq!(report.records[2].outcome.message().as_deref(), Some("cannot handle boom"));
}

#[test]
fn test_panic_is_recorded_and_later_rows_still_run() {
    fn body(inv: &Invocation<'_>) -> TestResult {
        let n: i64 = inv.get(0)?;
        if n == 2 {
            panic!("row two exploded");
        }
        Ok(())
    }
    let def = TestDefinition::new(
        "panics",
        vec![Param::value("n", ArgType::Int)],
        SourceDescriptor::literal(["1", "2", "3"]),
        body,
    );
    let report = InvocationEngine::default().run(&def).unwrap();

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.records[1].outcome, Outcome::Failed("panicked: row two exploded".into()));
    assert!(report.records[2].outcome.is_passed());
}

// ============================================================================
// Aggregation
// ============================================================================

fn pair(row: &RowAccessor<'_>) -> Result<ArgumentValue, AggregationError> {
    let left = row.get_int(0)?;
    let right = row.get_int(1)?;
    if left > right {
        return Err(AggregationError::new(format!("{left} > {right}")));
    }
    Ok(ArgumentValue::record(
        "Range",
        [("lo", ArgumentValue::Int(left)), ("hi", ArgumentValue::Int(right))],
    ))
}

#[test]
fn test_aggregator_failure_is_recorded_as_aggregation_error() {
    let def = TestDefinition::new(
        "ranges",
        vec![Param::aggregate("range", pair, [0, 1])],
        SourceDescriptor::delimited(["1, 2", "5, 4", "x, 9"]),
        passes,
    )
    .name_template("{0}");
    let report = InvocationEngine::default().run(&def).unwrap();

    assert_eq!(report.records[0].outcome, Outcome::Passed);
    assert_eq!(report.records[0].display_name, "Range(lo=1, hi=2)");
    assert_eq!(
        report.records[1].outcome,
        Outcome::AggregationError(AggregationError::Failed("5 > 4".into()))
    );
    assert!(matches!(
        report.records[2].outcome,
        Outcome::AggregationError(AggregationError::Access(ConversionError::Invalid { index: 0, .. }))
    ));
}

#[test]
fn test_aggregated_row_needs_declared_columns() {
    let def = TestDefinition::new(
        "short",
        vec![Param::aggregate("range", pair, [0, 1])],
        SourceDescriptor::literal(["1"]),
        passes,
    );
    let report = InvocationEngine::default().run(&def).unwrap();
    assert_eq!(
        report.records[0].outcome,
        Outcome::ConversionError(ConversionError::TooFewColumns { required: 2, actual: 1 })
    );
}

#[test]
fn test_aggregator_panic_is_confined_to_its_row() {
    fn lookup(row: &RowAccessor<'_>) -> Result<ArgumentValue, AggregationError> {
        let table = [10, 20];
        let n = row.get_int(0)?;
        Ok(ArgumentValue::Int(table[n as usize]))
    }
    let def = TestDefinition::new(
        "lookup",
        vec![Param::aggregate("entry", lookup, [0])],
        SourceDescriptor::literal(["0", "5", "1"]),
        passes,
    );
    let report = InvocationEngine::default().run(&def).unwrap();

    assert_eq!(report.records.len(), 3);
    assert!(report.records[0].outcome.is_passed());
    match &report.records[1].outcome {
        Outcome::AggregationError(AggregationError::Failed(msg)) => {
            assert!(msg.starts_with("panicked: index out of bounds"), "{msg}");
        }
        other => panic!("expected AggregationError, got {other:?}"),
    }
    assert!(report.records[2].outcome.is_passed());
    assert_eq!(report.records[2].arguments, Some(vec![ArgumentValue::Int(20)]));
}

// ============================================================================
// Display names
// ============================================================================

#[test]
fn test_index_and_positional_tokens() {
    let def = TestDefinition::new(
        "words",
        vec![Param::value("word", ArgType::Str)],
        SourceDescriptor::literal(["foo", "bar"]),
        passes,
    )
    .name_template("{index} => {0}");
    let report = InvocationEngine::default().run(&def).unwrap();
    assert_eq!(names(&report), vec!["1 => foo", "2 => bar"]);
}

#[test]
fn test_float_rows_render_in_plain_form() {
    let def = TestDefinition::new(
        "floats",
        vec![
            Param::value("c", ArgType::Float),
            Param::value("a", ArgType::Float),
            Param::value("b", ArgType::Float),
        ],
        SourceDescriptor::delimited_text("1,0,1\n1.414,1,1"),
        passes,
    )
    .name_template("{0} {1} {2}");
    let report = InvocationEngine::default().run(&def).unwrap();
    assert_eq!(names(&report), vec!["1.0 0.0 1.0", "1.414 1.0 1.0"]);
    assert_eq!(
        report.records[1].arguments,
        Some(vec![ArgumentValue::Float(1.414), ArgumentValue::Float(1.0), ArgumentValue::Float(1.0)])
    );
}

#[test]
fn test_failed_conversion_still_gets_a_name() {
    let def = TestDefinition::new(
        "named",
        vec![Param::value("n", ArgType::Int)],
        SourceDescriptor::literal(["nope"]),
        passes,
    );
    let report = InvocationEngine::default().run(&def).unwrap();
    assert_eq!(names(&report), vec!["[1] n = \"nope\""]);
}

#[test]
fn test_engine_default_template_applies() {
    let engine = InvocationEngine::new(EngineConfig::new().with_default_name_template("#{index}: {arguments}"));
    let def = TestDefinition::new(
        "defaults",
        vec![Param::value("a", ArgType::Int), Param::value("b", ArgType::Str)],
        SourceDescriptor::delimited(["1, 'x y'"]),
        passes,
    );
    let report = engine.run(&def).unwrap();
    assert_eq!(names(&report), vec!["#1: 1, \"x y\""]);
}

// ============================================================================
// Enum and provider sources
// ============================================================================

#[test]
fn test_include_filter_yields_one_row_per_name() {
    let def = TestDefinition::new(
        "planets",
        vec![Param::value("planet", ArgType::Enum(EnumType::of::<Planet>()))],
        SourceDescriptor::enum_of::<Planet>().with_filter(EnumFilter::include(["Mars", "Venus"])),
        passes,
    )
    .name_template("{0}");
    let report = InvocationEngine::default().run(&def).unwrap();
    // Declaration order, not filter order
    assert_eq!(names(&report), vec!["Venus", "Mars"]);
    assert!(report.is_success());
}

#[test]
fn test_provider_rows_are_type_checked() {
    let registry = ProviderRegistry::new().with("mixed", || {
        vec![
            ArgumentRow::of_values([ArgumentValue::Int(1)]),
            ArgumentRow::of_values([ArgumentValue::Bool(true)]),
        ]
    });
    let engine = InvocationEngine::default().with_registry(registry);
    let def = TestDefinition::new(
        "mixed",
        vec![Param::value("n", ArgType::Int)],
        SourceDescriptor::method("mixed"),
        passes,
    );
    let report = engine.run(&def).unwrap();
    assert!(report.records[0].outcome.is_passed());
    assert!(matches!(
        report.records[1].outcome,
        Outcome::ConversionError(ConversionError::TypeMismatch { index: 0, .. })
    ));
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_configuration_errors_escape_the_run() {
    let engine = InvocationEngine::default();
    let empty = TestDefinition::new(
        "empty",
        vec![Param::value("s", ArgType::Str)],
        SourceDescriptor::literal(Vec::<String>::new()),
        passes,
    );
    assert!(matches!(engine.run(&empty), Err(ConfigurationError::NoRows)));

    let unknown = TestDefinition::new(
        "unknown",
        vec![Param::value("s", ArgType::Str)],
        SourceDescriptor::method("nowhere"),
        passes,
    );
    assert!(matches!(engine.run(&unknown), Err(ConfigurationError::UnknownProvider(name)) if name == "nowhere"));

    let malformed = TestDefinition::new(
        "malformed",
        vec![Param::value("s", ArgType::Str)],
        SourceDescriptor::delimited(["'open"]),
        passes,
    );
    assert!(matches!(engine.run(&malformed), Err(ConfigurationError::Malformed { .. })));
}
