//! Built-in demonstration suite, run by `paramrun demo`.
//!
//! One definition per feature: literal values, inline delimited rows with a custom name, context parameters,
//! presets, float conversion, enum sources, provider functions, aggregation and dates. Every definition passes.

use chrono::{Datelike, NaiveDate};
use paramrun_core::{ArgType, ArgumentValue, EnumType, ParamEnum};

use crate::aggregate::RowAccessor;
use crate::assertions::{check, check_close, check_eq};
use crate::config::EngineConfig;
use crate::definition::{Param, Preset, TestDefinition};
use crate::engine::InvocationEngine;
use crate::errors::{AggregationError, TestResult};
use crate::invocation::Invocation;
use crate::source::{ArgumentRow, EnumFilter, ProviderRegistry, SourceDescriptor};
use crate::suite::Suite;

/// Units of time fed to the enum demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl ParamEnum for TimeUnit {
    const NAME: &'static str = "TimeUnit";
    const MEMBERS: &'static [&'static str] = &["Seconds", "Minutes", "Hours", "Days"];
}

impl TimeUnit {
    pub fn from_member(member: &str) -> Option<Self> {
        match member {
            "Seconds" => Some(TimeUnit::Seconds),
            "Minutes" => Some(TimeUnit::Minutes),
            "Hours" => Some(TimeUnit::Hours),
            "Days" => Some(TimeUnit::Days),
            _ => None,
        }
    }

    pub fn seconds(self) -> i64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 3_600,
            TimeUnit::Days => 86_400,
        }
    }
}

/// Value of a Roman numeral made of `I`, `V`, `X`, `L`, `C`, `D` and `M`.
pub fn roman_value(numeral: &str) -> Option<i64> {
    let digits: Option<Vec<i64>> = numeral
        .chars()
        .map(|c| match c {
            'I' => Some(1),
            'V' => Some(5),
            'X' => Some(10),
            'L' => Some(50),
            'C' => Some(100),
            'D' => Some(500),
            'M' => Some(1000),
            _ => None,
        })
        .collect();
    let digits = digits?;
    if digits.is_empty() {
        return None;
    }
    let mut total = 0;
    for (i, d) in digits.iter().enumerate() {
        match digits.get(i + 1) {
            Some(next) if next > d => total -= d,
            _ => total += d,
        }
    }
    Some(total)
}

fn fibonacci_rows() -> Vec<ArgumentRow> {
    let mut rows = Vec::new();
    let (mut a, mut b) = (0_i64, 1_i64);
    for n in 0..8_i64 {
        rows.push(ArgumentRow::of_values([ArgumentValue::Int(n), ArgumentValue::Int(a)]).with_label(format!("fib({n})")));
        (a, b) = (b, a + b);
    }
    rows
}

fn point(row: &RowAccessor<'_>) -> Result<ArgumentValue, AggregationError> {
    let x = row.get_int(1)?;
    let y = row.get_int(2)?;
    Ok(ArgumentValue::record(
        "Point",
        [("x", ArgumentValue::Int(x)), ("y", ArgumentValue::Int(y))],
    ))
}

// ============================================================================
// Test bodies
// ============================================================================

fn word_is_present(inv: &Invocation<'_>) -> TestResult {
    let word: Option<String> = inv.get(0)?;
    check(word.is_some_and(|w| !w.is_empty()), "word must not be empty")
}

fn roman_numeral(inv: &Invocation<'_>) -> TestResult {
    let word: String = inv.get(0)?;
    let number: i64 = inv.get(1)?;
    check_eq(roman_value(&word), Some(number))
}

fn publishes_word(inv: &Invocation<'_>) -> TestResult {
    let word: String = inv.get(0)?;
    if let (Some(info), Some(reporter)) = (inv.test_info(), inv.reporter()) {
        reporter.publish_entry(info.display_name.as_str(), format!("Word: {word}"));
    }
    Ok(())
}

fn pythagorean(inv: &Invocation<'_>) -> TestResult {
    let hypotenuse: f64 = inv.get(0)?;
    let a: f64 = inv.get(1)?;
    let b: f64 = inv.get(2)?;
    check_close(hypotenuse, a.hypot(b), 1e-3)
}

fn shorter_than_a_day(inv: &Invocation<'_>) -> TestResult {
    let member: String = inv.get(0)?;
    let unit = TimeUnit::from_member(&member);
    check(
        unit.is_some_and(|u| u.seconds() < TimeUnit::Days.seconds()),
        format!("{member} is not shorter than a day"),
    )
}

fn fibonacci(inv: &Invocation<'_>) -> TestResult {
    let n: i64 = inv.get(0)?;
    let expected: i64 = inv.get(1)?;
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let closed_form = (phi.powi(n as i32) / 5.0_f64.sqrt()).round() as i64;
    check_eq(closed_form, expected)
}

fn point_distance(inv: &Invocation<'_>) -> TestResult {
    let distance: f64 = inv.get(0)?;
    let point: ArgumentValue = inv.get(1)?;
    let coord = |name: &str| point.field(name).and_then(|v| match v {
        ArgumentValue::Int(i) => Some(*i as f64),
        _ => None,
    });
    match (coord("x"), coord("y")) {
        (Some(x), Some(y)) => check_close(x.hypot(y), distance, 1e-9),
        _ => check(false, format!("{point} is not a point")),
    }
}

fn leap_day(inv: &Invocation<'_>) -> TestResult {
    let date: NaiveDate = inv.get(0)?;
    let leap: bool = inv.get(1)?;
    let is_leap = NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some();
    check_eq(is_leap, leap)
}

// ============================================================================
// Suite
// ============================================================================

/// Providers referenced by the demonstration suite.
pub fn demo_registry() -> ProviderRegistry {
    ProviderRegistry::new().with("fibonacci", fibonacci_rows)
}

/// Engine configured for the demonstration suite.
pub fn demo_engine(config: EngineConfig) -> InvocationEngine {
    InvocationEngine::new(config).with_registry(demo_registry())
}

/// Every demonstration definition, in run order.
pub fn demo_suite() -> Suite {
    let words = || SourceDescriptor::literal(["hello", "world"]);
    let elaborate = Preset::new()
        .with_name_template("Elaborate name listing all {arguments}")
        .with_source(words());

    Suite::new("demo")
        .with(
            TestDefinition::new(
                "parameterized_test",
                vec![Param::value("word", ArgType::Str)],
                words(),
                word_is_present,
            )
            .name_template("run #{index} with [{arguments}]"),
        )
        .with(
            TestDefinition::new(
                "with_nice_name",
                vec![Param::value("word", ArgType::Str), Param::value("number", ArgType::Int)],
                SourceDescriptor::delimited(["I, 1", "II, 2", "III, 3"]),
                roman_numeral,
            )
            .display_name("Roman numeral")
            .name_template("\"{0}\" should be {1}"),
        )
        .with(TestDefinition::new(
            "with_other_params",
            vec![
                Param::value("word", ArgType::Str),
                Param::test_info("info"),
                Param::reporter("reporter"),
            ],
            words(),
            publishes_word,
        ))
        .with(
            TestDefinition::new(
                "meta_preset",
                vec![Param::value("word", ArgType::Str)],
                SourceDescriptor::literal(Vec::<String>::new()),
                word_is_present,
            )
            .preset(&elaborate),
        )
        .with(
            TestDefinition::new(
                "pythagorean_floats",
                vec![
                    Param::value("c", ArgType::Float),
                    Param::value("a", ArgType::Float),
                    Param::value("b", ArgType::Float),
                ],
                SourceDescriptor::delimited_text("1,0,1\n1.414,1,1"),
                pythagorean,
            )
            .name_template("{0}² = {1}² + {2}²"),
        )
        .with(TestDefinition::new(
            "time_units",
            vec![Param::value("unit", ArgType::Enum(EnumType::of::<TimeUnit>()))],
            SourceDescriptor::enum_of::<TimeUnit>().with_filter(EnumFilter::exclude(["Days"])),
            shorter_than_a_day,
        ))
        .with(
            TestDefinition::new(
                "fibonacci_provider",
                vec![Param::value("n", ArgType::Int), Param::value("expected", ArgType::Int)],
                SourceDescriptor::method("fibonacci"),
                fibonacci,
            )
            .name_template("{label} = {1}"),
        )
        .with(
            TestDefinition::new(
                "aggregated_point",
                vec![Param::value("distance", ArgType::Float), Param::aggregate("point", point, [1, 2])],
                SourceDescriptor::delimited(["5, 3, 4", "13, 5, 12", "25, 7, 24"]),
                point_distance,
            )
            .name_template("{1} is {0} from the origin"),
        )
        .with(TestDefinition::new(
            "leap_days",
            vec![Param::value("date", ArgType::Date), Param::value("leap", ArgType::Bool)],
            SourceDescriptor::delimited(["2024-02-29, true", "2023-03-01, false", "2000-01-01, TRUE"]),
            leap_day,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SilentReporter;
    use crate::suite::SuiteOptions;

    #[test]
    fn test_roman_values() {
        assert_eq!(roman_value("III"), Some(3));
        assert_eq!(roman_value("IV"), Some(4));
        assert_eq!(roman_value("MCMXCIV"), Some(1994));
        assert_eq!(roman_value("ABC"), None);
        assert_eq!(roman_value(""), None);
    }

    #[test]
    fn test_demo_suite_passes() {
        let summary = demo_suite().run(
            &demo_engine(EngineConfig::default()),
            &SuiteOptions::new(),
            &mut SilentReporter,
        );
        let failures: Vec<String> = summary
            .reports
            .iter()
            .flat_map(|r| r.records.iter())
            .filter(|r| !r.outcome.is_passed())
            .map(|r| format!("{}: {}", r.display_name, r.outcome))
            .collect();
        assert!(failures.is_empty(), "{failures:?}");
        assert_eq!(summary.configuration_errors, 0);
        assert_eq!(summary.definitions, 9);
    }

    #[test]
    fn test_demo_display_names() {
        let engine = demo_engine(EngineConfig::default());
        let suite = demo_suite();
        let names = |test: &str| -> Vec<String> {
            let def = suite.definitions().iter().find(|d| d.name == test).unwrap();
            engine.run(def).unwrap().records.into_iter().map(|r| r.display_name).collect()
        };

        assert_eq!(names("parameterized_test"), vec!["run #1 with [\"hello\"]", "run #2 with [\"world\"]"]);
        assert_eq!(
            names("with_nice_name"),
            vec!["\"I\" should be 1", "\"II\" should be 2", "\"III\" should be 3"]
        );
        assert_eq!(
            names("meta_preset"),
            vec!["Elaborate name listing all \"hello\"", "Elaborate name listing all \"world\""]
        );
        assert_eq!(names("fibonacci_provider")[6], "fib(6) = 8");
        assert_eq!(names("aggregated_point")[0], "Point(x=3, y=4) is 5.0 from the origin");
    }

    #[test]
    fn test_context_params_publish_entries() {
        let engine = demo_engine(EngineConfig::default());
        let suite = demo_suite();
        let def = suite.definitions().iter().find(|d| d.name == "with_other_params").unwrap();
        let report = engine.run(def).unwrap();
        let entry = &report.records[1].entries[0];
        assert_eq!(entry.key, "[2] word = \"world\"");
        assert_eq!(entry.value, "Word: world");
    }
}
