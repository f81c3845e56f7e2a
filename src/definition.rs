//! Test definitions
//!
//! A [`TestDefinition`] binds a test function to its declared parameters, an argument source and an optional
//! display-name template. Definitions are plain data; the engine does the work.
//!
//! ## Parameters
//!
//! Parameters come in four kinds:
//! - **Value**: fed from one column of the row, converted to the declared [`ArgType`]
//! - **Aggregate**: built by an [`Aggregator`] from the whole row; must come after every value parameter
//! - **TestInfo** / **Reporter**: context objects, recognized by kind and never fed from row data
//!
//! Value parameters take columns in declaration order, so the `n`-th value parameter reads column `n`.

use std::fmt;
use std::sync::Arc;

use paramrun_core::ArgType;

use crate::aggregate::Aggregator;
use crate::errors::{ConfigurationError, TestResult};
use crate::invocation::Invocation;
use crate::source::SourceDescriptor;

/// Test function invoked once per row.
pub type TestFn = Arc<dyn Fn(&Invocation<'_>) -> TestResult + Send + Sync>;

/// How a parameter gets its value.
#[derive(Clone)]
pub enum ParamKind {
    Value(ArgType),
    Aggregate {
        aggregator: Arc<dyn Aggregator>,
        /// 0-based row columns the aggregator reads
        columns: Vec<usize>,
    },
    TestInfo,
    Reporter,
}

impl fmt::Debug for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Value(ty) => f.debug_tuple("Value").field(ty).finish(),
            ParamKind::Aggregate { columns, .. } => f.debug_struct("Aggregate").field("columns", columns).finish(),
            ParamKind::TestInfo => f.write_str("TestInfo"),
            ParamKind::Reporter => f.write_str("Reporter"),
        }
    }
}

/// A declared test parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
}

impl Param {
    pub fn value(name: impl Into<String>, ty: ArgType) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Value(ty),
        }
    }

    /// Parameter produced by `aggregator`, which reads `columns` of the row.
    pub fn aggregate<A, I>(name: impl Into<String>, aggregator: A, columns: I) -> Self
    where
        A: Aggregator + 'static,
        I: IntoIterator<Item = usize>,
    {
        Self {
            name: name.into(),
            kind: ParamKind::Aggregate {
                aggregator: Arc::new(aggregator),
                columns: columns.into_iter().collect(),
            },
        }
    }

    pub fn test_info(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::TestInfo,
        }
    }

    pub fn reporter(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Reporter,
        }
    }

    /// Context parameters are never fed from row data.
    pub fn is_context(&self) -> bool {
        matches!(self.kind, ParamKind::TestInfo | ParamKind::Reporter)
    }

    pub fn value_type(&self) -> Option<&ArgType> {
        match &self.kind {
            ParamKind::Value(ty) => Some(ty),
            _ => None,
        }
    }
}

/// Reusable name template and source, applied to many definitions.
#[derive(Debug, Clone, Default)]
pub struct Preset {
    pub name_template: Option<String>,
    pub source: Option<SourceDescriptor>,
}

impl Preset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_template(mut self, template: impl Into<String>) -> Self {
        self.name_template = Some(template.into());
        self
    }

    pub fn with_source(mut self, source: SourceDescriptor) -> Self {
        self.source = Some(source);
        self
    }
}

/// A test function together with everything needed to run it over a source.
#[derive(Clone)]
pub struct TestDefinition {
    pub name: String,
    pub display_name: Option<String>,
    pub params: Vec<Param>,
    pub source: SourceDescriptor,
    pub name_template: Option<String>,
    test_fn: TestFn,
}

impl TestDefinition {
    pub fn new<F>(name: impl Into<String>, params: Vec<Param>, source: SourceDescriptor, test_fn: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> TestResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            display_name: None,
            params,
            source,
            name_template: None,
            test_fn: Arc::new(test_fn),
        }
    }

    /// Human-readable name of the whole definition, available to templates as `{displayName}`.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn name_template(mut self, template: impl Into<String>) -> Self {
        self.name_template = Some(template.into());
        self
    }

    /// Apply whatever `preset` sets, overriding the current template and source.
    pub fn preset(mut self, preset: &Preset) -> Self {
        if let Some(template) = &preset.name_template {
            self.name_template = Some(template.clone());
        }
        if let Some(source) = &preset.source {
            self.source = source.clone();
        }
        self
    }

    /// The display name if set, otherwise the definition name.
    pub fn resolved_display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub(crate) fn test_fn(&self) -> &TestFn {
        &self.test_fn
    }

    /// Non-context parameters, in declaration order.
    pub fn data_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| !p.is_context())
    }

    /// Reject parameter lists the engine cannot bind.
    ///
    /// ## Errors
    /// `InvalidParameters` when a value parameter follows an aggregated one, or when a context kind is declared
    /// twice.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen_aggregate = false;
        for param in self.data_params() {
            match param.kind {
                ParamKind::Aggregate { .. } => seen_aggregate = true,
                ParamKind::Value(_) if seen_aggregate => {
                    return Err(ConfigurationError::InvalidParameters(format!(
                        "value parameter '{}' follows an aggregated parameter",
                        param.name
                    )));
                }
                _ => {}
            }
        }

        let info_count = self.params.iter().filter(|p| matches!(p.kind, ParamKind::TestInfo)).count();
        let reporter_count = self.params.iter().filter(|p| matches!(p.kind, ParamKind::Reporter)).count();
        for (kind, count) in [("test info", info_count), ("reporter", reporter_count)] {
            if count > 1 {
                return Err(ConfigurationError::InvalidParameters(format!(
                    "{kind} parameter declared {count} times"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for TestDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestDefinition")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("params", &self.params)
            .field("source", &self.source)
            .field("name_template", &self.name_template)
            .finish_non_exhaustive()
    }
}
