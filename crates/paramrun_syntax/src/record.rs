//! Records produced by the lexer.

/// A byte range in the lexed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// One field as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Field content: unquoted and unescaped for quoted fields, trimmed (when configured) for bare ones.
    pub text: String,
    /// Whether the field was enclosed in quote characters.
    pub quoted: bool,
    pub span: Span,
}

impl RawField {
    /// A bare field with no content, e.g. the middle of `a,,b`.
    pub fn is_blank(&self) -> bool {
        !self.quoted && self.text.is_empty()
    }
}

/// One non-blank, non-comment line split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number in the source.
    pub line: usize,
    pub span: Span,
    pub fields: Vec<RawField>,
}

impl Record {
    /// Field texts in order, ignoring quoting.
    pub fn texts(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.text.as_str()).collect()
    }
}
