//! Diagnostics collected across a translation unit run.
//!
//! Every pipeline stage appends to one [`Diagnostics`] sink; nothing reads
//! it until the unit is finished. Warnings never stop processing. Fatal
//! records abort only the smallest enclosing scope: a class for
//! [`DiagnosticCode::NameCollision`], the whole unit for
//! [`DiagnosticCode::MalformedInput`].

use std::collections::VecDeque;
use std::fmt;

/// Severity of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Processing continued past the issue.
    Warning,
    /// A class or the whole unit was aborted.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// Machine-readable code identifying the class of issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A construct the backend does not translate was dropped.
    UnsupportedConstruct,
    /// A base chain referred back to itself; the classes on it were skipped.
    InheritanceCycle,
    /// A class declared more than one base and was skipped.
    MultipleInheritanceUnsupported,
    /// A source type outside the vocabulary defaulted to the fallback integer.
    TypeFallback,
    /// Two overloads mangled identically; the class was skipped.
    NameCollision,
    /// The declaration tree itself was structurally invalid; the unit was
    /// aborted with no output.
    MalformedInput,
}

impl DiagnosticCode {
    /// The fixed severity of this code.
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticCode::UnsupportedConstruct
            | DiagnosticCode::InheritanceCycle
            | DiagnosticCode::MultipleInheritanceUnsupported
            | DiagnosticCode::TypeFallback => Severity::Warning,
            DiagnosticCode::NameCollision | DiagnosticCode::MalformedInput => Severity::Fatal,
        }
    }

    /// Stable name used in rendered output.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::UnsupportedConstruct => "unsupported-construct",
            DiagnosticCode::InheritanceCycle => "inheritance-cycle",
            DiagnosticCode::MultipleInheritanceUnsupported => "multiple-inheritance",
            DiagnosticCode::TypeFallback => "type-fallback",
            DiagnosticCode::NameCollision => "name-collision",
            DiagnosticCode::MalformedInput => "malformed-input",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity, fixed by the code.
    pub severity: Severity,
    /// Issue class.
    pub code: DiagnosticCode,
    /// The class the issue is attributed to, if any.
    pub class: Option<String>,
    /// The member the issue is attributed to, if any.
    pub member: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Create a record; severity is derived from the code.
    pub fn new(
        code: DiagnosticCode,
        class: Option<String>,
        member: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: code.severity(),
            code,
            class,
            member,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    /// Renders as `severity[code] Class::member: message`, omitting the
    /// location parts that are absent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.severity, self.code)?;
        match (&self.class, &self.member) {
            (Some(class), Some(member)) => write!(f, " {class}::{member}")?,
            (Some(class), None) => write!(f, " {class}")?,
            (None, Some(member)) => write!(f, " {member}")?,
            (None, None) => {}
        }
        write!(f, ": {}", self.message)
    }
}

/// Ordered, append-only collection of diagnostics for one unit run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: VecDeque<Diagnostic>,
    has_fatal: bool,
}

impl Diagnostics {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, updating the cached fatal flag.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity == Severity::Fatal {
            self.has_fatal = true;
        }
        self.records.push_back(diagnostic);
    }

    /// Append a record built from its parts.
    pub fn report(
        &mut self,
        code: DiagnosticCode,
        class: Option<&str>,
        member: Option<&str>,
        message: impl Into<String>,
    ) {
        self.add(Diagnostic::new(
            code,
            class.map(str::to_owned),
            member.map(str::to_owned),
            message,
        ));
    }

    /// Whether any fatal record has been appended. O(1).
    pub fn has_fatal(&self) -> bool {
        self.has_fatal
    }

    /// Whether any warning record has been appended.
    pub fn has_warnings(&self) -> bool {
        self.records.iter().any(|d| d.severity == Severity::Warning)
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Number of warning records.
    pub fn warning_count(&self) -> usize {
        self.records
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Number of fatal records.
    pub fn fatal_count(&self) -> usize {
        self.records
            .iter()
            .filter(|d| d.severity == Severity::Fatal)
            .count()
    }

    /// All records in append order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    /// Only the warning records.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Only the fatal records.
    pub fn fatals(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| d.severity == Severity::Fatal)
    }

    /// Move all records from `other` into this collection, preserving
    /// `other`'s internal order. Used when per-unit sinks are merged.
    pub fn absorb(&mut self, mut other: Diagnostics) {
        self.has_fatal |= other.has_fatal;
        self.records.append(&mut other.records);
    }

    /// Write every record on its own line.
    pub fn emit<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for record in &self.records {
            writeln!(writer, "{record}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}
