//! Diagnostics produced while evaluating directives.

use crate::error::ConditionError;
use crate::scope::ScopeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A recoverable problem with one directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub scope: ScopeKind,
    /// The directive text as it appeared in the buffer.
    pub directive: String,
    pub error: ConditionError,
}

impl Diagnostic {
    pub fn new(scope: ScopeKind, directive: impl Into<String>, error: ConditionError) -> Self {
        Self {
            scope,
            directive: directive.into(),
            error,
        }
    }

    /// Unrecognized directives are informational; everything else is an error.
    pub fn severity(&self) -> Severity {
        match self.error {
            ConditionError::UnrecognizedOperator(_) => Severity::Info,
            ConditionError::VariableNotFound { .. }
            | ConditionError::InvalidComparisonSyntax { .. } => Severity::Error,
        }
    }

    /// Emit this diagnostic as a tracing event.
    pub fn log(&self) {
        match self.severity() {
            Severity::Error => tracing::warn!(
                scope = %self.scope,
                directive = %self.directive,
                "{}",
                self.error
            ),
            Severity::Info => tracing::debug!(
                scope = %self.scope,
                directive = %self.directive,
                "{}",
                self.error
            ),
        }
    }
}

/// The result of an engine call together with the diagnostics it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Evaluation<T> {
    /// Whether any error-level diagnostic was produced.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == Severity::Error)
    }
}

/// Collects diagnostics, logging each as it is recorded.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.entries.push(diagnostic);
    }

    pub(crate) fn finish<T>(self, value: T) -> Evaluation<T> {
        Evaluation {
            value,
            diagnostics: self.entries,
        }
    }
}
