//! Condition engine - evaluates `if[...]` directives embedded in dialogue text.
//!
//! Two passes share the same scanner and comparator:
//! 1. **Render**: template directives `<m>if[cond]{"text"}` are replaced by
//!    their text when the condition holds and removed otherwise
//! 2. **Gate**: gate directives `<m>if[cond]` are all evaluated and the text
//!    passes only if none of them fails
//!
//! Malformed input never fails a call. Every problem is logged, recorded
//! as a [`Diagnostic`] and replaced by a safe default.

pub mod comparison;
mod config;
mod diagnostics;
pub mod scanner;

pub use comparison::{Condition, ConditionClass, Operator};
pub use config::*;
pub use diagnostics::*;

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ConditionError;
use crate::scope::{Scope, ScopeKind, ScopeProvider};

/// Three or more consecutive blank (or whitespace-only) lines. The first
/// line ending is captured so CRLF text stays CRLF.
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\r?\n)(?:[ \t\r]*\n){3,}").expect("blank line pattern is valid")
});

static LEADING_BLANK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A(?:[ \t\r]*\n)+").expect("blank line pattern is valid"));

static TRAILING_BLANK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n[ \t\r]*)+\z").expect("blank line pattern is valid"));

/// Order of the gate pass. Policy checks of both actors run between the
/// conspirator's and the target's value comparisons.
const GATE_STEPS: [(ScopeKind, ConditionClass); 6] = [
    (ScopeKind::Global, ConditionClass::Value),
    (ScopeKind::Table, ConditionClass::Value),
    (ScopeKind::Conspirator, ConditionClass::Value),
    (ScopeKind::Conspirator, ConditionClass::Policy),
    (ScopeKind::Target, ConditionClass::Policy),
    (ScopeKind::Target, ConditionClass::Value),
];

/// What to do with one template directive.
enum Splice {
    /// Replace the directive with this text and rescan it.
    Rescan(String),
    /// Replace the directive with this text and continue after it.
    Skip(String),
    /// Leave the directive in place.
    Keep,
}

/// The condition/template engine.
///
/// Holds configuration only; it can be shared between threads and reused
/// for any number of texts and scopes.
#[derive(Debug, Clone, Default)]
pub struct ConditionEngine {
    config: EngineConfig,
}

impl ConditionEngine {
    /// Create a new engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render all template directives in `text`.
    pub fn render<P: ScopeProvider + ?Sized>(&self, text: &str, context: &P) -> String {
        self.render_with_diagnostics(text, context).value
    }

    /// Check all gate directives in `text`.
    pub fn passes<P: ScopeProvider + ?Sized>(&self, text: &str, context: &P) -> bool {
        self.passes_with_diagnostics(text, context).value
    }

    /// Whether `text` contains any directive. Plain strings can skip evaluation.
    pub fn has_directives(&self, text: &str) -> bool {
        scanner::contains_directive(text)
    }

    /// Remove all gate directives from `text` without evaluating them.
    pub fn strip_directives(&self, text: &str) -> String {
        scanner::strip_gate_directives(text).into_owned()
    }

    /// Render all template directives, returning the diagnostics produced.
    ///
    /// # Algorithm
    ///
    /// For each scope in [`ScopeKind::ALL`] order:
    /// 1. Find the first template directive of that scope at or after the cursor
    /// 2. Evaluate it and splice the result into the buffer
    /// 3. Restart the scan at the splice point, so directives inside the
    ///    substituted text are evaluated too
    ///
    /// Every rescanned splice strictly shrinks the buffer, so the loop ends.
    /// Finally blank line runs are collapsed (see [`EngineConfig`]).
    #[tracing::instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub fn render_with_diagnostics<P: ScopeProvider + ?Sized>(
        &self,
        text: &str,
        context: &P,
    ) -> Evaluation<String> {
        let mut log = DiagnosticLog::default();
        let mut buffer = text.to_string();

        for kind in ScopeKind::ALL {
            let scope = context.scope(kind);
            let mut cursor = 0;

            while let Some(directive) = scanner::first_template_directive(&buffer, kind, cursor) {
                let range = directive.start..directive.end();
                let splice = self.splice_for(kind, scope, &directive, &mut log);

                cursor = match splice {
                    Splice::Rescan(replacement) => {
                        buffer.replace_range(range.clone(), &replacement);
                        range.start
                    }
                    Splice::Skip(replacement) => {
                        buffer.replace_range(range.clone(), &replacement);
                        range.start + replacement.len()
                    }
                    Splice::Keep => range.end,
                };
            }
        }

        if self.config.collapse_blank_lines {
            buffer = tidy_blank_lines(&buffer);
        }

        log.finish(buffer)
    }

    /// Check all gate directives, returning the diagnostics produced.
    ///
    /// The first directive that is false, refers to a missing variable or has
    /// an unparseable operand fails the whole text. Directives without a
    /// recognized comparison are ignored.
    #[tracing::instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub fn passes_with_diagnostics<P: ScopeProvider + ?Sized>(
        &self,
        text: &str,
        context: &P,
    ) -> Evaluation<bool> {
        let mut log = DiagnosticLog::default();

        for (kind, class) in GATE_STEPS {
            let scope = context.scope(kind);

            for directive in scanner::gate_directives(text, kind) {
                if comparison::classify(directive.payload, kind) != class {
                    continue;
                }

                match check(directive.payload, kind, scope) {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::debug!(directive = directive.raw, "gate failed");
                        return log.finish(false);
                    }
                    Err(error @ ConditionError::UnrecognizedOperator(_)) => {
                        log.record(Diagnostic::new(kind, directive.raw, error));
                    }
                    Err(error) => {
                        log.record(Diagnostic::new(kind, directive.raw, error));
                        return log.finish(false);
                    }
                }
            }
        }

        log.finish(true)
    }

    fn splice_for(
        &self,
        kind: ScopeKind,
        scope: &dyn Scope,
        directive: &scanner::DirectiveMatch<'_>,
        log: &mut DiagnosticLog,
    ) -> Splice {
        match check(directive.payload, kind, scope) {
            Ok(true) => {
                let replacement = directive.replacement.unwrap_or_default();
                if self.config.unescape_newlines {
                    Splice::Rescan(replacement.replace("\\n", "\n"))
                } else {
                    Splice::Rescan(replacement.to_string())
                }
            }
            Ok(false) => Splice::Rescan(String::new()),
            Err(error @ ConditionError::UnrecognizedOperator(_)) => {
                log.record(Diagnostic::new(kind, directive.raw, error));
                Splice::Keep
            }
            Err(error) => {
                log.record(Diagnostic::new(kind, directive.raw, error));
                Splice::Skip(self.config.placeholders.for_scope(kind).to_string())
            }
        }
    }
}

fn check(payload: &str, kind: ScopeKind, scope: &dyn Scope) -> Result<bool, ConditionError> {
    let condition = comparison::parse(payload, kind)?;
    comparison::evaluate(&condition, kind, scope)
}

/// Collapse runs of 3+ blank lines into a single blank line and drop
/// leading/trailing blank lines. Spaces on content lines are kept.
fn tidy_blank_lines(text: &str) -> String {
    let collapsed = BLANK_RUN.replace_all(text, "${1}${1}");
    let trimmed = LEADING_BLANK.replace(&collapsed, "");
    TRAILING_BLANK.replace(&trimmed, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeContext;
    use intrigue_rules::{Actor, Variable, VariableTable};

    fn globals(variables: impl IntoIterator<Item = Variable>) -> VariableTable {
        variables.into_iter().collect()
    }

    #[test]
    fn test_render_true_and_false() {
        let engine = ConditionEngine::with_defaults();

        let five = globals([Variable::int("x", 5)]);
        let context = ScopeContext::new().with_global(&five);
        assert_eq!(engine.render(r#"!if[x==5]{"A"}"#, &context), "A");

        let six = globals([Variable::int("x", 6)]);
        let context = ScopeContext::new().with_global(&six);
        assert_eq!(engine.render(r#"!if[x==5]{"A"}"#, &context), "");
    }

    #[test]
    fn test_render_and_gate_agree() {
        let engine = ConditionEngine::with_defaults();

        for value in [4, 5, 6] {
            let table = globals([Variable::int("x", value)]);
            for kind in ScopeKind::ALL {
                let context = match kind {
                    ScopeKind::Global => ScopeContext::new().with_global(&table),
                    ScopeKind::Table => ScopeContext::new().with_table(&table),
                    ScopeKind::Conspirator => ScopeContext::new().with_conspirator(&table),
                    ScopeKind::Target => ScopeContext::new().with_target(&table),
                };
                let marker = kind.marker();
                let rendered = engine.render(&format!(r#"{marker}if[x==5]{{"A"}}"#), &context);
                let passed = engine.passes(&format!("{marker}if[x==5]"), &context);

                assert_eq!(rendered == "A", value == 5, "{kind} render with x={value}");
                assert_eq!(passed, value == 5, "{kind} gate with x={value}");
            }
        }
    }

    #[test]
    fn test_operator_table_through_gate() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::int("x", 10)]);
        let context = ScopeContext::new().with_global(&table);

        let cases = [
            ("!if[x>>5]", true),
            ("!if[x>=10]", true),
            ("!if[x>>10]", false),
            ("!if[x==10]", true),
            ("!if[x!=10]", false),
            ("!if[x<<10]", false),
            ("!if[x<=10]", true),
        ];
        for (text, expected) in cases {
            assert_eq!(engine.passes(text, &context), expected, "{text}");
        }
    }

    #[test]
    fn test_unresolved_variable() {
        let engine = ConditionEngine::with_defaults();
        let context = ScopeContext::new();

        let rendered = engine.render_with_diagnostics(r#"!if[y==1]{"A"}"#, &context);
        assert_eq!(rendered.value, "NULL");
        assert_eq!(rendered.diagnostics.len(), 1);
        assert!(rendered.has_errors());
        assert!(matches!(
            &rendered.diagnostics[0].error,
            ConditionError::VariableNotFound { name, .. } if name == "y"
        ));

        assert!(!engine.passes("!if[y==1]", &context));
    }

    #[test]
    fn test_placeholder_only_for_global_scope() {
        let engine = ConditionEngine::with_defaults();
        let context = ScopeContext::new();

        assert_eq!(engine.render(r#"a!if[y==1]{"A"}b"#, &context), "aNULLb");
        assert_eq!(engine.render(r#"a#if[y==1]{"A"}b"#, &context), "ab");
        assert_eq!(engine.render(r#"a$if[y==1]{"A"}b"#, &context), "ab");
        assert_eq!(engine.render(r#"a&if[y==1]{"A"}b"#, &context), "ab");
    }

    #[test]
    fn test_invalid_operand_uses_placeholder() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::int("gold", 3)]);
        let context = ScopeContext::new().with_global(&table).with_table(&table);

        assert_eq!(engine.render(r#"!if[gold>>lots]{"rich"}"#, &context), "NULL");
        assert_eq!(engine.render(r#"#if[gold>>lots]{"rich"}"#, &context), "");
        assert!(!engine.passes("#if[gold>>lots]", &context));
    }

    #[test]
    fn test_unrecognized_directive_is_left_untouched() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::int("gold", 3)]);
        let context = ScopeContext::new().with_global(&table);

        let text = r#"before !if[gold]{"A"} after !if[gold==3]{"B"}"#;
        let rendered = engine.render_with_diagnostics(text, &context);
        assert_eq!(rendered.value, r#"before !if[gold]{"A"} after B"#);
        assert_eq!(rendered.diagnostics.len(), 1);
        assert!(!rendered.has_errors());

        assert!(engine.passes("!if[gold] !if[gold==3]", &context));
        assert!(!engine.passes("!if[gold] !if[gold==4]", &context));
    }

    #[test]
    fn test_bool_ordering_is_a_no_op() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::bool("met", true)]);
        let context = ScopeContext::new().with_global(&table);

        let text = r#"!if[met>>false]{"A"}"#;
        assert_eq!(engine.render(text, &context), text);
        assert!(engine.passes("!if[met<<true]", &context));
    }

    #[test]
    fn test_bool_not_equal_is_inequality() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::bool("met", true)]);
        let context = ScopeContext::new().with_table(&table);

        assert_eq!(engine.render(r#"#if[met!=false]{"A"}"#, &context), "A");
        assert_eq!(engine.render(r#"#if[met!=true]{"A"}"#, &context), "");
        assert!(!engine.passes("#if[met!=true]", &context));
    }

    #[test]
    fn test_policy_gating() {
        let engine = ConditionEngine::with_defaults();
        let actor = Actor::new("Mira").with_policy("P1");
        let context = ScopeContext::new().with_conspirator(&actor).with_target(&actor);

        assert!(engine.passes("$if[HasPolicy==P1]", &context));
        assert!(!engine.passes("$if[!HasPolicy==P1]", &context));
        assert!(!engine.passes("$if[HasPolicy==P2]", &context));
        assert!(engine.passes("&if[!HasPolicy==P2]", &context));
        assert!(engine.passes("$if[HasPolicy!=P1]", &context));
    }

    #[test]
    fn test_policy_templates() {
        let engine = ConditionEngine::with_defaults();
        let actor = Actor::new("Mira").with_policy("Zealot");
        let context = ScopeContext::new().with_target(&actor);

        let text = r#"&if[HasPolicy==Zealot]{"Heretic!"}&if[!HasPolicy==Zealot]{"Welcome."}"#;
        assert_eq!(engine.render(text, &context), "Heretic!");
    }

    #[test]
    fn test_gate_short_circuits_across_scopes() {
        let engine = ConditionEngine::with_defaults();
        let global = globals([Variable::int("year", 1204)]);
        let target = Actor::new("Aren").with_variable(Variable::bool("guarded", true));
        let context = ScopeContext::new().with_global(&global).with_target(&target);

        assert!(engine.passes("!if[year>=1200] &if[guarded==true]", &context));

        let result = engine.passes_with_diagnostics("&if[missing==1] !if[year<<1200]", &context);
        assert!(!result.value);
        // the global step fails before the target scope is inspected
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_multiple_scopes_render_independently() {
        let engine = ConditionEngine::with_defaults();
        let global = globals([Variable::int("year", 1204)]);
        let target = Actor::new("Aren").with_variable(Variable::bool("guarded", true));
        let context = ScopeContext::new().with_global(&global).with_target(&target);

        let text = r#"&if[guarded==true]{"Guards stand watch. "}!if[year>>1200]{"The war rages."}"#;
        assert_eq!(
            engine.render(text, &context),
            "Guards stand watch. The war rages."
        );
    }

    #[test]
    fn test_substituted_text_is_scanned_by_later_scopes() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::int("x", 1), Variable::int("y", 2)]);
        let context = ScopeContext::new().with_global(&table).with_table(&table);

        let text = r##"!if[x==1]{"#if[y==2]"}{"two"}"##;
        assert_eq!(engine.render(text, &context), "two");
    }

    #[test]
    fn test_placeholder_is_not_rescanned() {
        let config = EngineConfig {
            placeholders: Placeholders {
                global: r#"!if[y==1]{"loop"}"#.to_string(),
                ..Placeholders::default()
            },
            ..EngineConfig::default()
        };
        let engine = ConditionEngine::new(config);

        assert_eq!(
            engine.render(r#"!if[y==1]{"A"}"#, &ScopeContext::new()),
            r#"!if[y==1]{"loop"}"#
        );
    }

    #[test]
    fn test_newline_escapes_in_replacement() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::bool("met", true)]);
        let context = ScopeContext::new().with_global(&table);

        let text = r#"!if[met==true]{"Hello.\nWelcome back."}"#;
        assert_eq!(engine.render(text, &context), "Hello.\nWelcome back.");

        let raw = ConditionEngine::new(EngineConfig {
            unescape_newlines: false,
            ..EngineConfig::default()
        });
        assert_eq!(raw.render(text, &context), r"Hello.\nWelcome back.");
    }

    #[test]
    fn test_blank_lines_collapse() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::bool("met", false)]);
        let context = ScopeContext::new().with_global(&table);

        let text = "\n\nFirst line\n!if[met==true]{\"Secret\"}\n\n\n\nLast line\n\n";
        assert_eq!(engine.render(text, &context), "First line\n\nLast line");

        let two_blank = "A\n\n\nB";
        assert_eq!(engine.render(two_blank, &context), two_blank);

        let whitespace = "A\n  \n\t\n \n\nB";
        assert_eq!(engine.render(whitespace, &context), "A\n\nB");
    }

    #[test]
    fn test_blank_lines_keep_crlf() {
        let engine = ConditionEngine::with_defaults();
        let context = ScopeContext::new();

        let text = "\r\nFirst line\r\n\r\n\r\n\r\nLast line\r\n  \r\n";
        let rendered = engine.render(text, &context);
        assert_eq!(rendered, "First line\r\n\r\nLast line");
        assert_eq!(engine.render(&rendered, &context), rendered);
    }

    #[test]
    fn test_trailing_whitespace_lines_are_dropped() {
        let engine = ConditionEngine::with_defaults();
        let context = ScopeContext::new();

        assert_eq!(engine.render("  \n\t\nBody \n  \n\t", &context), "Body ");
        assert_eq!(engine.render("Pour the wine ", &context), "Pour the wine ");
    }

    #[test]
    fn test_gate_before_template_is_preserved() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::int("a", 1), Variable::int("x", 1)]);
        let context = ScopeContext::new().with_global(&table);

        let rendered = engine.render_with_diagnostics(r#"!if[a==1] hello !if[x==1]{"A"}"#, &context);
        assert_eq!(rendered.value, "!if[a==1] hello A");
        assert!(rendered.diagnostics.is_empty());
        assert!(engine.passes(&rendered.value, &context));
    }

    #[test]
    fn test_mixed_gate_and_template_across_scopes() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::int("gold", 60)]);
        let context = ScopeContext::new().with_conspirator(&table).with_table(&table);

        let text = r#"$if[gold>=10]Pay #if[gold>>1]{"well"} $if[gold>=50]{"generously"}"#;
        let rendered = engine.render(text, &context);
        assert_eq!(rendered, "$if[gold>=10]Pay well generously");
        assert_eq!(engine.strip_directives(&rendered), "Pay well generously");
    }

    #[test]
    fn test_render_is_idempotent() {
        let engine = ConditionEngine::with_defaults();
        let table = globals([Variable::int("favor", 4)]);
        let context = ScopeContext::new().with_conspirator(&table);

        let once = engine.render(
            "My lord,\n\n\n\n$if[favor>=3]{\"I am at your service.\"}\n",
            &context,
        );
        assert_eq!(once, "My lord,\n\nI am at your service.");
        assert_eq!(engine.render(&once, &context), once);
    }

    #[test]
    fn test_plain_text() {
        let engine = ConditionEngine::with_defaults();
        let context = ScopeContext::new();

        assert!(!engine.has_directives("plain text"));
        assert_eq!(engine.render("plain text", &context), "plain text");
        assert!(engine.passes("plain text", &context));
    }

    #[test]
    fn test_strip_directives() {
        let engine = ConditionEngine::with_defaults();
        assert!(engine.has_directives("$if[HasPolicy==Zealot]Pray with me"));
        assert_eq!(
            engine.strip_directives("$if[HasPolicy==Zealot]Pray with me!if[x>>1]"),
            "Pray with me"
        );
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConditionEngine>();
    }
}
