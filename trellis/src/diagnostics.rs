//! User-facing trellis diagnostics.
//!
//! The diagnostics module renders [libtrellis diagnostics][libtrellis::diagnostics] against the
//! grammar source they were raised on, in source order, followed by a one-line tally.

use libtrellis::diagnostics::{AssociatedDiagnostic, Diagnostic, DiagnosticKind};

use annotate_snippets::{
    display_list::{DisplayList, FormatOptions},
    snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation},
};

/// Name under which a grammar read from neither a file nor a named source is reported.
pub const ANONYMOUS_GRAMMAR: &str = "<grammar>";

/// A grammar source prepared for diagnostic rendering.
pub struct GrammarSource<'a> {
    name: &'a str,
    text: String,
}

impl<'a> GrammarSource<'a> {
    pub fn new(file: Option<&'a str>, grammar: &str) -> Self {
        Self {
            name: file.unwrap_or(ANONYMOUS_GRAMMAR),
            // A diagnostic may point at the end of the grammar, so leave a column for it.
            text: format!("{} ", grammar),
        }
    }

    /// Renders `diagnostics` ordered by their position in the grammar.
    pub fn render(&self, diagnostics: &[Diagnostic], color: bool) -> String {
        if diagnostics.is_empty() {
            return String::new();
        }

        let mut ordered: Vec<&Diagnostic> = diagnostics.iter().collect();
        ordered.sort_by_key(|diagnostic| (diagnostic.span.lo, diagnostic.span.hi));

        let mut rendered: Vec<String> = ordered
            .into_iter()
            .map(|diagnostic| self.render_one(diagnostic, color))
            .collect();
        rendered.push(tally(self.name, diagnostics));
        rendered.join("\n")
    }

    fn render_one(&self, diagnostic: &Diagnostic, color: bool) -> String {
        let annotation_type = convert_diagnostic_kind(&diagnostic.kind);
        let label = diagnostic.msg.as_deref().unwrap_or_default();

        // The rule the diagnostic was raised on comes first, then whatever it points at.
        let annotations = std::iter::once(SourceAnnotation {
            label,
            annotation_type,
            range: diagnostic.span.into(),
        })
        .chain(
            diagnostic
                .associated_diagnostics
                .iter()
                .map(|associated| SourceAnnotation {
                    label: &associated.msg,
                    annotation_type: convert_diagnostic_kind(&associated.kind),
                    range: associated.span.into(),
                }),
        )
        .collect();

        let snippet = Snippet {
            title: Some(Annotation {
                label: Some(&diagnostic.title),
                id: diagnostic.code,
                annotation_type,
            }),
            footer: diagnostic
                .unspanned_associated_diagnostics
                .iter()
                .map(convert_associated_diagnostic)
                .collect(),
            slices: vec![Slice {
                source: &self.text,
                line_start: 1,
                origin: Some(self.name),
                fold: true,
                annotations,
            }],
            opt: FormatOptions {
                color,
                ..Default::default()
            },
        };
        format!("{}\n", DisplayList::from(snippet))
    }
}

/// Summarizes the errors and warnings raised on a grammar, e.g. `a.grammar: 1 error, 2 warnings`.
fn tally(name: &str, diagnostics: &[Diagnostic]) -> String {
    let count = |kind: DiagnosticKind| diagnostics.iter().filter(|d| d.kind == kind).count();
    let plural = |n: usize, what: &str| format!("{} {}{}", n, what, if n == 1 { "" } else { "s" });

    let mut parts = vec![];
    let errors = count(DiagnosticKind::Error);
    if errors > 0 {
        parts.push(plural(errors, "error"));
    }
    let warnings = count(DiagnosticKind::Warning);
    if warnings > 0 {
        parts.push(plural(warnings, "warning"));
    }
    format!("{}: {}", name, parts.join(", "))
}

/// Converts a trellis AssociatedDiagnostic to an Annotation.
fn convert_associated_diagnostic(diagnostic: &AssociatedDiagnostic) -> Annotation {
    Annotation {
        label: Some(&diagnostic.msg),
        id: None,
        annotation_type: convert_diagnostic_kind(&diagnostic.kind),
    }
}

fn convert_diagnostic_kind(diagnostic_kind: &DiagnosticKind) -> AnnotationType {
    match diagnostic_kind {
        DiagnosticKind::Error => AnnotationType::Error,
        DiagnosticKind::Warning => AnnotationType::Warning,
        DiagnosticKind::Note => AnnotationType::Note,
        DiagnosticKind::Help => AnnotationType::Help,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libtrellis::{lint_rules, parse_grammar};

    fn lints(grammar: &str) -> Vec<Diagnostic> {
        lint_rules(&parse_grammar(grammar).expect("grammar should parse"))
    }

    #[test]
    fn anonymous_grammar_is_named() {
        let source = GrammarSource::new(None, "a = 'x', b = 'y'");
        let rendered = source.render(&lints("a = 'x', b = 'y'"), false);
        assert!(rendered.contains(ANONYMOUS_GRAMMAR), "{}", rendered);
        assert!(rendered.ends_with("<grammar>: 1 warning"), "{}", rendered);
    }

    #[test]
    fn diagnostics_follow_source_order() {
        // The shadowed alternative in `c` is linted before the unused rule `b`, but `b` comes
        // first in the grammar.
        let grammar = "a = 'x', b = 'y', c = 'z' | 'zz'";
        let rendered = GrammarSource::new(Some("g.grammar"), grammar).render(&lints(grammar), false);
        let unused_b = rendered.find("rule `b` is never applied").expect("b is reported");
        let shadowed = rendered.find("L0001").expect("shadowed alternative is reported");
        assert!(unused_b < shadowed, "{}", rendered);
        assert!(rendered.ends_with("g.grammar: 3 warnings"), "{}", rendered);
    }

    #[test]
    fn tallies_errors_and_warnings() {
        let mut diagnostics = lints("a = 'x', b = 'y'");
        diagnostics.extend(parse_grammar("a = 'x").err());
        assert_eq!(tally("t", &diagnostics), "t: 1 error, 1 warning");
    }

    #[test]
    fn nothing_to_render() {
        assert_eq!(GrammarSource::new(None, "").render(&[], false), "");
    }
}
