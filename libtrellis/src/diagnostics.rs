//! User-facing diagnostics for trellis grammars.
//!
//! Match failures of an input against a grammar are not diagnostics; they are reported as a single
//! formatted line by the [interpreter](crate::interpreter). Diagnostics describe problems with the
//! grammar itself.

use crate::common::Span;

use std::collections::HashMap;

/// Defines a registry of diagnostic codes. Each code gets a marker type implementing
/// [`DiagnosticRecord`] with the doc comment as its explanation, and a macro of the same name that
/// builds the [`Diagnostic`].
macro_rules! define_errors {
    ($registry:ident; $($(#[doc = $doc:expr])+ $code:ident: $error:ident $gen_macro:tt)*) => {
        $(
            $(#[doc = $doc])+
            pub(crate) struct $error;

            impl crate::diagnostics::DiagnosticRecord for $error {
                const CODE: &'static str = stringify!($code);
                const EXPLANATION: &'static str = concat!($($doc, "\n"),+);
            }
        )*

        pub struct $registry;

        impl crate::diagnostics::DiagnosticRegistry for $registry {
            fn codes_with_explanations() -> Vec<(&'static str, &'static str)> {
                use crate::diagnostics::DiagnosticRecord;
                vec![$(($error::CODE, $error::EXPLANATION)),*]
            }
        }

        $(
            #[allow(unused_macros)]
            macro_rules! $error $gen_macro
        )*
    };
}

/// The kind of a trellis diagnostic.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DiagnosticKind {
    /// An error diagnostic. Generally, this diagnostic should be emitted for unrecoverable errors.
    /// In other cases, a warning or a note may be more applicable.
    Error,
    /// A warning diagnostic describes a grammar construct that is legal but likely unintended.
    Warning,
    /// A note diagnostic is a generic annotation with no specific connotation like `error`. It can
    /// be particularly useful as an associated diagnostic, for example in expanding on a primary
    /// error.
    Note,
    /// A help diagnostic should instruct the user how their grammar can be changed to work
    /// correctly.
    Help,
}

/// A secondary diagnostic associated with a primary `Diagnostic`.
#[derive(Clone, Debug)]
pub struct AssociatedDiagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub msg: String,
}

/// A diagnostic for trellis grammar source code.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub title: String,
    pub code: Option<&'static str>,
    pub msg: Option<String>,
    pub associated_diagnostics: Vec<AssociatedDiagnostic>,
    pub unspanned_associated_diagnostics: Vec<AssociatedDiagnostic>,
}

/// Describes a diagnostic code and its long-form explanation.
pub trait DiagnosticRecord {
    const CODE: &'static str;
    const EXPLANATION: &'static str;
}

/// Describes a collection of diagnostic codes.
pub trait DiagnosticRegistry {
    /// All codes in the registry, paired with their explanations.
    fn codes_with_explanations() -> Vec<(&'static str, &'static str)>;
}

impl Diagnostic {
    fn new<S, M, N>(
        kind: DiagnosticKind,
        span: S,
        title: M,
        code: &'static str,
        msg: N,
    ) -> Diagnostic
    where
        S: Into<Span>,
        M: Into<String>,
        N: Into<Option<String>>,
    {
        Diagnostic {
            kind,
            span: span.into(),
            title: title.into(),
            code: Some(code),
            msg: msg.into(),
            associated_diagnostics: Vec::with_capacity(2),
            unspanned_associated_diagnostics: Vec::with_capacity(2),
        }
    }

    /// Creates an error diagnostic at a span.
    pub(crate) fn span_err<S, M, N>(span: S, title: M, code: &'static str, msg: N) -> Diagnostic
    where
        S: Into<Span>,
        M: Into<String>,
        N: Into<Option<String>>,
    {
        Self::new(DiagnosticKind::Error, span, title, code, msg)
    }

    /// Creates a warning diagnostic at a span.
    pub(crate) fn span_warn<S, M, N>(span: S, title: M, code: &'static str, msg: N) -> Diagnostic
    where
        S: Into<Span>,
        M: Into<String>,
        N: Into<Option<String>>,
    {
        Self::new(DiagnosticKind::Warning, span, title, code, msg)
    }

    /// Adds a note to the diagnostic.
    pub(crate) fn with_note<M>(mut self, note: M) -> Diagnostic
    where
        M: Into<String>,
    {
        self.unspanned_associated_diagnostics
            .push(AssociatedDiagnostic {
                kind: DiagnosticKind::Note,
                span: self.span,
                msg: note.into(),
            });
        self
    }

    /// Adds a help message to the diagnostic.
    pub(crate) fn with_help<M>(mut self, note: M) -> Diagnostic
    where
        M: Into<String>,
    {
        self.unspanned_associated_diagnostics
            .push(AssociatedDiagnostic {
                kind: DiagnosticKind::Help,
                span: self.span,
                msg: note.into(),
            });
        self
    }

    /// Adds a note to the diagnostic at a different span.
    pub(crate) fn with_spanned_note<S, M>(mut self, span: S, note: M) -> Diagnostic
    where
        S: Into<Span>,
        M: Into<String>,
    {
        self.associated_diagnostics.push(AssociatedDiagnostic {
            kind: DiagnosticKind::Note,
            span: span.into(),
            msg: note.into(),
        });
        self
    }

    /// All diagnostic codes known to libtrellis, mapped to their explanations.
    pub fn all_codes_with_explanations() -> HashMap<&'static str, &'static str> {
        use crate::linter::LintConfig;
        use crate::normalizer::errors::GrammarErrors;
        use crate::parser::errors::ParseErrors;
        use crate::scanner::errors::ScanErrors;

        let mut map = HashMap::new();
        map.extend(ScanErrors::codes_with_explanations());
        map.extend(ParseErrors::codes_with_explanations());
        map.extend(GrammarErrors::codes_with_explanations());
        map.extend(LintConfig::codes_with_explanations());
        map
    }

    /// Returns whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }
}
