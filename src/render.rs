//! Tagged-span rendering.
//!
//! The session describes its output as spans tagged with a semantic kind;
//! a [`Render`] implementation decides what a tag looks like. The shipped
//! [`AnsiRenderer`] maps tags to the constants in [`crate::styling`] and
//! writes through anstream, so color degrades automatically on redirected
//! output. Tests substitute recording renderers and never parse escape
//! codes.

use std::io::Write;

use anstyle::Style;

use crate::styling;

/// Semantic tag for a piece of output text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Header,
    CurrentBranch,
    RemoteMarker,
    Hint,
    Prompt,
    Error,
}

/// A run of text with one semantic tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
}

impl Span {
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Plain, text)
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Header, text)
    }

    pub fn current_branch(text: impl Into<String>) -> Self {
        Self::new(SpanKind::CurrentBranch, text)
    }

    pub fn remote_marker(text: impl Into<String>) -> Self {
        Self::new(SpanKind::RemoteMarker, text)
    }

    pub fn hint(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Hint, text)
    }

    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Prompt, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Error, text)
    }
}

/// Output collaborator for the interactive session.
pub trait Render {
    /// Write spans followed by a newline.
    fn line(&mut self, spans: &[Span]);

    /// Write spans with no newline and flush, for prompts.
    fn fragment(&mut self, spans: &[Span]);

    fn blank(&mut self) {
        self.line(&[]);
    }
}

/// Renderer writing styled text to stdout.
pub struct AnsiRenderer;

fn style_for(kind: SpanKind) -> Style {
    match kind {
        SpanKind::Plain => Style::new(),
        SpanKind::Header => styling::HEADER,
        SpanKind::CurrentBranch => styling::CURRENT_BRANCH,
        SpanKind::RemoteMarker => styling::REMOTE_MARKER,
        SpanKind::Hint => styling::HINT,
        SpanKind::Prompt => styling::PROMPT,
        SpanKind::Error => styling::ERROR,
    }
}

fn write_spans(spans: &[Span]) {
    for span in spans {
        let style = style_for(span.kind);
        styling::print!("{style}{}{style:#}", span.text);
    }
}

impl Render for AnsiRenderer {
    fn line(&mut self, spans: &[Span]) {
        write_spans(spans);
        styling::println!();
    }

    fn fragment(&mut self, spans: &[Span]) {
        write_spans(spans);
        let _ = styling::stdout().flush();
    }
}
