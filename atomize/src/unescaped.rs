//! Context-aware search and replace over regex pattern text
//!
//! These primitives look for a needle (itself a regex) only where it would be
//! real syntax: never inside an escape pair, and only inside or outside
//! character classes as the [`Context`] asks.

use regex::{Captures, Regex, RegexBuilder};

use crate::error::Result;
use crate::lexer::{Lexer, Token};

/// Where in a pattern a needle may be found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Context {
    /// Outside any character class
    #[default]
    Default,
    /// Inside a character class
    CharClass,
    /// Anywhere, as long as it is not escaped
    Any,
}

impl Context {
    fn admits(self, depth: &ClassDepth) -> bool {
        match self {
            Context::Default => !depth.in_class(),
            Context::CharClass => depth.in_class(),
            Context::Any => true,
        }
    }
}

/// Character-class nesting tracked over a lexeme stream
///
/// Only gates how other lexemes are interpreted; an unbalanced `]` at depth
/// zero is a literal and leaves the depth at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassDepth {
    depth: usize,
}

impl ClassDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the depth for a lexeme that has just been read
    pub fn observe(&mut self, token: Token) {
        match token {
            Token::CharClassOpen => self.depth += 1,
            Token::CharClassClose => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }

    pub fn in_class(&self) -> bool {
        self.depth > 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// A compiled needle pattern
///
/// Needles are matched with `.` matching newlines. The unanchored form backs
/// the quick rejection test; the anchored form is tried at lexeme starts.
#[derive(Debug, Clone)]
pub struct Needle {
    search: Regex,
    anchored: Regex,
}

impl Needle {
    /// Compile a needle from regex syntax
    pub fn new(pattern: &str) -> Result<Self> {
        let search = RegexBuilder::new(pattern)
            .dot_matches_new_line(true)
            .build()?;
        let anchored = RegexBuilder::new(&format!("^(?:{pattern})"))
            .dot_matches_new_line(true)
            .build()?;
        Ok(Needle { search, anchored })
    }

    /// Compile a needle that matches `text` literally
    pub fn literal(text: &str) -> Result<Self> {
        Self::new(&regex::escape(text))
    }

    /// Whether the needle occurs anywhere in `haystack`, escaped or not
    pub fn is_found_in(&self, haystack: &str) -> bool {
        self.search.is_match(haystack)
    }

    /// Whether a match starts exactly at byte `pos`
    fn matches_at_start(&self, haystack: &str, pos: usize) -> bool {
        self.anchored.is_match(&haystack[pos..])
    }

    /// Captures of a match starting exactly at byte `pos`
    fn captures_at_start<'h>(&self, haystack: &'h str, pos: usize) -> Option<Captures<'h>> {
        self.anchored.captures(&haystack[pos..])
    }
}

/// Check whether `needle` occurs unescaped in `pattern` within `context`
///
/// The pattern is assumed to be well formed; unbalanced brackets give
/// unspecified (but non-panicking) results.
pub fn exists_unescaped(pattern: &str, needle: &Needle, context: Context) -> bool {
    // Quick partial test avoids the scan in most cases
    if !needle.is_found_in(pattern) {
        return false;
    }
    let mut depth = ClassDepth::new();
    for lexeme in Lexer::new(pattern) {
        if context.admits(&depth) && needle.matches_at_start(pattern, lexeme.span.start) {
            return true;
        }
        depth.observe(lexeme.token);
    }
    false
}

/// Check whether `needle` occurs unescaped outside any character class
pub fn exists_unescaped_in_default_context(pattern: &str, needle: &Needle) -> bool {
    exists_unescaped(pattern, needle, Context::Default)
}

/// Replace every unescaped occurrence of `needle` within `context`
///
/// Matches are found left to right and never overlap. `replacer` receives the
/// captures of each match; their offsets are relative to the match start.
/// Text consumed by a match is not re-scanned, so brackets inside a match do
/// not affect the character-class depth.
pub fn replace_unescaped<F>(pattern: &str, needle: &Needle, mut replacer: F, context: Context) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    if !needle.is_found_in(pattern) {
        return pattern.to_string();
    }

    let mut result = String::with_capacity(pattern.len());
    let mut depth = ClassDepth::new();
    let mut copied_up_to = 0;
    let mut lexer = Lexer::new(pattern);

    while let Some(lexeme) = lexer.next_lexeme() {
        let start = lexeme.span.start;
        if context.admits(&depth)
            && let Some(caps) = needle.captures_at_start(pattern, start)
        {
            let matched_len = caps.get(0).map_or(0, |m| m.len());
            result.push_str(&pattern[copied_up_to..start]);
            result.push_str(&replacer(&caps));
            copied_up_to = start + matched_len;
            if matched_len > 0 {
                lexer = Lexer::starting_at(pattern, copied_up_to);
                continue;
            }
        }
        depth.observe(lexeme.token);
    }

    result.push_str(&pattern[copied_up_to..]);
    result
}
