//! Escape-aware lexer for regex patterns
//!
//! This module walks a pattern as a stream of lexemes, each covering one
//! logical unit: a group delimiter, a numbered backreference, an escaped
//! pair, or a single character. It does no bracket or group bookkeeping;
//! callers layer that on top of the raw stream.

use std::fmt;

use crate::error::Span;

/// The kind of construct opened by a group delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Non-capturing group `(?:`
    NonCapturing,
    /// Positive lookahead `(?=`
    Lookahead,
    /// Negative lookahead `(?!`
    NegativeLookahead,
    /// Positive lookbehind `(?<=`
    Lookbehind,
    /// Negative lookbehind `(?<!`
    NegativeLookbehind,
    /// Atomic group `(?>`
    Atomic,
    /// Named capturing group `(?<name>` or `(?P<name>`; the lexeme covers the opener up to `<`
    Named,
    /// Plain capturing group `(`
    Capturing,
    /// Any other `(?` construct, such as inline flags; the lexeme covers `(?`
    Modifier,
}

impl GroupKind {
    /// Whether a group of this kind is counted as a capture
    pub fn is_capturing(self) -> bool {
        matches!(self, GroupKind::Named | GroupKind::Capturing)
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupKind::NonCapturing => "non-capturing",
            GroupKind::Lookahead => "lookahead",
            GroupKind::NegativeLookahead => "negative lookahead",
            GroupKind::Lookbehind => "lookbehind",
            GroupKind::NegativeLookbehind => "negative lookbehind",
            GroupKind::Atomic => "atomic",
            GroupKind::Named => "named",
            GroupKind::Capturing => "capturing",
            GroupKind::Modifier => "modifier",
        };
        f.write_str(name)
    }
}

/// A token in a regex pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Opening delimiter of a group
    GroupStart(GroupKind),
    /// Right parenthesis `)`
    GroupEnd,
    /// A backreference by number (e.g., \1, \12)
    BackrefNum(u32),
    /// Left bracket `[`
    CharClassOpen,
    /// Right bracket `]`
    CharClassClose,
    /// An escaped pair or any other single character
    Other,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::GroupStart(kind) => write!(f, "{} group start", kind),
            Token::GroupEnd => write!(f, "`)`"),
            Token::BackrefNum(n) => write!(f, "backref `\\{}`", n),
            Token::CharClassOpen => write!(f, "`[`"),
            Token::CharClassClose => write!(f, "`]`"),
            Token::Other => write!(f, "other"),
        }
    }
}

/// A token together with the bytes it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub span: Span,
}

impl Lexeme {
    /// The pattern text covered by this lexeme
    pub fn text<'a>(&self, pattern: &'a str) -> &'a str {
        self.span.slice(pattern)
    }
}

/// Group delimiters, longest first so `(?<=` wins over `(?<`
const GROUP_DELIMITERS: &[(&str, GroupKind)] = &[
    ("(?<=", GroupKind::Lookbehind),
    ("(?<!", GroupKind::NegativeLookbehind),
    ("(?P<", GroupKind::Named),
    ("(?:", GroupKind::NonCapturing),
    ("(?=", GroupKind::Lookahead),
    ("(?!", GroupKind::NegativeLookahead),
    ("(?>", GroupKind::Atomic),
    ("(?<", GroupKind::Named),
    ("(?", GroupKind::Modifier),
];

/// Lexer for regex patterns
///
/// Iterating yields one [`Lexeme`] per logical unit until the end of the
/// pattern. A lexer can start at any char boundary, which is how rewriting
/// passes resume after the pattern has been rebuilt.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input string
    pub fn new(input: &'a str) -> Self {
        Self::starting_at(input, 0)
    }

    /// Create a lexer that begins at byte `offset`, which must be a char boundary
    pub fn starting_at(input: &'a str, offset: usize) -> Self {
        debug_assert!(input.is_char_boundary(offset));
        Lexer {
            input,
            position: offset,
        }
    }

    /// Current byte offset into the input
    pub fn position(&self) -> usize {
        self.position
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Read an escape sequence starting at the backslash
    fn read_escape(&self) -> (Token, usize) {
        let mut chars = self.rest()[1..].char_indices();
        match chars.next() {
            Some((_, c)) if matches!(c, '1'..='9') => {
                let digits = self.rest()[1..]
                    .bytes()
                    .take_while(|b| b.is_ascii_digit())
                    .count();
                let number = self.rest()[1..=digits].parse().unwrap_or(u32::MAX);
                (Token::BackrefNum(number), 1 + digits)
            }
            Some((_, c)) => (Token::Other, 1 + c.len_utf8()),
            // A trailing backslash stands alone
            None => (Token::Other, 1),
        }
    }

    fn read_group_start(&self) -> (Token, usize) {
        let rest = self.rest();
        GROUP_DELIMITERS
            .iter()
            .find(|(delimiter, _)| rest.starts_with(*delimiter))
            .map(|&(delimiter, kind)| (Token::GroupStart(kind), delimiter.len()))
            .unwrap_or((Token::GroupStart(GroupKind::Capturing), 1))
    }

    /// Get the next lexeme from the input
    pub fn next_lexeme(&mut self) -> Option<Lexeme> {
        let c = self.rest().chars().next()?;
        let (token, len) = match c {
            '\\' => self.read_escape(),
            '(' => self.read_group_start(),
            ')' => (Token::GroupEnd, 1),
            '[' => (Token::CharClassOpen, 1),
            ']' => (Token::CharClassClose, 1),
            _ => (Token::Other, c.len_utf8()),
        };
        let span = Span::new(self.position, self.position + len);
        self.position = span.end;
        Some(Lexeme { token, span })
    }

    /// Tokenize the remaining input
    pub fn tokenize(&mut self) -> Vec<Lexeme> {
        self.by_ref().collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Lexeme> {
        self.next_lexeme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).map(|lexeme| lexeme.token).collect()
    }

    fn texts(input: &str) -> Vec<&str> {
        Lexer::new(input).map(|lexeme| lexeme.text(input)).collect()
    }

    #[test]
    fn test_literal_sequence() {
        assert_eq!(tokens("abc"), vec![Token::Other; 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_group_delimiters() {
        assert_eq!(
            tokens("(?:(?=(?!(?<=(?<!(?>"),
            vec![
                Token::GroupStart(GroupKind::NonCapturing),
                Token::GroupStart(GroupKind::Lookahead),
                Token::GroupStart(GroupKind::NegativeLookahead),
                Token::GroupStart(GroupKind::Lookbehind),
                Token::GroupStart(GroupKind::NegativeLookbehind),
                Token::GroupStart(GroupKind::Atomic),
            ]
        );
    }

    #[test]
    fn test_capturing_and_named_groups() {
        assert_eq!(
            texts("(a)(?<n>b)(?P<m>c)"),
            vec!["(", "a", ")", "(?<", "n", ">", "b", ")", "(?P<", "m", ">", "c", ")"]
        );
        assert_eq!(tokens("(?<n>")[0], Token::GroupStart(GroupKind::Named));
        assert_eq!(tokens("(a")[0], Token::GroupStart(GroupKind::Capturing));
    }

    #[test]
    fn test_modifier_group() {
        assert_eq!(texts("(?i)a"), vec!["(?", "i", ")", "a"]);
        assert_eq!(tokens("(?i)")[0], Token::GroupStart(GroupKind::Modifier));
    }

    #[test]
    fn test_escape_pairs_are_indivisible() {
        assert_eq!(texts(r"\(\?>\)"), vec![r"\(", r"\?", ">", r"\)"]);
        assert_eq!(tokens(r"\(\)"), vec![Token::Other, Token::Other]);
    }

    #[test]
    fn test_escaped_backslash_before_paren() {
        // `\\` is one pair, so the paren after it is a real delimiter
        assert_eq!(
            tokens(r"\\(?>"),
            vec![Token::Other, Token::GroupStart(GroupKind::Atomic)]
        );
    }

    #[test]
    fn test_backreference_number() {
        assert_eq!(
            tokens(r"\1\2\12"),
            vec![
                Token::BackrefNum(1),
                Token::BackrefNum(2),
                Token::BackrefNum(12)
            ]
        );
    }

    #[test]
    fn test_zero_escape_is_not_a_backreference() {
        assert_eq!(texts(r"\01"), vec![r"\0", "1"]);
        assert_eq!(tokens(r"\0"), vec![Token::Other]);
    }

    #[test]
    fn test_named_backreference_is_other() {
        assert_eq!(texts(r"\k<a>"), vec![r"\k", "<", "a", ">"]);
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(texts("a\\"), vec!["a", "\\"]);
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(texts("é\\ü"), vec!["é", "\\ü"]);
        let spans: Vec<Span> = Lexer::new("é(").map(|l| l.span).collect();
        assert_eq!(spans, vec![Span::new(0, 2), Span::new(2, 3)]);
    }

    #[test]
    fn test_character_class_brackets() {
        assert_eq!(
            tokens(r"[a\]]"),
            vec![
                Token::CharClassOpen,
                Token::Other,
                Token::Other,
                Token::CharClassClose
            ]
        );
    }

    #[test]
    fn test_restart_at_offset() {
        let input = "ab(?>c)";
        let mut lexer = Lexer::starting_at(input, 2);
        let first = lexer.next_lexeme().unwrap();
        assert_eq!(first.token, Token::GroupStart(GroupKind::Atomic));
        assert_eq!(first.span, Span::new(2, 5));
        assert_eq!(lexer.position(), 5);
    }

    #[test]
    fn test_spans_cover_input_exactly() {
        let input = r"a(?<x>[\]b])\1(?>c)\";
        let mut expected_start = 0;
        for lexeme in Lexer::new(input) {
            assert_eq!(lexeme.span.start, expected_start);
            assert!(!lexeme.span.is_empty());
            expected_start = lexeme.span.end;
        }
        assert_eq!(expected_start, input.len());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(
            Token::GroupStart(GroupKind::Atomic).to_string(),
            "atomic group start"
        );
        assert_eq!(Token::BackrefNum(3).to_string(), "backref `\\3`");
        assert_eq!(Token::GroupEnd.to_string(), "`)`");
    }
}
