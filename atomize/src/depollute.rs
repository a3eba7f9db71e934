//! Removal of synthetic group names
//!
//! After rewriting, every emulated atomic group is a named capture with a
//! matching named backreference. This pass turns them into a plain capture
//! and a numbered backreference so the synthetic names never reach the
//! caller's match results.

use std::collections::HashMap;

use crate::atomic::Rewrite;
use crate::error::Result;
use crate::lexer::{Lexer, Token};
use crate::unescaped::{ClassDepth, Context, Needle, replace_unescaped};

/// Map each marker ordinal to its capture index in `pattern`
///
/// Capture indexes count every capturing group outside character classes,
/// left to right, starting at 1.
pub fn capture_indexes(pattern: &str, marker_prefix: &str) -> HashMap<u32, usize> {
    let marker_opener = format!("(?<{marker_prefix}");
    let mut indexes = HashMap::new();
    let mut depth = ClassDepth::new();
    let mut captures = 0;

    for lexeme in Lexer::new(pattern) {
        if !depth.in_class()
            && let Token::GroupStart(kind) = lexeme.token
            && kind.is_capturing()
        {
            captures += 1;
            let ordinal = pattern[lexeme.span.start..]
                .strip_prefix(&marker_opener)
                .and_then(|rest| rest.split_once('>'))
                .and_then(|(digits, _)| digits.parse::<u32>().ok());
            if let Some(ordinal) = ordinal {
                indexes.insert(ordinal, captures);
            }
        }
        depth.observe(lexeme.token);
    }

    indexes
}

/// Replace synthetic named groups and backreferences with numbered ones
pub fn depollute(rewrite: &Rewrite) -> Result<String> {
    if rewrite.is_unchanged() {
        return Ok(rewrite.pattern.clone());
    }

    let indexes = capture_indexes(&rewrite.pattern, &rewrite.marker_prefix);
    let prefix = regex::escape(&rewrite.marker_prefix);
    let needle = Needle::new(&format!(
        r"\(\?<{prefix}\d+>|\\k<{prefix}(?<ordinal>\d+)>"
    ))?;

    let output = replace_unescaped(
        &rewrite.pattern,
        &needle,
        |caps| match caps.name("ordinal") {
            Some(ordinal) => {
                let ordinal: u32 = ordinal.as_str().parse().unwrap_or(0);
                let index = indexes
                    .get(&ordinal)
                    .copied()
                    .unwrap_or(ordinal as usize);
                format!("\\{index}")
            }
            None => "(".to_string(),
        },
        Context::Default,
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::rewrite_atomic_groups;

    fn depolluted(pattern: &str) -> String {
        depollute(&rewrite_atomic_groups(pattern).unwrap()).unwrap()
    }

    #[test]
    fn test_single_group() {
        assert_eq!(depolluted("a(?>bc)d"), r"a(?:(?=(bc))\1)d");
    }

    #[test]
    fn test_nested_groups_numbering() {
        assert_eq!(
            depolluted("(?>a(?>b)c)"),
            r"(?:(?=(a(?:(?=(b))\2)c))\1)"
        );
    }

    #[test]
    fn test_existing_capture_before_group() {
        assert_eq!(depolluted("(x)(?>a)"), r"(x)(?:(?=(a))\2)");
    }

    #[test]
    fn test_existing_captures_inside_group() {
        assert_eq!(
            depolluted("(?>(a)(?<n>b))(?>c)"),
            r"(?:(?=((a)(?<n>b)))\1)(?:(?=(c))\4)"
        );
    }

    #[test]
    fn test_unchanged_pattern_passes_through() {
        assert_eq!(depolluted("(a)[(?>]"), "(a)[(?>]");
    }

    #[test]
    fn test_capture_indexes_skip_classes_and_escapes() {
        let indexes = capture_indexes(r"[(]\((?<$AG$1>a)(?<$AG$2>b)", "$AG$");
        assert_eq!(indexes.get(&1), Some(&1));
        assert_eq!(indexes.get(&2), Some(&2));
    }

    #[test]
    fn test_capture_indexes_ignore_lookbehind() {
        let indexes = capture_indexes("(?<=a)(?<!b)(?<$AG$1>c)", "$AG$");
        assert_eq!(indexes.get(&1), Some(&1));
    }

    #[test]
    fn test_alternate_prefix() {
        assert_eq!(
            depolluted(r"(?<$AG$1>x)(?>y)\k<$AG$1>"),
            r"(?<$AG$1>x)(?:(?=(y))\2)\k<$AG$1>"
        );
    }
}
