//! Atomic group rewriting
//!
//! Each atomic group `(?>BODY)` is replaced by `(?:(?=(?<M>BODY))\k<M>)`: the
//! lookahead tries `BODY` with full backtracking and captures what it matched,
//! then the backreference consumes exactly that text. Outer backtracking can
//! retry the backreference but never re-enter `BODY`, which is the atomic
//! group contract.
//!
//! Groups are resolved one per pass, outermost first. Rewriting a group moves
//! its body into a larger pattern, so the next pass scans again from where the
//! resolved group started to pick up any atomic groups nested inside it.

use std::sync::LazyLock;

use log::{debug, trace};

use crate::error::{AtomizeError, Result, Span};
use crate::lexer::{GroupKind, Lexer, Token};
use crate::unescaped::{ClassDepth, Needle, exists_unescaped_in_default_context};

/// Opening delimiter of an atomic group
pub const ATOMIC_GROUP_OPENER: &str = "(?>";

/// Marker prefix used unless the pattern already contains it
pub const DEFAULT_MARKER_PREFIX: &str = "$AG$";

static ATOMIC_OPENER_NEEDLE: LazyLock<Needle> = LazyLock::new(|| {
    Needle::literal(ATOMIC_GROUP_OPENER).expect("escaped literal is a valid regex")
});

/// One resolved atomic group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicGroupRecord {
    /// Resolution order, starting at 1
    pub ordinal: u32,
    /// Name of the synthetic group emulating this atomic group
    pub marker_name: String,
    /// Where the group sat in the pattern at the time it was resolved
    pub span: Span,
}

/// A pattern with its atomic groups replaced by marker-named emulations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The rewritten pattern, still carrying synthetic group names
    pub pattern: String,
    /// Prefix shared by every synthetic group name
    pub marker_prefix: String,
    /// Resolved groups in ordinal order
    pub records: Vec<AtomicGroupRecord>,
}

impl Rewrite {
    /// Whether any atomic group was rewritten
    pub fn is_unchanged(&self) -> bool {
        self.records.is_empty()
    }

    /// Name of the synthetic group for `ordinal`
    pub fn marker_name(&self, ordinal: u32) -> String {
        format!("{}{}", self.marker_prefix, ordinal)
    }
}

/// Pick a marker prefix that does not occur anywhere in `pattern`
///
/// Marker names are the prefix followed by digits, so no existing group name
/// or literal text can collide with them.
pub fn marker_prefix_for(pattern: &str) -> String {
    if !pattern.contains(DEFAULT_MARKER_PREFIX) {
        return DEFAULT_MARKER_PREFIX.to_string();
    }
    (0u32..)
        .map(|n| format!("$AG{n}$"))
        .find(|prefix| !pattern.contains(prefix.as_str()))
        .unwrap_or_else(|| DEFAULT_MARKER_PREFIX.to_string())
}

/// Whether `pattern` contains an atomic group opener outside character classes
pub fn has_atomic_groups(pattern: &str) -> bool {
    exists_unescaped_in_default_context(pattern, &ATOMIC_OPENER_NEEDLE)
}

/// Bookkeeping for a single pass over the pattern
#[derive(Debug, Default)]
struct ScanState {
    class_depth: ClassDepth,
    atomic_group_start: Option<usize>,
    /// Groups opened inside the tracked atomic group and not yet closed
    nested_open_groups: usize,
}

/// Find the first complete atomic group at or after `from`
///
/// `from` must be a position at character-class depth zero with no atomic
/// group open before it. Returns the span from the opener through its `)`.
fn locate_atomic_group(pattern: &str, from: usize) -> Result<Option<Span>> {
    let mut state = ScanState::default();

    for lexeme in Lexer::starting_at(pattern, from) {
        if !state.class_depth.in_class() {
            match (lexeme.token, state.atomic_group_start) {
                (Token::GroupStart(GroupKind::Atomic), None) => {
                    state.atomic_group_start = Some(lexeme.span.start);
                }
                (Token::GroupStart(_), Some(_)) => state.nested_open_groups += 1,
                (Token::GroupEnd, Some(start)) => {
                    if state.nested_open_groups == 0 {
                        return Ok(Some(Span::new(start, lexeme.span.end)));
                    }
                    state.nested_open_groups -= 1;
                }
                (Token::BackrefNum(_), Some(_)) => {
                    return Err(AtomizeError::UnsupportedBackrefInAtomicGroup {
                        backref: lexeme.text(pattern).to_string(),
                        position: lexeme.span.start,
                    });
                }
                _ => {}
            }
        }
        state.class_depth.observe(lexeme.token);
    }

    Ok(None)
}

/// Replace every atomic group in `pattern` with its marker-named emulation
///
/// Fails if a numbered backreference appears inside an atomic group. A pattern
/// without atomic groups comes back unchanged with no records.
pub fn rewrite_atomic_groups(pattern: &str) -> Result<Rewrite> {
    let mut rewrite = Rewrite {
        pattern: pattern.to_string(),
        marker_prefix: marker_prefix_for(pattern),
        records: Vec::new(),
    };

    if !has_atomic_groups(pattern) {
        trace!("no atomic groups in pattern");
        return Ok(rewrite);
    }

    let mut ordinal = 0u32;
    let mut resume_at = 0;
    while let Some(span) = locate_atomic_group(&rewrite.pattern, resume_at)? {
        ordinal += 1;
        let marker_name = rewrite.marker_name(ordinal);
        let current = &rewrite.pattern;
        let body = &current[span.start + ATOMIC_GROUP_OPENER.len()..span.end - 1];
        let rebuilt = format!(
            "{}(?:(?=(?<{marker}>{body}))\\k<{marker}>){}",
            &current[..span.start],
            &current[span.end..],
            marker = marker_name,
        );

        debug!(
            "resolved atomic group {} at {}..{} as `{}`",
            ordinal, span.start, span.end, marker_name
        );
        rewrite.pattern = rebuilt;
        rewrite.records.push(AtomicGroupRecord {
            ordinal,
            marker_name,
            span,
        });

        // Everything before the resolved group is settled
        resume_at = span.start;
        trace!("next pass resumes at byte {}", resume_at);
    }

    Ok(rewrite)
}
