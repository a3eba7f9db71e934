//! Atomic group transformation
//!
//! This module ties rewriting and depollution together into the public
//! entry points.

use log::debug;

use crate::atomic::{AtomicGroupRecord, rewrite_atomic_groups};
use crate::depollute::depollute;
use crate::error::Result;

/// Rewrite atomic groups into lookahead-plus-backreference emulation
///
/// # Example
/// ```
/// use atomize::transform_atomic_groups;
///
/// let result = transform_atomic_groups("a(?>bc)d").unwrap();
/// assert_eq!(result, r"a(?:(?=(bc))\1)d");
/// ```
pub fn transform_atomic_groups(pattern: &str) -> Result<String> {
    Ok(transform_atomic_groups_debug(pattern)?.output)
}

/// Transform with the intermediate marker form kept for inspection
pub fn transform_atomic_groups_debug(pattern: &str) -> Result<TransformReport> {
    let rewrite = rewrite_atomic_groups(pattern)?;
    let output = depollute(&rewrite)?;
    debug!(
        "transformed {} atomic group(s), {} -> {} bytes",
        rewrite.records.len(),
        pattern.len(),
        output.len()
    );

    Ok(TransformReport {
        input: pattern.to_string(),
        intermediate: rewrite.pattern,
        output,
        groups: rewrite.records,
    })
}

/// Result of a transformation with debug information
#[derive(Debug, Clone)]
pub struct TransformReport {
    /// The original input pattern
    pub input: String,
    /// The pattern with synthetic group names still in place
    pub intermediate: String,
    /// The transformed output
    pub output: String,
    /// Atomic groups in the order they were resolved
    pub groups: Vec<AtomicGroupRecord>,
}

impl TransformReport {
    /// Print a formatted report of the transformation
    pub fn report(&self) {
        println!("Transformation Report");
        println!("=====================");
        println!("Input:        {}", self.input);
        println!("Intermediate: {}", self.intermediate);
        println!("Output:       {}", self.output);
        for group in &self.groups {
            println!(
                "  #{} `{}` at {}..{}",
                group.ordinal, group.marker_name, group.span.start, group.span.end
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtomizeError;

    #[test]
    fn test_transform_single_group() {
        let result = transform_atomic_groups("a(?>bc)d").unwrap();
        assert_eq!(result, r"a(?:(?=(bc))\1)d");
    }

    #[test]
    fn test_transform_empty() {
        assert_eq!(transform_atomic_groups("").unwrap(), "");
    }

    #[test]
    fn test_transform_without_atomic_groups() {
        let pattern = r"(a|b)+\1[(?>]";
        assert_eq!(transform_atomic_groups(pattern).unwrap(), pattern);
    }

    #[test]
    fn test_transform_is_idempotent() {
        let once = transform_atomic_groups("(?>a(?>b)c)+(?>d)").unwrap();
        let twice = transform_atomic_groups(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_transform_error() {
        let result = transform_atomic_groups(r"(?>a\1)");
        assert!(matches!(
            result,
            Err(AtomizeError::UnsupportedBackrefInAtomicGroup { .. })
        ));
    }

    #[test]
    fn test_transform_debug() {
        let report = transform_atomic_groups_debug("a(?>bc)d").unwrap();
        assert_eq!(report.input, "a(?>bc)d");
        assert_eq!(report.intermediate, r"a(?:(?=(?<$AG$1>bc))\k<$AG$1>)d");
        assert_eq!(report.output, r"a(?:(?=(bc))\1)d");
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].marker_name, "$AG$1");
    }
}
