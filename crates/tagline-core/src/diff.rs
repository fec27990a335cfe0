//! Unified diffs for previewing rewrites

use similar::TextDiff;

/// Render a unified diff between `old` and `new`, labelled with `label`.
///
/// Returns an empty string when the texts are identical.
pub fn unified_diff(label: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let old_label = format!("a/{}", label);
    let new_label = format!("b/{}", label);

    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&old_label, &new_label)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_have_no_diff() {
        assert_eq!(unified_diff("f.txt", "a\nb\n", "a\nb\n"), "");
    }

    #[test]
    fn test_diff_marks_inserted_line() {
        let diff = unified_diff("f.txt", "A\nB\nC\n", "A\nB\nZ\nC\n");
        assert!(diff.contains("--- a/f.txt"));
        assert!(diff.contains("+++ b/f.txt"));
        assert!(diff.contains("+Z"));
        assert!(!diff.contains("-B"));
    }
}
