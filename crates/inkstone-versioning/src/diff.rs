//! Line-based diff between two text snapshots.
//!
//! The diff is positional, not LCS-based: lines are compared index by index,
//! so a single inserted line turns every following line into a delete+add
//! pair. Stored histories and the history UI depend on these exact line
//! numbers; do not replace this with an LCS diff.
//!
//! Diffs are a derived, display-oriented artifact. Restoring a version always
//! uses the full stored content, never [`apply_diff`].

use serde::{Deserialize, Serialize};

/// Kind of a single line change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Delete,
}

/// One changed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Whether the line was added or deleted.
    #[serde(rename = "type")]
    pub kind: ChangeKind,

    /// 1-based line number the change applies at. [`compute_diff`] always
    /// emits values >= 1; [`apply_diff`] treats a zero as line 1.
    pub line_number: usize,

    /// The line content (without trailing newline).
    pub content: String,
}

/// A line-level delta between two text snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    /// Number of added lines.
    pub additions: usize,

    /// Number of deleted lines.
    pub deletions: usize,

    /// Individual line changes, in ascending line order.
    pub changes: Vec<Change>,
}

impl Diff {
    /// Whether the diff contains no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Compute the positional line diff between `old` and `new`.
///
/// Lines are walked by index. A line present only in `new` is an add, a line
/// present only in `old` is a delete, and a differing line at the same index
/// is emitted as a delete of the old line followed by an add of the new one
/// at the same line number.
pub fn compute_diff(old: &str, new: &str) -> Diff {
    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();

    let mut changes = Vec::new();
    let mut additions = 0;
    let mut deletions = 0;

    let max_len = old_lines.len().max(new_lines.len());

    for i in 0..max_len {
        match (old_lines.get(i), new_lines.get(i)) {
            (None, Some(new_line)) => {
                changes.push(Change {
                    kind: ChangeKind::Add,
                    line_number: i + 1,
                    content: (*new_line).to_string(),
                });
                additions += 1;
            }
            (Some(old_line), None) => {
                changes.push(Change {
                    kind: ChangeKind::Delete,
                    line_number: i + 1,
                    content: (*old_line).to_string(),
                });
                deletions += 1;
            }
            (Some(old_line), Some(new_line)) if old_line != new_line => {
                changes.push(Change {
                    kind: ChangeKind::Delete,
                    line_number: i + 1,
                    content: (*old_line).to_string(),
                });
                changes.push(Change {
                    kind: ChangeKind::Add,
                    line_number: i + 1,
                    content: (*new_line).to_string(),
                });
                additions += 1;
                deletions += 1;
            }
            _ => {}
        }
    }

    Diff {
        additions,
        deletions,
        changes,
    }
}

/// Apply a diff produced by [`compute_diff`] to `content`.
///
/// Changes are applied in descending line-number order so earlier edits don't
/// shift the indices of later ones. The sort is stable, so the two changes of
/// a modified line keep their emitted order (delete, then add) and the line
/// is replaced in place.
pub fn apply_diff(content: &str, diff: &Diff) -> String {
    let mut lines: Vec<String> = content.split('\n').map(String::from).collect();

    let mut sorted: Vec<&Change> = diff.changes.iter().collect();
    sorted.sort_by(|a, b| b.line_number.cmp(&a.line_number));

    for change in sorted {
        let index = change.line_number.saturating_sub(1);
        match change.kind {
            ChangeKind::Add => {
                let index = index.min(lines.len());
                lines.insert(index, change.content.clone());
            }
            ChangeKind::Delete => {
                if index < lines.len() {
                    lines.remove(index);
                }
            }
        }
    }

    lines.join("\n")
}

/// Render a diff as plain text for display.
pub fn format_diff(diff: &Diff) -> String {
    let mut output = format!("Changes: +{} -{}\n\n", diff.additions, diff.deletions);

    for change in &diff.changes {
        let prefix = match change.kind {
            ChangeKind::Add => '+',
            ChangeKind::Delete => '-',
        };
        output.push_str(&format!(
            "{} {}: {}\n",
            prefix, change.line_number, change.content
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modified_line_is_delete_plus_add() {
        let diff = compute_diff("a\nb\nc", "a\nx\nc");

        assert_eq!(diff.additions, 1);
        assert_eq!(diff.deletions, 1);
        assert_eq!(
            diff.changes,
            vec![
                Change {
                    kind: ChangeKind::Delete,
                    line_number: 2,
                    content: "b".to_string(),
                },
                Change {
                    kind: ChangeKind::Add,
                    line_number: 2,
                    content: "x".to_string(),
                },
            ]
        );
    }

    #[test]
    fn insertion_rewrites_following_lines() {
        // Positional semantics: inserting a line makes every following line
        // compare unequal at its index. An LCS diff would report a single
        // add here; this one must not.
        let diff = compute_diff("a\nb", "a\nINSERTED\nb");

        assert_eq!(
            diff.changes,
            vec![
                Change {
                    kind: ChangeKind::Delete,
                    line_number: 2,
                    content: "b".to_string(),
                },
                Change {
                    kind: ChangeKind::Add,
                    line_number: 2,
                    content: "INSERTED".to_string(),
                },
                Change {
                    kind: ChangeKind::Add,
                    line_number: 3,
                    content: "b".to_string(),
                },
            ]
        );
        assert_eq!(diff.additions, 2);
        assert_eq!(diff.deletions, 1);
    }

    #[test]
    fn appended_lines_are_adds() {
        let diff = compute_diff("a", "a\nb\nc");

        assert_eq!(diff.additions, 2);
        assert_eq!(diff.deletions, 0);
        assert_eq!(diff.changes[0].line_number, 2);
        assert_eq!(diff.changes[1].line_number, 3);
    }

    #[test]
    fn truncated_lines_are_deletes() {
        let diff = compute_diff("a\nb\nc", "a");

        assert_eq!(diff.additions, 0);
        assert_eq!(diff.deletions, 2);
        assert!(diff
            .changes
            .iter()
            .all(|c| c.kind == ChangeKind::Delete));
    }

    #[test]
    fn identical_content_is_empty_diff() {
        let diff = compute_diff("a\nb", "a\nb");
        assert!(diff.is_empty());
        assert_eq!(diff.additions, 0);
        assert_eq!(diff.deletions, 0);
    }

    #[test]
    fn apply_diff_round_trips_modification() {
        let old = "a\nb\nc";
        let new = "a\nx\nc";
        let diff = compute_diff(old, new);
        assert_eq!(apply_diff(old, &diff), new);
    }

    #[test]
    fn apply_diff_round_trips_insertion() {
        let old = "a\nb";
        let new = "a\nINSERTED\nb";
        let diff = compute_diff(old, new);
        assert_eq!(apply_diff(old, &diff), new);
    }

    #[test]
    fn apply_diff_round_trips_truncation() {
        let old = "a\nb\nc\nd";
        let new = "a\nb";
        let diff = compute_diff(old, new);
        assert_eq!(apply_diff(old, &diff), new);
    }

    #[test]
    fn apply_diff_round_trips_from_empty() {
        let old = "";
        let new = "first line\nsecond line";
        let diff = compute_diff(old, new);
        assert_eq!(apply_diff(old, &diff), new);
    }

    #[test]
    fn apply_diff_tolerates_zero_line_number() {
        // compute_diff never emits line 0, but the fields are public
        let diff = Diff {
            additions: 1,
            deletions: 0,
            changes: vec![Change {
                kind: ChangeKind::Add,
                line_number: 0,
                content: "x".to_string(),
            }],
        };
        assert_eq!(apply_diff("a", &diff), "x\na");
    }

    #[test]
    fn format_diff_renders_stats_and_lines() {
        let diff = compute_diff("a\nb\nc", "a\nx\nc");
        let rendered = format_diff(&diff);

        assert!(rendered.starts_with("Changes: +1 -1\n"));
        assert!(rendered.contains("- 2: b\n"));
        assert!(rendered.contains("+ 2: x\n"));
    }
}
