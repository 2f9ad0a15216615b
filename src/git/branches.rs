//! Pure helpers over branch names.

use std::collections::BTreeSet;

/// Outcome of comparing selected branches against already-merged ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchDiff {
    /// Selected branches that were already merged
    pub in_both: BTreeSet<String>,
    /// Selected branches that still need merging
    pub only_in_selected: BTreeSet<String>,
}

impl BranchDiff {
    /// Selected branches still to merge, in their original selection order
    pub fn pending_in_order<'a>(&self, selected: &'a [String]) -> Vec<&'a str> {
        let mut seen = BTreeSet::new();
        selected
            .iter()
            .map(String::as_str)
            .filter(|b| self.only_in_selected.contains(*b) && seen.insert(*b))
            .collect()
    }
}

/// Split `selected` into branches also present in `merged` and branches only selected.
///
/// Both inputs are treated as sets; duplicates collapse.
pub fn diff_branches(selected: &[String], merged: &[String]) -> BranchDiff {
    let merged: BTreeSet<&str> = merged.iter().map(String::as_str).collect();
    let (in_both, only_in_selected) = selected
        .iter()
        .cloned()
        .partition::<BTreeSet<String>, _>(|b| merged.contains(b.as_str()));

    BranchDiff {
        in_both,
        only_in_selected,
    }
}

/// Parse `git branch -r` output into bare branch names.
///
/// Drops the `<remote>/HEAD -> ...` alias, `*` markers and the remote prefix.
pub fn parse_remote_branches(output: &str, remote: &str) -> Vec<String> {
    let prefix = format!("{}/", remote);
    output
        .lines()
        .map(|line| match line.split_once('*') {
            Some((_, rest)) => rest.trim(),
            None => line.trim(),
        })
        .filter(|line| !line.is_empty() && !line.contains(" -> "))
        .map(|line| line.strip_prefix(&prefix).unwrap_or(line).to_string())
        .collect()
}

/// Keep branches containing any of the comma-separated `patterns`.
pub fn filter_branches(patterns: &str, branches: &[String]) -> Vec<String> {
    let patterns: Vec<&str> = patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    branches
        .iter()
        .filter(|branch| patterns.iter().any(|p| branch.trim().contains(p)))
        .cloned()
        .collect()
}

/// Tag name for a version: `1.2.3` and `7` become `v1.2.3` and `v7`, anything else is verbatim.
pub fn format_tag(version: &str) -> String {
    let numeric = !version.is_empty() && version.chars().all(|c| c.is_ascii_digit());
    if version.contains('.') || numeric {
        format!("v{}", version)
    } else {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_diff_branches() {
        let diff = diff_branches(&strings(&["a", "b", "c"]), &strings(&["b"]));
        assert_eq!(diff.in_both, BTreeSet::from(["b".to_string()]));
        assert_eq!(
            diff.only_in_selected,
            BTreeSet::from(["a".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_diff_collapses_duplicates() {
        let diff = diff_branches(&strings(&["a", "a", "b"]), &strings(&["b", "b"]));
        assert_eq!(diff.only_in_selected.len(), 1);
        assert_eq!(diff.in_both.len(), 1);
    }

    #[test]
    fn test_pending_keeps_selection_order() {
        let selected = strings(&["fix/z", "feat/a", "fix/m", "feat/a"]);
        let diff = diff_branches(&selected, &strings(&["fix/m"]));
        assert_eq!(diff.pending_in_order(&selected), vec!["fix/z", "feat/a"]);
    }

    #[test]
    fn test_parse_remote_branches() {
        let output = "  origin/HEAD -> origin/master\n  origin/feat/login\n* origin/fix/typo\n  origin/master\n\n";
        assert_eq!(
            parse_remote_branches(output, "origin"),
            strings(&["feat/login", "fix/typo", "master"])
        );
    }

    #[test]
    fn test_filter_branches() {
        let branches = strings(&["feat/123-login", "fix/401", "chore/deps", "that-feature-branch"]);
        assert_eq!(
            filter_branches("feat/123, fix/401 ,that-feature", &branches),
            strings(&["feat/123-login", "fix/401", "that-feature-branch"])
        );
        assert!(filter_branches("nothing", &branches).is_empty());
    }

    #[test]
    fn test_format_tag() {
        assert_eq!(format_tag("1.2.3"), "v1.2.3");
        assert_eq!(format_tag("7"), "v7");
        assert_eq!(format_tag("nightly"), "nightly");
    }
}
