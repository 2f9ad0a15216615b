//! Next-version suggestion from the branches going into a release.
//!
//! Only minor and patch are ever bumped: each `feat/` branch adds one to the
//! minor component and each `fix/` branch adds one to the patch component.

use semver::Version;

const FEATURE_MARKER: &str = "feat/";
const FIX_MARKER: &str = "fix/";

/// Coerce a loose version string into `major.minor.patch`.
///
/// Takes the first run of up to three dot-separated numbers, so `v1.2`,
/// `1.2.3-beta.1` and `release 4` all coerce. Returns `None` when no number is
/// present.
pub fn coerce_version(input: &str) -> Option<Version> {
    let start = input.find(|c: char| c.is_ascii_digit())?;
    let mut parts = [0u64; 3];

    for (slot, component) in parts.iter_mut().zip(input[start..].split('.')) {
        let digits: String = component.chars().take_while(char::is_ascii_digit).collect();
        if digits.is_empty() {
            break;
        }
        *slot = digits.parse().ok()?;
        if digits.len() != component.len() {
            break;
        }
    }

    Some(Version::new(parts[0], parts[1], parts[2]))
}

/// Suggest the next release version.
///
/// - unparsable `current` → `None`
/// - no branches → minor + 1
/// - otherwise `major.(minor + feat count).(patch + fix count)`; a branch
///   matching both markers counts toward both, and unmatched branches are ignored
pub fn suggest_next_version<S: AsRef<str>>(current: &str, branches: &[S]) -> Option<String> {
    let version = coerce_version(current)?;

    if branches.is_empty() {
        return Some(Version::new(version.major, version.minor + 1, version.patch).to_string());
    }

    let (features, fixes) = branches.iter().fold((0u64, 0u64), |(feat, fix), branch| {
        let branch = branch.as_ref();
        (
            feat + u64::from(branch.contains(FEATURE_MARKER)),
            fix + u64::from(branch.contains(FIX_MARKER)),
        )
    });

    Some(
        Version::new(
            version.major,
            version.minor + features,
            version.patch + fixes,
        )
        .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_branches_bumps_minor() {
        let none: [&str; 0] = [];
        assert_eq!(suggest_next_version("1.2.3", &none), Some("1.3.3".to_string()));
    }

    #[test]
    fn test_mixed_branches() {
        let branches = ["feat/x", "fix/y", "fix/z", "chore/w"];
        assert_eq!(suggest_next_version("1.2.3", &branches), Some("1.3.5".to_string()));
    }

    #[test]
    fn test_unparsable_current_version() {
        assert_eq!(suggest_next_version("not-a-version", &["feat/x"]), None);
        let none: [&str; 0] = [];
        assert_eq!(suggest_next_version("", &none), None);
    }

    #[test]
    fn test_classification_is_case_sensitive_substring() {
        let branches = ["team/feat/login", "Feat/upper", "FIX/upper", "hotfix/crash"];
        // "hotfix/" contains "fix/"
        assert_eq!(suggest_next_version("0.9.0", &branches), Some("0.10.1".to_string()));
    }

    #[test]
    fn test_branch_matching_both_counts_twice() {
        assert_eq!(
            suggest_next_version("2.0.0", &["feat/fix/both"]),
            Some("2.1.1".to_string())
        );
    }

    #[test]
    fn test_only_ignored_branches_keeps_version() {
        assert_eq!(
            suggest_next_version("3.4.5", &["chore/deps", "docs/readme"]),
            Some("3.4.5".to_string())
        );
    }

    #[test]
    fn test_never_bumps_major() {
        let branches: Vec<String> = (0..12).map(|i| format!("feat/{i}")).collect();
        assert_eq!(suggest_next_version("1.0.0", &branches), Some("1.12.0".to_string()));
    }

    #[test]
    fn test_coerce_version() {
        assert_eq!(coerce_version("v1.2"), Some(Version::new(1, 2, 0)));
        assert_eq!(coerce_version("1.2.3-beta.4"), Some(Version::new(1, 2, 3)));
        assert_eq!(coerce_version("7"), Some(Version::new(7, 0, 0)));
        assert_eq!(coerce_version("version"), None);
    }
}
