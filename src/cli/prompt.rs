//! Operator prompts.
//!
//! The release workflow asks its questions through [`Prompter`]. The terminal
//! implementation reads line-based answers, so it works over any
//! `BufRead`/`Write` pair and can be driven from tests.

use crate::error::{CliError, Result};
use crate::git::branches::filter_branches;
use std::io::{BufRead, Write};

/// Default answer of the branch-name prompt meaning "stay on the current branch"
pub const USE_EXISTING_BRANCH: &str = "Use existing branch";
/// Default answer of the branch filter prompt
pub const SHOW_ALL_BRANCHES: &str = "Show me all branches";

const NEW_BRANCH_NAME: &str = "Name of the new branch?";
const BASE_BRANCH: &str = "Name of the branch to base it on?";
const WISH_TO_MERGE: &str = "Do you want to select branches to merge into the selected branch?";
const FILTER_BRANCHES: &str = "Please provide comma separated patterns to filter your branches e.g. feat/123, fix/401, that-feature-branch";
const NO_MATCHES_FOUND: &str = "No matches found. Do you want to try again with new filters?";
const CHOOSE_BRANCHES: &str =
    "Choose the branches you want to add to the release (numbers separated by commas, 'all', or blank for none)";
const CONFIRM_BRANCHES: &str = "Do you wish to continue with these branches?";
const NO_BRANCHES_CONTINUE: &str = "You didn't select any branches. Do you still wish to continue with the release process on the current branch?";
const NEXT_RELEASE_VERSION: &str = "What should the next release version be?";
const RESUME: &str = "A previous release is in progress. Do you want to resume it?";
const CREATE_PR_TO_STAGING: &str = "Do you want to open a pull request into a staging branch?";
const NAME_OF_STAGING_BRANCH: &str = "Name of the staging branch?";

/// Answer to the new-branch prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewBranch {
    /// Stay on the branch that is currently checked out
    UseCurrent,
    /// Create `name` from `base`
    Create {
        /// New branch name
        name: String,
        /// Branch to fork from
        base: String,
    },
}

/// Answer to the branch selection prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSelection {
    /// Branches to merge, in selection order
    pub selected: Vec<String>,
    /// Whether to carry on when nothing was selected
    pub should_continue: bool,
}

/// Questions the release workflow asks the operator
pub trait Prompter {
    /// Resume the release described by `summary`?
    fn resume(&mut self, summary: &str) -> Result<bool>;

    /// Name (and base) of the release branch
    fn new_branch(&mut self, default_base: &str) -> Result<NewBranch>;

    /// Merge other branches into the release branch?
    fn wish_to_merge(&mut self) -> Result<bool>;

    /// Pick branches from `available` to merge into `current_branch`
    fn select_branches(
        &mut self,
        available: &[String],
        current_branch: &str,
    ) -> Result<BranchSelection>;

    /// Next release version, offering `suggested` as the default
    fn next_version(&mut self, suggested: Option<&str>) -> Result<String>;

    /// Staging branch for the pull request, or `None` to skip it
    fn staging_branch(&mut self, default_staging: &str) -> Result<Option<String>>;
}

/// Line-based prompter over a reader/writer pair
#[derive(Debug)]
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompter bound to the process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Create a prompter over `input` and `output`
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| prompt_failed(e.to_string()))?;
        if read == 0 {
            return Err(prompt_failed("input closed before an answer was given"));
        }
        Ok(line.trim().to_string())
    }

    fn write_prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "? {} ", text).map_err(|e| prompt_failed(e.to_string()))?;
        self.output.flush().map_err(|e| prompt_failed(e.to_string()))
    }

    /// Free text answer; blank picks `default`
    fn ask(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(default) => self.write_prompt(&format!("{} ({})", message, default))?,
            None => self.write_prompt(message)?,
        }
        let answer = self.read_answer()?;
        Ok(match default {
            Some(default) if answer.is_empty() => default.to_string(),
            _ => answer,
        })
    }

    /// Free text answer that must not be blank
    fn ask_required(&mut self, message: &str, default: &str) -> Result<String> {
        loop {
            let answer = self.ask(message, Some(default))?;
            if !answer.trim().is_empty() {
                return Ok(answer);
            }
            self.line("Please provide a value.")?;
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            self.write_prompt(&format!("{} {}", message, hint))?;
            match self.read_answer()?.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.line("Please answer y or n.")?,
            }
        }
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).map_err(|e| prompt_failed(e.to_string()))
    }

    fn filtered_branches(&mut self, available: &[String]) -> Result<Vec<String>> {
        loop {
            let patterns = self.ask(FILTER_BRANCHES, Some(SHOW_ALL_BRANCHES))?;
            if patterns == SHOW_ALL_BRANCHES {
                return Ok(available.to_vec());
            }

            let matches = filter_branches(&patterns, available);
            if !matches.is_empty() {
                return Ok(matches);
            }
            if !self.confirm(NO_MATCHES_FOUND, false)? {
                return Ok(available.to_vec());
            }
        }
    }

    fn choose(&mut self, choices: &[String]) -> Result<Vec<String>> {
        for (index, branch) in choices.iter().enumerate() {
            self.line(&format!("  {:>3}) {}", index + 1, branch))?;
        }

        loop {
            let answer = self.ask(CHOOSE_BRANCHES, None)?;
            match parse_choice(&answer, choices.len()) {
                Some(indices) => {
                    return Ok(indices.into_iter().map(|i| choices[i].clone()).collect());
                }
                None => self.line(&format!("Enter numbers between 1 and {}.", choices.len()))?,
            }
        }
    }
}

/// Parse "1, 3 4" / "all" / "" into zero-based indices, keeping first-seen order
fn parse_choice(answer: &str, len: usize) -> Option<Vec<usize>> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("all") {
        return Some((0..len).collect());
    }

    let mut indices = Vec::new();
    for token in answer.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let number: usize = token.parse().ok()?;
        if number == 0 || number > len {
            return None;
        }
        if !indices.contains(&(number - 1)) {
            indices.push(number - 1);
        }
    }
    Some(indices)
}

fn prompt_failed(reason: impl Into<String>) -> crate::error::ReleaseError {
    CliError::PromptFailed {
        reason: reason.into(),
    }
    .into()
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn resume(&mut self, summary: &str) -> Result<bool> {
        self.line(&format!("  {}", summary))?;
        self.confirm(RESUME, true)
    }

    fn new_branch(&mut self, default_base: &str) -> Result<NewBranch> {
        let name = self.ask(NEW_BRANCH_NAME, Some(USE_EXISTING_BRANCH))?;
        if name == USE_EXISTING_BRANCH {
            return Ok(NewBranch::UseCurrent);
        }
        let base = self.ask_required(BASE_BRANCH, default_base)?;
        Ok(NewBranch::Create { name, base })
    }

    fn wish_to_merge(&mut self) -> Result<bool> {
        self.confirm(WISH_TO_MERGE, true)
    }

    fn select_branches(
        &mut self,
        available: &[String],
        current_branch: &str,
    ) -> Result<BranchSelection> {
        loop {
            let choices = self.filtered_branches(available)?;
            let selected = self.choose(&choices)?;

            if selected.is_empty() {
                let question = format!(
                    "{} (current branch = {})",
                    NO_BRANCHES_CONTINUE, current_branch
                );
                let should_continue = self.confirm(&question, true)?;
                return Ok(BranchSelection {
                    selected,
                    should_continue,
                });
            }

            let listing = selected
                .iter()
                .map(|b| format!("\n - {}", b))
                .collect::<String>();
            if self.confirm(&format!("{}{}\n", CONFIRM_BRANCHES, listing), true)? {
                return Ok(BranchSelection {
                    selected,
                    should_continue: true,
                });
            }
        }
    }

    fn next_version(&mut self, suggested: Option<&str>) -> Result<String> {
        self.ask(NEXT_RELEASE_VERSION, suggested)
    }

    fn staging_branch(&mut self, default_staging: &str) -> Result<Option<String>> {
        if !self.confirm(CREATE_PR_TO_STAGING, true)? {
            return Ok(None);
        }
        self.ask_required(NAME_OF_STAGING_BRANCH, default_staging)
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn branches() -> Vec<String> {
        ["feat/login", "fix/typo", "chore/deps"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_new_branch_default_uses_current() {
        let mut p = prompter("\n");
        assert_eq!(p.new_branch("master").unwrap(), NewBranch::UseCurrent);
    }

    #[test]
    fn test_new_branch_with_default_base() {
        let mut p = prompter("release/1.4\n\n");
        assert_eq!(
            p.new_branch("master").unwrap(),
            NewBranch::Create {
                name: "release/1.4".to_string(),
                base: "master".to_string(),
            }
        );
    }

    #[test]
    fn test_select_with_filter_and_confirm() {
        // filter "fix/,feat/" -> [feat/login, fix/typo]; pick 2 then 1; confirm
        let mut p = prompter("fix/,feat/\n2,1\ny\n");
        let selection = p.select_branches(&branches(), "release/1.4").unwrap();
        assert_eq!(selection.selected, vec!["fix/typo".to_string(), "feat/login".to_string()]);
        assert!(selection.should_continue);
    }

    #[test]
    fn test_select_nothing_and_decline() {
        let mut p = prompter("\n\nn\n");
        let selection = p.select_branches(&branches(), "release/1.4").unwrap();
        assert!(selection.selected.is_empty());
        assert!(!selection.should_continue);
    }

    #[test]
    fn test_no_matches_falls_back_to_all() {
        // no match, decline retry -> all branches shown; pick 3
        let mut p = prompter("nope\nn\n3\n\n");
        let selection = p.select_branches(&branches(), "release/1.4").unwrap();
        assert_eq!(selection.selected, vec!["chore/deps".to_string()]);
    }

    #[test]
    fn test_declined_confirmation_restarts_selection() {
        let mut p = prompter("\n1\nn\n\n2\ny\n");
        let selection = p.select_branches(&branches(), "release/1.4").unwrap();
        assert_eq!(selection.selected, vec!["fix/typo".to_string()]);
    }

    #[test]
    fn test_next_version_defaults_to_suggestion() {
        let mut p = prompter("\n");
        assert_eq!(p.next_version(Some("1.3.0")).unwrap(), "1.3.0");
        let mut p = prompter("\n");
        assert_eq!(p.next_version(None).unwrap(), "");
    }

    #[test]
    fn test_staging_branch() {
        let mut p = prompter("\n\n");
        assert_eq!(p.staging_branch("preprod").unwrap().as_deref(), Some("preprod"));
        let mut p = prompter("n\n");
        assert_eq!(p.staging_branch("preprod").unwrap(), None);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut p = prompter("");
        assert!(p.wish_to_merge().is_err());
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("", 3), Some(vec![]));
        assert_eq!(parse_choice("3 1,3", 3), Some(vec![2, 0]));
        assert_eq!(parse_choice("all", 2), Some(vec![0, 1]));
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("x", 3), None);
    }
}
