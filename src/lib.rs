pub mod answers;
pub mod app_vars;
pub mod artifacts;
pub mod project_edits;

pub mod short_name {
    use std::fmt;

    pub const MAX_SHORT_NAME_LEN: usize = 30;
    pub const MAX_PREFIX_LEN: usize = 20;
    pub const HASH_LEN: usize = 5;

    // One separator between prefix and branch, one between branch and hash.
    const SEPARATOR_LEN: usize = 2;

    /// A bounded-length name for an ephemeral per-branch deployment target,
    /// rendered as `{prefix}-{branch}-{hash}`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Identifier {
        prefix: String,
        branch: String,
        hash: String,
    }

    impl Identifier {
        pub fn prefix(&self) -> &str {
            &self.prefix
        }

        pub fn branch(&self) -> &str {
            &self.branch
        }

        pub fn hash(&self) -> &str {
            &self.hash
        }

        /// Length in characters, separators included.
        pub fn char_len(&self) -> usize {
            self.prefix.chars().count()
                + self.branch.chars().count()
                + self.hash.chars().count()
                + SEPARATOR_LEN
        }
    }

    impl fmt::Display for Identifier {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}-{}-{}", self.prefix, self.branch, self.hash)
        }
    }

    fn is_branch_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
    }

    fn take_chars(s: &str, n: usize) -> String {
        s.chars().take(n).collect()
    }

    /// Replaces the first run of disallowed characters with a single `-` and
    /// lowercases the result. Later runs are kept as they are: existing review
    /// apps are named after this exact scheme.
    pub fn normalize_branch(branch: &str) -> String {
        let Some(start) = branch.find(|ch: char| !is_branch_char(ch)) else {
            return branch.to_lowercase();
        };
        let rest = &branch[start..];
        let run_len = rest.find(is_branch_char).unwrap_or(rest.len());

        let mut out = String::with_capacity(branch.len());
        out.push_str(&branch[..start]);
        out.push('-');
        out.push_str(&rest[run_len..]);
        out.to_lowercase()
    }

    /// Derives the short name for `branch`.
    ///
    /// The prefix is capped at [`MAX_PREFIX_LEN`] and the hash at [`HASH_LEN`]
    /// characters; the normalized branch gets whatever is left of
    /// [`MAX_SHORT_NAME_LEN`], possibly nothing. Total for any input.
    pub fn derive_short_name(prefix: &str, branch: &str, hash: &str) -> Identifier {
        let prefix = take_chars(prefix, MAX_PREFIX_LEN);
        let hash = take_chars(hash, HASH_LEN);
        let budget = MAX_SHORT_NAME_LEN
            .saturating_sub(SEPARATOR_LEN + prefix.chars().count() + hash.chars().count());
        let branch = take_chars(&normalize_branch(branch), budget);
        Identifier {
            prefix,
            branch,
            hash,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn derive(p: &str, b: &str, h: &str) -> String {
            derive_short_name(p, b, h).to_string()
        }

        #[test]
        fn clean_branch_is_kept() {
            assert_eq!(derive("app", "feature-x", "abcdef"), "app-feature-x-abcde");
        }

        #[test]
        fn only_first_disallowed_run_is_replaced() {
            assert_eq!(derive("app", "feature/x/y", "abcdef"), "app-feature-x/y-abcde");
            assert_eq!(normalize_branch("Fix//Login  Page"), "fix-login  page");
        }

        #[test]
        fn underscores_survive_normalization() {
            assert_eq!(normalize_branch("feat_x"), "feat_x");
        }

        #[test]
        fn twenty_char_prefix_leaves_three_for_branch() {
            let id = derive_short_name("twenty-char-prefix12", "any-branch", "abcdef");
            assert_eq!(id.branch(), "any");
            assert_eq!(id.to_string(), "twenty-char-prefix12-any-abcde");
            assert_eq!(id.char_len(), MAX_SHORT_NAME_LEN);
        }

        #[test]
        fn long_prefix_is_capped() {
            let id = derive_short_name("a-very-long-application-name", "main", "0123456789");
            assert_eq!(id.prefix(), "a-very-long-applicat");
            assert_eq!(id.hash(), "01234");
            assert_eq!(id.branch(), "mai");
        }

        #[test]
        fn empty_branch_does_not_panic() {
            assert_eq!(derive("app", "", "abcdef"), "app--abcde");
        }

        #[test]
        fn short_hash_is_used_whole() {
            assert_eq!(derive("app", "main", "ab"), "app-main-ab");
        }

        #[test]
        fn branch_made_only_of_disallowed_chars_collapses() {
            assert_eq!(derive("app", "///", "abcdef"), "app---abcde");
        }

        #[test]
        fn uppercase_is_lowered_after_replacement() {
            assert_eq!(derive("app", "Feature/ABC", "abcdef"), "app-feature-abc-abcde");
        }
    }
}
