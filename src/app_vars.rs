//! Per-job deployment variables for the generated GitHub workflows.
//!
//! Computes the same values as the generated `bin/actions-vars` script:
//! which Heroku app a ref deploys to, its URL, and the buildx cache keys.

use sha2::{Digest, Sha256};

use crate::answers::default_staging_name;
use crate::short_name::derive_short_name;

/// Which deployment a job targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Staging,
    Master,
    Review,
}

impl Target {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("staging") => Target::Staging,
            Some("master") => Target::Master,
            _ => Target::Review,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppVarsInput<'a> {
    pub tag_prefix: &'a str,
    pub git_ref: &'a str,
    pub target: Target,
    pub app_name: &'a str,
    pub staging_name: Option<&'a str>,
    pub runner_os: &'a str,
    pub github_sha: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppVars {
    pub cache_key: String,
    pub cache_key1: String,
    pub cache_key2: String,
    pub cache_key3: String,
    pub url: String,
    pub branch_name: String,
    pub image_repo: String,
    pub app_name: String,
    pub tag_prefix: String,
}

/// Hex SHA-256 of `branch` followed by a newline, matching
/// `echo "$BRANCH_NAME" | sha256sum`.
pub fn branch_hash(branch: &str) -> String {
    hex::encode(Sha256::digest(format!("{branch}\n").as_bytes()))
}

impl AppVars {
    pub fn resolve(input: &AppVarsInput<'_>) -> AppVars {
        let (branch_name, app_name) = match input.target {
            Target::Staging => (
                "staging".to_string(),
                input
                    .staging_name
                    .map(str::to_string)
                    .unwrap_or_else(|| default_staging_name(input.app_name)),
            ),
            Target::Master => ("master".to_string(), input.app_name.to_string()),
            Target::Review => {
                let branch = input
                    .git_ref
                    .strip_prefix("refs/heads/")
                    .unwrap_or(input.git_ref)
                    .to_string();
                let name =
                    derive_short_name(input.app_name, &branch, &branch_hash(&branch)).to_string();
                (branch, name)
            }
        };

        let os = input.runner_os;
        let cache_key3 = format!("{os}-docker-buildx");
        let cache_key2 = format!("{cache_key3}-{branch_name}");
        let cache_key1 = format!("{cache_key2}-{}", input.tag_prefix);
        let cache_key = format!("{cache_key1}-{}", input.github_sha);

        AppVars {
            cache_key,
            cache_key1,
            cache_key2,
            cache_key3,
            url: format!("https://{app_name}.herokuapp.com"),
            image_repo: format!("registry.heroku.com/{app_name}"),
            branch_name,
            app_name,
            tag_prefix: input.tag_prefix.to_string(),
        }
    }

    /// Output pairs in the order the workflows expect them.
    pub fn outputs(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("cache_key", self.cache_key.as_str()),
            ("cache_key1", self.cache_key1.as_str()),
            ("cache_key2", self.cache_key2.as_str()),
            ("cache_key3", self.cache_key3.as_str()),
            ("url", self.url.as_str()),
            ("branch_name", self.branch_name.as_str()),
            ("image_repo", self.image_repo.as_str()),
            ("app_name", self.app_name.as_str()),
            ("tag_prefix", self.tag_prefix.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(git_ref: &'a str, target: Target) -> AppVarsInput<'a> {
        AppVarsInput {
            tag_prefix: "deploy",
            git_ref,
            target,
            app_name: "shop",
            staging_name: None,
            runner_os: "Linux",
            github_sha: "c0ffee",
        }
    }

    #[test]
    fn branch_hash_includes_trailing_newline() {
        assert_eq!(
            branch_hash("main"),
            "6403203dd5a0867eb14d104ee8a73730bd72dd9ad92e78d996a6dba0a5dcfc01"
        );
    }

    #[test]
    fn master_deploys_production_app() {
        let v = AppVars::resolve(&input("refs/heads/master", Target::Master));
        assert_eq!(v.app_name, "shop");
        assert_eq!(v.branch_name, "master");
        assert_eq!(v.url, "https://shop.herokuapp.com");
        assert_eq!(v.image_repo, "registry.heroku.com/shop");
    }

    #[test]
    fn staging_uses_default_staging_name() {
        let v = AppVars::resolve(&input("refs/heads/staging", Target::Staging));
        assert_eq!(v.app_name, "shop-staging");

        let mut i = input("refs/heads/staging", Target::Staging);
        i.staging_name = Some("shop-stage");
        assert_eq!(AppVars::resolve(&i).app_name, "shop-stage");
    }

    #[test]
    fn review_app_name_is_derived_from_branch() {
        let v = AppVars::resolve(&input("refs/heads/feature/login", Target::Review));
        assert_eq!(v.branch_name, "feature/login");
        assert_eq!(v.app_name, "shop-feature-login-5693a");
    }

    #[test]
    fn cache_keys_narrow_progressively() {
        let v = AppVars::resolve(&input("refs/heads/master", Target::Master));
        assert_eq!(v.cache_key, "Linux-docker-buildx-master-deploy-c0ffee");
        assert_eq!(v.cache_key1, "Linux-docker-buildx-master-deploy");
        assert_eq!(v.cache_key2, "Linux-docker-buildx-master");
        assert_eq!(v.cache_key3, "Linux-docker-buildx");
    }

    #[test]
    fn unknown_target_is_review() {
        assert_eq!(Target::from_arg(Some("tests")), Target::Review);
        assert_eq!(Target::from_arg(None), Target::Review);
    }
}
