use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

pub const DEFAULT_ORG: &str = "zeitdev";
pub const DEFAULT_RUBY_VERSION: &str = "2.6.6";
pub const DEFAULT_NODE_VERSION: &str = "12";

/// Where the generated GitHub workflows run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Runner {
    /// GitHub-hosted `ubuntu-latest` runners
    Cloud,
    /// Self-hosted runners
    #[default]
    SelfHosted,
}

impl Runner {
    pub fn runs_on(self) -> &'static str {
        match self {
            Runner::Cloud => "ubuntu-latest",
            Runner::SelfHosted => "self-hosted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswersFormat {
    Toml,
    Yaml,
    Json,
}

impl AnswersFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yml") | Some("yaml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "Unsupported answers file: {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ),
        }
    }
}

/// Answers gathered so far from flags, an answers file or prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialAnswers {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub staging_name: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub pipeline: Option<String>,
    #[serde(default)]
    pub runner: Option<Runner>,
    #[serde(default)]
    pub default_org: Option<String>,
    #[serde(default)]
    pub ruby_version: Option<String>,
    #[serde(default)]
    pub node_version: Option<String>,
}

fn present(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl PartialAnswers {
    pub fn parse(text: &str, format: AnswersFormat) -> Result<Self> {
        Ok(match format {
            AnswersFormat::Toml => toml::from_str(text)?,
            AnswersFormat::Yaml => serde_yaml::from_str(text)?,
            AnswersFormat::Json => serde_json::from_str(text)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let format = AnswersFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text, format)
            .with_context(|| format!("Failed to parse answers file {}", path.display()))
    }

    /// Fills every field still unset in `self` from `lower`.
    pub fn or(self, lower: PartialAnswers) -> PartialAnswers {
        PartialAnswers {
            app_name: present(self.app_name).or(lower.app_name),
            staging_name: present(self.staging_name).or(lower.staging_name),
            repo: present(self.repo).or(lower.repo),
            pipeline: present(self.pipeline).or(lower.pipeline),
            runner: self.runner.or(lower.runner),
            default_org: present(self.default_org).or(lower.default_org),
            ruby_version: present(self.ruby_version).or(lower.ruby_version),
            node_version: present(self.node_version).or(lower.node_version),
        }
    }

    pub fn default_org(&self) -> &str {
        self.default_org
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_ORG)
    }

    /// Applies defaults; fails on the first missing required answer.
    pub fn finish(self) -> Result<Answers> {
        let default_org = self.default_org().to_string();
        let Some(app_name) = present(self.app_name) else {
            bail!("Missing required answer: app_name (pass --app-name)");
        };
        let Some(pipeline) = present(self.pipeline) else {
            bail!("Missing required answer: pipeline (pass --pipeline)");
        };
        let staging_name =
            present(self.staging_name).unwrap_or_else(|| default_staging_name(&app_name));
        let repo = present(self.repo).unwrap_or_else(|| default_repo(&default_org, &app_name));
        Ok(Answers {
            staging_name,
            repo,
            pipeline,
            runner: self.runner.unwrap_or_default(),
            ruby_version: present(self.ruby_version)
                .unwrap_or_else(|| DEFAULT_RUBY_VERSION.to_string()),
            node_version: present(self.node_version)
                .unwrap_or_else(|| DEFAULT_NODE_VERSION.to_string()),
            app_name,
        })
    }
}

pub fn default_staging_name(app_name: &str) -> String {
    format!("{app_name}-staging")
}

pub fn default_repo(org: &str, app_name: &str) -> String {
    format!("{org}/{app_name}")
}

/// Fully resolved answers for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub app_name: String,
    pub staging_name: String,
    pub repo: String,
    pub pipeline: String,
    pub runner: Runner,
    pub ruby_version: String,
    pub node_version: String,
}

impl Answers {
    /// Template variables, keyed by placeholder name.
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("app_name", self.app_name.clone()),
            ("staging_name", self.staging_name.clone()),
            ("repo", self.repo.clone()),
            ("pipeline", self.pipeline.clone()),
            ("runner", self.runner.runs_on().to_string()),
            ("ruby_version", self.ruby_version.clone()),
            ("node_version", self.node_version.clone()),
        ]
    }
}
