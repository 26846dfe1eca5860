use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use include_dir::{include_dir, Dir};
use serde_json::json;

use crate::answers::Answers;

pub const TEMPLATE_SET: &str = "rails-heroku";

static EMBEDDED: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates/rails-heroku");

/// A file the generator emits, relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
    pub executable: bool,
}

struct TemplateFile {
    source: &'static str,
    target: &'static str,
    executable: bool,
}

const fn tpl(source: &'static str, target: &'static str, executable: bool) -> TemplateFile {
    TemplateFile {
        source,
        target,
        executable,
    }
}

const TEMPLATE_FILES: &[TemplateFile] = &[
    tpl("dockerignore", ".dockerignore", false),
    tpl("Dockerfile", "Dockerfile", false),
    tpl("bin/entrypoint", "bin/entrypoint", true),
    tpl("bin/create-app-name.js", "bin/create-app-name.js", false),
    tpl("bin/actions-vars", "bin/actions-vars", true),
    tpl("bin/build-image", "bin/build-image", true),
    tpl("bin/release", "bin/release", true),
    tpl(
        "workflows/deploy-master.yml",
        ".github/workflows/deploy-master.yml",
        false,
    ),
    tpl(
        "workflows/run-tests.yml",
        ".github/workflows/run-tests.yml",
        false,
    ),
    tpl(
        "workflows/create-review-app.yml",
        ".github/workflows/create-review-app.yml",
        false,
    ),
    tpl(
        "workflows/deploy-review-app.yml",
        ".github/workflows/deploy-review-app.yml",
        false,
    ),
    tpl(
        "workflows/destroy-review-app.yml",
        ".github/workflows/destroy-review-app.yml",
        false,
    ),
    tpl(
        "config/airbrake.rb",
        "config/initializers/airbrake.rb",
        false,
    ),
    tpl("env.development", ".env.development", false),
    tpl("env.test", ".env.test", false),
];

pub const GEMFILE_ADDITIONS: &str = "Gemfile.append";
pub const DATABASE_PRODUCTION: &str = "config/database.production.yml";

pub fn scaffold_home_dir() -> Option<PathBuf> {
    if let Some(v) = std::env::var_os("SCAFFOLD_HOME") {
        return Some(PathBuf::from(v));
    }
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".scaffold"))
}

/// Directory whose files replace the embedded templates one by one.
pub fn override_dir() -> Option<PathBuf> {
    Some(scaffold_home_dir()?.join("templates").join(TEMPLATE_SET))
}

/// Loads a template by its source name, preferring `override_dir`.
pub fn template_source(name: &str, override_dir: Option<&Path>) -> Result<String> {
    if let Some(dir) = override_dir {
        let path = dir.join(name);
        if path.is_file() {
            tracing::debug!(template = name, path = %path.display(), "using template override");
            return std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }
    }
    let file = EMBEDDED
        .get_file(name)
        .ok_or_else(|| anyhow!("Unknown template: {name}"))?;
    file.contents_utf8()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Template is not utf8: {name}"))
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_lowercase() || b == b'_')
}

/// Substitutes `%%key%%` placeholders. Text that only looks like a placeholder
/// boundary (a lone `%%`, or `%%` around anything but `[a-z_]+`) is copied as is.
pub fn render(template: &str, vars: &[(&str, String)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("%%") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let key = after.find("%%").map(|end| &after[..end]);
        match key {
            Some(key) if is_placeholder_key(key) => {
                let value = vars
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| v)
                    .ok_or_else(|| anyhow!("Unknown template variable: {key}"))?;
                out.push_str(value);
                rest = &after[key.len() + 2..];
            }
            _ => {
                out.push_str("%%");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn app_manifest(answers: &Answers, review: bool) -> Result<String> {
    let mut root = serde_json::Map::new();
    root.insert("name".to_string(), json!(answers.app_name));
    root.insert(
        "repository".to_string(),
        json!(format!("https://github.com/{}", answers.repo)),
    );
    root.insert("scripts".to_string(), json!({}));
    root.insert("stack".to_string(), json!("container"));
    if review {
        root.insert(
            "env".to_string(),
            json!({
                "RAILS_ENV": { "required": true },
                "TZ": { "required": true },
                "LOCALE": { "required": true },
                "RAILS_MASTER_KEY": { "required": true },
                "AIRBRAKE_PROJECT_KEY": {},
                "AIRBRAKE_PROJECT_ID": {},
                "APP_ENV": { "value": "review" },
            }),
        );
        root.insert(
            "addons".to_string(),
            json!(["heroku-postgresql:hobby-dev", "logdna:quaco"]),
        );
    }
    root.insert(
        "formation".to_string(),
        json!({ "web": { "quantity": 1 } }),
    );

    let v = serde_json::Value::Object(root);
    Ok(serde_json::to_string_pretty(&v)? + "\n")
}

/// Renders every generated file for `answers`.
pub fn build_artifacts(answers: &Answers, override_dir: Option<&Path>) -> Result<Vec<Artifact>> {
    let vars = answers.variables();
    let mut out = Vec::with_capacity(TEMPLATE_FILES.len() + 2);
    for t in TEMPLATE_FILES {
        let source = template_source(t.source, override_dir)?;
        let contents =
            render(&source, &vars).with_context(|| format!("Failed to render {}", t.source))?;
        tracing::debug!(template = t.source, target = t.target, "rendered template");
        out.push(Artifact {
            path: PathBuf::from(t.target),
            contents,
            executable: t.executable,
        });
    }
    out.push(Artifact {
        path: PathBuf::from("app.master.json"),
        contents: app_manifest(answers, false)?,
        executable: false,
    });
    out.push(Artifact {
        path: PathBuf::from("app.json"),
        contents: app_manifest(answers, true)?,
        executable: false,
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::Runner;

    fn answers() -> Answers {
        Answers {
            app_name: "shop".to_string(),
            staging_name: "shop-staging".to_string(),
            repo: "acme/shop".to_string(),
            pipeline: "0000-pipe".to_string(),
            runner: Runner::Cloud,
            ruby_version: "2.6.6".to_string(),
            node_version: "12".to_string(),
        }
    }

    fn find<'a>(artifacts: &'a [Artifact], path: &str) -> &'a Artifact {
        artifacts
            .iter()
            .find(|a| a.path == Path::new(path))
            .unwrap_or_else(|| panic!("missing artifact {path}"))
    }

    #[test]
    fn render_substitutes_known_keys() {
        let vars = vec![("app_name", "shop".to_string())];
        assert_eq!(render("APP=%%app_name%%;", &vars).unwrap(), "APP=shop;");
    }

    #[test]
    fn render_leaves_github_expressions_and_bash_tests_alone() {
        let text = "if [[ \"$3\" == x ]]; then ${{ github.ref }} 100%% done %%";
        assert_eq!(render(text, &[]).unwrap(), text);
    }

    #[test]
    fn render_rejects_unknown_keys() {
        let err = render("%%nope%%", &[]).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn builds_every_artifact_once() {
        let artifacts = build_artifacts(&answers(), None).unwrap();
        assert_eq!(artifacts.len(), TEMPLATE_FILES.len() + 2);
        for a in &artifacts {
            assert!(!a.contents.contains("%%"), "{} left a placeholder", a.path.display());
        }
    }

    #[test]
    fn workflows_receive_runner_staging_and_pipeline() {
        let artifacts = build_artifacts(&answers(), None).unwrap();
        let deploy = find(&artifacts, ".github/workflows/deploy-master.yml");
        assert!(deploy.contents.contains("runs-on: ubuntu-latest"));
        assert!(deploy.contents.contains("${{ github.sha }}"));

        let create = find(&artifacts, ".github/workflows/create-review-app.yml");
        assert!(create.contents.contains("env_from: shop-staging"));
        assert!(create.contents.contains("pipeline: 0000-pipe"));
        assert!(create.contents.contains("runs-on: self-hosted"));
    }

    #[test]
    fn scripts_are_executable() {
        let artifacts = build_artifacts(&answers(), None).unwrap();
        let vars = find(&artifacts, "bin/actions-vars");
        assert!(vars.executable);
        assert!(vars.contents.contains("APP_NAME=shop-staging"));
        assert!(vars.contents.contains("APP_PREFIX=shop"));
        assert!(!find(&artifacts, "bin/create-app-name.js").executable);
    }

    #[test]
    fn dockerfile_pins_ruby_and_node() {
        let artifacts = build_artifacts(&answers(), None).unwrap();
        let docker = find(&artifacts, "Dockerfile");
        assert!(docker
            .contents
            .starts_with("FROM zeitio/ruby-node-stack:ruby2.6.6_node12 AS gems"));
    }

    #[test]
    fn app_manifests_keep_heroku_key_order() {
        let review = app_manifest(&answers(), true).unwrap();
        let v: serde_json::Value = serde_json::from_str(&review).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["name", "repository", "scripts", "stack", "env", "addons", "formation"]
        );
        assert_eq!(v["repository"], "https://github.com/acme/shop");
        assert_eq!(v["env"]["APP_ENV"]["value"], "review");

        let master = app_manifest(&answers(), false).unwrap();
        assert!(!master.contains("addons"));
        assert!(master.contains("\"quantity\": 1"));
    }

    #[test]
    fn override_dir_replaces_single_template() {
        let td = tempfile::TempDir::new().unwrap();
        std::fs::write(td.path().join("dockerignore"), "custom\n").unwrap();
        let artifacts = build_artifacts(&answers(), Some(td.path())).unwrap();
        assert_eq!(find(&artifacts, ".dockerignore").contents, "custom\n");
        assert!(find(&artifacts, "Dockerfile").contents.starts_with("FROM "));
    }
}
