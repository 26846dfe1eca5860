use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

/// Asks for a non-empty line; an empty answer takes `default` when one is given.
pub(crate) fn input(prompt: &str, default: Option<&str>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);
    if let Some(d) = default {
        input = input.default(d.to_string()).show_default(true);
    }
    let answer = input.interact_text().context("Prompt failed")?;
    Ok(answer.trim().to_string())
}

pub(crate) fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .context("Prompt failed")
}
