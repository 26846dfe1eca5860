//! In-place edits to files a Rails app already has.
//!
//! Each function maps the current file text to the new text, or `None` when
//! the file lacks the anchor the edit needs.

/// Lines placed into the `Rails::Application` class body, in call order.
pub const APPLICATION_CONFIG: &[&str] = &[
    "config.time_zone = ENV['TZ'] || 'UTC'",
    "config.i18n.available_locales = [ENV['LOCALE'] || 'en']",
    "config.i18n.default_locale = ENV['LOCALE'] || 'en'",
];

pub fn append_gemfile(existing: &str, additions: &str) -> String {
    let mut out = existing.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(additions);
    out
}

/// Replaces everything from the first `production:` to the end of the file.
pub fn replace_production_section(database_yml: &str, production: &str) -> Option<String> {
    let start = database_yml.find("production:")?;
    let mut out = database_yml[..start].to_string();
    out.push_str(production);
    Some(out)
}

fn is_application_class_line(line: &str) -> bool {
    let Some(rest) = line.trim_start().strip_prefix("class ") else {
        return false;
    };
    let Some((name, parent)) = rest.split_once('<') else {
        return false;
    };
    let name = name.trim();
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b':')
        && parent.trim() == "Rails::Application"
}

/// Inserts `line` right after the `class X < Rails::Application` line,
/// indented by four spaces. Repeated calls stack up in reverse order.
pub fn insert_application_config(application_rb: &str, line: &str) -> Option<String> {
    let mut offset = 0;
    for l in application_rb.split_inclusive('\n') {
        offset += l.len();
        if is_application_class_line(l) {
            let mut out = String::with_capacity(application_rb.len() + line.len() + 5);
            out.push_str(&application_rb[..offset]);
            if !l.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
            out.push_str(&application_rb[offset..]);
            return Some(out);
        }
    }
    None
}
