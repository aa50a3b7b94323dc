use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Failure while expanding placeholders in the raw config text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    /// Placeholder referenced an unset variable and carried no default
    #[error("environment variable not found: `{0}`")]
    MissingVar(String),

    /// Placeholder used a scope other than `env.`
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.VAR }}` or `{{ env.VAR | default("fallback") }}`
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// A `| default("...")` suffix supplies the value when the variable is
/// unset. Comment lines are copied through untouched so that a commented-out
/// secret never has to exist in the environment.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut last_end = 0;

        for captures in placeholder().captures_iter(line) {
            let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            output.push_str(&line[last_end..whole.start()]);

            let var_name = match key.as_str().split_once('.') {
                Some(("env", name)) if !name.contains('.') => name,
                _ => return Err(ExpandError::UnsupportedScope(key.as_str().to_owned())),
            };

            match (std::env::var(var_name), captures.get(2)) {
                (Ok(value), _) => output.push_str(&value),
                (Err(_), Some(default)) => output.push_str(default.as_str()),
                (Err(_), None) => return Err(ExpandError::MissingVar(var_name.to_owned())),
            }

            last_end = whole.end();
        }

        output.push_str(&line[last_end..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
