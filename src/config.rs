//! Locate, read and parse the tsconfig file.
//!
//! Only `compilerOptions.baseUrl`, `compilerOptions.paths` and `extends` are
//! read. `extends` is recorded but never followed.

use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

use serde_json::Value;

use crate::error::AliasError;
use crate::model::RawAliasTable;
use crate::util::{clean, join_clean};

/// File name looked up when the root is a directory.
pub const DEFAULT_CONFIG_NAME: &str = "tsconfig.json";

/// Where the config file lives and which directory counts as project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub project_root: PathBuf,
    pub file: PathBuf,
}

/// The subset of a tsconfig file the alias engine needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsConfig {
    pub file: PathBuf,
    /// Absolute base directory for relative destinations.
    pub base_url: PathBuf,
    /// `true` when `baseUrl` was absent and the config directory was used.
    pub base_url_inferred: bool,
    pub paths: RawAliasTable,
    pub extends: Option<String>,
}

/// Resolve `root` (a directory or a config file) to a config location.
///
/// `None` uses the current working directory. Relative roots are taken
/// against the current working directory and must exist.
pub fn locate(root: Option<&Path>) -> Result<ConfigLocation, AliasError> {
    let cwd = std::env::current_dir().map_err(|source| AliasError::ConfigRead {
        path: PathBuf::from("."),
        source,
    })?;

    let root = match root {
        None => cwd,
        Some(root) => {
            let root = clean(&cwd.join(root));
            if !root.exists() {
                return Err(AliasError::ConfigNotFound { path: root });
            }
            root
        }
    };

    if root.is_file() {
        let project_root = root.parent().unwrap_or(&root).to_path_buf();
        Ok(ConfigLocation {
            project_root,
            file: root,
        })
    } else {
        Ok(ConfigLocation {
            file: root.join(DEFAULT_CONFIG_NAME),
            project_root: root,
        })
    }
}

/// Read and parse the config file at `file`.
pub fn read_ts_config(file: &Path) -> Result<TsConfig, AliasError> {
    let content = std::fs::read_to_string(file).map_err(|source| AliasError::ConfigRead {
        path: file.to_path_buf(),
        source,
    })?;
    parse_ts_config(&content, file)
}

/// Parse relaxed-JSON config text; `file` anchors `baseUrl` and error messages.
pub fn parse_ts_config(content: &str, file: &Path) -> Result<TsConfig, AliasError> {
    let stripped = strip_trailing_commas(&strip_jsonc_comments(content));
    let val: Value = serde_json::from_str(&stripped).map_err(|source| AliasError::ConfigParse {
        path: file.to_path_buf(),
        source,
    })?;

    let compiler = val
        .get("compilerOptions")
        .ok_or_else(|| AliasError::MissingCompilerOptions {
            path: file.to_path_buf(),
        })?;
    let config_dir = file.parent().unwrap_or(Path::new("."));

    let extends = val
        .get("extends")
        .and_then(Value::as_str)
        .map(String::from);

    let (base_url, base_url_inferred) = match compiler.get("baseUrl") {
        Some(Value::String(b)) => (join_clean(config_dir, b), false),
        Some(_) => return Err(invalid(file, "compilerOptions.baseUrl", "a string")),
        None => (clean(config_dir), true),
    };

    let paths = match compiler.get("paths") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(entries)) => {
            let mut paths = Vec::with_capacity(entries.len());
            for (pattern, targets) in entries {
                let field = format!("compilerOptions.paths[\"{pattern}\"]");
                let targets = targets
                    .as_array()
                    .ok_or_else(|| invalid(file, &field, "an array of strings"))?;
                let replacements = targets
                    .iter()
                    .map(|v| v.as_str().map(String::from))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| invalid(file, &field, "an array of strings"))?;
                paths.push((pattern.clone(), replacements));
            }
            paths
        }
        Some(_) => return Err(invalid(file, "compilerOptions.paths", "an object")),
    };

    Ok(TsConfig {
        file: file.to_path_buf(),
        base_url,
        base_url_inferred,
        paths,
        extends,
    })
}

fn invalid(file: &Path, field: &str, expected: &'static str) -> AliasError {
    AliasError::InvalidField {
        path: file.to_path_buf(),
        field: field.to_string(),
        expected,
    }
}

/// Strip JSONC comments (`//` line and `/* */` block) while respecting strings.
fn strip_jsonc_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            out.push(ch);
            copy_string_body(&mut chars, &mut out);
            continue;
        }

        if ch == '/' {
            match chars.peek() {
                Some('/') => {
                    // Keep the newline so line numbers in parse errors stay right.
                    for c in chars.by_ref() {
                        if c == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for c in chars.by_ref() {
                        if prev == '*' && c == '/' {
                            break;
                        }
                        if c == '\n' {
                            out.push('\n');
                        }
                        prev = c;
                    }
                    out.push(' ');
                    continue;
                }
                _ => {}
            }
        }

        out.push(ch);
    }

    out
}

/// Drop commas directly followed (modulo whitespace) by `}` or `]`.
fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                out.push(ch);
                copy_string_body(&mut chars, &mut out);
            }
            ',' => {
                let next = chars.clone().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}' | ']')) {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Copy a string literal verbatim up to and including its closing quote.
fn copy_string_body(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else if c == '"' {
            break;
        }
    }
}
