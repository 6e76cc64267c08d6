//! Turn a raw `paths` table into the canonical [`AliasDefinition`] list.
//!
//! Pure over its inputs: no filesystem access, only lexical path joins.

use std::path::Path;

use crate::model::{AliasDefinition, WILDCARD_SUFFIX};
use crate::options::ModuleReferences;
use crate::util::{join_clean, path_string};

/// Normalize every `(pattern, templates)` entry, keeping the table's order.
pub fn normalize(
    table: &[(String, Vec<String>)],
    base_dir: &Path,
    modules: &ModuleReferences,
) -> Vec<AliasDefinition> {
    table
        .iter()
        .map(|(pattern, templates)| normalize_entry(pattern, templates, base_dir, modules))
        .collect()
}

fn normalize_entry(
    pattern: &str,
    templates: &[String],
    base_dir: &Path,
    modules: &ModuleReferences,
) -> AliasDefinition {
    let (alias, exact) = match pattern.strip_suffix(WILDCARD_SUFFIX) {
        Some(stripped) => (stripped, false),
        None => (pattern, true),
    };

    let mut destinations = Vec::with_capacity(templates.len());
    for template in templates {
        let cleaned = clean_template(template);

        match modules {
            ModuleReferences::Expand(dirs) if is_module_reference(cleaned) => destinations
                .extend(dirs.iter().map(|dir| path_string(&join_clean(dir, cleaned)))),
            ModuleReferences::Symbolic if is_module_reference(cleaned) => {
                destinations.push(cleaned.to_string());
            }
            _ if cleaned.is_empty() => destinations.push(path_string(base_dir)),
            _ => destinations.push(path_string(&join_clean(base_dir, cleaned))),
        }
    }

    AliasDefinition::new(alias, destinations, exact)
}

/// Drop one trailing `*`, then one trailing `/`.
fn clean_template(template: &str) -> &str {
    let t = template.strip_suffix('*').unwrap_or(template);
    t.strip_suffix('/').unwrap_or(t)
}

/// Anything not starting with `.` or `/` names a package.
///
/// An empty template is a base-dir reference, not a package.
fn is_module_reference(template: &str) -> bool {
    !template.is_empty() && !template.starts_with('.') && !template.starts_with('/')
}
