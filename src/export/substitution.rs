use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::model::match_prefix;
use crate::resolver::AliasResolver;
use crate::util::{absolutize, clean, path_string};

/// Appended to exact keys; webpack reads `alias$` as "exact match only".
pub const EXACT_SUFFIX: char = '$';

#[derive(Debug, Clone, Default)]
pub struct SubstitutionOptions {
    /// Destinations under this directory become bare module names.
    pub module_root: Option<PathBuf>,
    /// Move single-destination module aliases into [`Externals`].
    pub node_externals: bool,
}

/// Alias key to destination list, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    entries: Vec<(String, Vec<String>)>,
}

impl SubstitutionMap {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SubstitutionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, destinations) in &self.entries {
            map.serialize_entry(key, destinations)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExternalEntry {
    alias: String,
    module: String,
    exact: bool,
}

/// Aliases pointing at a single package, to be left to the runtime `require`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Externals {
    entries: Vec<ExternalEntry>,
    debug: bool,
}

impl Externals {
    /// Rewrite `request` to its module reference, or `None` to let the caller
    /// fall through to its own resolution.
    pub fn resolve(&self, request: &str) -> Option<String> {
        let resolved = self.entries.iter().find_map(|entry| {
            match_prefix(&entry.alias, entry.exact, request)
                .map(|rest| format!("{}{rest}", entry.module))
        });
        if self.debug {
            if let Some(module) = &resolved {
                debug!(request, %module, "external");
            }
        }
        resolved
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Externals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            let key = exact_key(&entry.alias, entry.exact);
            map.serialize_entry(&key, &entry.module)?;
        }
        map.end()
    }
}

/// Output of [`AliasResolver::export_substitution_map`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SubstitutionExport {
    pub aliases: SubstitutionMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub externals: Option<Externals>,
}

impl AliasResolver {
    /// Flatten the alias list into a bundler alias map.
    ///
    /// `externals` is `Some` whenever `node_externals` was requested, even if
    /// no alias qualified.
    pub fn export_substitution_map(&self, options: &SubstitutionOptions) -> SubstitutionExport {
        let module_root = options.module_root.as_deref().map(clean_root);
        let mut aliases = Vec::with_capacity(self.definitions().len());
        let mut externals = Vec::new();

        'definitions: for def in self.definitions() {
            let mut destinations = Vec::with_capacity(def.destinations.len());

            for dest in &def.destinations {
                let Some(module) = module_root
                    .as_deref()
                    .and_then(|root| module_reference(dest, root)) else {
                    destinations.push(dest.clone());
                    continue;
                };

                if options.node_externals && def.destinations.len() == 1 {
                    externals.push(ExternalEntry {
                        alias: def.alias.clone(),
                        module,
                        exact: def.exact,
                    });
                    continue 'definitions;
                }
                destinations.push(module);
            }

            aliases.push((exact_key(&def.alias, def.exact), destinations));
        }

        let export = SubstitutionExport {
            aliases: SubstitutionMap { entries: aliases },
            externals: options
                .node_externals
                .then_some(Externals {
                    entries: externals,
                    debug: self.debug_enabled(),
                }),
        };
        if self.debug_enabled() {
            debug!(
                aliases = export.aliases.len(),
                externals = export.externals.as_ref().map_or(0, Externals::len),
                "generated substitution map"
            );
        }
        export
    }
}

fn exact_key(alias: &str, exact: bool) -> String {
    if exact {
        format!("{alias}{EXACT_SUFFIX}")
    } else {
        alias.to_string()
    }
}

/// Bring the root to the same absolute, cleaned form as the destinations.
fn clean_root(root: &Path) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => absolutize(&cwd, &path_string(root)),
        Err(_) => clean(root),
    }
}

/// `<root>/some-lib/sub` -> `some-lib/sub`; `None` outside `root`.
fn module_reference(dest: &str, root: &Path) -> Option<String> {
    let root = path_string(root);
    let rest = dest.strip_prefix(root.trim_end_matches('/'))?;
    let rest = rest.strip_prefix('/')?;
    (!rest.is_empty()).then(|| rest.to_string())
}
