use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::model::AliasDefinition;
use crate::probe::{ModuleProbe, NodeProbe};
use crate::resolver::AliasResolver;
use crate::util::relative_from_file;

/// Memoized `(origin file, request) -> relative path` results.
///
/// Lives as long as the [`RuntimeResolvers`] that owns it; never invalidated.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    entries: HashMap<PathBuf, HashMap<String, String>>,
}

impl ResolutionCache {
    pub fn get(&self, origin_file: &Path, request: &str) -> Option<&str> {
        self.entries
            .get(origin_file)?
            .get(request)
            .map(String::as_str)
    }

    fn insert(&mut self, origin_file: &Path, request: &str, resolved: String) {
        self.entries
            .entry(origin_file.to_path_buf())
            .or_default()
            .insert(request.to_string(), resolved);
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One alias handler: the definition it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverDescriptor {
    pub definition: AliasDefinition,
}

impl ResolverDescriptor {
    pub fn alias(&self) -> &str {
        &self.definition.alias
    }
}

enum Outcome {
    /// Not this descriptor's request.
    Declined,
    Resolved(String),
    /// Matched but no destination exists.
    Unresolved,
}

/// Per-alias handlers for loaders that call back on every aliased request.
pub struct RuntimeResolvers<P = NodeProbe> {
    descriptors: Vec<ResolverDescriptor>,
    cache: Option<ResolutionCache>,
    probe: P,
    debug: bool,
}

impl<P: ModuleProbe> RuntimeResolvers<P> {
    pub fn descriptors(&self) -> &[ResolverDescriptor] {
        &self.descriptors
    }

    /// Registered alias names, in declaration order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(ResolverDescriptor::alias)
    }

    /// `None` when caching was disabled at export time.
    pub fn cache(&self) -> Option<&ResolutionCache> {
        self.cache.as_ref()
    }

    /// Resolve `full_request`, made from `origin_file`, for the handler of `alias`.
    ///
    /// Returns the accepted destination relative to `origin_file`'s directory,
    /// or `matched_prefix` unchanged when the alias does not apply or nothing
    /// resolves. Descriptors sharing an alias are tried in declaration order.
    pub fn resolve(
        &mut self,
        alias: &str,
        origin_file: &Path,
        full_request: &str,
        matched_prefix: &str,
    ) -> String {
        let Self {
            descriptors,
            cache,
            probe,
            debug,
        } = self;

        let mut unresolved = false;
        for descriptor in descriptors.iter().filter(|d| d.alias() == alias) {
            match resolve_descriptor(
                &descriptor.definition,
                cache.as_mut(),
                &*probe,
                *debug,
                origin_file,
                full_request,
                matched_prefix,
            ) {
                Outcome::Resolved(relative) => return relative,
                Outcome::Unresolved => unresolved = true,
                Outcome::Declined => {}
            }
        }

        if unresolved {
            warn!(
                request = full_request,
                from = %origin_file.display(),
                "unable to resolve alias"
            );
        }
        matched_prefix.to_string()
    }
}

fn resolve_descriptor<P: ModuleProbe>(
    def: &AliasDefinition,
    mut cache: Option<&mut ResolutionCache>,
    probe: &P,
    debug: bool,
    origin_file: &Path,
    full_request: &str,
    matched_prefix: &str,
) -> Outcome {
    if def.exact && full_request != def.alias {
        return Outcome::Declined;
    }

    if debug {
        debug!(request = full_request, from = %origin_file.display(), "resolving");
    }

    if let Some(hit) = cache.as_deref().and_then(|c| c.get(origin_file, full_request)) {
        if debug {
            debug!(resolved = hit, "found in cache");
        }
        return Outcome::Resolved(hit.to_string());
    }

    let Some(module_path) = full_request.strip_prefix(matched_prefix) else {
        return Outcome::Declined;
    };

    for dest in &def.destinations {
        let candidate = format!("{dest}{module_path}");
        match probe.probe(Path::new(&candidate)) {
            Ok(found) => {
                let relative = relative_from_file(origin_file, Path::new(dest));
                if debug {
                    debug!(%candidate, found = %found.display(), %relative, "resolved");
                }
                if let Some(cache) = cache.as_deref_mut() {
                    cache.insert(origin_file, full_request, relative.clone());
                }
                return Outcome::Resolved(relative);
            }
            Err(err) => {
                if debug {
                    debug!(%candidate, %err, "destination did not resolve");
                }
            }
        }
    }

    Outcome::Unresolved
}

impl AliasResolver {
    /// Runtime handlers probing the filesystem with Node's resolution rules.
    pub fn export_runtime_resolvers(&self, enable_cache: bool) -> RuntimeResolvers<NodeProbe> {
        self.export_runtime_resolvers_with(enable_cache, NodeProbe::default())
    }

    /// Runtime handlers using a caller-supplied module probe.
    pub fn export_runtime_resolvers_with<P: ModuleProbe>(
        &self,
        enable_cache: bool,
        probe: P,
    ) -> RuntimeResolvers<P> {
        let descriptors: Vec<_> = self
            .definitions()
            .iter()
            .map(|def| ResolverDescriptor {
                definition: def.clone(),
            })
            .collect();
        if self.debug_enabled() {
            debug!(handlers = descriptors.len(), enable_cache, "generated runtime resolvers");
        }
        RuntimeResolvers {
            descriptors,
            cache: enable_cache.then(ResolutionCache::default),
            probe,
            debug: self.debug_enabled(),
        }
    }
}
