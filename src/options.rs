use std::path::PathBuf;

use crate::model::AliasDefinition;

/// Where the alias list comes from.
#[derive(Debug, Clone)]
pub enum AliasSource {
    /// A project directory (implies `tsconfig.json` inside it) or an explicit
    /// config file. `None` uses the current working directory.
    Root(Option<PathBuf>),
    /// A canonical list supplied by the caller. Relative destinations are made
    /// absolute against the current working directory.
    Definitions(Vec<AliasDefinition>),
}

impl Default for AliasSource {
    fn default() -> Self {
        Self::Root(None)
    }
}

/// How destinations naming a package (`some-lib`, `@scope/pkg`) are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModuleReferenceMode {
    /// One destination per module-resolution directory.
    #[default]
    Expand,
    /// Keep the bare package name as the destination.
    Symbolic,
    /// No package references: every template is relative to `baseUrl`, as tsc reads it.
    BaseUrl,
}

/// Construction contract for [`crate::AliasResolver`].
#[derive(Debug, Clone, Default)]
pub struct AliasOptions {
    pub source: AliasSource,
    /// Module-resolution roots. Defaults to `<project root>/node_modules`.
    pub module_dirs: Option<Vec<PathBuf>>,
    pub module_references: ModuleReferenceMode,
    /// Emit `debug` events while loading and exporting.
    pub debug: bool,
}

impl AliasOptions {
    pub fn root(path: impl Into<PathBuf>) -> Self {
        Self {
            source: AliasSource::Root(Some(path.into())),
            ..Self::default()
        }
    }

    pub fn definitions(definitions: Vec<AliasDefinition>) -> Self {
        Self {
            source: AliasSource::Definitions(definitions),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_module_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.module_dirs = Some(dirs);
        self
    }

    #[must_use]
    pub fn with_module_references(mut self, mode: ModuleReferenceMode) -> Self {
        self.module_references = mode;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Normalizer-level view of [`ModuleReferenceMode`] with the roots resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleReferences {
    Expand(Vec<PathBuf>),
    Symbolic,
    BaseUrl,
}
