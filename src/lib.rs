//! `tsalias`: tsconfig path aliases for build tools.
//!
//! Reads `compilerOptions.paths` / `baseUrl`, normalizes them into an ordered
//! list of [`AliasDefinition`]s and answers both directions of the mapping:
//! real path to alias ([`AliasResolver::apply`]) and alias to real path
//! ([`AliasResolver::realpath`]). The list can also be exported as a bundler
//! alias map ([`AliasResolver::export_substitution_map`]) or as per-request
//! runtime handlers ([`AliasResolver::export_runtime_resolvers`]).
//!
//! ```no_run
//! use tsalias::AliasResolver;
//!
//! let aliases = AliasResolver::from_root("./my-project")?;
//! let short = aliases.apply("/abs/my-project/src/app/store.ts");
//! let real = aliases.realpath("@app/store");
//! # Ok::<(), tsalias::AliasError>(())
//! ```
//!
//! `extends` chains are not followed: a config without its own `baseUrl`
//! uses its own directory.

pub mod config;
mod error;
pub mod export;
mod model;
pub mod normalize;
mod options;
pub mod probe;
mod resolver;
#[cfg(test)]
mod test_support;
mod util;

pub use error::{AliasError, ProbeError};
pub use export::{
    Externals, ResolutionCache, ResolverDescriptor, RuntimeResolvers, SubstitutionExport,
    SubstitutionMap, SubstitutionOptions,
};
pub use model::{AliasDefinition, RawAliasTable};
pub use normalize::normalize;
pub use options::{AliasOptions, AliasSource, ModuleReferenceMode, ModuleReferences};
pub use probe::{ModuleProbe, NodeProbe};
pub use resolver::AliasResolver;
