//! Reshape the canonical alias list for external tools.
//!
//! `substitution` targets bundlers that take a static alias map
//! (webpack `resolve.alias` + `externals`); `runtime` targets loaders that
//! call back per request (`module-alias` handlers).

mod runtime;
mod substitution;

pub use runtime::{ResolutionCache, ResolverDescriptor, RuntimeResolvers};
pub use substitution::{
    Externals, SubstitutionExport, SubstitutionMap, SubstitutionOptions, EXACT_SUFFIX,
};
