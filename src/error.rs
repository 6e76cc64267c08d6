use std::path::PathBuf;

/// Errors produced while loading and normalizing an alias configuration.
#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    #[error("the provided root \"{}\" doesn't exist", .path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: invalid config: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{}: missing `compilerOptions`", .path.display())]
    MissingCompilerOptions { path: PathBuf },

    #[error("{}: `{field}` must be {expected}", .path.display())]
    InvalidField {
        path: PathBuf,
        field: String,
        expected: &'static str,
    },
}

/// A destination candidate that did not resolve to a module.
///
/// Recovered by the runtime resolvers, which move on to the next destination.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("cannot find module {}", .candidate.display())]
    NotFound { candidate: PathBuf },

    #[error("{}: invalid package.json: {source}", .manifest.display())]
    Manifest {
        manifest: PathBuf,
        source: serde_json::Error,
    },
}
