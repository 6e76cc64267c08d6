use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ProbeError;

/// Extensions tried by [`NodeProbe`], in Node's order followed by the TS ecosystem.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "js", "json", "node", "ts", "tsx", "jsx", "mts", "mjs", "cjs",
];

/// Host module-existence check used by the runtime resolvers.
///
/// Returns the file a candidate resolves to, or why it does not.
pub trait ModuleProbe {
    fn probe(&self, candidate: &Path) -> Result<PathBuf, ProbeError>;
}

impl<F> ModuleProbe for F
where
    F: Fn(&Path) -> Result<PathBuf, ProbeError>,
{
    fn probe(&self, candidate: &Path) -> Result<PathBuf, ProbeError> {
        self(candidate)
    }
}

/// Filesystem probe following Node's `require.resolve` rules for paths:
/// the file itself, the file with an extension, `package.json#main`, then
/// `index` with an extension.
#[derive(Debug, Clone)]
pub struct NodeProbe {
    extensions: Vec<String>,
}

impl Default for NodeProbe {
    fn default() -> Self {
        Self::with_extensions(DEFAULT_EXTENSIONS)
    }
}

impl NodeProbe {
    pub fn with_extensions(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn try_file(&self, base: &Path) -> Option<PathBuf> {
        if base.is_file() {
            return Some(base.to_path_buf());
        }

        // Append rather than replace: `foo.service` -> `foo.service.ts`.
        for ext in &self.extensions {
            let mut name = base.as_os_str().to_os_string();
            name.push(".");
            name.push(ext);
            let candidate = PathBuf::from(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        None
    }

    fn try_index(&self, dir: &Path) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| dir.join(format!("index.{ext}")))
            .find(|candidate| candidate.is_file())
    }

    fn try_directory(&self, dir: &Path) -> Result<Option<PathBuf>, ProbeError> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let manifest = dir.join("package.json");
        if manifest.is_file() {
            if let Some(main) = read_main(&manifest)? {
                let entry = dir.join(main);
                if let Some(found) = self.try_file(&entry).or_else(|| self.try_index(&entry)) {
                    return Ok(Some(found));
                }
            }
        }

        Ok(self.try_index(dir))
    }
}

impl ModuleProbe for NodeProbe {
    fn probe(&self, candidate: &Path) -> Result<PathBuf, ProbeError> {
        if let Some(found) = self.try_file(candidate) {
            return Ok(found);
        }
        if let Some(found) = self.try_directory(candidate)? {
            return Ok(found);
        }
        Err(ProbeError::NotFound {
            candidate: candidate.to_path_buf(),
        })
    }
}

/// `main` field of a package manifest. An unreadable manifest counts as absent.
fn read_main(manifest: &Path) -> Result<Option<String>, ProbeError> {
    let Ok(content) = std::fs::read_to_string(manifest) else {
        return Ok(None);
    };
    let val: Value = serde_json::from_str(&content).map_err(|source| ProbeError::Manifest {
        manifest: manifest.to_path_buf(),
        source,
    })?;
    Ok(val.get("main").and_then(Value::as_str).map(String::from))
}
