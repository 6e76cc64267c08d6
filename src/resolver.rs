use std::path::PathBuf;

use tracing::debug;

use crate::config;
use crate::error::AliasError;
use crate::model::{match_prefix, AliasDefinition, RawAliasTable};
use crate::normalize::normalize;
use crate::options::{AliasOptions, AliasSource, ModuleReferenceMode, ModuleReferences};
use crate::util::{absolutize, path_string};

/// Canonical alias list plus the lookups built on it.
///
/// Immutable once built; every query is a read-only scan in declaration order.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    definitions: Vec<AliasDefinition>,
    typescript: RawAliasTable,
    debug: bool,
}

impl AliasResolver {
    /// Build from options: either read the config or adopt a supplied list.
    pub fn new(options: AliasOptions) -> Result<Self, AliasError> {
        let AliasOptions {
            source,
            module_dirs,
            module_references,
            debug,
        } = options;

        let cwd = std::env::current_dir().map_err(|source| AliasError::ConfigRead {
            path: PathBuf::from("."),
            source,
        })?;

        match source {
            AliasSource::Definitions(supplied) => {
                let definitions: Vec<_> = supplied
                    .into_iter()
                    .map(|def| AliasDefinition {
                        destinations: def
                            .destinations
                            .iter()
                            .map(|d| path_string(&absolutize(&cwd, d)))
                            .collect(),
                        ..def
                    })
                    .collect();
                if debug {
                    debug!(count = definitions.len(), "loaded aliases from definitions");
                }
                Ok(Self {
                    definitions,
                    typescript: Vec::new(),
                    debug,
                })
            }
            AliasSource::Root(root) => {
                let location = config::locate(root.as_deref())?;
                let modules = match module_references {
                    ModuleReferenceMode::Expand => ModuleReferences::Expand(
                        module_dirs
                            .unwrap_or_else(|| vec![location.project_root.join("node_modules")])
                            .iter()
                            .map(|dir| absolutize(&cwd, &path_string(dir)))
                            .collect(),
                    ),
                    ModuleReferenceMode::Symbolic => ModuleReferences::Symbolic,
                    ModuleReferenceMode::BaseUrl => ModuleReferences::BaseUrl,
                };
                if debug {
                    debug!(file = %location.file.display(), ?modules, "reading config");
                }

                let ts = config::read_ts_config(&location.file)?;
                if ts.base_url_inferred {
                    if let Some(parent) = &ts.extends {
                        debug!(
                            extends = %parent,
                            base_url = %ts.base_url.display(),
                            "baseUrl not inherited from extended config, using config directory"
                        );
                    }
                }

                let definitions = normalize(&ts.paths, &ts.base_url, &modules);
                if debug {
                    for def in &definitions {
                        debug!(%def, "normalized alias");
                    }
                }

                Ok(Self {
                    definitions,
                    typescript: ts.paths,
                    debug,
                })
            }
        }
    }

    /// Read `root` (project directory or config file) with default options.
    pub fn from_root(root: impl Into<PathBuf>) -> Result<Self, AliasError> {
        Self::new(AliasOptions::root(root))
    }

    /// Adopt an already-normalized list as is, without touching the filesystem.
    pub fn from_definitions(definitions: Vec<AliasDefinition>) -> Self {
        Self {
            definitions,
            typescript: Vec::new(),
            debug: false,
        }
    }

    pub fn definitions(&self) -> &[AliasDefinition] {
        &self.definitions
    }

    /// The `paths` table as read from the config (empty for supplied lists).
    pub fn typescript(&self) -> &RawAliasTable {
        &self.typescript
    }

    pub(crate) fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Replace a real path by its alias form, or `None` when no alias applies.
    pub fn apply_strict(&self, real_path: &str) -> Option<String> {
        self.definitions.iter().find_map(|def| {
            def.destinations.iter().find_map(|dest| {
                match_prefix(dest, def.exact, real_path).map(|rest| format!("{}{rest}", def.alias))
            })
        })
    }

    /// Like [`Self::apply_strict`], returning the input unchanged on a miss.
    pub fn apply(&self, real_path: &str) -> String {
        self.apply_strict(real_path)
            .unwrap_or_else(|| real_path.to_string())
    }

    /// Whether `path` can be shortened with an alias.
    pub fn is_aliased(&self, path: &str) -> bool {
        self.apply_strict(path).is_some()
    }

    /// Replace an alias by the real path, or `None` when no alias matches.
    ///
    /// Only the first destination of each definition is used.
    pub fn realpath_strict(&self, request: &str) -> Option<String> {
        self.definitions.iter().find_map(|def| {
            let dest = def.destinations.first()?;
            def.match_alias(request).map(|rest| format!("{dest}{rest}"))
        })
    }

    /// Like [`Self::realpath_strict`], returning the input unchanged on a miss.
    pub fn realpath(&self, request: &str) -> String {
        self.realpath_strict(request)
            .unwrap_or_else(|| request.to_string())
    }

    /// Whether `request` starts with a known alias.
    pub fn contains_alias(&self, request: &str) -> bool {
        self.realpath_strict(request).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn resolver(defs: &[(&str, &[&str], bool)]) -> AliasResolver {
        AliasResolver::from_definitions(
            defs.iter()
                .map(|(alias, dests, exact)| {
                    AliasDefinition::new(*alias, dests.iter().map(|d| d.to_string()).collect(), *exact)
                })
                .collect(),
        )
    }

    fn write_tsconfig(dir: &Path, body: &str) {
        fs::write(dir.join("tsconfig.json"), body).unwrap();
    }

    // --- apply / realpath ---

    #[test]
    fn prefix_alias_round_trip() {
        let r = resolver(&[("@app", &["/proj/src/app"], false)]);
        assert_eq!(r.apply("/proj/src/app/foo.ts"), "@app/foo.ts");
        assert_eq!(r.realpath("@app/foo.ts"), "/proj/src/app/foo.ts");
        assert_eq!(r.apply(&r.realpath("@app/a/b/c")), "@app/a/b/c");
    }

    #[test]
    fn exact_alias_round_trip() {
        let r = resolver(&[("@lib", &["/proj/node_modules/some-lib"], true)]);
        assert_eq!(r.realpath("@lib"), "/proj/node_modules/some-lib");
        assert_eq!(r.apply(&r.realpath("@lib")), "@lib");
    }

    #[test]
    fn exact_alias_never_prefix_matches() {
        let r = resolver(&[("@lib", &["/proj/node_modules/some-lib"], true)]);
        assert_eq!(
            r.apply("/proj/node_modules/some-lib/extra"),
            "/proj/node_modules/some-lib/extra"
        );
        assert_eq!(r.realpath_strict("@lib/extra"), None);
    }

    #[test]
    fn prefix_alias_requires_separator() {
        let r = resolver(&[("@app", &["/proj/src/app"], false)]);
        assert_eq!(r.apply_strict("/proj/src/application/x.ts"), None);
        assert_eq!(r.apply_strict("/proj/src/app"), None);
        assert_eq!(r.realpath_strict("@apple/x"), None);
    }

    #[test]
    fn first_declared_alias_wins() {
        let r = resolver(&[
            ("@src", &["/proj/src"], false),
            ("@app", &["/proj/src/app"], false),
        ]);
        assert_eq!(r.apply("/proj/src/app/foo.ts"), "@src/app/foo.ts");

        let reversed = resolver(&[
            ("@app", &["/proj/src/app"], false),
            ("@src", &["/proj/src"], false),
        ]);
        assert_eq!(reversed.apply("/proj/src/app/foo.ts"), "@app/foo.ts");
    }

    #[test]
    fn overlapping_aliases_resolve_in_order() {
        let r = resolver(&[
            ("@x", &["/first"], false),
            ("@x", &["/second"], false),
        ]);
        assert_eq!(r.realpath("@x/mod"), "/first/mod");
    }

    #[test]
    fn apply_tries_every_destination() {
        let r = resolver(&[("@shared", &["/a/shared", "/b/shared"], false)]);
        assert_eq!(r.apply("/b/shared/util.ts"), "@shared/util.ts");
        // Reverse lookups only ever use the first destination.
        assert_eq!(r.realpath("@shared/util.ts"), "/a/shared/util.ts");
    }

    #[test]
    fn definition_without_destinations_never_matches() {
        let r = resolver(&[("@none", &[], false), ("@none", &["/fallback"], false)]);
        assert_eq!(r.realpath("@none/x"), "/fallback/x");
    }

    #[test]
    fn lenient_lookups_return_input_on_miss() {
        let r = resolver(&[("@app", &["/proj/src/app"], false)]);
        assert_eq!(r.apply("/elsewhere/x.ts"), "/elsewhere/x.ts");
        assert_eq!(r.realpath("react"), "react");
    }

    #[test]
    fn predicates_agree_with_strict_lookups() {
        let r = resolver(&[
            ("@app", &["/proj/src/app"], false),
            ("@cfg", &["/proj/config.ts"], true),
        ]);
        for input in [
            "/proj/src/app/x.ts",
            "/proj/config.ts",
            "@app/x",
            "@cfg",
            "@cfg/x",
            "lodash",
            "",
        ] {
            assert_eq!(r.is_aliased(input), r.apply_strict(input).is_some(), "{input}");
            assert_eq!(r.contains_alias(input), r.realpath_strict(input).is_some(), "{input}");
        }
    }

    // --- construction ---

    #[test]
    fn new_reads_project_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_tsconfig(
            dir.path(),
            r#"{
  "compilerOptions": {
    "baseUrl": ".",
    "paths": {
      "@app/*": ["./src/app/*"],
      "@lib": ["some-lib"], // package
    },
  },
}"#,
        );

        let r = AliasResolver::from_root(dir.path()).unwrap();
        let root = path_string(dir.path());

        assert_eq!(r.apply(&format!("{root}/src/app/foo.ts")), "@app/foo.ts");
        assert_eq!(r.realpath("@app/foo.ts"), format!("{root}/src/app/foo.ts"));
        assert_eq!(r.apply(&format!("{root}/node_modules/some-lib")), "@lib");
        assert_eq!(r.typescript().len(), 2);
    }

    #[test]
    fn new_treats_node_modules_template_as_package_name() {
        let dir = tempfile::tempdir().unwrap();
        write_tsconfig(
            dir.path(),
            r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "@lib": ["node_modules/some-lib"] } } }"#,
        );
        let root = path_string(dir.path());

        let expanded = AliasResolver::from_root(dir.path()).unwrap();
        let nested = format!("{root}/node_modules/node_modules/some-lib");
        assert_eq!(expanded.definitions()[0].destinations, vec![nested.clone()]);
        assert_eq!(expanded.apply(&nested), "@lib");
        assert_eq!(expanded.apply_strict(&format!("{root}/node_modules/some-lib")), None);

        let joined = AliasResolver::new(
            AliasOptions::root(dir.path()).with_module_references(ModuleReferenceMode::BaseUrl),
        )
        .unwrap();
        let direct = format!("{root}/node_modules/some-lib");
        assert_eq!(joined.definitions()[0].destinations, vec![direct.clone()]);
        assert_eq!(joined.apply(&direct), "@lib");
    }

    #[test]
    fn new_uses_configured_module_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write_tsconfig(
            dir.path(),
            r#"{ "compilerOptions": { "paths": { "@lib/*": ["some-lib/*"] } } }"#,
        );

        let r = AliasResolver::new(
            AliasOptions::root(dir.path())
                .with_module_dirs(vec![PathBuf::from("/a/node_modules"), PathBuf::from("/b/node_modules")]),
        )
        .unwrap();

        assert_eq!(
            r.definitions()[0].destinations,
            vec!["/a/node_modules/some-lib", "/b/node_modules/some-lib"]
        );
    }

    #[test]
    fn new_symbolic_mode_keeps_package_names() {
        let dir = tempfile::tempdir().unwrap();
        write_tsconfig(
            dir.path(),
            r#"{ "compilerOptions": { "paths": { "@lib": ["some-lib"] } } }"#,
        );

        let r = AliasResolver::new(
            AliasOptions::root(dir.path()).with_module_references(ModuleReferenceMode::Symbolic),
        )
        .unwrap();
        assert_eq!(r.realpath("@lib"), "some-lib");
    }

    #[test]
    fn new_base_url_mode_reads_tsc_style_templates() {
        let dir = tempfile::tempdir().unwrap();
        write_tsconfig(
            dir.path(),
            r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "@app/*": ["src/app/*"] } } }"#,
        );

        let r = AliasResolver::new(
            AliasOptions::root(dir.path()).with_module_references(ModuleReferenceMode::BaseUrl),
        )
        .unwrap();
        let root = path_string(dir.path());
        assert_eq!(r.apply(&format!("{root}/src/app/foo.ts")), "@app/foo.ts");
        assert_eq!(r.realpath("@app/foo.ts"), format!("{root}/src/app/foo.ts"));
    }

    #[test]
    fn new_accepts_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        let file = dir.path().join("config/tsconfig.app.json");
        fs::write(
            &file,
            r#"{ "compilerOptions": { "baseUrl": "..", "paths": { "~/*": ["./*"] } } }"#,
        )
        .unwrap();

        let r = AliasResolver::from_root(&file).unwrap();
        assert_eq!(
            r.realpath("~/src/main.ts"),
            format!("{}/src/main.ts", path_string(dir.path()))
        );
    }

    #[test]
    fn new_fails_for_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = AliasResolver::from_root(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, AliasError::ConfigNotFound { .. }));
    }

    #[test]
    fn new_fails_for_directory_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = AliasResolver::from_root(dir.path()).unwrap_err();
        assert!(matches!(err, AliasError::ConfigRead { .. }));
    }

    #[test]
    fn new_absolutizes_supplied_definitions() {
        let cwd = std::env::current_dir().unwrap();
        let r = AliasResolver::new(AliasOptions::definitions(vec![
            AliasDefinition::new("@app", vec!["src/app".to_string()], false),
            AliasDefinition::new("@abs", vec!["/opt/abs".to_string()], true),
        ]))
        .unwrap();

        assert_eq!(
            r.definitions()[0].destinations,
            vec![path_string(&cwd.join("src/app"))]
        );
        assert_eq!(r.definitions()[1].destinations, vec!["/opt/abs"]);
        assert!(r.typescript().is_empty());
    }
}
