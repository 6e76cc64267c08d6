use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix marking a pattern (or destination template) as a wildcard.
pub const WILDCARD_SUFFIX: &str = "/*";

/// Alias table exactly as declared in `compilerOptions.paths`, in key order.
pub type RawAliasTable = Vec<(String, Vec<String>)>;

/// A normalized alias: the unit every lookup and export works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDefinition {
    /// Pattern with any trailing `/*` removed.
    pub alias: String,
    /// Path prefixes in declaration order. The first match wins.
    #[serde(alias = "pathnames")]
    pub destinations: Vec<String>,
    /// `true` when the pattern had no wildcard, so only the literal alias matches.
    pub exact: bool,
}

impl AliasDefinition {
    pub fn new(alias: impl Into<String>, destinations: Vec<String>, exact: bool) -> Self {
        Self {
            alias: alias.into(),
            destinations,
            exact,
        }
    }

    /// Match `request` against the alias side and return the remainder
    /// (empty for an exact match, `/rest` for a prefix match).
    pub(crate) fn match_alias<'r>(&self, request: &'r str) -> Option<&'r str> {
        match_prefix(&self.alias, self.exact, request)
    }
}

/// Shared matching rule: exact entries compare the whole string, prefix
/// entries require `prefix + "/"` and keep the leading slash in the remainder.
pub(crate) fn match_prefix<'r>(prefix: &str, exact: bool, input: &'r str) -> Option<&'r str> {
    if exact {
        return (input == prefix).then_some("");
    }
    let rest = input.strip_prefix(prefix)?;
    rest.starts_with('/').then_some(rest)
}

impl fmt::Display for AliasDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exact {
            write!(f, "{}", self.alias)?;
        } else {
            write!(f, "{}{WILDCARD_SUFFIX}", self.alias)?;
        }
        write!(f, " -> [{}]", self.destinations.join(", "))
    }
}
