// ABOUTME: Immutable snapshot of the process environment with prefix-based overrides.
// ABOUTME: Lets one CI config carry per-branch values without mutating the real environment.

use std::collections::BTreeMap;

/// Placeholder shown instead of secret values.
pub const REDACTED: &str = "<redacted>";

/// Environment variables read once at startup.
///
/// Nothing here touches the real process environment; prefix resolution
/// returns a new snapshot that is passed explicitly to whoever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot the current process environment, skipping non-UTF-8 entries.
    pub fn from_process() -> Self {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of `key` if it is set to something other than blanks.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Expose every `<PREFIX>_<NAME>` variable under `<NAME>` as well.
    ///
    /// Matching ignores case and treats `-` and `_` alike. A separator must
    /// follow the prefix. Stripped names keep their original spelling and
    /// win over an existing unprefixed variable.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        let wanted = normalize(prefix.trim());
        if wanted.is_empty() {
            return self.clone();
        }

        let mut resolved = self.vars.clone();
        for (key, value) in &self.vars {
            let normalized = normalize(key);
            let Some(rest) = normalized.strip_prefix(&wanted) else {
                continue;
            };
            if !rest.starts_with('_') {
                continue;
            }

            // normalize() maps ASCII to ASCII, so byte offsets line up with `key`.
            let stripped = &key[wanted.len() + 1..];
            if stripped.is_empty() {
                continue;
            }

            tracing::debug!(from = %key, to = %stripped, "resolved prefixed variable");
            resolved.insert(stripped.to_string(), value.clone());
        }

        Self { vars: resolved }
    }

    /// All variables sorted by name, with secret values replaced.
    pub fn redacted(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| {
            let shown = if is_secret(k) { REDACTED } else { v.as_str() };
            (k.as_str(), shown)
        })
    }
}

/// Whether a variable's value must never be printed.
pub fn is_secret(name: &str) -> bool {
    name.to_ascii_uppercase().contains("SECRET")
}

fn normalize(value: &str) -> String {
    value.to_ascii_uppercase().replace('-', "_")
}
