//! Canonical key vocabulary and raw-key normalization.
//!
//! The pet artwork understands a constrained set of canonical key names (the
//! support table ships with the model and is read-only here). The capture
//! service reports much finer-grained names: `ControlLeft`, `MetaRight`,
//! `F13`, and so on. [`KeyNormalizer`] folds unsupported raw names down to a
//! canonical family key so the pet still reacts:
//!
//! - `F<digits>` that the table does not list becomes `"Fn"`.
//! - A key starting with a modifier-family name (`Meta`, `Shift`, `Alt`,
//!   `Control`) that the table does not list becomes just the family name.
//! - Everything else passes through unchanged.
//!
//! If the final candidate is still not in the support table, normalization
//! yields `None` and the caller drops the event — an unmapped key is not an
//! error.
//!
//! The whole path is prefix and digit checks over a `const` family table; no
//! patterns are compiled at runtime.

use std::collections::HashMap;

/// Modifier families, in the fixed order the fallback rules are tried.
///
/// The support check is computed once against the raw key before any rule
/// runs, so the order only matters for keys matching several families — which
/// cannot happen with these four disjoint prefixes. The order is kept anyway
/// to match the capture pipeline's documented behavior.
pub const MODIFIER_FAMILIES: [&str; 4] = ["Meta", "Shift", "Alt", "Control"];

/// Read-only table of canonical key names and their supported flags.
///
/// Supplied by the loaded pet model; keys absent from the table are
/// unsupported.
#[derive(Debug, Clone, Default)]
pub struct KeySupportTable {
    supported: HashMap<String, bool>,
}

impl KeySupportTable {
    pub fn new(supported: HashMap<String, bool>) -> Self {
        Self { supported }
    }

    /// Builds a table where every listed key is supported.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: keys.into_iter().map(|k| (k.into(), true)).collect(),
        }
    }

    pub fn is_supported(&self, key: &str) -> bool {
        self.supported.get(key).copied().unwrap_or(false)
    }
}

/// Maps raw capture-service key names onto the canonical vocabulary.
#[derive(Debug, Clone)]
pub struct KeyNormalizer {
    table: KeySupportTable,
}

impl KeyNormalizer {
    pub fn new(table: KeySupportTable) -> Self {
        Self { table }
    }

    /// Normalizes a raw key name to a canonical key, or `None` if the key has
    /// no canonical mapping and the event should be dropped.
    ///
    /// The unsupported flag is evaluated exactly once, against the raw key,
    /// before any rewrite. A rewrite applied by one rule is deliberately not
    /// re-checked against the table within the same call; changing that would
    /// change which canonical key wins for raw names matching multiple rules.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let mut candidate = raw;

        let unsupported = !self.table.is_supported(raw);

        if unsupported && is_function_key(raw) {
            candidate = "Fn";
        } else {
            for family in MODIFIER_FAMILIES {
                if unsupported && raw.starts_with(family) {
                    candidate = family;
                }
            }
        }

        if self.table.is_supported(candidate) {
            Some(candidate.to_string())
        } else {
            None
        }
    }
}

/// `true` for `"F"` followed by one or more ASCII digits (`F1` .. `F24`).
fn is_function_key(key: &str) -> bool {
    match key.strip_prefix('F') {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
