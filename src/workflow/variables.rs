//! Run-scoped variable store and `{{name}}` placeholder substitution

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Matches `{{name}}` where name contains no braces
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid placeholder regex"));

/// Named string values produced by the steps of one run
///
/// A fresh store is owned by every execution; nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    variables: HashMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, overwriting any previous value
    ///
    /// Empty keys are ignored: no step can reference them.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if key.is_empty() {
            tracing::debug!("Ignoring variable write with an empty name");
            return;
        }
        let value = value.into();
        tracing::trace!("Set variable {} ({} bytes)", key, value.len());
        self.variables.insert(key, value);
    }

    /// Look up a variable, returning `("", false)` when it was never set
    pub fn get(&self, key: &str) -> (&str, bool) {
        match self.variables.get(key) {
            Some(value) => (value.as_str(), true),
            None => ("", false),
        }
    }

    /// Value of a variable, empty when unset
    pub fn value(&self, key: &str) -> &str {
        self.get(key).0
    }

    /// Replace every `{{key}}` whose key is known with its value
    ///
    /// Placeholders naming unknown variables are left verbatim. Substituted
    /// values are not scanned again.
    pub fn parse(&self, text: &str) -> String {
        if self.variables.is_empty() || !text.contains("{{") {
            return text.to_string();
        }

        PLACEHOLDER
            .replace_all(text, |caps: &Captures| match self.variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Forget all variables
    pub fn reset(&mut self) {
        self.variables.clear();
    }

    /// Snapshot of the current variables
    pub fn to_map(&self) -> HashMap<String, String> {
        self.variables.clone()
    }
}

impl<K, V> FromIterator<(K, V)> for VariableStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = VariableStore::new();
        for (key, value) in iter {
            store.set(key, value);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_get_unset_variable() {
        let store = VariableStore::new();
        assert_eq!(store.get("missing"), ("", false));
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = VariableStore::new();
        store.set("name", "Ada");
        store.set("name", "");
        assert_eq!(store.get("name"), ("", true));
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let mut store = VariableStore::new();
        store.set("", "value");
        assert!(store.to_map().is_empty());
    }

    #[test]
    fn test_parse_known_and_unknown() {
        let store: VariableStore = [("name", "Ada"), ("lang", "rust")].into_iter().collect();
        assert_eq!(
            store.parse("hi {{name}}, {{lang}} {{missing}} {{name}}"),
            "hi Ada, rust {{missing}} Ada"
        );
    }

    #[test]
    fn test_parse_does_not_rescan_values() {
        let store: VariableStore = [("a", "{{b}}"), ("b", "B")].into_iter().collect();
        assert_eq!(store.parse("{{a}}-{{b}}"), "{{b}}-B");
    }

    #[test]
    fn test_parse_keys_are_exact() {
        let store: VariableStore = [("name", "Ada")].into_iter().collect();
        assert_eq!(store.parse("{{ name }}"), "{{ name }}");
        assert_eq!(store.parse("{name}"), "{name}");
    }

    #[test]
    fn test_parse_without_variables() {
        let store = VariableStore::new();
        assert_eq!(store.parse("echo {{x}}"), "echo {{x}}");
    }

    #[test]
    fn test_reset_clears() {
        let mut store: VariableStore = [("x", "1")].into_iter().collect();
        store.reset();
        assert_eq!(store.get("x"), ("", false));
        assert_eq!(store.parse("{{x}}"), "{{x}}");
    }

    proptest! {
        #[test]
        fn test_parse_substitutes_every_known_key(
            vars in prop::collection::hash_map("[a-z_]{1,8}", "[a-zA-Z0-9 ]{0,12}", 0..6),
            unknown in "[A-Z]{1,8}",
            prefix in "[a-z ]{0,10}",
        ) {
            let store: VariableStore = vars.clone().into_iter().collect();

            let mut text = prefix.clone();
            let mut expected = prefix;
            for (key, value) in &vars {
                text.push_str(&format!("<{{{{{key}}}}}>"));
                expected.push_str(&format!("<{value}>"));
            }
            text.push_str(&format!("{{{{{unknown}}}}}"));
            expected.push_str(&format!("{{{{{unknown}}}}}"));

            let parsed = store.parse(&text);
            prop_assert_eq!(&parsed, &expected);
            prop_assert_eq!(store.parse(&parsed), parsed);
        }
    }
}
