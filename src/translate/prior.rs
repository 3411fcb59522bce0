//! Lookup of previously known configuration entries.
//!
//! List entries are matched by a stable key rather than by position alone, so
//! a reordered list never pairs a value with the wrong entry.

use crate::state::{
    ApiStepConfig, BrowserStepConfig, BrowserVariableConfig, ConfigVariableConfig,
    RequestFileConfig,
};

/// A list entry identified by a stable key.
pub(crate) trait Keyed {
    fn key(&self) -> &str;
}

/// The prior entry for `key`: the one at `index` if its key matches, else
/// the first entry carrying that key.
pub(crate) fn find<'a, T: Keyed>(prior: &'a [T], index: usize, key: &str) -> Option<&'a T> {
    prior
        .get(index)
        .filter(|entry| entry.key() == key)
        .or_else(|| prior.iter().find(|entry| entry.key() == key))
}

macro_rules! keyed_by_name {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Keyed for $ty {
                fn key(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

keyed_by_name!(
    ApiStepConfig,
    BrowserStepConfig,
    BrowserVariableConfig,
    ConfigVariableConfig,
    RequestFileConfig,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(name: &str, example: &str) -> ConfigVariableConfig {
        ConfigVariableConfig {
            name: name.to_string(),
            example: example.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_index_wins() {
        let prior = vec![variable("A", "first"), variable("A", "second")];

        assert_eq!(find(&prior, 1, "A").unwrap().example, "second");
    }

    #[test]
    fn test_reordered_entries_match_by_key() {
        let prior = vec![variable("USER", "jane"), variable("TOKEN", "abc")];

        assert_eq!(find(&prior, 0, "TOKEN").unwrap().example, "abc");
        assert_eq!(find(&prior, 5, "USER").unwrap().example, "jane");
    }

    #[test]
    fn test_missing_key() {
        let prior = vec![variable("USER", "jane")];

        assert!(find(&prior, 0, "PASSWORD").is_none());
        assert!(find::<ConfigVariableConfig>(&[], 0, "USER").is_none());
    }
}
