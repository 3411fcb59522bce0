//! Ordered discriminator rules.
//!
//! Each discriminated union declares a static [`RuleTable`]: an ordered list
//! of named predicates, each naming the variant it selects. The first
//! matching rule wins, so priority is the table order and nothing else.

use crate::schema::Diagnostic;
use crate::translate::warning;

/// One entry of a [`RuleTable`].
pub struct Rule<T: ?Sized, K> {
    /// Name used in logs and tests.
    pub name: &'static str,
    /// Whether this rule selects the input.
    pub matches: fn(&T) -> bool,
    /// The variant selected when `matches` holds.
    pub kind: K,
}

/// An ordered list of rules selecting a variant `K` for an input `T`.
pub struct RuleTable<T: ?Sized + 'static, K: 'static> {
    union: &'static str,
    rules: &'static [Rule<T, K>],
}

impl<T: ?Sized, K> RuleTable<T, K> {
    /// A table for the union named `union`, tried in `rules` order.
    pub const fn new(union: &'static str, rules: &'static [Rule<T, K>]) -> Self {
        Self { union, rules }
    }

    /// The union name, e.g. `"assertion"`.
    pub fn union(&self) -> &'static str {
        self.union
    }

    /// The rules in priority order.
    pub fn rules(&self) -> &'static [Rule<T, K>] {
        self.rules
    }

    /// The first rule matching `input`.
    pub fn matching_rule(&self, input: &T) -> Option<&'static Rule<T, K>> {
        self.rules.iter().find(|rule| (rule.matches)(input))
    }
}

impl<T: ?Sized, K: Copy> RuleTable<T, K> {
    /// The variant selected for `input`, if any rule matches.
    pub fn classify(&self, input: &T) -> Option<K> {
        self.matching_rule(input).map(|rule| rule.kind)
    }

    /// Like [`classify`](Self::classify), but an unmatched input records
    /// exactly one warning naming `discriminator`.
    pub fn resolve(
        &self,
        input: &T,
        discriminator: &str,
        attribute: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<K> {
        let kind = self.classify(input);
        if kind.is_none() {
            warning(
                diagnostics,
                attribute,
                format!("Unrecognized {} variant", self.union),
                format!("\"{}\" matches no known {}; it is ignored", discriminator, self.union),
            );
        }
        kind
    }
}
