//! Encapsulation expansion: wrapper shorthands rewritten into the canonical
//! `namespace:payload` form.
//!
//! The rules form an ordered list. The first rule whose predicate matches
//! decides the rewrite and no later rule is consulted, so the sentinel
//! literals (`[.]`, `[!]`) always win over the generic wrapper rule.

use crate::namespace::{NamespaceTable, Wrapper};

/// One (predicate, rewrite) pair of the expansion grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `{}` becomes the brace placeholder `{:}`.
    EmptyBraces,
    /// `[]` / `()` become the placeholder `[:]` / `(:)`.
    EmptyPlaceholder(Wrapper),
    /// `[X]` / `(X)` become `ns:X`.
    Generic(Wrapper),
    /// `[.]` / `(.)` become `ns:./:`, a label-named file beside the document.
    SelfDirectory(Wrapper),
    /// `[!]` / `(!)` become `ns:!:`.
    Sentinel(Wrapper),
}

/// The expansion grammar in precedence order.
pub const RULES: [Rule; 9] = [
    Rule::EmptyPlaceholder(Wrapper::Brackets),
    Rule::SelfDirectory(Wrapper::Brackets),
    Rule::Sentinel(Wrapper::Brackets),
    Rule::Generic(Wrapper::Brackets),
    Rule::EmptyPlaceholder(Wrapper::Parens),
    Rule::SelfDirectory(Wrapper::Parens),
    Rule::Sentinel(Wrapper::Parens),
    Rule::Generic(Wrapper::Parens),
    Rule::EmptyBraces,
];

impl Rule {
    /// Whether this rule claims `target`.
    pub fn matches(self, target: &str) -> bool {
        return match self {
            Self::EmptyBraces => target == "{}",
            Self::EmptyPlaceholder(w) => w.payload(target) == Some(""),
            Self::Generic(w) => w.payload(target).is_some(),
            Self::SelfDirectory(w) => w.payload(target) == Some("."),
            Self::Sentinel(w) => w.payload(target) == Some("!"),
        };
    }

    /// Short name used in diagnostics.
    pub const fn name(self) -> &'static str {
        return match self {
            Self::EmptyBraces => "empty-braces",
            Self::EmptyPlaceholder(_) => "empty-placeholder",
            Self::Generic(_) => "generic-wrapper",
            Self::SelfDirectory(_) => "self-directory",
            Self::Sentinel(_) => "sentinel",
        };
    }

    /// Rewrite a target this rule matched. Wrapper families with no namespace
    /// in the table leave the target unchanged.
    pub fn rewrite(self, target: &str, table: &NamespaceTable) -> String {
        let namespaced = |w: Wrapper, payload: &str| -> String {
            return match table.wrapper_namespace(w) {
                Some(ns) => format!("{ns}:{payload}"),
                None => target.to_string(),
            };
        };

        return match self {
            Self::EmptyBraces => "{:}".to_string(),
            Self::EmptyPlaceholder(w) => placeholder(w),
            Self::Generic(w) => namespaced(w, w.payload(target).unwrap_or("")),
            Self::SelfDirectory(w) => namespaced(w, "./:"),
            Self::Sentinel(w) => namespaced(w, "!:"),
        };
    }
}

/// Canonical empty placeholder for a wrapper family, e.g. `[:]`.
fn placeholder(wrapper: Wrapper) -> String {
    return format!("{}:{}", wrapper.open(), wrapper.close());
}

/// First rule that claims `target`, if any.
pub fn matching_rule(target: &str) -> Option<Rule> {
    return RULES.into_iter().find(|rule| return rule.matches(target));
}

/// Rewrite wrapper shorthands into canonical form. Unmatched input is
/// returned unchanged.
pub fn expand(target: &str, table: &NamespaceTable) -> String {
    return match matching_rule(target) {
        Some(rule) => rule.rewrite(target, table),
        None => target.to_string(),
    };
}

/// After colon substitution, a bracket or paren placeholder holds the label
/// as its payload (`[:]` became `[intro]`). Expand that with the generic
/// wrapper rule so it lands in the family's namespace. Anything else,
/// including the brace placeholder, is returned as substituted.
pub fn expand_placeholder(expanded: &str, substituted: &str, table: &NamespaceTable) -> String {
    for wrapper in Wrapper::ALL {
        if expanded == placeholder(wrapper) && Rule::Generic(wrapper).matches(substituted) {
            return Rule::Generic(wrapper).rewrite(substituted, table);
        }
    }
    return substituted.to_string();
}
