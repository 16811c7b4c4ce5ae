//! Colon substitution: the last qualifying colon in a target is a
//! placeholder for the link's own label.

use std::sync::LazyLock;

use regex::Regex;

use crate::namespace::NamespaceTable;
use crate::types::ResolveOptions;

/// `scheme://` at the start of a target.
#[allow(clippy::expect_used, reason = "literal pattern, checked by tests")]
static PROTOCOL: LazyLock<Regex> = LazyLock::new(|| return Regex::new(r"^[A-Za-z]+://").expect("valid regex"));

/// Whether `target` starts with a `scheme://` prefix.
pub fn has_protocol(target: &str) -> bool {
    return PROTOCOL.is_match(target);
}

/// Byte length of the `scheme://` prefix, if any.
fn protocol_len(target: &str) -> Option<usize> {
    return PROTOCOL.find(target).map(|m| return m.end());
}

/// Replace the last qualifying colon in `target` with `display_text`.
///
/// Colons that are part of a protocol marker or a registered namespace
/// marker never qualify. A namespace marker with an empty payload takes the
/// label as its payload, so `blocks:` names a file after the link.
pub fn substitute_colon(
    target: &str,
    display_text: &str,
    table: &NamespaceTable,
    options: &ResolveOptions,
) -> String {
    if let Some(marker_len) = protocol_len(target) {
        if !options.url_placeholders {
            return target.to_string();
        }
        return splice_last_colon(target, marker_len, display_text);
    }

    if let Some((name, payload)) = table.split_prefix(target) {
        if payload.is_empty() {
            return format!("{name}:{display_text}");
        }
        let marker_len = name.len().saturating_add(1);
        return splice_last_colon(target, marker_len, display_text);
    }

    return splice_last_colon(target, 0, display_text);
}

/// Splice `display_text` over the last colon at or after byte `floor`.
fn splice_last_colon(target: &str, floor: usize, display_text: &str) -> String {
    return match target.rsplit_once(':') {
        Some((prefix, suffix)) if prefix.len() >= floor => format!("{prefix}{display_text}{suffix}"),
        Some(_) | None => target.to_string(),
    };
}
