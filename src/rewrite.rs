//! Rendering hook: rewrite shorthand link targets into the site-rooted
//! `href` a markdown renderer would emit.

use std::path::Path;

use regex::Captures;

use crate::resolver::Resolver;
use crate::scanner::link_pattern;
use crate::types::{LinkRequest, OutputMode, Resolution};

/// Rewrite every link target in `content` to `/` plus its workspace-relative
/// resolution. Protocol links keep their URL after colon substitution;
/// unresolvable links are left as written.
pub fn rewrite_links(content: &str, source: &Path, resolver: &Resolver<'_>) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let rewritten = link_pattern().replace_all(line, |cap: &Captures<'_>| {
            return rewrite_capture(cap, source, resolver);
        });
        out.push_str(&rewritten);
    }
    return out;
}

/// Rewrite a single `[label](target)` match.
fn rewrite_capture(cap: &Captures<'_>, source: &Path, resolver: &Resolver<'_>) -> String {
    let whole = cap.get(0).map_or("", |m| return m.as_str());
    let label = cap.get(1).map_or("", |m| return m.as_str());
    let raw_target = cap.get(2).map_or("", |m| return m.as_str());

    let request = LinkRequest::new(raw_target, label, source, OutputMode::WORKSPACE_RELATIVE);
    return match resolver.resolve(&request) {
        Resolution::Display(path) => format!("[{label}]({})", site_rooted(&path)),
        Resolution::Location(path) => format!("[{label}]({})", site_rooted(&path.display().to_string())),
        Resolution::External(url) => format!("[{label}]({url})"),
        Resolution::Unresolved => whole.to_string(),
    };
}

/// Prefix `/` unless the path already carries one.
fn site_rooted(path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    return format!("/{path}");
}
