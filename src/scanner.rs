use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::types::LinkOccurrence;

/// `[label](target)` where the target may hold one level of parentheses,
/// so the `(X)` shorthand survives inside the link.
#[allow(clippy::expect_used, reason = "literal pattern, checked by tests")]
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"\[([^\]]+)\]\(((?:\([^()\s]*\)|[^()\s])*)\)").expect("valid regex");
});

/// The compiled link pattern. Group 1 is the label, group 2 the target.
pub fn link_pattern() -> &'static Regex {
    return &LINK_PATTERN;
}

/// Scan all markdown files under `root` and extract their links.
/// Applies the config's include/exclude filters to control which files are
/// scanned. Files are visited in name order so output is stable.
///
/// # Errors
///
/// Returns `Error::Io` if any markdown file cannot be read.
pub fn scan(root: &Path, config: &Config) -> Result<Vec<LinkOccurrence>, Error> {
    let mut links = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.path().extension().is_some_and(|ext| return ext == "md"))
    {
        let md_path = entry.path();
        let relative = md_path.strip_prefix(root).unwrap_or(md_path);
        if !config.should_scan(&relative.to_string_lossy()) {
            continue;
        }

        links.extend(scan_document(md_path)?);
    }

    return Ok(links);
}

/// Read one markdown file and extract its links.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file is missing, or `Error::Io` for
/// other read failures.
pub fn scan_document(path: &Path) -> Result<Vec<LinkOccurrence>, Error> {
    let content = match std::fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound { path: path.to_path_buf() });
        },
        Err(e) => return Err(Error::Io(e)),
        Ok(c) => c,
    };
    return Ok(extract_links(&content, path));
}

/// Extract all `[label](target)` links from markdown content.
pub fn extract_links(content: &str, source: &Path) -> Vec<LinkOccurrence> {
    let mut links = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_number = u32::try_from(idx).unwrap_or(u32::MAX).saturating_add(1);
        for cap in LINK_PATTERN.captures_iter(line) {
            links.push(occurrence_from_capture(&cap, source, line_number));
        }
    }
    return links;
}

/// Turn a regex capture into a link occurrence.
fn occurrence_from_capture(cap: &Captures<'_>, source: &Path, line: u32) -> LinkOccurrence {
    let start = cap.get(0).map_or(0, |m| return m.start());
    let column = u32::try_from(start).unwrap_or(u32::MAX).saturating_add(1);
    return LinkOccurrence {
        column,
        display_text: cap.get(1).map_or("", |m| return m.as_str()).to_string(),
        line,
        raw_target: cap.get(2).map_or("", |m| return m.as_str()).to_string(),
        source: source.to_path_buf(),
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    fn targets(line: &str) -> Vec<(String, String)> {
        return extract_links(line, Path::new("docs/page.md"))
            .into_iter()
            .map(|l| return (l.display_text, l.raw_target))
            .collect();
    }

    #[test]
    fn finds_shorthand_targets() {
        let found = targets("See [intro]([]) and [Button]((Button.js)) or [x]({}).");
        assert_eq!(
            found,
            [
                ("intro".to_string(), "[]".to_string()),
                ("Button".to_string(), "(Button.js)".to_string()),
                ("x".to_string(), "{}".to_string()),
            ]
        );
    }

    #[test]
    fn empty_target_is_captured() {
        assert_eq!(targets("[notes/]()"), [("notes/".to_string(), String::new())]);
    }

    #[test]
    fn empty_paren_shorthand_is_captured() {
        assert_eq!(targets("[label](())"), [("label".to_string(), "()".to_string())]);
    }

    #[test]
    fn whitespace_in_target_is_not_a_link() {
        assert!(targets("[a](b c)").is_empty());
    }

    #[test]
    fn records_line_and_column() {
        let links = extract_links("title\n\nsee [a](b:)", Path::new("docs/page.md"));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].line, 3);
        assert_eq!(links[0].column, 5);
        assert_eq!(links[0].source, Path::new("docs/page.md"));
    }

    #[test]
    fn scan_honours_config_filters() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs/archive")).unwrap();
        std::fs::write(dir.path().join("docs/a.md"), "[a]([])").unwrap();
        std::fs::write(dir.path().join("docs/archive/b.md"), "[b]([])").unwrap();
        std::fs::write(
            dir.path().join(".colonlink.toml"),
            "include = [\"docs/\"]\nexclude = [\"docs/archive/\"]\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        let links = scan(dir.path(), &config).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].display_text, "a");
    }

    #[test]
    fn missing_document_is_file_not_found() {
        let err = scan_document(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
