//! Terminal logging with colored `module: message` prefixes on stderr.
//!
//! ```ignore
//! log!("watch"; "monitoring {} directories", count);
//! debug!("resolve"; "{target} -> {canonical}");
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::{OwoColorize as _, Stream, Style};

/// Global verbose flag (set by `--verbose`).
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Whether verbose mode is enabled.
pub fn is_verbose() -> bool {
    return VERBOSE.load(Ordering::SeqCst);
}

/// Print one prefixed line to stderr.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    eprintln!("{prefix} {message}");
}

/// Module prefix, colored by module when stderr is a terminal.
fn colorize_prefix(module: &str) -> String {
    let style = match module {
        "error" => Style::new().bright_red().bold(),
        "watch" => Style::new().bright_green().bold(),
        _ => Style::new().bright_yellow().bold(),
    };
    let prefix = format!("{module}:");
    return prefix
        .if_supports_color(Stream::Stderr, |text| return text.style(style))
        .to_string();
}

/// Log a message with a module prefix.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message only when `--verbose` is set.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn prefix_keeps_module_name() {
        assert!(colorize_prefix("watch").contains("watch:"));
        assert!(colorize_prefix("namespace").contains("namespace:"));
    }

    #[test]
    fn verbose_flag_round_trips() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
