use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter};

/// External crates only need to log warnings and errors
const ALLOWED_EXTERNAL_LEVELS: [Level; 2] = [Level::Warn, Level::Error];

/// Logs to stderr, so command output on stdout stays clean.
/// Timestamps are only shown when verbose.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let origin = origin(record.target());

            if verbose {
                let now = chrono::Local::now().format("%H:%M:%S%.3f");

                out.finish(format_args!(
                    "{} {} {} {}",
                    now.to_string().bright_black(),
                    level_label(record.level()),
                    message,
                    format!("({})", origin).bright_black()
                ))
            } else {
                out.finish(format_args!("{} {}", level_label(record.level()), message))
            }
        })
        .filter(move |meta| {
            let is_local = is_local(meta.target());
            let is_allowed = meta.level() <= level;
            let is_severe = ALLOWED_EXTERNAL_LEVELS.contains(&meta.level());

            is_local && is_allowed || is_severe
        })
        .chain(std::io::stderr())
        .apply()
        .expect("logging is initialized")
}

fn crate_name(target: &str) -> &str {
    target.split("::").next().unwrap_or_default()
}

fn is_local(target: &str) -> bool {
    matches!(
        crate_name(target),
        "arena" | "arena_core" | "arena_views" | "arena_impls"
    )
}

/// The crate a record came from, without the common prefix
fn origin(target: &str) -> &str {
    match crate_name(target) {
        "arena" => "cli",
        name => name.strip_prefix("arena_").unwrap_or(name),
    }
}

fn level_label(level: Level) -> ColoredString {
    match level {
        Level::Error => "error:".red().bold(),
        Level::Warn => "warning:".yellow().bold(),
        Level::Info => "info:".blue(),
        Level::Debug => "debug:".dimmed(),
        Level::Trace => "trace:".dimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        assert_eq!(origin("arena::commands"), "cli");
        assert_eq!(origin("arena_core::client"), "core");
        assert_eq!(origin("reqwest::connect"), "reqwest");
        assert!(is_local("arena_views::tournaments::detail"));
        assert!(!is_local("hyper::proto"));
    }
}
