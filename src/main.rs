//! padsearch - Command-line Entry Point
//!
//! Runs one search bar command against a file: find, replace next, or
//! replace all, and prints the resulting "N of M" status.

use clap::Parser;
use log::{error, info, warn};
use padsearch::config::{load_config, save_config_silent, Settings};
use padsearch::search::{
    CompileOptions, Position, ResultInfo, SearchSession, TextBuffer, TextComponent,
};
use padsearch::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Find and replace in a file the way the playground search bar does.
#[derive(Debug, Parser)]
#[command(name = "padsearch", version, about)]
struct Cli {
    /// File to search
    file: PathBuf,

    /// Search text, or /pattern/flags
    query: String,

    /// Replace the next match with this text ($1..$9 expand capture groups)
    #[arg(long, value_name = "TEXT")]
    replace: Option<String>,

    /// With --replace, replace every match
    #[arg(long, requires = "replace")]
    all: bool,

    /// Search backwards from the cursor
    #[arg(long)]
    reverse: bool,

    /// Report matches without moving the cursor
    #[arg(long)]
    highlight_only: bool,

    /// Match case exactly
    #[arg(long, overrides_with = "no_match_case")]
    match_case: bool,

    /// Ignore case, overriding a saved default
    #[arg(long, overrides_with = "match_case")]
    no_match_case: bool,

    /// Only match whole words
    #[arg(long, overrides_with = "no_whole_word")]
    whole_word: bool,

    /// Match inside words, overriding a saved default
    #[arg(long, overrides_with = "whole_word")]
    no_whole_word: bool,

    /// Treat the query as a regular expression
    #[arg(long, overrides_with = "no_regex")]
    regex: bool,

    /// Treat the query as plain text, overriding a saved default
    #[arg(long, overrides_with = "regex")]
    no_regex: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Write the file back after replacing
    #[arg(long, requires = "replace")]
    write: bool,

    /// Remember the --match-case, --whole-word and --regex toggles as defaults
    #[arg(long)]
    save_defaults: bool,

    /// Cursor line (1-based)
    #[arg(long, default_value_t = 1)]
    line: usize,

    /// Cursor column (1-based)
    #[arg(long, default_value_t = 1)]
    column: usize,
}

impl Cli {
    /// The saved toggles with any command-line overrides applied.
    fn compile_options(&self, defaults: CompileOptions) -> CompileOptions {
        CompileOptions::new(
            toggle(defaults.match_case, self.match_case, self.no_match_case),
            toggle(defaults.whole_word, self.whole_word, self.no_whole_word),
            toggle(defaults.regex_mode, self.regex, self.no_regex),
        )
    }
}

/// Resolve a `--flag` / `--no-flag` pair against its saved default.
fn toggle(default: bool, on: bool, off: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_config();

    let text = fs::read_to_string(&cli.file).map_err(|source| Error::ReadDocument {
        path: cli.file.clone(),
        source,
    })?;

    let mut session = SearchSession::with_settings(TextBuffer::new(&text), &settings);
    let line_count = session.editor().line_count();
    if cli.line > line_count {
        warn!(
            "Line {} is past the end of {} ({} lines)",
            cli.line,
            cli.file.display(),
            line_count
        );
    }
    session.editor_mut().set_cursor(Position::new(
        cli.line.saturating_sub(1),
        cli.column.saturating_sub(1),
    ));

    let options = cli.compile_options(settings.compile_options());

    if cli.save_defaults {
        let defaults = Settings {
            match_case: options.match_case,
            whole_word: options.whole_word,
            regex_mode: options.regex_mode,
            ..settings.clone()
        };
        save_config_silent(&defaults);
    }

    let info = match &cli.replace {
        Some(replacement) if cli.all => {
            let replaced = session.replace_all_text(&cli.query, replacement, options);
            info!("Replaced {} matches", replaced);
            session.current_match_info()
        }
        Some(replacement) => {
            session.replace_next(&cli.query, replacement, options);
            session.search(&cli.query, false, true, options)
        }
        None => session.search(&cli.query, cli.reverse, cli.highlight_only, options),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&info).map_err(Error::EncodeResult)?;
        println!("{}", json);
    } else {
        print_summary(session.editor(), &info);
    }

    if cli.write {
        fs::write(&cli.file, session.editor().text()).map_err(|source| {
            Error::WriteDocument {
                path: cli.file.clone(),
                source,
            }
        })?;
        info!("Wrote {}", cli.file.display());
    }

    Ok(())
}

/// Print the status line, then each match with its line, marking the
/// current one.
fn print_summary(buffer: &TextBuffer, info: &ResultInfo) {
    println!("{}", info);
    if !info.has_matches() {
        return;
    }

    let current = usize::try_from(info.cur_match_num).ok();
    for (i, span) in info.matches.iter().enumerate() {
        let marker = if current == Some(i) { '>' } else { ' ' };
        let line = buffer.line(span.from.line).unwrap_or_default();
        println!("{} {:>8}  {}", marker, span.from.to_string(), line.trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["padsearch", "main.dart", "foo"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_saved_defaults_apply_without_flags() {
        let saved = CompileOptions::new(true, true, true);
        assert_eq!(parse(&[]).compile_options(saved), saved);
    }

    #[test]
    fn test_no_flags_switch_saved_defaults_off() {
        let saved = CompileOptions::new(true, true, true);
        let cli = parse(&["--no-match-case", "--no-whole-word", "--no-regex"]);
        assert_eq!(cli.compile_options(saved), CompileOptions::default());
    }

    #[test]
    fn test_flags_switch_defaults_on() {
        let cli = parse(&["--match-case", "--regex"]);
        assert_eq!(
            cli.compile_options(CompileOptions::default()),
            CompileOptions::new(true, false, true)
        );
    }

    #[test]
    fn test_last_of_a_flag_pair_wins() {
        let cli = parse(&["--match-case", "--no-match-case"]);
        assert!(!cli.compile_options(CompileOptions::new(true, false, false)).match_case);

        let cli = parse(&["--no-regex", "--regex"]);
        assert!(cli.compile_options(CompileOptions::default()).regex_mode);
    }

    #[test]
    fn test_replace_flags_require_replacement() {
        assert!(Cli::try_parse_from(["padsearch", "a.dart", "foo", "--all"]).is_err());
        assert!(Cli::try_parse_from(["padsearch", "a.dart", "foo", "--write"]).is_err());
    }
}
