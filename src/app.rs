//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - dispatches to the TUI or the one-shot handlers
//! - prints reports/plots for the one-shot paths

use clap::Parser;

use crate::cli::{Command, RegionsArgs, ShowArgs};
use crate::data::CovidClient;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `covid` binary.
pub fn run() -> Result<(), AppError> {
    // We want `covid` and `covid -r WA` to behave like `covid tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(args),
        Command::Show(args) => handle_show(args),
        Command::Regions(args) => handle_regions(args),
    }
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let client = CovidClient::from_env();

    let output = match &args.region {
        Some(region) => pipeline::run_show(&client, region, args.metric, args.window)?,
        None => {
            // No region given: list what the feed knows and let the user pick.
            let index = client.fetch_regional()?;
            let choice = crate::cli::picker::prompt_for_region(&index.display_names())?;
            if pipeline::is_national(&choice) {
                pipeline::national_show(&client, args.metric, args.window)?
            } else {
                pipeline::regional_show(&index, &choice, args.metric, args.window)?
            }
        }
    };

    print!(
        "{}",
        crate::report::format_show_summary(&output.summary, args.metric, args.window)
    );

    if args.plot && !args.no_plot {
        println!();
        print!(
            "{}",
            crate::plot::render_ascii_chart(&output.series, &output.view, args.width, args.height)
        );
    }

    Ok(())
}

fn handle_regions(args: RegionsArgs) -> Result<(), AppError> {
    let client = CovidClient::from_env();
    let rows = pipeline::run_regions(&client, args.metric)?;

    print!(
        "{}",
        crate::report::format_region_table(&rows, args.metric, args.top)
    );
    Ok(())
}

/// Rewrite argv so `covid` defaults to `covid tui`.
///
/// Rules:
/// - `covid`                    -> `covid tui`
/// - `covid -r WA ...`          -> `covid tui -r WA ...`
/// - `covid --help/--version`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "show" | "regions");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(args: &[&str]) -> Vec<String> {
        rewrite_args(args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite(&["covid"]), vec!["covid", "tui"]);
    }

    #[test]
    fn leading_flags_route_to_tui() {
        assert_eq!(
            rewrite(&["covid", "-r", "WA"]),
            vec!["covid", "tui", "-r", "WA"]
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite(&["covid", "show", "-r", "WA"]),
            vec!["covid", "show", "-r", "WA"]
        );
        assert_eq!(rewrite(&["covid", "--help"]), vec!["covid", "--help"]);
    }
}
