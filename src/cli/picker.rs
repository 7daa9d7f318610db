//! Interactive region picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `covid show` and choose a region" UX
//!
//! Choices come from the fetched region index, so the picker never offers a
//! region the feed does not know about.

use std::io::{self, Write};

use crate::error::AppError;

/// Prompt the user to select a region from the display list.
///
/// Behavior:
/// - list the choices (synthetic all-regions entry first, rest sorted)
/// - accept either a number (from the list) or a region code
/// - `q` cancels
pub fn prompt_for_region(choices: &[String]) -> Result<String, AppError> {
    if choices.is_empty() {
        return Err(AppError::usage(
            "No regions available. Pass one with `covid show -r <code>`.",
        ));
    }

    println!("Found {} region(s):", choices.len());
    for (idx, name) in choices.iter().enumerate() {
        println!("{:>3}) {name}", idx + 1);
    }

    loop {
        print!(
            "Select a region by number (1-{}) or type a code (q to quit): ",
            choices.len()
        );
        io::stdout()
            .flush()
            .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::usage(
                "No input received. Pass a region with `covid show -r <code>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::usage("Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=choices.len()).contains(&choice) {
                return Ok(choices[choice - 1].clone());
            }
            println!(
                "Invalid choice: {choice}. Enter a number between 1 and {}.",
                choices.len()
            );
            continue;
        }

        match resolve_region(choices, input) {
            Some(name) => return Ok(name),
            None => {
                println!("Unknown region: {input}. Enter a listed code or number.");
                continue;
            }
        }
    }
}

/// Match typed input against the display list, case-insensitively.
fn resolve_region(choices: &[String], input: &str) -> Option<String> {
    choices
        .iter()
        .find(|name| name.eq_ignore_ascii_case(input))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_region_is_case_insensitive() {
        let choices = vec![
            "All (Nationwide)".to_string(),
            "NY".to_string(),
            "WA".to_string(),
        ];
        assert_eq!(resolve_region(&choices, "wa"), Some("WA".to_string()));
        assert_eq!(
            resolve_region(&choices, "all (nationwide)"),
            Some("All (Nationwide)".to_string())
        );
        assert_eq!(resolve_region(&choices, "ZZ"), None);
    }
}
