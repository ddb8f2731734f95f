mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use billwatch_client::ClientError;
use clap::{Parser, error::ErrorKind};
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "Billwatch - recurring payment watcher

Usage:
  billwatch <command>

Start here:
  billwatch import --help
  billwatch import --dry-run <path>
  billwatch recurring
";

const TOP_LEVEL_HELP: &str = "Billwatch — recurring payment watcher

USAGE: billwatch <command>

Import your transactions:
  1. billwatch import --help                 Read import schema and workflow details
  2. billwatch import --dry-run <path>       Safely validate import without data writes
  3. billwatch import <path>                 Import transactions

See what charges keep coming back:
  billwatch recurring                        Detect recurring payments
  billwatch recurring --as-of 2026-04-15     Detect against a fixed clock
  billwatch recurring --json                 Emit machine-readable output

Having issues or errors?
  Run `billwatch import --help` for import workflow guidance,
  or `billwatch <command> --help` for command usage.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                if is_top_level_help_request(&raw_args) {
                    if write_stdout_text(TOP_LEVEL_HELP).is_err() {
                        return Err(ExitCode::from(2));
                    }
                } else if write_stdout_text(&err.to_string()).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }

            let command_hint = command_path_from_args(&raw_args);
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so our "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Builds the subcommand path from raw CLI args for use in help hints.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let first_non_flag = raw_args
        .iter()
        .skip(1)
        .find(|value| !value.starts_with('-'))?;

    match first_non_flag.as_str() {
        "import" => Some("import".to_string()),
        "recurring" => Some("recurring".to_string()),
        _ => None,
    }
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
        || matches!(
            error.code.as_str(),
            "ledger_init_permission_denied"
                | "ledger_locked"
                | "ledger_corrupt"
                | "migration_failed"
                | "ledger_init_failed"
        )
}

#[cfg(test)]
mod tests {
    use billwatch_client::ClientError;

    use super::{
        command_path_from_args, infer_requested_output_mode, is_internal_error,
        is_top_level_help_request, strip_clap_boilerplate,
    };

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn top_level_help_only_matches_bare_help_flags() {
        assert!(is_top_level_help_request(&args(&["billwatch", "--help"])));
        assert!(is_top_level_help_request(&args(&["billwatch", "-h"])));
        assert!(!is_top_level_help_request(&args(&[
            "billwatch", "import", "--help"
        ])));
    }

    #[test]
    fn clap_boilerplate_is_stripped_from_parse_errors() {
        let message = "error: invalid value\n\nUsage: billwatch recurring [OPTIONS]\n";
        assert_eq!(strip_clap_boilerplate(message), "error: invalid value");
    }

    #[test]
    fn command_hints_only_cover_known_commands() {
        assert_eq!(
            command_path_from_args(&args(&["billwatch", "import", "--bogus"])),
            Some("import".to_string())
        );
        assert_eq!(
            command_path_from_args(&args(&["billwatch", "recurring", "--as-of", "x"])),
            Some("recurring".to_string())
        );
        assert_eq!(command_path_from_args(&args(&["billwatch", "guide"])), None);
    }

    #[test]
    fn json_flag_anywhere_selects_json_failure_output() {
        let mode = infer_requested_output_mode(&args(&["billwatch", "recurring", "--json"]));
        assert_eq!(mode, super::output::OutputMode::Json);

        let text = infer_requested_output_mode(&args(&["billwatch", "recurring"]));
        assert_eq!(text, super::output::OutputMode::Text);
    }

    #[test]
    fn ledger_failures_map_to_internal_exit_code() {
        let locked = ClientError::new("ledger_locked", "locked", Vec::new());
        assert!(is_internal_error(&locked));

        let invalid = ClientError::invalid_argument("bad");
        assert!(!is_internal_error(&invalid));
    }
}
