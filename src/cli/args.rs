use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

use crate::cli::error::{CliError, Result};

/// Command-line options. Command words are collected as-is and validated
/// by the dispatcher.
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(name = "webcam-settings")]
#[command(about = "Save and restore webcam control settings", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Options {
    /// Name of the camera device to work with
    #[arg(short, long, visible_alias = "cam")]
    pub camera: Option<String>,

    /// Name of the file to work with
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Name of the property to increment or decrement
    #[arg(short, long)]
    pub property: Option<String>,

    /// Custom step, rounded up to a multiple of the property's step size
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..))]
    pub step: Option<i32>,

    /// Show this help text
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub help: bool,

    /// Command to run
    #[arg(value_name = "COMMAND")]
    pub commands: Vec<String>,
}

impl Options {
    /// Parse an argument list whose first element is the program name.
    pub fn parse_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|e| {
            // clap appends tips and a usage block; keep the error line only.
            let rendered = e.to_string();
            let message = rendered.lines().next().unwrap_or_default().trim();
            CliError::Argument(message.to_string())
        })
    }

    /// Option descriptions as rendered by clap.
    pub fn render_help() -> String {
        Self::command().render_help().to_string()
    }

    /// The camera option, or an argument error naming the command.
    pub fn require_camera(&self, command: &str) -> Result<&str> {
        self.camera
            .as_deref()
            .ok_or_else(|| CliError::Argument(format!("Command '{command}' requires --camera.")))
    }

    /// The property option, or an argument error naming the command.
    pub fn require_property(&self, command: &str) -> Result<&str> {
        self.property
            .as_deref()
            .ok_or_else(|| CliError::Argument(format!("Command '{command}' requires --property.")))
    }

    /// The file option, or an argument error naming the command.
    pub fn require_file(&self, command: &str) -> Result<&PathBuf> {
        self.file
            .as_ref()
            .ok_or_else(|| CliError::Argument(format!("Command '{command}' requires --file.")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options> {
        Options::parse_from_args(std::iter::once("webcam-settings").chain(args.iter().copied()))
    }

    #[test]
    fn short_and_long_options() {
        let options = parse(&["-f", "theFileName.txt"]).unwrap();
        assert_eq!(options.file, Some(PathBuf::from("theFileName.txt")));
        assert_eq!(options.camera, None);
        assert!(!options.help);

        let options = parse(&["--file", "other.txt", "--camera", "Cam"]).unwrap();
        assert_eq!(options.file, Some(PathBuf::from("other.txt")));
        assert_eq!(options.camera.as_deref(), Some("Cam"));
    }

    #[test]
    fn cam_alias_and_help_flag() {
        let options = parse(&["-h", "--cam", "theThirdCamName"]).unwrap();
        assert_eq!(options.camera.as_deref(), Some("theThirdCamName"));
        assert!(options.help);
        assert!(options.commands.is_empty());
    }

    #[test]
    fn commands_are_collected_around_options() {
        let options = parse(&["-c", "aCamName", "command1", "-f", "aFileName", "command2"]).unwrap();
        assert_eq!(options.commands, vec!["command1", "command2"]);
        assert_eq!(options.camera.as_deref(), Some("aCamName"));
    }

    #[test]
    fn property_and_step_options() {
        let options = parse(&["increment", "-c", "A", "-p", "Zoom", "-s", "15"]).unwrap();
        assert_eq!(options.property.as_deref(), Some("Zoom"));
        assert_eq!(options.step, Some(15));
    }

    #[test]
    fn step_must_be_positive() {
        assert!(matches!(parse(&["-s", "0"]), Err(CliError::Argument(_))));
        assert!(matches!(parse(&["-s", "abc"]), Err(CliError::Argument(_))));
    }

    #[test]
    fn missing_option_value_is_argument_error() {
        assert!(matches!(parse(&["save", "-f"]), Err(CliError::Argument(_))));
    }

    #[test]
    fn unknown_option_is_single_line_argument_error() {
        let message = match parse(&["--bogus"]) {
            Err(CliError::Argument(message)) => message,
            other => panic!("expected argument error, got {other:?}"),
        };
        assert_eq!(message.lines().count(), 1);
        assert!(message.contains("--bogus"));
        assert!(!message.contains("Usage"));
    }

    #[test]
    fn require_helpers_name_the_command() {
        let options = Options::default();
        let err = options.require_file("save").unwrap_err();
        assert_eq!(err.to_string(), "Command 'save' requires --file.");
        assert!(options.require_camera("increment").is_err());
        assert!(options.require_property("increment").is_err());
    }

    #[test]
    fn help_text_lists_options() {
        let help = Options::render_help();
        assert!(help.contains("--camera"));
        assert!(help.contains("--file"));
        assert!(help.contains("--property"));
        assert!(help.contains("--step"));
    }
}
