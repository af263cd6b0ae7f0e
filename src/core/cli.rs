//! Command line arguments for the application

use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

/// command line arguments for loading documents and running scripts
#[derive(Parser, Debug, Clone, Default, Resource)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// path to a sketch document to open instead of a new one
    #[arg(long = "load")]
    pub load: Option<PathBuf>,

    /// run the editing commands in this file
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// write the document here when done
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// settings file with undo depth and key bindings
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// print every tool with its name and group, then exit
    #[arg(long, default_value_t = false)]
    pub list_tools: bool,

    /// display debug information
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl CliArgs {
    /// Checks that the files we read exist before anything starts.
    pub fn validate(&self) -> Result<(), String> {
        for (flag, path) in [
            ("--load", &self.load),
            ("--script", &self.script),
            ("--settings", &self.settings),
        ] {
            if let Some(path) = path {
                if !path.is_file() {
                    return Err(format!("{flag}: {} is not a file", path.display()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "sketchwright",
            "--script",
            "demo.sws",
            "--save",
            "out.json",
            "--debug",
        ]);
        assert_eq!(args.script, Some(PathBuf::from("demo.sws")));
        assert_eq!(args.save, Some(PathBuf::from("out.json")));
        assert!(args.debug);
        assert!(!args.list_tools);
    }

    #[test]
    fn test_missing_input_file_is_rejected() {
        let args = CliArgs {
            load: Some(PathBuf::from("does/not/exist.json")),
            ..Default::default()
        };
        let err = args.validate().unwrap_err();
        assert!(err.starts_with("--load"));
        assert!(CliArgs::default().validate().is_ok());
    }
}
