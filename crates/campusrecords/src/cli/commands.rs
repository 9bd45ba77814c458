//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind (overrides configuration)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides configuration)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Student listing arguments.
#[derive(Debug, Args)]
pub struct StudentsCommand {
    /// Only students enrolled in this course id
    #[arg(long, value_name = "ID")]
    pub course: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Course listing arguments.
#[derive(Debug, Args)]
pub struct CoursesCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_command_debug() {
        let cmd = ServeCommand {
            host: None,
            port: Some(3000),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("port"));
        assert!(debug_str.contains("3000"));
    }

    #[test]
    fn test_students_command_debug() {
        let cmd = StudentsCommand {
            course: Some("3".to_string()),
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("course"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
