//! Command-line interface for campusrecords.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, CoursesCommand, ServeCommand, StatusCommand, StudentsCommand};

use crate::logging::Verbosity;

/// campusrecords - Student and course records over the web
///
/// Serves pages for browsing students and courses, and for adding and
/// editing student records kept in JSON documents.
#[derive(Debug, Parser)]
#[command(name = "campusrecords")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the records and serve the web application
    Serve(ServeCommand),

    /// Show record counts and document paths
    Status(StatusCommand),

    /// List students
    Students(StudentsCommand),

    /// List courses
    Courses(CoursesCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "campusrecords");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(3, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(cli_with(2, true).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["campusrecords", "serve"]).unwrap();
        match cli.command {
            Command::Serve(cmd) => {
                assert!(cmd.host.is_none());
                assert!(cmd.port.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli =
            Cli::try_parse_from(["campusrecords", "serve", "--host", "127.0.0.1", "-p", "3000"])
                .unwrap();
        match cli.command {
            Command::Serve(cmd) => {
                assert_eq!(cmd.host.as_deref(), Some("127.0.0.1"));
                assert_eq!(cmd.port, Some(3000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_students_with_course() {
        let cli = Cli::try_parse_from(["campusrecords", "students", "--course", "3", "--json"])
            .unwrap();
        match cli.command {
            Command::Students(cmd) => {
                assert_eq!(cmd.course.as_deref(), Some("3"));
                assert!(cmd.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_short_c_after_students_is_config() {
        let cli = Cli::try_parse_from([
            "campusrecords",
            "students",
            "-c",
            "/custom/config.toml",
            "--course",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        match cli.command {
            Command::Students(cmd) => assert_eq!(cmd.course.as_deref(), Some("1")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["campusrecords", "config", "validate", "-f", "/tmp/c.toml"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["campusrecords", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["campusrecords", "-vv", "courses"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["campusrecords", "-q", "courses"]).unwrap();
        assert!(cli.quiet);
    }
}
