//! `campusrecords` - CLI and web server for campus records
//!
//! Loads configuration, then either serves the web application or answers a
//! one-shot query against the record documents.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use campusrecords::cli::{Cli, Command, ConfigCommand, ServeCommand, StudentsCommand};
use campusrecords::{init_logging, web, Config, Course, DataStore, Student};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, serve_cmd).await,
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json).await,
        Command::Students(students_cmd) => handle_students(&config, students_cmd).await,
        Command::Courses(courses_cmd) => handle_courses(&config, courses_cmd.json).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    let store = match DataStore::open(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("Unable to start server: {e}");
            return Err(e.into());
        }
    };

    web::serve(&config, Arc::new(store)).await?;
    Ok(())
}

async fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = DataStore::open(config).await?;
    let stats = store.stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("campusrecords status");
        println!("--------------------");
        println!("Students:      {}", stats.total_students);
        println!("Courses:       {}", stats.total_courses);
        println!("Student file:  {}", stats.students_path.display());
        println!("Course file:   {}", stats.courses_path.display());
        println!("Loaded at:     {}", stats.loaded_at.to_rfc3339());
    }
    Ok(())
}

async fn handle_students(config: &Config, cmd: StudentsCommand) -> anyhow::Result<()> {
    let store = DataStore::open(config).await?;
    let result = match cmd.course.filter(|c| !c.is_empty()) {
        Some(course) => store.get_students_by_course(course).await,
        None => store.get_all_students().await,
    };

    let students = match result {
        Ok(students) => students,
        Err(e) if e.is_no_results() => {
            println!("no results");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&students)?);
    } else {
        for student in &students {
            print_student(student);
        }
    }
    Ok(())
}

async fn handle_courses(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = DataStore::open(config).await?;
    let courses = match store.get_courses().await {
        Ok(courses) => courses,
        Err(e) if e.is_no_results() => {
            println!("no results");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
    } else {
        for course in &courses {
            print_course(course);
        }
    }
    Ok(())
}

fn print_student(student: &Student) {
    println!(
        "{:>4}  {:<24} {:<28} course {:<4} {}",
        student.student_num,
        student.full_name(),
        student.email,
        student.course,
        if student.ta { "TA" } else { "" }
    );
}

fn print_course(course: &Course) {
    println!(
        "{:>4}  {:<8} {}",
        course.course_id, course.course_code, course.course_name
    );
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!(
                    "  Static dir:         {}",
                    config.server.static_dir.display()
                );
                println!();
                println!("[Data]");
                println!("  Students:           {}", config.students_path().display());
                println!("  Courses:            {}", config.courses_path().display());
                println!("  Atomic writes:      {}", config.data.atomic_writes);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
