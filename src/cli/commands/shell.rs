use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tracing::trace;

use crate::cli::{Cli, Commands};

use super::{course_command, init_database, student_command};

/// Runs the regular CLI commands in a read-eval loop so repeated admin
/// work skips the process startup. Lines are parsed exactly like the
/// command line, minus the leading binary name.
pub async fn shell(database_url: &str) -> Result<()> {
    trace!("Entering shell function");

    println!("Gatevas interactive shell on {}", database_url);
    println!("Type a command like 'student list', 'help' for an overview or 'exit' to leave.");

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("gatevas> ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            // EOF ends the session like 'exit'
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        let args = std::iter::once("gatevas").chain(input.split_whitespace());
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) => {
                // clap renders its own usage and help output
                let _ = e.print();
                continue;
            }
        };

        // The session database wins over per-line flags so every command
        // in the loop talks to the same database.
        let result = match cli.command {
            Commands::InitDb { .. } => init_database(database_url).await,
            Commands::Student { command, .. } => student_command(command, database_url).await,
            Commands::Course { command, .. } => course_command(command, database_url).await,
            Commands::Shell { .. } => {
                println!("Already in an interactive session.");
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("Error: {e:#}");
        }
    }

    Ok(())
}
