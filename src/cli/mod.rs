//! CLI module - Command-line interface for filmclub
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// filmclub - Family movie club tracker
/// Weekly movie ratings, watch history and a monthly diary
#[derive(Parser)]
#[command(name = "filmclub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// List movies with their average rating
    #[command(alias = "ls", alias = "l")]
    List {
        /// Only movies with this status (weekly, seen, ...)
        #[arg(long)]
        status: Option<String>,
    },

    /// Search TMDB for a movie
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Manage family members
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },
}

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a member if not already present
    Add {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// List members by name
    #[command(alias = "ls")]
    List,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["filmclub"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_web_alias() {
        let cli = Cli::try_parse_from(["filmclub", "web"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn test_list_status_flag() {
        let cli = Cli::try_parse_from(["filmclub", "list", "--status", "seen"]).unwrap();
        match cli.command {
            Some(Commands::List { status }) => assert_eq!(status.as_deref(), Some("seen")),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_member_add_joins_words() {
        let cli = Cli::try_parse_from(["filmclub", "member", "add", "Tia", "Rosa"]).unwrap();
        match cli.command {
            Some(Commands::Member {
                command: MemberCommands::Add { name },
            }) => assert_eq!(name.join(" "), "Tia Rosa"),
            _ => panic!("expected member add"),
        }
    }
}
