//! Command-line interface definition

use clap::{Parser, Subcommand};

/// Chat-driven workspace client for atelier
#[derive(Debug, Parser)]
#[command(name = "atelier", version, about)]
pub struct Args {
    /// Backend API base URL
    #[arg(long, env = "ATELIER_API", global = true)]
    pub api: Option<String>,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and store its token
    Login {
        /// Username to register
        username: String,
    },
    /// Show the authenticated user
    Whoami,
    /// List your chats
    Chats,
    /// List the available starter stacks
    Stacks,
    /// Create a new chat
    New {
        /// Chat name
        name: String,
        /// Stack id to seed the sandbox from
        #[arg(long)]
        stack: Option<i64>,
        /// Team id to create the chat under
        #[arg(long)]
        team: Option<i64>,
        /// Prompt to send as the first turn
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Open a chat session and talk to it interactively
    Open {
        /// Chat id
        chat_id: i64,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        let args = Args::parse_from(["atelier", "login", "ada"]);
        assert!(matches!(args.command, Command::Login { username } if username == "ada"));
        assert!(args.api.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_parse_open_with_global_flags() {
        let args = Args::parse_from([
            "atelier",
            "open",
            "42",
            "--api",
            "http://localhost:9000",
            "--verbose",
        ]);
        assert!(matches!(args.command, Command::Open { chat_id: 42 }));
        assert_eq!(args.api.as_deref(), Some("http://localhost:9000"));
        assert!(args.verbose);
    }

    #[test]
    fn test_parse_new_with_options() {
        let args = Args::parse_from([
            "atelier", "new", "pong", "--stack", "2", "--prompt", "make pong",
        ]);
        match args.command {
            Command::New {
                name,
                stack,
                team,
                prompt,
            } => {
                assert_eq!(name, "pong");
                assert_eq!(stack, Some(2));
                assert_eq!(team, None);
                assert_eq!(prompt.as_deref(), Some("make pong"));
            }
            other => panic!("Expected New, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric_chat_id() {
        assert!(Args::try_parse_from(["atelier", "open", "pong"]).is_err());
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(Args::try_parse_from(["atelier"]).is_err());
    }
}
