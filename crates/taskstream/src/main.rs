//! CLI entry point for taskstream.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod view;

/// Local task tracking with a simulated sign-in flow.
#[derive(Parser, Debug)]
#[command(
    name = "taskstream",
    version,
    about = "taskstream: tasks, filters, and a mock sign-in, stored locally"
)]
struct Cli {
    /// Directory holding tasks, session, and config (defaults to the user data dir).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        assign: Option<String>,
        #[arg(short = 's', long = "share")]
        shared: Vec<String>,
    },

    /// List tasks, optionally searched and filtered.
    Ls {
        #[arg(long, default_value = "")]
        search: String,
        /// One of: all, today, overdue, pending, in-progress, completed.
        #[arg(long, default_value = "all")]
        filter: String,
    },

    /// Edit fields of an existing task; empty strings clear optional fields.
    Edit {
        #[arg(long)]
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Due date as YYYY-MM-DD; an empty string clears it.
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        assign: Option<String>,
        #[arg(long = "share")]
        shared: Option<Vec<String>>,
    },

    /// Mark a task completed.
    Done {
        #[arg(long)]
        task: String,
    },

    /// Delete a task; unknown ids are ignored.
    Rm {
        #[arg(long)]
        task: String,
    },

    /// Show board statistics.
    Stats,

    /// Seed the board with the demonstration tasks.
    Seed,

    /// Sign in with an email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign in through a simulated social provider (google or github).
    LoginWith {
        #[arg(long)]
        provider: String,
    },

    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Sign out and clear the stored session.
    Logout,

    /// Show the signed-in user.
    Whoami,
}

fn main() -> Result<()> {
    let Cli { data_dir, cmd } = Cli::parse();
    install_tracing();

    let data_dir = resolve_data_dir(data_dir)?;
    commands::run(&data_dir, cmd)
}

fn resolve_data_dir(arg: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = arg {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|base| base.join("taskstream"))
        .ok_or_else(|| anyhow!("could not determine a data directory; pass --data-dir"))
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "taskstream",
            "--data-dir",
            "/tmp/ts",
            "add",
            "--title",
            "Write spec",
            "--priority",
            "high",
            "--share",
            "jane@example.com",
        ]);

        assert_eq!(cli.data_dir.as_deref(), Some(std::path::Path::new("/tmp/ts")));
        match cli.cmd {
            Command::Add {
                title,
                priority,
                shared,
                ..
            } => {
                assert_eq!(title, "Write spec");
                assert_eq!(priority.as_deref(), Some("high"));
                assert_eq!(shared, vec!["jane@example.com"]);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_ls_defaults() {
        let cli = Cli::parse_from(["taskstream", "ls"]);
        match cli.cmd {
            Command::Ls { search, filter } => {
                assert_eq!(search, "");
                assert_eq!(filter, "all");
            }
            _ => panic!("expected ls command"),
        }
    }

    #[test]
    fn parse_login_command() {
        let cli = Cli::parse_from([
            "taskstream",
            "login",
            "--email",
            "john@example.com",
            "--password",
            "password",
        ]);
        match cli.cmd {
            Command::Login { email, password } => {
                assert_eq!(email, "john@example.com");
                assert_eq!(password, "password");
            }
            _ => panic!("expected login command"),
        }
    }

    #[test]
    fn parse_edit_share_list() {
        let cli = Cli::parse_from([
            "taskstream",
            "edit",
            "--task",
            "019a6ff3-119f-7661-869e-2a6c4fca5c4f",
            "--share",
            "a@example.com",
            "--share",
            "b@example.com",
        ]);
        match cli.cmd {
            Command::Edit { shared, .. } => {
                assert_eq!(
                    shared,
                    Some(vec!["a@example.com".to_owned(), "b@example.com".to_owned()])
                );
            }
            _ => panic!("expected edit command"),
        }
    }
}
