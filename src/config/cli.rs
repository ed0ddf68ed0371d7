use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "tjkt-groups")]
#[command(about = "Class roster and group randomizer for X TJKT 2")]
pub struct CliConfig {
    #[arg(long, short, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Override the state file path")]
    pub state: Option<String>,

    #[arg(long, global = true, help = "Seed for reproducible draws")]
    pub seed: Option<u64>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Manage the class roster
    Roster {
        #[command(subcommand)]
        action: RosterCommand,
    },
    /// Show students who are not in a group yet
    Pool,
    /// Draw the next group
    Draw {
        #[arg(long, short, help = "Group size (defaults to the configured size)")]
        size: Option<usize>,

        #[arg(long, short, default_value = "", help = "Group name (defaults to \"Group N\")")]
        name: String,

        #[arg(long, help = "Skip the spinner animation")]
        no_spin: bool,
    },
    /// Inspect or remove committed groups
    Groups {
        #[command(subcommand)]
        action: GroupsCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum RosterCommand {
    List,
    Add {
        name: String,
        #[arg(long, default_value = "")]
        role: String,
    },
    Rename {
        id: String,
        name: String,
    },
    Remove {
        id: String,
    },
    /// Import students from a CSV file with a `name,role[,id]` header
    Import {
        file: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum GroupsCommand {
    List,
    Delete {
        id: String,
    },
    Clear,
    /// Write groups as CSV to a file, or stdout when no file is given
    Export {
        file: Option<String>,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(state) = &self.state {
            validation::validate_path("state", state)?;
        }

        match &self.command {
            Command::Draw {
                size: Some(size), ..
            } => validation::validate_positive_number("size", *size, 1),
            Command::Roster {
                action: RosterCommand::Import { file },
            } => validation::validate_file_extensions("file", std::slice::from_ref(file), &["csv"]),
            Command::Groups {
                action: GroupsCommand::Export { file: Some(file) },
            } => validation::validate_path("file", file),
            _ => Ok(()),
        }
    }
}
