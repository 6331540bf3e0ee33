//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the vantage binary.

use clap::{Parser, Subcommand, ValueEnum};

/// Vantage API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "vantage", about = "Vantage API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of formatted text.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: String,
    },

    /// Search entities with optional filter conditions.
    Search {
        /// The type of entity to search.
        entity: Entity,

        /// Filter conditions as key=value pairs, matched as CONTAINS.
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Search the trash instead of live entities.
        #[arg(long)]
        deleted: bool,
    },

    /// Delete an entity by ID.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// The entity ID.
        id: String,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// An alert.
    #[value(alias = "alerts")]
    Alert,
    /// A dashboard.
    #[value(alias = "dashboards")]
    Dashboard,
    /// An event.
    #[value(alias = "events")]
    Event,
    /// A user account.
    #[value(alias = "users")]
    User,
    /// A notification target.
    #[value(alias = "targets")]
    Target,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search_with_filters() {
        let cli = Cli::try_parse_from([
            "vantage", "search", "alerts", "--filter", "tags=prod", "--deleted",
        ])
        .unwrap();
        match cli.command {
            Command::Search {
                entity,
                filters,
                deleted,
            } => {
                assert_eq!(entity, Entity::Alert);
                assert_eq!(filters, vec!["tags=prod".to_string()]);
                assert!(deleted);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
