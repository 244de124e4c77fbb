//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the agolapi binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{ListOptions, RunFilter};

/// Agola gateway API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "agolapi", about = "Agola gateway API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests and responses to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Gateway base URL.
    #[arg(
        long,
        global = true,
        env = "AGOLA_GATEWAY_URL",
        default_value = "http://localhost:8000"
    )]
    pub gateway_url: String,

    /// API token.
    #[arg(long, global = true, env = "AGOLA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

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

        /// The entity ID (or project path).
        id: String,
    },

    /// List entities with optional filtering and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        #[command(flatten)]
        owner: OwnerArgs,

        #[command(flatten)]
        page: PageArgs,

        /// Only runs in this phase (repeatable).
        #[arg(long = "phase")]
        phases: Vec<String>,

        /// Only runs in this group (repeatable).
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Only runs in this run group (repeatable).
        #[arg(long = "run-group")]
        run_groups: Vec<String>,
    },

    /// Create an entity.
    Create {
        /// The type of entity to create.
        entity: Entity,

        /// Name of the new entity (for linked accounts: the user name).
        name: String,

        #[command(flatten)]
        owner: OwnerArgs,

        #[command(flatten)]
        args: CreateArgs,
    },

    /// Delete an entity.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// Name of the entity (for linked accounts: the user name).
        name: String,

        #[command(flatten)]
        owner: OwnerArgs,

        /// Linked account ID (linked accounts only).
        #[arg(long)]
        id: Option<String>,
    },

    /// Reconfigure a project.
    Reconfig {
        /// Project name or path.
        project: String,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A project.
    #[value(alias = "projects")]
    Project,
    /// A user.
    #[value(alias = "users")]
    User,
    /// A CI run.
    #[value(alias = "runs")]
    Run,
    /// A remote git hosting service.
    #[value(aliases = ["remote-sources", "remotesource", "remotesources"])]
    RemoteSource,
    /// An organization.
    #[value(alias = "orgs")]
    Org,
    /// A user API token.
    #[value(alias = "tokens")]
    Token,
    /// An account linked to a user.
    #[value(alias = "linked-accounts")]
    LinkedAccount,
}

/// Owner selection for project commands. Neither flag means the current user.
#[derive(Args, Debug, Clone, Default)]
pub struct OwnerArgs {
    /// Act on projects of this user (also the target user for tokens).
    #[arg(long, conflicts_with = "org")]
    pub user: Option<String>,

    /// Act on projects of this organization.
    #[arg(long)]
    pub org: Option<String>,
}

/// Resolved owner of a project command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    CurrentUser,
    User(String),
    Org(String),
}

impl OwnerArgs {
    /// Resolve the flags into an owner.
    pub fn owner(&self) -> Owner {
        match (&self.user, &self.org) {
            (_, Some(org)) => Owner::Org(org.clone()),
            (Some(user), None) => Owner::User(user.clone()),
            (None, None) => Owner::CurrentUser,
        }
    }
}

/// Pagination flags.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Cursor to start listing from.
    #[arg(long, default_value = "")]
    pub start: String,

    /// Maximum number of items (0 for server default).
    #[arg(long, default_value_t = 0)]
    pub limit: i64,

    /// Sort ascending.
    #[arg(long)]
    pub asc: bool,
}

impl PageArgs {
    /// Convert into list options.
    pub fn list_options(&self) -> ListOptions {
        ListOptions::new(self.start.clone(), self.limit, self.asc)
    }
}

/// Build the run filter from repeated flags.
pub fn run_filter(phases: &[String], groups: &[String], run_groups: &[String]) -> RunFilter {
    RunFilter {
        phases: phases.to_vec(),
        groups: groups.to_vec(),
        run_groups: run_groups.to_vec(),
    }
}

/// Flags used by `create`.
#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Remote source name (projects, linked accounts).
    #[arg(long)]
    pub remote_source: Option<String>,

    /// Repository path on the remote source (projects).
    #[arg(long)]
    pub repo_path: Option<String>,

    /// Disable ssh host key checking (projects).
    #[arg(long)]
    pub skip_ssh_host_key_check: bool,

    /// Remote source type, e.g. gitea (remote sources).
    #[arg(long = "type")]
    pub source_type: Option<String>,

    /// Remote source API URL (remote sources).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Remote source auth type: oauth2 or password (remote sources).
    #[arg(long)]
    pub auth_type: Option<String>,

    /// Skip TLS verification (remote sources).
    #[arg(long)]
    pub skip_verify: bool,

    /// OAuth2 client ID (remote sources).
    #[arg(long)]
    pub client_id: Option<String>,

    /// OAuth2 client secret (remote sources).
    #[arg(long)]
    pub client_secret: Option<String>,

    /// Login name on the remote source (linked accounts).
    #[arg(long)]
    pub login_name: Option<String>,

    /// Password on the remote source (linked accounts).
    #[arg(long)]
    pub password: Option<String>,
}
