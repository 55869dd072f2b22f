//! IT Org CLI - command-line front end for the IT Org portal.
//!
//! # Usage
//!
//! ```bash
//! # Check the backend
//! itorg health
//!
//! # Log in (the token is stored in ITORG_SESSION_FILE)
//! itorg login -e ops@example.com
//!
//! # Manage resources
//! itorg projects create --name "Laptop refresh" --description "Replace 2019 fleet"
//! itorg projects set-status 1 active
//! itorg tickets list
//! itorg assets create --type monitor --make-model "Dell U2720Q" --serial CN0123
//!
//! # Log out
//! itorg logout
//! ```
//!
//! # Environment Variables
//!
//! - `ITORG_API_BASE` - API endpoint (default: `http://127.0.0.1:8000`)
//! - `ITORG_SESSION_FILE` - Session token file
//! - `ITORG_API_TIMEOUT_SECS` - Per-request deadline
//! - `ITORG_LOG_FORMAT` - Set to `json` for structured logs
//! - `RUST_LOG` - Log filter (default: `itorg=info,itorg_client=warn`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use itorg_client::{ApiClient, ClientConfig, SessionStore};
use itorg_core::{
    Asset, AssetDraft, AssetId, AssetStatus, AssetType, Project, ProjectDraft, ProjectId,
    ProjectStatus, ResourceKind, Ticket, TicketDraft, TicketId, TicketPriority, TicketStatus,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::CommandError;
use commands::resources::Operation;

#[derive(Parser)]
#[command(name = "itorg")]
#[command(author, version, about = "IT Org portal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show backend health
    Health,
    /// Log in with an email address
    Login {
        /// Email address to log in as
        #[arg(short, long)]
        email: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show whether a session token is stored
    Whoami,
    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Manage helpdesk tickets
    Tickets {
        #[command(subcommand)]
        action: TicketAction,
    },
    /// Manage hardware and VM assets
    Assets {
        #[command(subcommand)]
        action: AssetAction,
    },
    /// Describe the fields of a resource kind
    Schema {
        /// `projects`, `tickets` or `assets`
        kind: ResourceKind,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List projects
    List,
    /// Create a project
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// `planned`, `active` or `done`
        #[arg(long, default_value_t)]
        status: ProjectStatus,
    },
    /// Change a project's status
    SetStatus { id: ProjectId, status: ProjectStatus },
    /// Delete a project
    Delete { id: ProjectId },
}

#[derive(Subcommand)]
enum TicketAction {
    /// List tickets
    List,
    /// Open a ticket
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// `low`, `medium` or `high`
        #[arg(long, default_value_t)]
        priority: TicketPriority,
        /// `open`, `in-progress` or `resolved`
        #[arg(long, default_value_t)]
        status: TicketStatus,
        #[arg(long, default_value = "")]
        requester_email: String,
    },
    /// Change a ticket's status
    SetStatus { id: TicketId, status: TicketStatus },
    /// Delete a ticket
    Delete { id: TicketId },
}

#[derive(Subcommand)]
enum AssetAction {
    /// List assets
    List,
    /// Register an asset
    Create {
        /// `laptop`, `monitor` or `vm`
        #[arg(long = "type", default_value_t)]
        kind: AssetType,
        #[arg(long, default_value = "")]
        make_model: String,
        #[arg(long, default_value = "")]
        serial: String,
        #[arg(long, default_value = "")]
        assigned_to: String,
        /// `stock`, `in-use` or `retired`
        #[arg(long, default_value_t)]
        status: AssetStatus,
    },
    /// Change an asset's status
    SetStatus { id: AssetId, status: AssetStatus },
    /// Delete an asset
    Delete { id: AssetId },
}

impl From<ProjectAction> for Operation<Project> {
    fn from(action: ProjectAction) -> Self {
        match action {
            ProjectAction::List => Self::List,
            ProjectAction::Create {
                name,
                description,
                status,
            } => Self::Create(ProjectDraft {
                name,
                description,
                status,
            }),
            ProjectAction::SetStatus { id, status } => Self::SetStatus(id, status),
            ProjectAction::Delete { id } => Self::Delete(id),
        }
    }
}

impl From<TicketAction> for Operation<Ticket> {
    fn from(action: TicketAction) -> Self {
        match action {
            TicketAction::List => Self::List,
            TicketAction::Create {
                title,
                description,
                priority,
                status,
                requester_email,
            } => Self::Create(TicketDraft {
                title,
                description,
                priority,
                status,
                requester_email,
            }),
            TicketAction::SetStatus { id, status } => Self::SetStatus(id, status),
            TicketAction::Delete { id } => Self::Delete(id),
        }
    }
}

impl From<AssetAction> for Operation<Asset> {
    fn from(action: AssetAction) -> Self {
        match action {
            AssetAction::List => Self::List,
            AssetAction::Create {
                kind,
                make_model,
                serial,
                assigned_to,
                status,
            } => Self::Create(AssetDraft {
                kind,
                make_model,
                serial,
                assigned_to,
                status,
            }),
            AssetAction::SetStatus { id, status } => Self::SetStatus(id, status),
            AssetAction::Delete { id } => Self::Delete(id),
        }
    }
}

/// Initialize tracing on stderr so command output on stdout stays clean.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "itorg=info,itorg_client=warn".into());

    let is_json = std::env::var("ITORG_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Commands::Schema { kind } = cli.command {
        render::schema(&mut out, kind)?;
        return Ok(());
    }

    let config = ClientConfig::from_env().map_err(itorg_client::ClientError::from)?;
    let session = Arc::new(SessionStore::open_file(&config.session_file)?);
    let api = ApiClient::new(&config, session)?;

    match cli.command {
        Commands::Health => commands::session::health(&api, &mut out).await?,
        Commands::Login { email } => commands::session::login(&api, &email, &mut out).await?,
        Commands::Logout => commands::session::logout(&api, &mut out).await?,
        Commands::Whoami => commands::session::whoami(&api, &mut out).await?,
        Commands::Projects { action } => {
            commands::resources::run::<Project>(api, action.into(), &mut out).await?;
        }
        Commands::Tickets { action } => {
            commands::resources::run::<Ticket>(api, action.into(), &mut out).await?;
        }
        Commands::Assets { action } => {
            commands::resources::run::<Asset>(api, action.into(), &mut out).await?;
        }
        Commands::Schema { .. } => {}
    }

    out.flush()?;
    Ok(())
}
