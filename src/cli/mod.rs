use anyhow::{ anyhow, Context, Result };
use clap::{ Parser, Subcommand };
use log::info;
use std::path::PathBuf;

use crate::models::OutputFormat;
use crate::{
    Clock,
    EstateConfig,
    JsonFileStore,
    JsonLinesEventSink,
    LogEventSink,
    ManualClock,
    PrincipalId,
    PropertyRegistry,
    SystemClock,
    Timestamp,
};

pub mod commands;
pub mod ui;

/// Registry as hosted by the command line: file-backed, logging every event
/// and optionally journaling it.
pub type CliRegistry = PropertyRegistry<
    JsonFileStore,
    Box<dyn Clock>,
    (LogEventSink, Option<JsonLinesEventSink>)
>;

#[derive(Parser)]
#[command(
    name = "estate",
    about = "A registry of ownable, time-bounded property records",
    version,
    author,
    long_about = None
)]
pub struct EstateCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file, overriding the configuration
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Principal invoking the operation
    #[arg(long, global = true)]
    pub caller: Option<PrincipalId>,

    /// Current time as epoch seconds or RFC 3339 (defaults to the system clock)
    #[arg(long, global = true)]
    pub now: Option<String>,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub output_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl EstateCli {
    /// Configuration file, then `ESTATE_*` overrides from `lookup`, then `--state`
    pub fn resolve_config<F>(&self, lookup: F) -> Result<EstateConfig>
        where F: Fn(&str) -> Option<String>
    {
        let mut config = EstateConfig::load_with(self.config.as_deref(), lookup).context(
            "Failed to load configuration"
        )?;
        if let Some(state) = &self.state {
            config.state_path = state.clone();
        }
        Ok(config)
    }

    /// A clock frozen at `--now`, or the system clock
    pub fn clock(&self) -> Result<Box<dyn Clock>> {
        match &self.now {
            Some(now) => {
                let now = Timestamp::parse(now).map_err(|e| anyhow!(e))?;
                info!("Using fixed time {}", now);
                Ok(Box::new(ManualClock::at(now)))
            }
            None => Ok(Box::new(SystemClock)),
        }
    }

    pub fn format(&self) -> Result<OutputFormat> {
        self.output_format.parse().map_err(|e: String| anyhow!(e))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new property owned by the caller
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        kind: String,

        #[arg(long, default_value_t = 0)]
        price: u128,

        #[arg(long, default_value_t = 0)]
        value: u128,

        #[arg(long, default_value = "")]
        location: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Expiry as epoch seconds or RFC 3339
        #[arg(long)]
        expiry: String,

        /// Principal that receives the property on succession
        #[arg(long)]
        beneficiary: PrincipalId,
    },

    /// Show a property
    Show { id: u64 },

    /// Show only the value of a property
    Value { id: u64 },

    /// List live properties
    List {
        /// Only properties owned by this principal
        #[arg(long)]
        owner: Option<PrincipalId>,
    },

    /// Transfer a property to another principal
    Transfer { id: u64, to: PrincipalId },

    /// Clear a property whose expiry has passed
    Expire { id: u64 },

    /// Clear a property regardless of expiry
    Delete {
        id: u64,

        /// Skip the confirmation prompt
        #[arg(short, long, default_value = "false")]
        yes: bool,
    },

    /// Manage will owners
    Will {
        #[command(subcommand)]
        action: WillAction,
    },

    /// Transfer a property to its beneficiary
    Bequeath { id: u64 },

    /// Transfer a lapsed property to its beneficiary (any caller)
    AutoTransfer { id: u64 },

    /// Show expiry and auto-transfer standing
    Status { id: u64 },

    /// Set a new expiry, which must lie in the future
    SetExpiry { id: u64, expiry: String },

    /// Stamp the last renewal time (defaults to now)
    Renew {
        id: u64,

        #[arg(long)]
        at: Option<String>,
    },

    /// Set beneficiary and expiry together
    SetBeneficiary { id: u64, beneficiary: PrincipalId, expiry: String },

    /// Set price and value
    SetPrice { id: u64, price: u128, value: u128 },

    SetLocation { id: u64, location: String },

    SetDescription { id: u64, description: String },

    SetKind { id: u64, kind: String },

    SetName { id: u64, name: String },

    /// Print the event journal
    Events {
        /// Only events for this property
        #[arg(long)]
        id: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum WillAction {
    /// Add a will owner (duplicates are kept)
    Add { id: u64, will_owner: PrincipalId },

    /// Remove one occurrence of a will owner
    Remove { id: u64, will_owner: PrincipalId },

    /// List will owners
    List { id: u64 },

    /// Check whether a principal is a will owner
    Check { id: u64, principal: PrincipalId },
}
