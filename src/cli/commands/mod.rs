use anyhow::{ anyhow, Result };
use log::info;
use serde::Serialize;

use crate::{
    Clock,
    EstateConfig,
    JsonFileStore,
    JsonLinesEventSink,
    LogEventSink,
    PrincipalId,
    PropertyRegistry,
    Timestamp,
};

use crate::cli::CliRegistry;
use crate::models::OutputFormat;

pub mod property;
pub mod will;
pub mod succession;
pub mod events;

/// Everything a command needs from the host
pub struct CommandContext {
    pub registry: CliRegistry,
    pub caller: Option<PrincipalId>,
    pub format: OutputFormat,
    pub journal: Option<JsonLinesEventSink>,
}

impl CommandContext {
    /// Open the file-backed registry described by `config`, journaling events
    /// when an event log is configured
    pub fn open(
        config: &EstateConfig,
        clock: Box<dyn Clock>,
        caller: Option<PrincipalId>,
        format: OutputFormat
    ) -> Result<Self> {
        let journal = config.event_log_path.as_ref().map(|path| JsonLinesEventSink::new(path.clone()));
        let registry: CliRegistry = PropertyRegistry::open_with_options(
            JsonFileStore::open(&config.state_path)?,
            clock,
            (LogEventSink, journal.clone()),
            config.registry_options()
        )?;
        info!("Registry state at {}", config.state_path.display());

        Ok(CommandContext { registry, caller, format, journal })
    }

    /// The authenticated caller, required by every mutating command
    pub fn caller(&self) -> Result<&PrincipalId> {
        self.caller.as_ref().ok_or_else(|| anyhow!("this command needs --caller <principal>"))
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print `value` as JSON
    pub fn emit_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

pub fn parse_timestamp(input: &str) -> Result<Timestamp> {
    Timestamp::parse(input).map_err(|e| anyhow!(e))
}
