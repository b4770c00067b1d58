use std::fmt;
use std::str::FromStr;

use chrono::{ DateTime, SecondsFormat, Utc };
use serde::{ Deserialize, Serialize };

/// Number of seconds in one day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Identifier of a property record. Zero is never issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub u64);

impl PropertyId {
    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for PropertyId {
    fn from(value: u64) -> Self {
        PropertyId(value)
    }
}

/// Opaque identity of a caller, authenticated by the host.
///
/// The empty principal is the zero value: it is what an absent record reports
/// as its owner, and it never authorizes anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        PrincipalId(id.into())
    }

    /// The zero principal
    pub fn unset() -> Self {
        PrincipalId(String::new())
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            write!(f, "<none>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for PrincipalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("principal id cannot be empty".to_string());
        }
        Ok(PrincipalId(trimmed.to_string()))
    }
}

impl From<&str> for PrincipalId {
    fn from(value: &str) -> Self {
        PrincipalId::new(value)
    }
}

/// Absolute point in time, in whole seconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_secs(secs: u64) -> Self {
        Timestamp(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Adds `secs`, returning `None` when the result does not fit
    pub fn checked_add_secs(&self, secs: u64) -> Option<Timestamp> {
        self.0.checked_add(secs).map(Timestamp)
    }

    pub fn saturating_add_secs(&self, secs: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(secs))
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0).ok().and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Parses either raw epoch seconds or an RFC 3339 date-time
    pub fn parse(input: &str) -> Result<Timestamp, String> {
        let input = input.trim();
        if let Ok(secs) = input.parse::<u64>() {
            return Ok(Timestamp(secs));
        }
        let parsed = DateTime::parse_from_rfc3339(input).map_err(|e|
            format!("'{}' is neither epoch seconds nor RFC 3339: {}", input, e)
        )?;
        Timestamp::try_from(parsed.with_timezone(&Utc))
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = String;

    fn try_from(value: DateTime<Utc>) -> Result<Self, Self::Error> {
        u64::try_from(value.timestamp())
            .map(Timestamp)
            .map_err(|_| format!("{} is before the Unix epoch", value))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => write!(f, "{}s", self.0),
        }
    }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unsupported output format: {}", other)),
        }
    }
}
