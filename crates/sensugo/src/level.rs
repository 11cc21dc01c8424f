//! Alert severity levels and their Sensu Go check status.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of an alert as reported by the alerting engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    /// Alert recovered
    Ok,
    /// Informational
    Info,
    /// Something needs attention
    Warning,
    /// Immediate action required
    Critical,
    /// Any level the engine reports that we do not recognise
    Unknown,
}

impl Level {
    /// Sensu Go check status for this level.
    ///
    /// Sensu treats 0 as passing, 1 as warning, 2 as critical and anything
    /// else as unknown.
    #[must_use]
    pub const fn status(self) -> i32 {
        match self {
            Self::Ok | Self::Info => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    /// Display name for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for Level {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_ascii_uppercase().as_str() {
            "OK" => Self::Ok,
            "INFO" => Self::Info,
            "WARNING" => Self::Warning,
            "CRITICAL" => Self::Critical,
            _ => Self::Unknown,
        };
        Ok(level)
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Level::Ok.status(), 0);
        assert_eq!(Level::Info.status(), 0);
        assert_eq!(Level::Warning.status(), 1);
        assert_eq!(Level::Critical.status(), 2);
        assert_eq!(Level::Unknown.status(), 3);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("critical".parse::<Level>().unwrap(), Level::Critical);
        assert_eq!("Warning".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("ok".parse::<Level>().unwrap(), Level::Ok);
    }

    #[test]
    fn test_unrecognised_level_maps_to_unknown_status() {
        let level: Level = serde_json::from_str("\"EMERGENCY\"").unwrap();
        assert_eq!(level, Level::Unknown);
        assert_eq!(level.status(), 3);
    }

    #[test]
    fn test_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Level::Info).unwrap(), "\"INFO\"");
    }
}
