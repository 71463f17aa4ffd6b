//! Verification endpoints and per-table status derived from bitmasks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CheckError;

/// A role in a verification run. Each role owns one bit of the status mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Endpoint {
    /// Extraction against the migration source.
    Source,
    /// Extraction against the migration sink.
    Sink,
    /// The comparison performed by the check service.
    Check,
}

impl Endpoint {
    /// Every defined endpoint.
    pub const ALL: [Endpoint; 3] = [Endpoint::Source, Endpoint::Sink, Endpoint::Check];

    /// Bit owned by this endpoint.
    pub const fn code(self) -> u64 {
        match self {
            Endpoint::Source => 1,
            Endpoint::Sink => 2,
            Endpoint::Check => 4,
        }
    }

    /// Mask with every endpoint's bit set.
    pub const fn full_mask() -> u64 {
        Endpoint::Source.code() | Endpoint::Sink.code() | Endpoint::Check.code()
    }

    /// Uppercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Source => "SOURCE",
            Endpoint::Sink => "SINK",
            Endpoint::Check => "CHECK",
        }
    }

    /// Endpoints whose bits are set in `mask`.
    pub fn reported(mask: u64) -> Vec<Endpoint> {
        Endpoint::ALL
            .into_iter()
            .filter(|e| mask & e.code() != 0)
            .collect()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SOURCE" => Ok(Endpoint::Source),
            "SINK" => Ok(Endpoint::Sink),
            "CHECK" => Ok(Endpoint::Check),
            other => Err(CheckError::Validation(format!("Unknown endpoint: '{}'", other))),
        }
    }
}

/// Progress of one table within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Not tracked by the current run.
    Uninitialized,
    /// Tracked, no endpoint has reported.
    Pending,
    /// Some but not all endpoints have reported.
    Partial,
    /// Every endpoint has reported.
    Complete,
}

impl TableStatus {
    /// Classify a tracked table's bitmask.
    pub fn from_mask(mask: u64) -> Self {
        if mask == 0 {
            TableStatus::Pending
        } else if mask == Endpoint::full_mask() {
            TableStatus::Complete
        } else {
            TableStatus::Partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_powers_of_two() {
        let mut seen = 0u64;
        for e in Endpoint::ALL {
            assert!(e.code().is_power_of_two());
            assert_eq!(seen & e.code(), 0);
            seen |= e.code();
        }
        assert_eq!(seen, Endpoint::full_mask());
        assert_eq!(Endpoint::full_mask(), 7);
    }

    #[test]
    fn test_endpoint_parse_and_display() {
        for e in Endpoint::ALL {
            assert_eq!(e.to_string().parse::<Endpoint>().unwrap(), e);
        }
        assert_eq!("sink".parse::<Endpoint>().unwrap(), Endpoint::Sink);
        assert!("target".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_endpoint_serde_wire_names() {
        assert_eq!(serde_json::to_string(&Endpoint::Source).unwrap(), "\"SOURCE\"");
        let e: Endpoint = serde_json::from_str("\"CHECK\"").unwrap();
        assert_eq!(e, Endpoint::Check);
    }

    #[test]
    fn test_reported() {
        assert!(Endpoint::reported(0).is_empty());
        assert_eq!(
            Endpoint::reported(5),
            vec![Endpoint::Source, Endpoint::Check]
        );
    }

    #[test]
    fn test_table_status_from_mask() {
        assert_eq!(TableStatus::from_mask(0), TableStatus::Pending);
        assert_eq!(TableStatus::from_mask(1), TableStatus::Partial);
        assert_eq!(TableStatus::from_mask(6), TableStatus::Partial);
        assert_eq!(TableStatus::from_mask(7), TableStatus::Complete);
    }
}
