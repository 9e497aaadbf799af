//! EDIFACT edition catalogue

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Every edition the mapping package ships definitions for, in published order.
pub const KNOWN_EDITIONS: [&str; 60] = [
    "D00A", "D00B", "D01A", "D01B", "D01C", "D02A", "D02B", "D03A", "D03B", "D04A", "D04B", "D05A",
    "D05B", "D06A", "D06B", "D07A", "D07B", "D08A", "D08B", "D09A", "D09B", "D10A", "D10B", "D11A",
    "D11B", "D12A", "D12B", "D13A", "D13B", "D14A", "D14B", "D15A", "D15B", "D16A", "D16B", "D17A",
    "D17B", "D18A", "D18B", "D19A", "D19B", "D20A", "D20B", "D21A", "D21B", "D22A", "D22B", "D23A",
    "D24A", "D94B", "D95A", "D95B", "D96A", "D96B", "D97A", "D97B", "D98A", "D98B", "D99A", "D99B",
];

/// Edition generated when none is requested.
pub const DEFAULT_EDITION: &str = "D95B";

/// Selector value meaning "every known edition".
pub const ALL_EDITIONS: &str = "all";

/// A validated EDIFACT edition identifier (e.g. `D95B`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edition(String);

impl Edition {
    /// Parse an edition identifier, accepting only known editions.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if KNOWN_EDITIONS.contains(&value) {
            Ok(Self(value.to_string()))
        } else {
            Err(Error::UnknownEdition(value.to_string()))
        }
    }

    /// The edition identifier as written in paths and URIs.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// All known editions in catalogue order.
    pub fn all() -> Vec<Self> {
        KNOWN_EDITIONS.iter().map(|e| Self((*e).to_string())).collect()
    }
}

impl Default for Edition {
    fn default() -> Self {
        Self(DEFAULT_EDITION.to_string())
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Edition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Edition {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which editions a run should generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditionSelection {
    /// Every edition in [`KNOWN_EDITIONS`]
    All,
    /// A single edition
    One(Edition),
}

impl EditionSelection {
    /// Parse a command-line selector: `all` or a known edition.
    pub fn parse(value: &str) -> Result<Self> {
        if value.trim() == ALL_EDITIONS {
            Ok(Self::All)
        } else {
            Edition::parse(value).map(Self::One)
        }
    }

    /// Expand the selection into the editions to process, in order.
    pub fn editions(&self) -> Vec<Edition> {
        match self {
            Self::All => Edition::all(),
            Self::One(edition) => vec![edition.clone()],
        }
    }
}

impl Default for EditionSelection {
    fn default() -> Self {
        Self::One(Edition::default())
    }
}

impl FromStr for EditionSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
