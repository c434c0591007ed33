//! Partition keys: the unit of snapshot independence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{ExError, ExErrorKind};

/// Leaderboard region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "AP")]
    Ap,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Eu, Region::Us, Region::Ap];

    /// Stored and upstream representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Eu => "EU",
            Region::Us => "US",
            Region::Ap => "AP",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EU" => Ok(Region::Eu),
            "US" => Ok(Region::Us),
            "AP" => Ok(Region::Ap),
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_region")
                .with_message(format!("unknown region '{}'", other))),
        }
    }
}

/// Leaderboard game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Standard,
    Duos,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Standard, GameMode::Duos];

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Standard => "standard",
            GameMode::Duos => "duos",
        }
    }

    /// Leaderboard id used by the upstream API
    pub fn leaderboard_id(&self) -> &'static str {
        match self {
            GameMode::Standard => "battlegrounds",
            GameMode::Duos => "battlegroundsduo",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ExError;

    /// Accepts both the stored name and the upstream leaderboard id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "battlegrounds" => Ok(GameMode::Standard),
            "duos" | "duo" | "battlegroundsduo" => Ok(GameMode::Duos),
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_game_mode")
                .with_message(format!("unknown game mode '{}'", other))),
        }
    }
}

/// (region, game mode) pair identifying an independent leaderboard stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartitionKey {
    pub region: Region,
    pub game_mode: GameMode,
}

impl PartitionKey {
    pub fn new(region: Region, game_mode: GameMode) -> Self {
        Self { region, game_mode }
    }

    /// Every region × every game mode, region-major
    pub fn all() -> Vec<PartitionKey> {
        Region::ALL
            .iter()
            .flat_map(|r| GameMode::ALL.iter().map(move |m| PartitionKey::new(*r, *m)))
            .collect()
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.game_mode)
    }
}

impl FromStr for PartitionKey {
    type Err = ExError;

    /// Parses `EU/standard`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (region, mode) = s.split_once('/').ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_partition_key")
                .with_message(format!("expected REGION/MODE, got '{}'", s))
        })?;
        Ok(PartitionKey::new(region.parse()?, mode.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_partitions_is_region_major() {
        let all = PartitionKey::all();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], PartitionKey::new(Region::Eu, GameMode::Standard));
        assert_eq!(all[1], PartitionKey::new(Region::Eu, GameMode::Duos));
        assert_eq!(all[5], PartitionKey::new(Region::Ap, GameMode::Duos));
    }

    #[test]
    fn test_parse_accepts_upstream_ids() {
        assert_eq!("battlegroundsduo".parse::<GameMode>().unwrap(), GameMode::Duos);
        assert_eq!("Standard".parse::<GameMode>().unwrap(), GameMode::Standard);
        assert_eq!("us".parse::<Region>().unwrap(), Region::Us);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "CN".parse::<Region>().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!("EU-standard".parse::<PartitionKey>().is_err());
    }

    #[test]
    fn test_partition_display_round_trips() {
        let key = PartitionKey::new(Region::Ap, GameMode::Duos);
        assert_eq!(key.to_string(), "AP/duos");
        assert_eq!(key.to_string().parse::<PartitionKey>().unwrap(), key);
    }

    #[test]
    fn test_serde_names() {
        let key = PartitionKey::new(Region::Eu, GameMode::Standard);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"region":"EU","game_mode":"standard"}"#);
    }
}
