//! # Processing Stages
//!
//! The closed set of textile processing stages a batch moves through, from
//! raw cotton to a shipped garment. The ledger records stage transitions
//! but does not enforce their order; progression rules belong to whoever
//! owns the batch record.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// A textile supply-chain processing stage.
///
/// Serialized in `SCREAMING_SNAKE_CASE` (`"RAW_COTTON"`, `"SPUN_YARN"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Harvested seed cotton.
    RawCotton,
    /// Lint separated from seed.
    Ginned,
    /// Fibre spun into yarn.
    SpunYarn,
    /// Yarn woven or knitted into fabric.
    WovenFabric,
    /// Fabric dyed or printed.
    Dyed,
    /// Cut, sewn and finished garment.
    GarmentFinished,
    /// Dispatched to the buyer.
    Shipped,
}

impl Stage {
    /// All stages in processing order.
    pub fn all() -> &'static [Stage] {
        &[
            Self::RawCotton,
            Self::Ginned,
            Self::SpunYarn,
            Self::WovenFabric,
            Self::Dyed,
            Self::GarmentFinished,
            Self::Shipped,
        ]
    }

    /// The stage every batch is created in.
    pub fn initial() -> Self {
        Self::RawCotton
    }

    /// The serialized identifier of this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RawCotton => "RAW_COTTON",
            Self::Ginned => "GINNED",
            Self::SpunYarn => "SPUN_YARN",
            Self::WovenFabric => "WOVEN_FABRIC",
            Self::Dyed => "DYED",
            Self::GarmentFinished => "GARMENT_FINISHED",
            Self::Shipped => "SHIPPED",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_matches_serde() {
        for stage in Stage::all() {
            let json = serde_json::to_string(stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.as_str()));
        }
    }

    #[test]
    fn from_str_roundtrips_every_stage() {
        for stage in Stage::all() {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), *stage);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert_eq!(
            "FELTED".parse::<Stage>(),
            Err(ValidationError::UnknownStage("FELTED".to_string()))
        );
        assert!("raw_cotton".parse::<Stage>().is_err());
    }

    #[test]
    fn initial_is_raw_cotton_and_order_is_processing_order() {
        assert_eq!(Stage::initial(), Stage::RawCotton);
        assert_eq!(Stage::all().len(), 7);
        assert!(Stage::all().windows(2).all(|w| w[0] < w[1]));
    }
}
