//! House system selection.
//!
//! Accepts the canonical names loosely (case, whitespace, hyphens and
//! underscores are ignored) and maps each system to its Swiss Ephemeris code.

use crate::error::ValidationError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HouseSystem {
    #[default]
    Placidus,
    Koch,
    Porphyry,
    Regiomontanus,
    Campanus,
    Equal,
    WholeSign,
}

/// Lookup table: normalized key -> system. Porphyrius is an alias.
const HOUSE_SYSTEMS: &[(&str, HouseSystem)] = &[
    ("placidus", HouseSystem::Placidus),
    ("koch", HouseSystem::Koch),
    ("porphyry", HouseSystem::Porphyry),
    ("porphyrius", HouseSystem::Porphyry),
    ("regiomontanus", HouseSystem::Regiomontanus),
    ("campanus", HouseSystem::Campanus),
    ("equal", HouseSystem::Equal),
    ("wholesign", HouseSystem::WholeSign),
];

impl HouseSystem {
    pub const ALL: [HouseSystem; 7] = [
        HouseSystem::Placidus,
        HouseSystem::Koch,
        HouseSystem::Porphyry,
        HouseSystem::Regiomontanus,
        HouseSystem::Campanus,
        HouseSystem::Equal,
        HouseSystem::WholeSign,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "Placidus",
            HouseSystem::Koch => "Koch",
            HouseSystem::Porphyry => "Porphyry",
            HouseSystem::Regiomontanus => "Regiomontanus",
            HouseSystem::Campanus => "Campanus",
            HouseSystem::Equal => "Equal",
            HouseSystem::WholeSign => "WholeSign",
        }
    }

    /// One-byte Swiss Ephemeris house system code
    pub fn code(self) -> u8 {
        match self {
            HouseSystem::Placidus => b'P',
            HouseSystem::Koch => b'K',
            HouseSystem::Porphyry => b'O',
            HouseSystem::Regiomontanus => b'R',
            HouseSystem::Campanus => b'C',
            HouseSystem::Equal => b'E',
            HouseSystem::WholeSign => b'W',
        }
    }

    pub fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|s| s.name().to_string()).collect()
    }
}

fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for HouseSystem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        HOUSE_SYSTEMS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, system)| *system)
            .ok_or_else(|| ValidationError::InvalidHouseSystem {
                system: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for HouseSystem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
