use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Move identifiers are the slugs used as table keys (e.g. "flamethrower").
pub type MoveSlug = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveCategory::Physical => write!(f, "Physical"),
            MoveCategory::Special => write!(f, "Special"),
            MoveCategory::Status => write!(f, "Status"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    #[serde(alias = "attack")]
    Atk,
    #[serde(alias = "defense")]
    Def,
    #[serde(alias = "special_attack", alias = "special-attack")]
    SpAtk,
    #[serde(alias = "special_defense", alias = "special-defense")]
    SpDef,
    #[serde(alias = "speed")]
    Spe,
    #[serde(alias = "accuracy")]
    Acc,
    #[serde(alias = "evasion")]
    Eva,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Atk => write!(f, "Attack"),
            StatType::Def => write!(f, "Defense"),
            StatType::SpAtk => write!(f, "Special Attack"),
            StatType::SpDef => write!(f, "Special Defense"),
            StatType::Spe => write!(f, "Speed"),
            StatType::Acc => write!(f, "Accuracy"),
            StatType::Eva => write!(f, "Evasion"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    User,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusType {
    Sleep,
    Poison,
    #[serde(alias = "toxic")]
    BadPoison,
    Burn,
    Freeze,
    Paralysis,
    Confusion,
}

/// Closed vocabulary of tactical roles a move can play beyond raw damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticalFlag {
    Hazard,
    Screen,
    Weather,
    Redirection,
    Protection,
    StatStage,
    Status,
    PassiveDamage,
    Recovery,
    SpeedControl,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInflict {
    pub status: StatusType,
    #[serde(default = "always")]
    pub chance: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStageChange {
    pub stat: StatType,
    pub stages: i8,
    #[serde(default)]
    pub target: Target,
    #[serde(default = "always")]
    pub chance: u8,
}

fn always() -> u8 {
    100
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tactics {
    pub status: Option<StatusInflict>,
    pub stat_changes: Vec<StatStageChange>,
    pub flinch_chance: u8,
    pub crit_stage: u8,
    pub flags: Vec<TacticalFlag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    /// Filled from the table key when loading.
    #[serde(default)]
    pub slug: MoveSlug,
    #[serde(rename = "type")]
    pub move_type: PokemonType,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: Option<u16>,
    #[serde(default)]
    pub accuracy: Option<u8>,
    #[serde(default)]
    pub pp: u8,
    #[serde(default)]
    pub priority: i8,
    /// Generation the move was introduced in, when known.
    #[serde(default)]
    pub generation: Option<u8>,
    #[serde(default)]
    pub tactics: Tactics,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl MoveData {
    /// Minimal neutral stand-in for a move the tables do not know.
    pub fn placeholder(slug: &str) -> Self {
        MoveData {
            slug: slug.to_string(),
            move_type: PokemonType::Typeless,
            category: MoveCategory::Status,
            power: Some(0),
            accuracy: None,
            pp: 0,
            priority: 0,
            generation: None,
            tactics: Tactics::default(),
            extensions: BTreeMap::new(),
        }
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.base_power() > 0
    }

    pub fn base_power(&self) -> u16 {
        self.power.unwrap_or(0)
    }

    /// Explicit flags plus the ones implied by the rest of the tactics bundle.
    pub fn tactical_flags(&self) -> BTreeSet<TacticalFlag> {
        let mut flags: BTreeSet<TacticalFlag> = self.tactics.flags.iter().copied().collect();

        if self.priority > 0 {
            flags.insert(TacticalFlag::Priority);
        }
        if self.category == MoveCategory::Status && self.tactics.status.is_some() {
            flags.insert(TacticalFlag::Status);
        }
        for change in &self.tactics.stat_changes {
            let boosts_user = change.target == Target::User && change.stages > 0;
            let drops_target = change.target == Target::Target && change.stages < 0;
            if self.category == MoveCategory::Status && (boosts_user || drops_target) {
                flags.insert(TacticalFlag::StatStage);
            }
            if change.stat == StatType::Spe && (boosts_user || drops_target) {
                flags.insert(TacticalFlag::SpeedControl);
            }
        }
        if matches!(
            self.tactics.status,
            Some(StatusInflict {
                status: StatusType::Paralysis,
                ..
            })
        ) {
            flags.insert(TacticalFlag::SpeedControl);
        }

        flags
    }

    pub fn has_flag(&self, flag: TacticalFlag) -> bool {
        self.tactical_flags().contains(&flag)
    }
}
