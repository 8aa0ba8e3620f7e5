use crate::{MoveSlug, Nature, PartialStats, SpeciesId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
#[serde(rename_all = "snake_case")]
pub enum BattleCategory {
    #[serde(alias = "gym", alias = "gym-leader")]
    GymLeader,
    Rival,
    #[serde(alias = "e4", alias = "elite-four")]
    EliteFour,
    Champion,
    #[serde(alias = "evil-team-boss", alias = "boss")]
    EvilTeamBoss,
    #[serde(alias = "evil-team-admin", alias = "admin")]
    EvilTeamAdmin,
    Totem,
    Optional,
}

impl BattleCategory {
    /// Mandatory battles take part in phase partitioning; totem and optional fights do not.
    pub fn is_mandatory(&self) -> bool {
        !matches!(self, BattleCategory::Totem | BattleCategory::Optional)
    }
}

impl fmt::Display for BattleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            BattleCategory::GymLeader => "Gym Leader",
            BattleCategory::Rival => "Rival",
            BattleCategory::EliteFour => "Elite Four",
            BattleCategory::Champion => "Champion",
            BattleCategory::EvilTeamBoss => "Evil Team Boss",
            BattleCategory::EvilTeamAdmin => "Evil Team Admin",
            BattleCategory::Totem => "Totem",
            BattleCategory::Optional => "Optional",
        };

        write!(f, "{}", display_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BattleFormat {
    #[default]
    #[serde(alias = "singles")]
    Single,
    #[serde(alias = "doubles")]
    Double,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Rain,
    Sun,
    Sand,
    Hail,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Electric,
    Grassy,
    Psychic,
    Misty,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BossCreature {
    #[serde(alias = "species", alias = "species_id")]
    pub pokemon_id: SpeciesId,
    pub level: u8,
    #[serde(default)]
    pub moves: Vec<MoveSlug>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub nature: Option<Nature>,
    #[serde(default)]
    pub evs: PartialStats,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BossBattle {
    pub id: String,
    pub segment_id: String,
    pub category: BattleCategory,
    #[serde(default)]
    pub format: BattleFormat,
    /// Declared cap; the effective cap is always derived from the team.
    #[serde(default)]
    pub level_cap: Option<u8>,
    /// Team order is significant: the last slot is the ace.
    #[serde(default)]
    pub team: Vec<BossCreature>,
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub terrain: Option<Terrain>,
}

impl BossBattle {
    /// The team's maximum level, falling back to the declared cap for an empty team.
    pub fn effective_level_cap(&self) -> u8 {
        self.team
            .iter()
            .map(|creature| creature.level)
            .max()
            .or(self.level_cap)
            .unwrap_or(0)
    }

    pub fn ace(&self) -> Option<&BossCreature> {
        self.team.last()
    }

    pub fn is_ace_slot(&self, slot: usize) -> bool {
        !self.team.is_empty() && slot == self.team.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creature(pokemon_id: &str, level: u8) -> BossCreature {
        BossCreature {
            pokemon_id: pokemon_id.to_string(),
            level,
            moves: Vec::new(),
            item: None,
            ability: None,
            nature: None,
            evs: PartialStats::default(),
        }
    }

    #[test]
    fn test_level_cap_is_team_max() {
        let battle = BossBattle {
            id: "brock".to_string(),
            segment_id: "pewter".to_string(),
            category: BattleCategory::GymLeader,
            format: BattleFormat::Single,
            level_cap: Some(99),
            team: vec![creature("geodude", 12), creature("onix", 14)],
            weather: None,
            terrain: None,
        };

        assert_eq!(battle.effective_level_cap(), 14);
        assert_eq!(battle.ace().map(|c| c.pokemon_id.as_str()), Some("onix"));
        assert!(battle.is_ace_slot(1));
        assert!(!battle.is_ace_slot(0));
    }

    #[test]
    fn test_category_aliases() {
        let category: BattleCategory = serde_json::from_str(r#""gym""#).unwrap();
        assert_eq!(category, BattleCategory::GymLeader);
        let category: BattleCategory = serde_json::from_str(r#""elite_four""#).unwrap();
        assert_eq!(category, BattleCategory::EliteFour);
        assert!(!BattleCategory::Totem.is_mandatory());
        assert!(BattleCategory::Rival.is_mandatory());
    }

    #[test]
    fn test_ron_roster_with_identifier_categories() {
        let ron_text = r#"[
            (id: "brock", segment_id: "pewter", category: gym_leader, level_cap: Some(14),
             team: [(pokemon_id: "geodude", level: 12), (species: "onix", level: 14, nature: Some(adamant))]),
            (id: "gary", segment_id: "route-22", category: rival),
        ]"#;

        let roster: Vec<BossBattle> = ron::from_str(ron_text).unwrap();

        assert_eq!(roster[0].category, BattleCategory::GymLeader);
        assert_eq!(roster[0].team[1].nature, Some(Nature::Adamant));
        assert_eq!(roster[0].effective_level_cap(), 14);
        assert_eq!(roster[1].category, BattleCategory::Rival);
        assert!(roster[1].team.is_empty());
    }
}
