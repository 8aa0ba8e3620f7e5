use crate::PokemonType;
use serde::de::{self, Deserializer, IgnoredAny, IntoDeserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Species identifiers are the slugs used as table keys (e.g. "bulbasaur").
pub type SpeciesId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatIndex {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
}

impl StatIndex {
    pub const ALL: [StatIndex; 6] = [
        StatIndex::Hp,
        StatIndex::Attack,
        StatIndex::Defense,
        StatIndex::SpAttack,
        StatIndex::SpDefense,
        StatIndex::Speed,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    #[serde(alias = "atk")]
    pub attack: u16,
    #[serde(alias = "def")]
    pub defense: u16,
    #[serde(alias = "spa", alias = "special_attack", alias = "special-attack")]
    pub sp_attack: u16,
    #[serde(alias = "spd", alias = "special_defense", alias = "special-defense")]
    pub sp_defense: u16,
    #[serde(alias = "spe")]
    pub speed: u16,
}

impl BaseStats {
    pub fn get(&self, stat: StatIndex) -> u16 {
        match stat {
            StatIndex::Hp => self.hp,
            StatIndex::Attack => self.attack,
            StatIndex::Defense => self.defense,
            StatIndex::SpAttack => self.sp_attack,
            StatIndex::SpDefense => self.sp_defense,
            StatIndex::Speed => self.speed,
        }
    }

    pub fn set(&mut self, stat: StatIndex, value: u16) {
        match stat {
            StatIndex::Hp => self.hp = value,
            StatIndex::Attack => self.attack = value,
            StatIndex::Defense => self.defense = value,
            StatIndex::SpAttack => self.sp_attack = value,
            StatIndex::SpDefense => self.sp_defense = value,
            StatIndex::Speed => self.speed = value,
        }
    }

    /// Overlay the stats present in `partial`, leaving the others untouched.
    pub fn merge(&mut self, partial: &PartialStats) {
        for stat in StatIndex::ALL {
            if let Some(value) = partial.get(stat) {
                self.set(stat, value);
            }
        }
    }
}

/// A stat spread where every entry is optional: patch overlays and boss EV spreads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialStats {
    pub hp: Option<u16>,
    #[serde(alias = "atk")]
    pub attack: Option<u16>,
    #[serde(alias = "def")]
    pub defense: Option<u16>,
    #[serde(alias = "spa", alias = "special_attack", alias = "special-attack")]
    pub sp_attack: Option<u16>,
    #[serde(alias = "spd", alias = "special_defense", alias = "special-defense")]
    pub sp_defense: Option<u16>,
    #[serde(alias = "spe")]
    pub speed: Option<u16>,
}

impl PartialStats {
    pub fn get(&self, stat: StatIndex) -> Option<u16> {
        match stat {
            StatIndex::Hp => self.hp,
            StatIndex::Attack => self.attack,
            StatIndex::Defense => self.defense,
            StatIndex::SpAttack => self.sp_attack,
            StatIndex::SpDefense => self.sp_defense,
            StatIndex::Speed => self.speed,
        }
    }

    pub fn is_complete(&self) -> bool {
        StatIndex::ALL.iter().all(|stat| self.get(*stat).is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum EvolutionTrigger {
    LevelUp { min_level: Option<u8> },
    Item { item: String },
    Trade,
    Friendship,
    #[default]
    Other,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum TriggerMethod {
    #[serde(alias = "level-up", alias = "level")]
    LevelUp,
    #[serde(alias = "use-item")]
    Item,
    Trade,
    Friendship,
    Other,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum TriggerField {
    Method,
    MinLevel,
    Item,
    #[serde(other)]
    Unknown,
}

impl TriggerMethod {
    fn into_trigger<E: de::Error>(self, min_level: Option<u8>, item: Option<String>) -> Result<EvolutionTrigger, E> {
        Ok(match self {
            TriggerMethod::LevelUp => EvolutionTrigger::LevelUp { min_level },
            TriggerMethod::Item => EvolutionTrigger::Item {
                item: item.ok_or_else(|| E::missing_field("item"))?,
            },
            TriggerMethod::Trade => EvolutionTrigger::Trade,
            TriggerMethod::Friendship => EvolutionTrigger::Friendship,
            TriggerMethod::Other => EvolutionTrigger::Other,
        })
    }
}

/// Triggers are a `(method, min_level?, item?)` record, or just the method name.
impl<'de> Deserialize<'de> for EvolutionTrigger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TriggerVisitor;

        impl<'de> Visitor<'de> for TriggerVisitor {
            type Value = EvolutionTrigger;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an evolution method or a trigger record")
            }

            fn visit_str<E: de::Error>(self, method: &str) -> Result<EvolutionTrigger, E> {
                let method_name: de::value::StrDeserializer<E> = method.into_deserializer();
                TriggerMethod::deserialize(method_name)?.into_trigger(None, None)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<EvolutionTrigger, A::Error> {
                let mut method: Option<TriggerMethod> = None;
                let mut min_level = None;
                let mut item = None;
                while let Some(field) = map.next_key()? {
                    match field {
                        TriggerField::Method => method = Some(map.next_value()?),
                        TriggerField::MinLevel => min_level = map.next_value()?,
                        TriggerField::Item => item = Some(map.next_value()?),
                        TriggerField::Unknown => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                method
                    .ok_or_else(|| <A::Error as de::Error>::missing_field("method"))?
                    .into_trigger(min_level, item)
            }
        }

        deserializer.deserialize_any(TriggerVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvolutionEdge {
    pub id: SpeciesId,
    pub trigger: EvolutionTrigger,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum EdgeField {
    Id,
    Trigger,
    #[serde(other)]
    Unknown,
}

/// Edges may be written as a bare species id or as an `(id, trigger)` record.
impl<'de> Deserialize<'de> for EvolutionEdge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EdgeVisitor;

        impl<'de> Visitor<'de> for EdgeVisitor {
            type Value = EvolutionEdge;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a species id or an evolution edge")
            }

            fn visit_str<E: de::Error>(self, id: &str) -> Result<EvolutionEdge, E> {
                Ok(EvolutionEdge {
                    id: id.to_string(),
                    trigger: EvolutionTrigger::Other,
                })
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<EvolutionEdge, A::Error> {
                let mut id = None;
                let mut trigger = EvolutionTrigger::default();
                while let Some(field) = map.next_key()? {
                    match field {
                        EdgeField::Id => id = Some(map.next_value()?),
                        EdgeField::Trigger => trigger = map.next_value()?,
                        EdgeField::Unknown => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                let id = id.ok_or_else(|| <A::Error as de::Error>::missing_field("id"))?;
                Ok(EvolutionEdge { id, trigger })
            }
        }

        deserializer.deserialize_any(EdgeVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evolution {
    pub from: Option<SpeciesId>,
    pub to: Vec<EvolutionEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonSpecies {
    /// Filled from the table key when loading.
    #[serde(default)]
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<PokemonType>,
    #[serde(alias = "stats")]
    pub base_stats: BaseStats,
    #[serde(default)]
    pub evolution: Evolution,
    /// Fields introduced by patch overlays that the base schema does not know.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl PokemonSpecies {
    pub fn primary_type(&self) -> PokemonType {
        self.types.first().copied().unwrap_or(PokemonType::Typeless)
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    /// The trigger recorded on this species' edge to `child`, if any.
    pub fn trigger_for(&self, child: &str) -> Option<&EvolutionTrigger> {
        self.evolution
            .to
            .iter()
            .find(|edge| edge.id == child)
            .map(|edge| &edge.trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_species_deserializes_with_stats_alias() {
        let json = r#"{
            "name": "Ivysaur",
            "types": ["grass", "poison"],
            "stats": {"hp": 60, "atk": 62, "def": 63, "spa": 80, "spd": 80, "spe": 60},
            "evolution": {"from": "bulbasaur", "to": [{"id": "venusaur", "trigger": {"method": "level_up", "min_level": 32}}]}
        }"#;
        let species: PokemonSpecies = serde_json::from_str(json).unwrap();

        assert_eq!(species.types, vec![PokemonType::Grass, PokemonType::Poison]);
        assert_eq!(species.base_stats.sp_attack, 80);
        assert_eq!(species.evolution.from.as_deref(), Some("bulbasaur"));
        assert_eq!(
            species.trigger_for("venusaur"),
            Some(&EvolutionTrigger::LevelUp { min_level: Some(32) })
        );
    }

    #[test]
    fn test_merge_partial_stats() {
        let mut stats = BaseStats {
            hp: 45,
            attack: 49,
            defense: 49,
            sp_attack: 65,
            sp_defense: 65,
            speed: 45,
        };
        let partial = PartialStats {
            speed: Some(95),
            ..Default::default()
        };
        stats.merge(&partial);

        assert_eq!(stats.speed, 95);
        assert_eq!(stats.hp, 45);
        assert!(!partial.is_complete());
    }

    #[test]
    fn test_ron_species_with_edge_record_and_trigger_identifiers() {
        // Arrange
        let ron_text = r#"{
            "ivysaur": (
                name: "Ivysaur",
                types: [grass, poison],
                stats: (hp: 60, atk: 62, def: 63, spa: 80, spd: 80, spe: 60),
                evolution: (
                    from: Some("bulbasaur"),
                    to: [
                        (id: "venusaur", trigger: (method: level_up, min_level: Some(32))),
                        (id: "ivystone", trigger: (method: use_item, item: "leaf-stone")),
                        "ivyclone",
                    ],
                ),
            ),
        }"#;

        // Act
        let table: BTreeMap<String, PokemonSpecies> = ron::from_str(ron_text).unwrap();

        // Assert
        let ivysaur = &table["ivysaur"];
        assert_eq!(ivysaur.base_stats.speed, 60);
        assert_eq!(
            ivysaur.trigger_for("venusaur"),
            Some(&EvolutionTrigger::LevelUp { min_level: Some(32) })
        );
        assert_eq!(
            ivysaur.trigger_for("ivystone"),
            Some(&EvolutionTrigger::Item {
                item: "leaf-stone".to_string()
            })
        );
        assert_eq!(ivysaur.trigger_for("ivyclone"), Some(&EvolutionTrigger::Other));
    }

    #[test]
    fn test_trigger_accepts_method_name_alone() {
        let evolution: Evolution =
            serde_json::from_str(r#"{"to": [{"id": "gengar", "trigger": "trade"}]}"#).unwrap();
        assert_eq!(evolution.to[0].trigger, EvolutionTrigger::Trade);

        let item_without_name: Result<EvolutionTrigger, _> = serde_json::from_str(r#"{"method": "item"}"#);
        assert!(item_without_name.is_err());
    }

    #[test]
    fn test_bare_evolution_edge() {
        let evolution: Evolution = serde_json::from_str(r#"{"to": ["raichu"]}"#).unwrap();
        assert_eq!(evolution.to[0].id, "raichu");
        assert_eq!(evolution.to[0].trigger, EvolutionTrigger::Other);
        assert_eq!(evolution.from, None);
    }
}
