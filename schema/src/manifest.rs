use crate::SpeciesId;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterMethod {
    #[default]
    Wild,
    Static,
    Gift,
    Trade,
    Event,
}

impl EncounterMethod {
    /// Whether an encounter of this kind lets the player legitimately own the species.
    pub fn grants_ownership(&self) -> bool {
        matches!(
            self,
            EncounterMethod::Wild | EncounterMethod::Static | EncounterMethod::Gift
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encounter {
    pub pokemon_id: SpeciesId,
    pub method: EncounterMethod,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum EncounterField {
    #[serde(alias = "species", alias = "id")]
    PokemonId,
    Method,
    #[serde(other)]
    Other,
}

/// Encounters may be written as a bare species id or as a `(pokemon_id, method)` record.
impl<'de> Deserialize<'de> for Encounter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EncounterVisitor;

        impl<'de> Visitor<'de> for EncounterVisitor {
            type Value = Encounter;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a species id or an encounter record")
            }

            fn visit_str<E: de::Error>(self, id: &str) -> Result<Encounter, E> {
                Ok(Encounter {
                    pokemon_id: id.to_string(),
                    method: EncounterMethod::Wild,
                })
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Encounter, A::Error> {
                let mut pokemon_id = None;
                let mut method = EncounterMethod::default();
                while let Some(field) = map.next_key()? {
                    match field {
                        EncounterField::PokemonId => pokemon_id = Some(map.next_value()?),
                        EncounterField::Method => method = map.next_value()?,
                        EncounterField::Other => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                let pokemon_id =
                    pokemon_id.ok_or_else(|| <A::Error as de::Error>::missing_field("pokemon_id"))?;
                Ok(Encounter { pokemon_id, method })
            }
        }

        deserializer.deserialize_any(EncounterVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub order: u32,
    #[serde(default)]
    pub encounters: Vec<Encounter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameManifest {
    /// Filled from the game directory name when loading.
    #[serde(default)]
    pub id: String,
    /// Generation whose movepools the game draws from.
    pub generation: u8,
    pub segments: Vec<Segment>,
}

impl GameManifest {
    /// Segments in story order; ties keep file order.
    pub fn ordered_segments(&self) -> Vec<&Segment> {
        let mut segments: Vec<&Segment> = self.segments.iter().collect();
        segments.sort_by_key(|segment| segment.order);
        segments
    }

    pub fn segment(&self, segment_id: &str) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.id == segment_id)
    }
}
