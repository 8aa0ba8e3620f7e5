use crate::StatIndex;
use serde::{Deserialize, Serialize};
use strum::EnumString;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Nature {
    #[default]
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    /// The (raised, lowered) stat pair, or `None` for the five neutral natures.
    pub fn affected_stats(&self) -> Option<(StatIndex, StatIndex)> {
        use StatIndex::*;

        match self {
            Nature::Lonely => Some((Attack, Defense)),
            Nature::Brave => Some((Attack, Speed)),
            Nature::Adamant => Some((Attack, SpAttack)),
            Nature::Naughty => Some((Attack, SpDefense)),
            Nature::Bold => Some((Defense, Attack)),
            Nature::Relaxed => Some((Defense, Speed)),
            Nature::Impish => Some((Defense, SpAttack)),
            Nature::Lax => Some((Defense, SpDefense)),
            Nature::Timid => Some((Speed, Attack)),
            Nature::Hasty => Some((Speed, Defense)),
            Nature::Jolly => Some((Speed, SpAttack)),
            Nature::Naive => Some((Speed, SpDefense)),
            Nature::Modest => Some((SpAttack, Attack)),
            Nature::Mild => Some((SpAttack, Defense)),
            Nature::Quiet => Some((SpAttack, Speed)),
            Nature::Rash => Some((SpAttack, SpDefense)),
            Nature::Calm => Some((SpDefense, Attack)),
            Nature::Gentle => Some((SpDefense, Defense)),
            Nature::Sassy => Some((SpDefense, Speed)),
            Nature::Careful => Some((SpDefense, SpAttack)),
            Nature::Hardy | Nature::Docile | Nature::Serious | Nature::Bashful | Nature::Quirky => {
                None
            }
        }
    }

    /// Multiplier in tenths: 11 raised, 9 lowered, 10 untouched (HP is never affected).
    pub fn stat_modifier(&self, stat: StatIndex) -> u16 {
        match self.affected_stats() {
            Some((raised, _)) if raised == stat => 11,
            Some((_, lowered)) if lowered == stat => 9,
            _ => 10,
        }
    }
}
