use crate::config::BuildSettings;
use schema::{BaseStats, BossCreature, Nature, PartialStats, PokemonSpecies, StatIndex};

/// Highest EV a single stat can hold.
const MAX_STAT_EV: u16 = 255;

/// Battle stats of one built creature at a fixed level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatBlock {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl StatBlock {
    fn set(&mut self, stat: StatIndex, value: u16) {
        match stat {
            StatIndex::Hp => self.hp = value,
            StatIndex::Attack => self.attack = value,
            StatIndex::Defense => self.defense = value,
            StatIndex::SpAttack => self.sp_attack = value,
            StatIndex::SpDefense => self.sp_defense = value,
            StatIndex::Speed => self.speed = value,
        }
    }
}

/// Gen 3+ stat formula with a uniform IV, per-stat EVs and a nature.
pub fn calculate_stats(base_stats: &BaseStats, level: u8, iv: u16, evs: &PartialStats, nature: Nature) -> StatBlock {
    let level = level as u32;
    let mut stats = StatBlock::default();

    for stat in StatIndex::ALL {
        let ev = evs.get(stat).unwrap_or(0).min(MAX_STAT_EV) as u32;
        let base_calculation = 2 * base_stats.get(stat) as u32 + iv as u32 + ev / 4;
        let scaled = base_calculation * level / 100;

        let value = if stat == StatIndex::Hp {
            // HP = floor((2 * Base + IV + floor(EV / 4)) * Level / 100) + Level + 10
            scaled + level + 10
        } else {
            // Other = floor((floor((2 * Base + IV + floor(EV / 4)) * Level / 100) + 5) * Nature)
            (scaled + 5) * nature.stat_modifier(stat) as u32 / 10
        };

        stats.set(stat, value.min(u16::MAX as u32) as u16);
    }

    stats
}

/// The player-side build: fixed IVs, flat EVs, neutral nature, at `level`.
pub fn attacker_stats(species: &PokemonSpecies, level: u8, builds: &BuildSettings) -> StatBlock {
    let evs = PartialStats {
        hp: Some(builds.attacker_ev),
        attack: Some(builds.attacker_ev),
        defense: Some(builds.attacker_ev),
        sp_attack: Some(builds.attacker_ev),
        sp_defense: Some(builds.attacker_ev),
        speed: Some(builds.attacker_ev),
    };
    calculate_stats(&species.base_stats, level, builds.attacker_iv, &evs, Nature::Hardy)
}

/// A boss creature's build: its own level, nature and EV spread.
pub fn boss_stats(species: &PokemonSpecies, creature: &BossCreature, builds: &BuildSettings) -> StatBlock {
    calculate_stats(
        &species.base_stats,
        creature.level,
        builds.boss_iv,
        &creature.evs,
        creature.nature.unwrap_or_default(),
    )
}
