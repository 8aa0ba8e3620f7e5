#[cfg(test)]
mod tests {
    use crate::analysis::matchup::{expected_damage, ko_turns, simulate, BattleConditions, Combatant};
    use crate::analysis::movepool::Moveset;
    use crate::analysis::tests::common::{attack, species};
    use crate::config::DamageSettings;
    use crate::stats::StatBlock;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{MoveCategory, PokemonType, Weather};

    fn block(hp: u16, attack: u16, defense: u16, speed: u16) -> StatBlock {
        StatBlock {
            hp,
            attack,
            defense,
            sp_attack: attack,
            sp_defense: defense,
            speed,
        }
    }

    #[test]
    fn test_faster_attacker_that_outdamages_hp_ohkoes_first() {
        // Arrange: speed 100 against speed 60, with one hit worth more than the defender's HP.
        let striker = species("striker", &[PokemonType::Fire], [80, 80, 80, 80, 80, 80]);
        let target = species("target", &[PokemonType::Water], [50, 50, 50, 50, 50, 50]);
        let mega_punch = Moveset::new(vec![attack("mega-punch", PokemonType::Normal, MoveCategory::Physical, 120)]);
        let tackle = Moveset::new(vec![attack("tackle", PokemonType::Normal, MoveCategory::Physical, 40)]);
        let attacker = Combatant {
            species: &striker,
            level: 50,
            stats: block(100, 200, 100, 100),
            moveset: &mega_punch,
        };
        let defender = Combatant {
            species: &target,
            level: 50,
            stats: block(50, 50, 50, 60),
            moveset: &tackle,
        };
        let settings = DamageSettings::default();

        // Act
        let outcome = simulate(&attacker, &defender, &BattleConditions::default(), &settings);

        // Assert: floor(floor(22 * 120 * 200 / 50) / 50) + 2 = 213, times the 0.925 roll.
        let damage = expected_damage(&attacker, &defender, &mega_punch.moves[0], &BattleConditions::default(), &settings);
        assert!((damage - 213.0 * 0.925).abs() < 1e-9);
        assert!(outcome.attacker_first);
        assert!(outcome.attacker_ohkoes);
        assert_eq!(outcome.attacker_ko_turns, Some(1));
        assert!(!outcome.defender_ohkoes);
        assert!(outcome.attacker_wins());
    }

    #[test]
    fn test_immune_defender_is_never_knocked_out() {
        let brawler = species("brawler", &[PokemonType::Normal], [80, 80, 80, 80, 80, 80]);
        let spirit = species("spirit", &[PokemonType::Ghost], [50, 50, 50, 50, 50, 50]);
        let normal_only = Moveset::new(vec![attack("body-slam", PokemonType::Normal, MoveCategory::Physical, 85)]);
        let none = Moveset::default();
        let attacker = Combatant {
            species: &brawler,
            level: 30,
            stats: block(90, 90, 90, 90),
            moveset: &normal_only,
        };
        let defender = Combatant {
            species: &spirit,
            level: 30,
            stats: block(70, 60, 60, 50),
            moveset: &none,
        };

        let outcome = simulate(&attacker, &defender, &BattleConditions::default(), &DamageSettings::default());

        assert_eq!(outcome.attacker_ko_turns, None);
        assert_eq!(outcome.defender_ko_turns, None);
        assert!(!outcome.attacker_wins());
        assert!(outcome.is_walled(3));
    }

    #[test]
    fn test_speed_ties_favour_the_attacker() {
        let mirror = species("mirror", &[PokemonType::Normal], [50, 50, 50, 50, 50, 50]);
        let tackle = Moveset::new(vec![attack("tackle", PokemonType::Normal, MoveCategory::Physical, 40)]);
        let side = Combatant {
            species: &mirror,
            level: 20,
            stats: block(60, 40, 40, 45),
            moveset: &tackle,
        };

        let outcome = simulate(&side, &side, &BattleConditions::default(), &DamageSettings::default());

        assert!(outcome.attacker_first);
        assert_eq!(outcome.attacker_ko_turns, outcome.defender_ko_turns);
        assert!(outcome.attacker_wins());
    }

    #[rstest]
    #[case(Some(Weather::Rain), PokemonType::Water, 1.5)]
    #[case(Some(Weather::Sun), PokemonType::Water, 0.5)]
    #[case(Some(Weather::Sun), PokemonType::Fire, 1.5)]
    #[case(Some(Weather::Sand), PokemonType::Water, 1.0)]
    #[case(None, PokemonType::Water, 1.0)]
    fn test_weather_scales_damage(
        #[case] weather: Option<Weather>,
        #[case] move_type: PokemonType,
        #[case] factor: f64,
    ) {
        let user = species("user", &[PokemonType::Normal], [50, 50, 50, 50, 50, 50]);
        let target = species("target", &[PokemonType::Normal], [50, 50, 50, 50, 50, 50]);
        let hit = attack("hit", move_type, MoveCategory::Special, 80);
        let empty = Moveset::default();
        let attacker = Combatant {
            species: &user,
            level: 40,
            stats: block(100, 80, 80, 50),
            moveset: &empty,
        };
        let defender = Combatant {
            species: &target,
            level: 40,
            stats: block(100, 80, 80, 50),
            moveset: &empty,
        };
        let settings = DamageSettings::default();

        let clear = expected_damage(&attacker, &defender, &hit, &BattleConditions::default(), &settings);
        let conditions = BattleConditions { weather, terrain: None };
        let scaled = expected_damage(&attacker, &defender, &hit, &conditions, &settings);

        assert!((scaled - clear * factor).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_scales_expected_damage() {
        let user = species("user", &[PokemonType::Normal], [50, 50, 50, 50, 50, 50]);
        let mut wild_swing = attack("wild-swing", PokemonType::Rock, MoveCategory::Physical, 100);
        wild_swing.accuracy = Some(50);
        let empty = Moveset::default();
        let side = Combatant {
            species: &user,
            level: 40,
            stats: block(100, 80, 80, 50),
            moveset: &empty,
        };
        let exact = DamageSettings {
            apply_accuracy: false,
            ..DamageSettings::default()
        };

        let expected = expected_damage(&side, &side, &wild_swing, &BattleConditions::default(), &DamageSettings::default());
        let raw = expected_damage(&side, &side, &wild_swing, &BattleConditions::default(), &exact);

        assert!((expected - raw * 0.5).abs() < 1e-9);
    }

    #[rstest]
    #[case(100, 50.0, Some(2))]
    #[case(100, 100.0, Some(1))]
    #[case(100, 250.0, Some(1))]
    #[case(100, 33.4, Some(3))]
    #[case(100, 0.0, None)]
    fn test_ko_turns(#[case] hp: u16, #[case] damage: f64, #[case] expected: Option<u32>) {
        assert_eq!(ko_turns(hp, damage), expected);
    }
}
