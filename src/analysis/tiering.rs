//! Mapping phase ratios to ratings, tiers, scores and reasons.

use crate::config::{EngineConfig, PhaseWeights, RatingThresholds, ScoreWeights, TierBands};
use schema::{PhaseData, PhaseKind, PhaseRatios, Rating, Role, Tier};

/// Metrics a reason rule can look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    OneToOne,
    Risk,
    AceKill,
    Ohko,
    Outspeed,
    EnemyOhko,
    SafePivot,
    Wall,
    SafeSupport,
    CoverageRatio,
    SpeedControl,
}

impl Metric {
    fn value(self, ratios: &PhaseRatios) -> f64 {
        match self {
            Metric::OneToOne => ratios.one_to_one_rate,
            Metric::Risk => ratios.risk_rate,
            Metric::AceKill => ratios.ace_kill_rate,
            Metric::Ohko => ratios.ohko_rate,
            Metric::Outspeed => ratios.outspeed_rate,
            Metric::EnemyOhko => ratios.enemy_ohko_rate,
            Metric::SafePivot => ratios.safe_pivot_rate,
            Metric::Wall => ratios.wall_rate,
            Metric::SafeSupport => ratios
                .safe_buff_rate
                .max(ratios.safe_hazards_rate)
                .max(ratios.safe_status_rate),
            Metric::CoverageRatio => coverage_ratio(ratios),
            Metric::SpeedControl => ratios.speed_control_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    AtLeast,
    Below,
}

struct ReasonRule {
    metric: Metric,
    bound: Bound,
    threshold: f64,
    phrase: &'static str,
}

const fn rule(metric: Metric, bound: Bound, threshold: f64, phrase: &'static str) -> ReasonRule {
    ReasonRule {
        metric,
        bound,
        threshold,
        phrase,
    }
}

impl ReasonRule {
    fn matches(&self, ratios: &PhaseRatios) -> bool {
        let value = self.metric.value(ratios);
        match self.bound {
            Bound::AtLeast => value >= self.threshold,
            Bound::Below => value < self.threshold,
        }
    }
}

const GOOD_RULES: &[ReasonRule] = &[
    rule(Metric::OneToOne, Bound::AtLeast, 0.75, "wins most one-on-one matchups"),
    rule(Metric::AceKill, Bound::AtLeast, 0.66, "reliably beats boss aces"),
    rule(Metric::Ohko, Bound::AtLeast, 0.5, "OHKOs half the bosses or more"),
    rule(Metric::Outspeed, Bound::AtLeast, 0.75, "outspeeds most bosses"),
    rule(Metric::SafePivot, Bound::AtLeast, 0.9, "is almost never OHKO'd"),
    rule(Metric::CoverageRatio, Bound::AtLeast, 1.0, "covers all of its weaknesses"),
];

const AVG_RULES: &[ReasonRule] = &[
    rule(Metric::OneToOne, Bound::AtLeast, 0.5, "wins about half its matchups"),
    rule(Metric::AceKill, Bound::Below, 0.34, "struggles against boss aces"),
    rule(Metric::EnemyOhko, Bound::AtLeast, 0.34, "is often OHKO'd"),
    rule(Metric::Wall, Bound::AtLeast, 0.5, "walls many bosses"),
    rule(Metric::SafeSupport, Bound::AtLeast, 0.5, "can set up support safely"),
    rule(Metric::Outspeed, Bound::Below, 0.34, "is outsped by most bosses"),
    rule(Metric::SpeedControl, Bound::AtLeast, 1.0, "brings speed control"),
];

const BAD_RULES: &[ReasonRule] = &[
    rule(Metric::Risk, Bound::AtLeast, 0.6, "loses most one-on-one matchups"),
    rule(Metric::EnemyOhko, Bound::AtLeast, 0.5, "is OHKO'd by half the bosses or more"),
    rule(Metric::Ohko, Bound::Below, 0.1, "rarely OHKOs anything"),
    rule(Metric::Outspeed, Bound::Below, 0.25, "is outsped by almost every boss"),
    rule(Metric::CoverageRatio, Bound::Below, 0.34, "has poor coverage for its weaknesses"),
];

const MAX_REASONS: usize = 2;

fn coverage_ratio(ratios: &PhaseRatios) -> f64 {
    (ratios.coverage as f64 / ratios.weaknesses.max(1) as f64).min(1.0)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Explanation for a rating, built from the first rules of its bucket that hold.
pub fn reason(rating: Rating, ratios: &PhaseRatios) -> String {
    let (rules, fallback): (&[ReasonRule], &str) = match rating {
        Rating::Good => (GOOD_RULES, "solid results across the phase"),
        Rating::Avg => (AVG_RULES, "mixed results across the phase"),
        Rating::Bad => (BAD_RULES, "struggles against most bosses"),
        Rating::Unavailable => return "Not obtainable in time for this phase".to_string(),
    };

    let phrases: Vec<&str> = rules
        .iter()
        .filter(|r| r.matches(ratios))
        .take(MAX_REASONS)
        .map(|r| r.phrase)
        .collect();

    if phrases.is_empty() {
        capitalize(fallback)
    } else {
        capitalize(&phrases.join(" and "))
    }
}

pub fn phase_score(ratios: &PhaseRatios, weights: &ScoreWeights) -> f64 {
    let score = weights.one_to_one * ratios.one_to_one_rate
        + weights.ace_kill * ratios.ace_kill_rate
        + weights.safety * (1.0 - ratios.risk_rate)
        + weights.ohko * ratios.ohko_rate
        + weights.safe_pivot * ratios.safe_pivot_rate
        + weights.coverage * coverage_ratio(ratios);
    score.clamp(0.0, 1.0)
}

pub fn rating_for(score: f64, thresholds: &RatingThresholds) -> Rating {
    if score >= thresholds.good {
        Rating::Good
    } else if score >= thresholds.avg {
        Rating::Avg
    } else {
        Rating::Bad
    }
}

pub fn tier_for(score: f64, bands: &TierBands) -> Tier {
    if score >= bands.s {
        Tier::S
    } else if score >= bands.a {
        Tier::A
    } else if score >= bands.b {
        Tier::B
    } else if score >= bands.c {
        Tier::C
    } else if score >= bands.d {
        Tier::D
    } else {
        Tier::F
    }
}

/// Classify one phase. An unavailable phase scores zero whatever its ratios say.
pub fn classify_phase(ratios: PhaseRatios, available: bool, config: &EngineConfig) -> PhaseData {
    if !available {
        return PhaseData {
            rating: Rating::Unavailable,
            tier: Tier::NotAvailable,
            score: 0.0,
            reason: reason(Rating::Unavailable, &ratios),
            ratios,
        };
    }

    let score = phase_score(&ratios, &config.score_weights);
    let rating = rating_for(score, &config.rating_thresholds);
    PhaseData {
        rating,
        tier: tier_for(score, &config.tier_bands),
        score,
        reason: reason(rating, &ratios),
        ratios,
    }
}

fn phase_weight(kind: PhaseKind, weights: &PhaseWeights) -> f64 {
    match kind {
        PhaseKind::Early => weights.early,
        PhaseKind::Mid => weights.mid,
        PhaseKind::Late => weights.late,
    }
}

/// Weighted score over the available phases, renormalized to their weights.
pub fn overall_score(phases: &[(PhaseKind, &PhaseData)], weights: &PhaseWeights) -> Option<f64> {
    let (weighted, total) = phases
        .iter()
        .filter(|(_, data)| data.rating != Rating::Unavailable)
        .fold((0.0, 0.0), |(weighted, total), (kind, data)| {
            let weight = phase_weight(*kind, weights);
            (weighted + weight * data.score, total + weight)
        });

    if total > 0.0 {
        Some((weighted / total).clamp(0.0, 1.0))
    } else {
        None
    }
}

/// The role whose signal is strongest; ties keep the earlier role.
pub fn role_for(ratios: &PhaseRatios) -> Role {
    let candidates = [
        (Role::Sweeper, ratios.ohko_rate + ratios.outspeed_rate),
        (Role::Wall, ratios.wall_rate + ratios.safe_pivot_rate),
        (Role::Support, Metric::SafeSupport.value(ratios)),
        (Role::Staller, ratios.stall_rate),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    best.0
}
