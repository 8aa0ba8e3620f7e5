use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Early,
    Mid,
    Late,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 3] = [PhaseKind::Early, PhaseKind::Mid, PhaseKind::Late];
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Early => write!(f, "early"),
            PhaseKind::Mid => write!(f, "mid"),
            PhaseKind::Late => write!(f, "late"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Unavailable,
    Bad,
    Avg,
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    F,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::NotAvailable => write!(f, "N/A"),
            other => write!(f, "{:?}", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Sweeper,
    Wall,
    Support,
    Staller,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Postgame,
    Unavailable,
}

/// Named performance ratios for one phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRatios {
    pub one_to_one_rate: f64,
    pub risk_rate: f64,
    #[serde(rename = "OHKoRate")]
    pub ohko_rate: f64,
    pub outspeed_rate: f64,
    #[serde(rename = "enemyOHKORate")]
    pub enemy_ohko_rate: f64,
    pub ace_kill_rate: f64,
    pub safe_pivot_rate: f64,
    pub risky_pivot_rate: f64,
    pub wall_rate: f64,
    pub stall_rate: f64,
    pub safe_buff_rate: f64,
    pub safe_hazards_rate: f64,
    pub safe_status_rate: f64,
    pub coverage: u32,
    pub weaknesses: u32,
    pub weakness_coverage: u32,
    pub speed_control_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseData {
    pub rating: Rating,
    pub tier: Tier,
    pub score: f64,
    pub reason: String,
    pub ratios: PhaseRatios,
}
