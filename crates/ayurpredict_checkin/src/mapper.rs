//! Translation from check-in answers to the scoring service's numeric scale.
//!
//! Only relative order inside each table matters to the service (poor sleep
//! scores below good sleep, and so on). An unanswered field maps to that
//! table's neutral value instead of blocking submission.

use ayurpredict_client::PredictionRequest;

use crate::snapshot::CheckInSnapshot;
use crate::vocabulary::{BowelMovement, Digestion, EnergyLevel, SleepQuality, StressLevel};

/// An answer set with a fixed integer score per answer.
pub trait ScoreTable: Copy + PartialEq + 'static {
    const TABLE: &'static [(Self, i32)];
    /// Score used when the question was skipped.
    const UNANSWERED: i32;

    fn score(self) -> i32 {
        Self::TABLE
            .iter()
            .find(|(v, _)| *v == self)
            .map(|(_, s)| *s)
            .unwrap_or(Self::UNANSWERED)
    }
}

impl ScoreTable for SleepQuality {
    const TABLE: &'static [(Self, i32)] = &[
        (SleepQuality::Poor, 3),
        (SleepQuality::Moderate, 5),
        (SleepQuality::Good, 8),
    ];
    const UNANSWERED: i32 = 5;
}

impl ScoreTable for StressLevel {
    const TABLE: &'static [(Self, i32)] = &[
        (StressLevel::Low, 2),
        (StressLevel::Medium, 5),
        (StressLevel::High, 9),
    ];
    const UNANSWERED: i32 = 5;
}

impl ScoreTable for EnergyLevel {
    const TABLE: &'static [(Self, i32)] = &[
        (EnergyLevel::Low, 3),
        (EnergyLevel::Normal, 6),
        (EnergyLevel::High, 9),
    ];
    const UNANSWERED: i32 = 5;
}

impl ScoreTable for Digestion {
    const TABLE: &'static [(Self, i32)] = &[
        (Digestion::Light, 3),
        (Digestion::Normal, 6),
        (Digestion::Heavy, 2),
        (Digestion::Bloated, 1),
    ];
    const UNANSWERED: i32 = 5;
}

impl ScoreTable for BowelMovement {
    const TABLE: &'static [(Self, i32)] = &[
        (BowelMovement::Regular, 6),
        (BowelMovement::DryHard, 3),
        (BowelMovement::Loose, 8),
        (BowelMovement::Heavy, 2),
    ];
    const UNANSWERED: i32 = 5;
}

pub fn score_or_default<T: ScoreTable>(answer: Option<T>) -> i32 {
    answer.map_or(T::UNANSWERED, T::score)
}

/// Numeric fields derived from a snapshot, before identity and placeholders
/// are attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreVector {
    pub sleep_quality: i32,
    pub stress_level: i32,
    /// Morning energy; the evening reading is not sent.
    pub energy_level: i32,
    pub digestion: i32,
    pub stool_type: i32,
    pub sleep_hours: f32,
    pub hydration: f32,
}

impl ScoreVector {
    pub fn from_snapshot(snapshot: &CheckInSnapshot) -> Self {
        Self {
            sleep_quality: score_or_default(snapshot.sleep_quality),
            stress_level: score_or_default(snapshot.stress_level),
            energy_level: score_or_default(snapshot.morning_energy),
            digestion: score_or_default(snapshot.digestion),
            stool_type: score_or_default(snapshot.bowel_movement),
            sleep_hours: snapshot.sleep_duration,
            hydration: f32::from(snapshot.hydration),
        }
    }

    pub fn into_request(self, user_id: i64, defaults: &PayloadDefaults) -> PredictionRequest {
        PredictionRequest {
            user_id,
            sleep_quality: self.sleep_quality,
            stress_level: self.stress_level,
            energy_level: self.energy_level,
            digestion: self.digestion,
            stool_type: self.stool_type,
            skin_condition: defaults.skin_condition,
            gender: defaults.gender,
            sleep_hours: self.sleep_hours,
            hydration: self.hydration,
        }
    }
}

/// Request fields the wizard does not collect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayloadDefaults {
    pub skin_condition: i32,
    pub gender: i32,
}

impl Default for PayloadDefaults {
    fn default() -> Self {
        Self {
            skin_condition: 5,
            gender: 1,
        }
    }
}
