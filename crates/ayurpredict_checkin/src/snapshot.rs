//! The immutable answer set of one check-in session.

use std::collections::BTreeSet;

use crate::vocabulary::{Appetite, BowelMovement, Digestion, EnergyLevel, SleepQuality, StressLevel};

pub const DEFAULT_SLEEP_HOURS: f32 = 7.0;
pub const DEFAULT_HYDRATION_LITERS: u8 = 2;

/// Current answers for every step of the wizard.
///
/// Values are never edited in place: every change goes through
/// [`with`](CheckInSnapshot::with) or
/// [`toggle_symptom`](CheckInSnapshot::toggle_symptom), which return a new
/// snapshot. Range checks (sleep in `0..=12` hours, hydration in `0..=5` liters)
/// belong to the input surface and are not enforced here.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckInSnapshot {
    pub sleep_duration: f32,
    pub hydration: u8,
    pub sleep_quality: Option<SleepQuality>,
    pub stress_level: Option<StressLevel>,
    pub morning_energy: Option<EnergyLevel>,
    pub evening_energy: Option<EnergyLevel>,
    pub bowel_movement: Option<BowelMovement>,
    pub digestion: Option<Digestion>,
    pub appetite: Option<Appetite>,
    pub symptoms: BTreeSet<String>,
    pub mood: Option<String>,
    pub physical_activity: Option<String>,
}

impl Default for CheckInSnapshot {
    fn default() -> Self {
        Self {
            sleep_duration: DEFAULT_SLEEP_HOURS,
            hydration: DEFAULT_HYDRATION_LITERS,
            sleep_quality: None,
            stress_level: None,
            morning_energy: None,
            evening_energy: None,
            bowel_movement: None,
            digestion: None,
            appetite: None,
            symptoms: BTreeSet::new(),
            mood: None,
            physical_activity: None,
        }
    }
}

/// A single-field change, carrying the new value in that field's own type.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldUpdate {
    SleepDuration(f32),
    Hydration(u8),
    SleepQuality(SleepQuality),
    StressLevel(StressLevel),
    MorningEnergy(EnergyLevel),
    EveningEnergy(EnergyLevel),
    BowelMovement(BowelMovement),
    Digestion(Digestion),
    Appetite(Appetite),
    Symptoms(BTreeSet<String>),
    Mood(String),
    PhysicalActivity(String),
}

impl CheckInSnapshot {
    /// A copy of `self` with exactly one field replaced.
    #[must_use]
    pub fn with(&self, update: FieldUpdate) -> Self {
        let mut next = self.clone();
        match update {
            FieldUpdate::SleepDuration(v) => next.sleep_duration = v,
            FieldUpdate::Hydration(v) => next.hydration = v,
            FieldUpdate::SleepQuality(v) => next.sleep_quality = Some(v),
            FieldUpdate::StressLevel(v) => next.stress_level = Some(v),
            FieldUpdate::MorningEnergy(v) => next.morning_energy = Some(v),
            FieldUpdate::EveningEnergy(v) => next.evening_energy = Some(v),
            FieldUpdate::BowelMovement(v) => next.bowel_movement = Some(v),
            FieldUpdate::Digestion(v) => next.digestion = Some(v),
            FieldUpdate::Appetite(v) => next.appetite = Some(v),
            FieldUpdate::Symptoms(v) => next.symptoms = v,
            FieldUpdate::Mood(v) => next.mood = Some(v),
            FieldUpdate::PhysicalActivity(v) => next.physical_activity = Some(v),
        }
        next
    }

    /// Adds `label` to the symptom set, or removes it if already present.
    #[must_use]
    pub fn toggle_symptom(&self, label: &str) -> Self {
        let mut next = self.clone();
        if !next.symptoms.remove(label) {
            next.symptoms.insert(label.to_string());
        }
        next
    }

    pub fn has_symptom(&self, label: &str) -> bool {
        self.symptoms.contains(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CheckInSnapshot {
        CheckInSnapshot::default()
            .with(FieldUpdate::SleepQuality(SleepQuality::Moderate))
            .with(FieldUpdate::StressLevel(StressLevel::High))
            .with(FieldUpdate::Mood("Anxious".into()))
            .toggle_symptom("Cold Body")
    }

    #[test]
    fn defaults_match_a_fresh_wizard() {
        let s = CheckInSnapshot::default();
        assert_eq!(s.sleep_duration, 7.0);
        assert_eq!(s.hydration, 2);
        assert!(s.sleep_quality.is_none());
        assert!(s.appetite.is_none());
        assert!(s.symptoms.is_empty());
        assert!(s.mood.is_none() && s.physical_activity.is_none());
    }

    #[test]
    fn toggle_twice_is_a_no_op() {
        for base in [CheckInSnapshot::default(), filled()] {
            for label in ["Heat", "Cold Body", "Unlisted"] {
                assert_eq!(base.toggle_symptom(label).toggle_symptom(label), base);
            }
        }
    }

    #[test]
    fn toggle_sequence_keeps_only_odd_counts() {
        let s = CheckInSnapshot::default()
            .toggle_symptom("Heat")
            .toggle_symptom("Dryness")
            .toggle_symptom("Heat");
        assert_eq!(s.symptoms, BTreeSet::from(["Dryness".to_string()]));
        assert!(s.has_symptom("Dryness"));
        assert!(!s.has_symptom("Heat"));
    }

    /// Copies the field `update` targets from `from` into `into`.
    fn restore(
        update: &FieldUpdate,
        from: &CheckInSnapshot,
        mut into: CheckInSnapshot,
    ) -> CheckInSnapshot {
        match update {
            FieldUpdate::SleepDuration(_) => into.sleep_duration = from.sleep_duration,
            FieldUpdate::Hydration(_) => into.hydration = from.hydration,
            FieldUpdate::SleepQuality(_) => into.sleep_quality = from.sleep_quality,
            FieldUpdate::StressLevel(_) => into.stress_level = from.stress_level,
            FieldUpdate::MorningEnergy(_) => into.morning_energy = from.morning_energy,
            FieldUpdate::EveningEnergy(_) => into.evening_energy = from.evening_energy,
            FieldUpdate::BowelMovement(_) => into.bowel_movement = from.bowel_movement,
            FieldUpdate::Digestion(_) => into.digestion = from.digestion,
            FieldUpdate::Appetite(_) => into.appetite = from.appetite,
            FieldUpdate::Symptoms(_) => into.symptoms = from.symptoms.clone(),
            FieldUpdate::Mood(_) => into.mood = from.mood.clone(),
            FieldUpdate::PhysicalActivity(_) => {
                into.physical_activity = from.physical_activity.clone()
            }
        }
        into
    }

    #[test]
    fn with_changes_only_the_named_field() {
        let updates = [
            FieldUpdate::SleepDuration(5.0),
            FieldUpdate::Hydration(4),
            FieldUpdate::SleepQuality(SleepQuality::Good),
            FieldUpdate::StressLevel(StressLevel::Low),
            FieldUpdate::MorningEnergy(EnergyLevel::High),
            FieldUpdate::EveningEnergy(EnergyLevel::Low),
            FieldUpdate::BowelMovement(BowelMovement::Loose),
            FieldUpdate::Digestion(Digestion::Bloated),
            FieldUpdate::Appetite(Appetite::Strong),
            FieldUpdate::Symptoms(BTreeSet::from(["Heat".to_string()])),
            FieldUpdate::Mood("Calm".into()),
            FieldUpdate::PhysicalActivity("Intense".into()),
        ];
        for base in [CheckInSnapshot::default(), filled()] {
            for update in &updates {
                let next = base.with(update.clone());
                assert_ne!(next, base, "{update:?} changed nothing");
                assert_eq!(
                    restore(update, &base, next),
                    base,
                    "{update:?} leaked into another field"
                );
            }
        }
    }

    #[test]
    fn with_does_not_touch_the_original() {
        let base = CheckInSnapshot::default();
        let _ = base.with(FieldUpdate::MorningEnergy(EnergyLevel::High));
        assert_eq!(base, CheckInSnapshot::default());
    }

    #[test]
    fn out_of_range_values_are_stored_as_given() {
        let s = CheckInSnapshot::default()
            .with(FieldUpdate::Hydration(9))
            .with(FieldUpdate::SleepDuration(14.5));
        assert_eq!(s.hydration, 9);
        assert_eq!(s.sleep_duration, 14.5);
    }
}
