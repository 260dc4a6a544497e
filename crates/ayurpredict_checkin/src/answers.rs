//! Recorded check-in answers, replayed through the wizard one step at a time.

use std::path::Path;

use ayurpredict_client::PredictionResponse;
use serde::Deserialize;
use tracing::debug;

use crate::checkin::CheckInSession;
use crate::error::{CheckInError, CheckInResult};
use crate::sequencer::{Step, StepField};
use crate::snapshot::FieldUpdate;
use crate::vocabulary::{
    ACTIVITIES, Appetite, BowelMovement, Digestion, EnergyLevel, MOODS, SYMPTOMS, SleepQuality,
    StressLevel, canonical_label,
};

/// Answers as labels shown in the wizard; anything left out stays unanswered.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckInAnswers {
    pub sleep_hours: Option<f32>,
    pub sleep_quality: Option<String>,
    pub stress_level: Option<String>,
    pub morning_energy: Option<String>,
    pub evening_energy: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub bowel_movement: Option<String>,
    pub hydration: Option<u8>,
    pub mood: Option<String>,
    pub physical_activity: Option<String>,
    pub digestion: Option<String>,
    pub appetite: Option<String>,
}

/// What the user does on one step.
#[derive(Clone, Debug, PartialEq)]
pub enum StepInput {
    Select(FieldUpdate),
    Toggle(String),
}

fn parse<T>(field: &str, value: &Option<String>, from_label: fn(&str) -> Option<T>) -> CheckInResult<Option<T>> {
    value
        .as_deref()
        .map(|label| {
            from_label(label)
                .ok_or_else(|| CheckInError::Validation(format!("unknown {field} answer: {label}")))
        })
        .transpose()
}

fn pick(field: &str, value: &Option<String>, options: &[(&'static str, &str)]) -> CheckInResult<Option<String>> {
    value
        .as_deref()
        .map(|label| {
            canonical_label(options.iter().map(|(l, _)| *l), label)
                .map(str::to_string)
                .ok_or_else(|| CheckInError::Validation(format!("unknown {field} answer: {label}")))
        })
        .transpose()
}

impl CheckInAnswers {
    pub fn from_json(text: &str) -> CheckInResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> CheckInResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Inputs for the step editing `field`, validated against the fixed vocabularies.
    pub fn inputs_for(&self, field: StepField) -> CheckInResult<Vec<StepInput>> {
        let select =
            |u: Option<FieldUpdate>| -> Vec<StepInput> { u.into_iter().map(StepInput::Select).collect() };
        Ok(match field {
            StepField::SleepDuration => select(self.sleep_hours.map(FieldUpdate::SleepDuration)),
            StepField::SleepQuality => select(
                parse("sleep_quality", &self.sleep_quality, SleepQuality::from_label)?
                    .map(FieldUpdate::SleepQuality),
            ),
            StepField::StressLevel => select(
                parse("stress_level", &self.stress_level, StressLevel::from_label)?
                    .map(FieldUpdate::StressLevel),
            ),
            StepField::MorningEnergy => select(
                parse("morning_energy", &self.morning_energy, EnergyLevel::from_label)?
                    .map(FieldUpdate::MorningEnergy),
            ),
            StepField::EveningEnergy => select(
                parse("evening_energy", &self.evening_energy, EnergyLevel::from_label)?
                    .map(FieldUpdate::EveningEnergy),
            ),
            StepField::Symptoms => self
                .symptoms
                .iter()
                .map(|s| {
                    canonical_label(SYMPTOMS, s)
                        .map(|l| StepInput::Toggle(l.to_string()))
                        .ok_or_else(|| CheckInError::Validation(format!("unknown symptom: {s}")))
                })
                .collect::<CheckInResult<Vec<_>>>()?,
            StepField::BowelMovement => select(
                parse("bowel_movement", &self.bowel_movement, BowelMovement::from_label)?
                    .map(FieldUpdate::BowelMovement),
            ),
            StepField::Hydration => select(self.hydration.map(FieldUpdate::Hydration)),
            StepField::Mood => select(pick("mood", &self.mood, &MOODS)?.map(FieldUpdate::Mood)),
            StepField::PhysicalActivity => select(
                pick("physical_activity", &self.physical_activity, &ACTIVITIES)?
                    .map(FieldUpdate::PhysicalActivity),
            ),
            StepField::Digestion => select(
                parse("digestion", &self.digestion, Digestion::from_label)?
                    .map(FieldUpdate::Digestion),
            ),
            StepField::Appetite => select(
                parse("appetite", &self.appetite, Appetite::from_label)?.map(FieldUpdate::Appetite),
            ),
        })
    }

    /// Every step's inputs in wizard order. Fails before anything is applied.
    pub fn plan(&self) -> CheckInResult<Vec<(Step, Vec<StepInput>)>> {
        Step::all()
            .map(|step| Ok((step, self.inputs_for(step.field())?)))
            .collect()
    }

    /// Walk a fresh wizard from step 1, answering each step and pressing "Next"
    /// until the last step submits.
    pub async fn replay(&self, checkin: &CheckInSession) -> CheckInResult<Option<PredictionResponse>> {
        let plan = self.plan()?;
        checkin.start_new();
        for (step, inputs) in plan {
            debug!(%step, title = step.title(), "answering");
            for input in inputs {
                match input {
                    StepInput::Select(update) => checkin.select(update),
                    StepInput::Toggle(label) => {
                        // selecting a sensation twice would clear it again
                        if !checkin.snapshot().has_symptom(&label) {
                            checkin.toggle_symptom(&label);
                        }
                    }
                }
            }
            checkin.advance_or_submit().await?;
        }
        Ok(checkin.result())
    }
}
