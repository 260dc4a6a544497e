//! Linear twelve-step wizard position.

use crate::error::{CheckInError, CheckInResult};

pub const TOTAL_STEPS: u8 = 12;

/// The answer a step edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepField {
    SleepDuration,
    SleepQuality,
    StressLevel,
    MorningEnergy,
    EveningEnergy,
    Symptoms,
    BowelMovement,
    Hydration,
    Mood,
    PhysicalActivity,
    Digestion,
    Appetite,
}

struct StepInfo {
    field: StepField,
    title: &'static str,
    question: &'static str,
}

const STEPS: [StepInfo; TOTAL_STEPS as usize] = [
    StepInfo {
        field: StepField::SleepDuration,
        title: "Sleep hours",
        question: "How many hours did you sleep last night?",
    },
    StepInfo {
        field: StepField::SleepQuality,
        title: "Sleep Quality",
        question: "How was your sleep quality?",
    },
    StepInfo {
        field: StepField::StressLevel,
        title: "Stress level",
        question: "How stressed are you feeling today?",
    },
    StepInfo {
        field: StepField::MorningEnergy,
        title: "Morning Energy",
        question: "How are you feeling this morning?",
    },
    StepInfo {
        field: StepField::EveningEnergy,
        title: "Evening Energy",
        question: "How are you feeling this evening?",
    },
    StepInfo {
        field: StepField::Symptoms,
        title: "Body Sensations",
        question: "How does your body feel today?",
    },
    StepInfo {
        field: StepField::BowelMovement,
        title: "Bowel Movement",
        question: "What was your bowel movement like today?",
    },
    StepInfo {
        field: StepField::Hydration,
        title: "Hydration",
        question: "How much water did you drink today?",
    },
    StepInfo {
        field: StepField::Mood,
        title: "Mood",
        question: "How are you feeling today?",
    },
    StepInfo {
        field: StepField::PhysicalActivity,
        title: "Physical Activity",
        question: "How active were you today?",
    },
    StepInfo {
        field: StepField::Digestion,
        title: "Digestion",
        question: "How was your digestion today?",
    },
    StepInfo {
        field: StepField::Appetite,
        title: "Appetite Level",
        question: "How would you describe your appetite today?",
    },
];

/// A wizard position, always within `1..=12`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Step(u8);

impl Step {
    pub const FIRST: Step = Step(1);
    pub const LAST: Step = Step(TOTAL_STEPS);

    pub fn new(index: u8) -> CheckInResult<Self> {
        if (1..=TOTAL_STEPS).contains(&index) {
            Ok(Step(index))
        } else {
            Err(CheckInError::Validation(format!(
                "step {index} is outside 1..={TOTAL_STEPS}"
            )))
        }
    }

    /// Every step in wizard order.
    pub fn all() -> impl Iterator<Item = Step> {
        (1..=TOTAL_STEPS).map(Step)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    fn info(self) -> &'static StepInfo {
        &STEPS[usize::from(self.0 - 1)]
    }

    pub fn field(self) -> StepField {
        self.info().field
    }

    pub fn title(self) -> &'static str {
        self.info().title
    }

    pub fn question(self) -> &'static str {
        self.info().question
    }

    /// Fraction of the wizard reached, `1/12` on the first step and `1.0` on the last.
    pub fn progress(self) -> f32 {
        f32::from(self.0) / f32::from(TOTAL_STEPS)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Step {} of {}", self.0, TOTAL_STEPS)
    }
}

/// Result of pressing "Next".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Moved(Step),
    /// Already on the last step; control passes to the submission gate.
    Complete,
}

/// Forward/back navigation with no skipping and no answer validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sequencer {
    current: Step,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self { current: Step::FIRST }
    }
}

impl Sequencer {
    pub fn current(&self) -> Step {
        self.current
    }

    pub fn advance(&mut self) -> Advance {
        if self.current.is_last() {
            return Advance::Complete;
        }
        self.current = Step(self.current.0 + 1);
        Advance::Moved(self.current)
    }

    /// Steps back one position; returns `false` on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.current == Step::FIRST {
            return false;
        }
        self.current = Step(self.current.0 - 1);
        true
    }

    pub fn can_retreat(&self) -> bool {
        self.current != Step::FIRST
    }

    pub fn reset(&mut self) {
        self.current = Step::FIRST;
    }
}
