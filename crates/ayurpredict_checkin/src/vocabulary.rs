//! Closed answer sets for the daily check-in.
//!
//! Each enum carries its display labels in one table; screens, answer files
//! and the score mapper all go through [`label`](SleepQuality::label) /
//! [`from_label`](SleepQuality::from_label) rather than re-declaring them.

macro_rules! signal_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every answer, in the order the wizard lists them.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Case-insensitive inverse of [`label`](Self::label).
            pub fn from_label(s: &str) -> Option<Self> {
                let s = s.trim();
                Self::ALL.iter().copied().find(|v| v.label().eq_ignore_ascii_case(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

signal_enum!(SleepQuality {
    Poor => "Poor",
    Moderate => "Moderate",
    Good => "Good",
});

signal_enum!(StressLevel {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

signal_enum!(
    /// Tracked separately for the morning and the evening.
    EnergyLevel {
        Low => "Low",
        Normal => "Normal",
        High => "High",
    }
);

signal_enum!(BowelMovement {
    Regular => "Regular",
    DryHard => "Dry/Hard",
    Loose => "Loose",
    Heavy => "Heavy",
});

signal_enum!(Digestion {
    Light => "Light",
    Normal => "Normal",
    Heavy => "Heavy",
    Bloated => "Bloated",
});

signal_enum!(Appetite {
    Low => "Low",
    Normal => "Normal",
    Strong => "Strong",
});

/// Body sensations offered on the multi-select step.
pub const SYMPTOMS: [&str; 6] = [
    "Dryness",
    "Heat",
    "Heaviness",
    "Cold Body",
    "Sweet Craving",
    "Spicy Craving",
];

/// `(label, description)` pairs for the mood step.
pub const MOODS: [(&str, &str); 4] = [
    ("Calm", "Peaceful and centered"),
    ("Irritable", "Easily annoyed or frustrated"),
    ("Anxious", "Worried and uneasy"),
    ("Low", "Feeling down or unmotivated"),
];

/// `(label, description)` pairs for the physical activity step.
pub const ACTIVITIES: [(&str, &str); 4] = [
    ("None", "No physical activity"),
    ("Light", "Gentle movement, like a walk"),
    ("Moderate", "Activities like brisk walking"),
    ("Intense", "Vigorous activities like running"),
];

/// Canonical spelling of `label` within `options`, if it is one of them.
pub fn canonical_label<'a>(options: impl IntoIterator<Item = &'a str>, label: &str) -> Option<&'a str> {
    let label = label.trim();
    options.into_iter().find(|o| o.eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_for_every_variant() {
        for v in BowelMovement::ALL {
            assert_eq!(BowelMovement::from_label(v.label()), Some(*v));
        }
        for v in Digestion::ALL {
            assert_eq!(Digestion::from_label(v.label()), Some(*v));
        }
    }

    #[test]
    fn from_label_ignores_case_and_whitespace() {
        assert_eq!(BowelMovement::from_label(" dry/hard "), Some(BowelMovement::DryHard));
        assert_eq!(SleepQuality::from_label("GOOD"), Some(SleepQuality::Good));
        assert_eq!(StressLevel::from_label("extreme"), None);
    }

    #[test]
    fn all_lists_follow_definition_order() {
        assert_eq!(
            SleepQuality::ALL,
            &[SleepQuality::Poor, SleepQuality::Moderate, SleepQuality::Good]
        );
        assert_eq!(Appetite::ALL.len(), 3);
        assert_eq!(EnergyLevel::High.to_string(), "High");
    }

    #[test]
    fn canonical_label_matches_fixed_lists() {
        assert_eq!(canonical_label(SYMPTOMS, "cold body"), Some("Cold Body"));
        assert_eq!(canonical_label(MOODS.iter().map(|(l, _)| *l), "calm"), Some("Calm"));
        assert_eq!(canonical_label(ACTIVITIES.iter().map(|(l, _)| *l), "sprinting"), None);
    }
}
