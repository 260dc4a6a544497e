//! Values derived from dashboard and profile data for display.

use std::collections::BTreeSet;

use ayurpredict_client::{DashboardResponse, Dosha, DoshaScore};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Streak length that fills the consistency bar.
pub const STREAK_GOAL: u32 = 10;

/// Full years between `dob` (`YYYY-MM-DD`) and `today`.
pub fn age_from_dob(dob: &str, today: NaiveDate) -> Option<u32> {
    let birth = NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d").ok()?;
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendDirection {
    /// The dosha is increasing (aggravated).
    Rising,
    Easing,
}

impl TrendDirection {
    pub fn of(change: i32) -> Self {
        if change > 0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Easing
        }
    }
}

/// `+5%`, `-3%`, `0%`.
pub fn format_trend(change: i32) -> String {
    if change > 0 {
        format!("+{change}%")
    } else {
        format!("{change}%")
    }
}

/// One dosha's slice of a dashboard: current score, recent change and graph points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoshaSeries {
    pub dosha: Dosha,
    pub score: i32,
    pub change: i32,
    pub history: Vec<i32>,
}

impl DoshaSeries {
    pub fn from_dashboard(dashboard: &DashboardResponse, dosha: Dosha) -> Self {
        Self {
            dosha,
            score: dashboard
                .current
                .as_ref()
                .map_or(0, |c| c.score_for(dosha)),
            change: dashboard.trends.change_for(dosha),
            history: dashboard.history.iter().map(|h| h.score_for(dosha)).collect(),
        }
    }

    pub fn direction(&self) -> TrendDirection {
        TrendDirection::of(self.change)
    }

    pub fn trend_label(&self) -> String {
        format_trend(self.change)
    }
}

/// Each dosha's share of the total, rounded to whole percent.
pub fn percentages(score: &DoshaScore) -> [(Dosha, u32); 3] {
    let values = Dosha::ALL.map(|d| score.score_for(d).max(0));
    let total: i32 = values.iter().sum();
    let mut out = [(Dosha::Vata, 0), (Dosha::Pitta, 0), (Dosha::Kapha, 0)];
    if total == 0 {
        return out;
    }
    for (slot, value) in out.iter_mut().zip(values) {
        slot.1 = ((f64::from(value) * 100.0) / f64::from(total)).round() as u32;
    }
    out
}

fn parse_day(timestamp: &str) -> Option<NaiveDate> {
    let t = timestamp.trim();
    if let Ok(d) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(t) {
        return Some(dt.date_naive());
    }
    None
}

/// Consecutive days with at least one check-in, ending today or yesterday.
///
/// A missed yesterday breaks the streak; an unfinished today does not.
pub fn streak_from_dates<'a>(dates: impl IntoIterator<Item = &'a str>, today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = dates.into_iter().filter_map(parse_day).collect();
    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

/// Fill of the consistency bar, in `0.0..=1.0`.
pub fn consistency_progress(streak: u32) -> f32 {
    (streak as f32 / STREAK_GOAL as f32).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Badge {
    pub title: &'static str,
    pub days: u32,
}

pub const BADGES: [Badge; 3] = [
    Badge {
        title: "3-Day Streak",
        days: 3,
    },
    Badge {
        title: "7-Day Streak",
        days: 7,
    },
    Badge {
        title: "14-Day Streak",
        days: 14,
    },
];

impl Badge {
    pub fn unlocked(&self, streak: u32) -> bool {
        streak >= self.days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_dashboard;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn age_counts_completed_years() {
        let today = day("2026-10-17");
        assert_eq!(age_from_dob("1990-10-17", today), Some(36));
        assert_eq!(age_from_dob("1990-10-18", today), Some(35));
        assert_eq!(age_from_dob("2026-10-17", today), Some(0));
        assert_eq!(age_from_dob("2027-01-01", today), None);
        assert_eq!(age_from_dob("", today), None);
        assert_eq!(age_from_dob("17/10/1990", today), None);
    }

    #[test]
    fn leap_day_birthdays_turn_over_on_march_first() {
        assert_eq!(age_from_dob("2000-02-29", day("2026-02-28")), Some(25));
        assert_eq!(age_from_dob("2000-02-29", day("2026-03-01")), Some(26));
    }

    #[test]
    fn trend_formatting_and_direction() {
        assert_eq!(format_trend(5), "+5%");
        assert_eq!(format_trend(-3), "-3%");
        assert_eq!(format_trend(0), "0%");
        assert_eq!(TrendDirection::of(1), TrendDirection::Rising);
        assert_eq!(TrendDirection::of(0), TrendDirection::Easing);
    }

    #[test]
    fn series_selects_one_dosha() {
        let d = sample_dashboard();
        let pitta = DoshaSeries::from_dashboard(&d, Dosha::Pitta);
        assert_eq!(pitta.score, 30);
        assert_eq!(pitta.history, vec![35, 33, 30]);
        assert_eq!(pitta.trend_label(), "-5%");
        assert_eq!(pitta.direction(), TrendDirection::Easing);

        let empty = DoshaSeries::from_dashboard(&DashboardResponse::default(), Dosha::Kapha);
        assert_eq!(empty.score, 0);
        assert!(empty.history.is_empty());
    }

    #[test]
    fn percentages_split_the_total() {
        let s = DoshaScore {
            vata_score: 45,
            pitta_score: 30,
            kapha_score: 25,
            created_at: String::new(),
        };
        assert_eq!(
            percentages(&s),
            [(Dosha::Vata, 45), (Dosha::Pitta, 30), (Dosha::Kapha, 25)]
        );
        assert_eq!(
            percentages(&DoshaScore::default()),
            [(Dosha::Vata, 0), (Dosha::Pitta, 0), (Dosha::Kapha, 0)]
        );
    }

    #[test]
    fn streak_counts_back_from_today_or_yesterday() {
        let today = day("2026-10-17");
        let dates = [
            "2026-10-17 07:30:00",
            "2026-10-16T21:00:00Z",
            "2026-10-16 08:00:00",
            "2026-10-15",
            "2026-10-13",
            "garbage",
        ];
        assert_eq!(streak_from_dates(dates, today), 3);
        assert_eq!(streak_from_dates(["2026-10-16", "2026-10-15"], today), 2);
        assert_eq!(streak_from_dates(["2026-10-15"], today), 0);
        assert_eq!(streak_from_dates([], today), 0);
    }

    #[test]
    fn consistency_and_badges() {
        assert_eq!(consistency_progress(0), 0.0);
        assert_eq!(consistency_progress(5), 0.5);
        assert_eq!(consistency_progress(25), 1.0);
        let unlocked: Vec<&str> = BADGES
            .iter()
            .filter(|b| b.unlocked(7))
            .map(|b| b.title)
            .collect();
        assert_eq!(unlocked, vec!["3-Day Streak", "7-Day Streak"]);
    }
}
