// Schedule slot labels such as "Thursday at 9:00 AM".
// The label is a display string that doubles as a sort key.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tte::ConventionEvent;

/// Weekday ranks. Monday and Tuesday are not consecutive; only relative order matters.
const DAY_ORDER: [(&str, u8); 7] = [
    ("Monday", 0),
    ("Tuesday", 2),
    ("Wednesday", 3),
    ("Thursday", 4),
    ("Friday", 5),
    ("Saturday", 6),
    ("Sunday", 7),
];

/// A schedule slot label: `<Weekday> at <Hour>:<Minute> <AM|PM>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Daytime(String);

impl Daytime {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `self` sorts strictly before `other`.
    pub fn compare(&self, other: &Daytime) -> bool {
        compare_schedule_slots(self.as_str(), other.as_str())
    }

    /// Whether the label reads `<known weekday> at <hour>:<minute> <meridiem>`
    /// with a canonical hour.
    pub fn is_well_formed(&self) -> bool {
        let parts: Vec<&str> = self.0.split_whitespace().collect();
        if parts.len() < 4 || !DAY_ORDER.iter().any(|(day, _)| *day == parts[0]) {
            return false;
        }
        match split_time(parts[2]) {
            (hour, Some(_)) => hour
                .parse::<u32>()
                .is_ok_and(|h| h.to_string() == hour),
            (_, None) => false,
        }
    }

    /// Total order used for sorting.
    ///
    /// Well-formed labels follow [`Daytime::compare`], with labels it cannot
    /// separate ordered as text. Every other label sorts after them, as text.
    pub fn ordering(&self, other: &Daytime) -> Ordering {
        match (self.is_well_formed(), other.is_well_formed()) {
            (true, true) => {
                if self.compare(other) {
                    Ordering::Less
                } else if other.compare(self) {
                    Ordering::Greater
                } else {
                    self.0.cmp(&other.0)
                }
            }
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl From<&str> for Daytime {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl fmt::Display for Daytime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true iff slot label `a` sorts strictly before `b`.
///
/// Order: weekday rank, then the AM/PM token, then the hour numerically, then the
/// minute text. Labels with fewer than four tokens compare as plain strings.
pub fn compare_schedule_slots(a: &str, b: &str) -> bool {
    let a_parts: Vec<&str> = a.split_whitespace().collect();
    let b_parts: Vec<&str> = b.split_whitespace().collect();
    if a_parts.len() < 4 || b_parts.len() < 4 {
        return a < b;
    }

    if a_parts[0] != b_parts[0] {
        return day_rank(a_parts[0]) < day_rank(b_parts[0]);
    }

    if a_parts[3] != b_parts[3] {
        return a_parts[3] < b_parts[3];
    }

    let (a_hour, a_minute) = split_time(a_parts[2]);
    let (b_hour, b_minute) = split_time(b_parts[2]);
    if a_hour != b_hour {
        return parse_hour(a_hour) < parse_hour(b_hour);
    }

    // Minutes compare as text, so "30" sorts before "4".
    if a_parts[2].len() > 1 && b_parts[2].len() > 1 {
        if let (Some(a_minute), Some(b_minute)) = (a_minute, b_minute) {
            return a_minute < b_minute;
        }
    }

    a < b
}

/// Sort events by schedule slot, breaking ties by name.
/// Unscheduled or malformed slots go last.
pub fn sort_events(events: &mut [ConventionEvent]) {
    events.sort_by(|a, b| {
        a.startdaypart_name
            .ordering(&b.startdaypart_name)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Unknown weekdays rank with Monday.
fn day_rank(day: &str) -> u8 {
    DAY_ORDER
        .iter()
        .find(|(name, _)| *name == day)
        .map(|(_, rank)| *rank)
        .unwrap_or(0)
}

fn split_time(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((hour, minute)) => (hour, Some(minute)),
        None => (token, None),
    }
}

fn parse_hour(hour: &str) -> u32 {
    hour.parse().unwrap_or(0)
}
