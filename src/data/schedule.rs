use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TIME_FORMAT: &str = "%H:%M";

pub const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];
pub const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

/// Set of selected weekdays, stored as a bitmask indexed from Monday.
/// Serializes as a list of day names (`[Mon, Tue, ...]`) in week order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct DaySet(u8);

impl DaySet {
    const FULL: u8 = 0b0111_1111;

    pub fn full() -> Self {
        DaySet(Self::FULL)
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn set(&mut self, day: Weekday, on: bool) {
        if on {
            self.0 |= Self::bit(day);
        } else {
            self.0 &= !Self::bit(day);
        }
    }

    pub fn set_all(&mut self, days: &[Weekday], on: bool) {
        for day in days {
            self.set(*day, on);
        }
    }

    pub fn toggle(&mut self, day: Weekday) {
        self.0 ^= Self::bit(day);
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_full(&self) -> bool {
        self.0 == Self::FULL
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL_DAYS.into_iter().filter(|d| self.contains(*d))
    }
}

impl From<Vec<Weekday>> for DaySet {
    fn from(days: Vec<Weekday>) -> Self {
        let mut set = DaySet::default();
        set.set_all(&days, true);
        set
    }
}

impl From<DaySet> for Vec<Weekday> {
    fn from(set: DaySet) -> Self {
        set.iter().collect()
    }
}

/// Reception operating hours: the canonical day set, the three cached group
/// flags the toggle buttons display, and the opening window.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperatingSchedule {
    #[serde(default)]
    pub days: DaySet,
    #[serde(default)]
    pub all_days: bool,
    #[serde(default)]
    pub weekdays: bool,
    #[serde(default)]
    pub weekend: bool,
    #[serde(default, with = "hh_mm")]
    pub from: Option<NaiveTime>,
    #[serde(default, with = "hh_mm")]
    pub to: Option<NaiveTime>,
}

impl Default for OperatingSchedule {
    fn default() -> Self {
        OperatingSchedule::with_hours(
            NaiveTime::from_hms_opt(9, 0, 0),
            NaiveTime::from_hms_opt(21, 0, 0),
        )
    }
}

impl OperatingSchedule {
    /// No days selected, no group flags, the given opening window.
    pub fn with_hours(from: Option<NaiveTime>, to: Option<NaiveTime>) -> Self {
        OperatingSchedule {
            days: DaySet::default(),
            all_days: false,
            weekdays: false,
            weekend: false,
            from,
            to,
        }
    }

    pub fn is_open_on(&self, day: Weekday) -> bool {
        self.days.contains(day)
    }

    /// True when at least one day or group flag is set.
    pub fn has_any_day(&self) -> bool {
        !self.days.is_empty() || self.all_days || self.weekdays || self.weekend
    }

    pub fn has_hours(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    pub fn bound(&self, bound: TimeBound) -> Option<NaiveTime> {
        match bound {
            TimeBound::From => self.from,
            TimeBound::To => self.to,
        }
    }
}

/// One of the ten toggle buttons on the operating-hours screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ToggleKey {
    AllDays,
    Weekdays,
    Weekend,
    Day(Weekday),
}

impl ToggleKey {
    /// Buttons in on-screen order: the group row, then MON..SUN.
    pub const ALL: [ToggleKey; 10] = [
        ToggleKey::AllDays,
        ToggleKey::Weekdays,
        ToggleKey::Weekend,
        ToggleKey::Day(Weekday::Mon),
        ToggleKey::Day(Weekday::Tue),
        ToggleKey::Day(Weekday::Wed),
        ToggleKey::Day(Weekday::Thu),
        ToggleKey::Day(Weekday::Fri),
        ToggleKey::Day(Weekday::Sat),
        ToggleKey::Day(Weekday::Sun),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ToggleKey::AllDays => "All Days",
            ToggleKey::Weekdays => "Weekdays",
            ToggleKey::Weekend => "Weekend",
            ToggleKey::Day(day) => day_label(*day),
        }
    }

    /// Whether the button renders as pressed for `schedule`.
    pub fn is_active(&self, schedule: &OperatingSchedule) -> bool {
        match self {
            ToggleKey::AllDays => schedule.all_days,
            ToggleKey::Weekdays => schedule.weekdays,
            ToggleKey::Weekend => schedule.weekend,
            ToggleKey::Day(day) => schedule.is_open_on(*day),
        }
    }
}

impl fmt::Display for ToggleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleKey::AllDays => write!(f, "all_days"),
            ToggleKey::Weekdays => write!(f, "weekdays"),
            ToggleKey::Weekend => write!(f, "weekend"),
            ToggleKey::Day(day) => write!(f, "{}", day_label(*day).to_lowercase()),
        }
    }
}

impl FromStr for ToggleKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "all_days" | "alldays" => Ok(ToggleKey::AllDays),
            "weekdays" => Ok(ToggleKey::Weekdays),
            "weekend" => Ok(ToggleKey::Weekend),
            other => other
                .parse::<Weekday>()
                .map(ToggleKey::Day)
                .map_err(|_| format!("unknown toggle key '{s}'")),
        }
    }
}

impl TryFrom<String> for ToggleKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToggleKey> for String {
    fn from(key: ToggleKey) -> Self {
        key.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBound {
    From,
    To,
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBound::From => write!(f, "from"),
            TimeBound::To => write!(f, "to"),
        }
    }
}

pub fn day_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

pub fn parse_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
}

pub fn format_time(t: NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// 12-hour clock rendering shown beside the time inputs, e.g. `9:00 AM`.
pub fn format_time_12h(t: NaiveTime) -> String {
    let (is_pm, hour) = t.hour12();
    let suffix = if is_pm { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour, t.minute(), suffix)
}

/// `Option<NaiveTime>` as `"HH:MM"`; a missing, null or blank value is `None`.
pub(crate) mod hh_mm {
    use super::{format_time, parse_time};
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_some(&format_time(*t)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse_time(s).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
