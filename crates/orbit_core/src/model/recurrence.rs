//! Recurrence vocabulary for pulses.
//!
//! # Responsibility
//! - Name every recurrence kind a pulse can carry, including legacy tags.
//! - Classify kinds into per-day schedules and period-accumulative commitments.
//!
//! # Invariants
//! - Parsing never fails: unrecognized tags are kept as `Unknown` and are
//!   never active.
//! - Accumulative kinds always map to exactly one `CommitmentPeriod`.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Recurrence rule tag stored on a pulse.
///
/// `None` on the pulse and `Once` are equivalent (single occurrence).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceKind {
    Once,
    Daily,
    WeeklyFixedDays,
    DayInterval,
    WeeklyIntervalFixedDays,
    MonthlyFixedDay,
    MonthlyIntervalFixedDay,
    YearlyFixedDate,
    WeeklyAccumulative,
    WeeklyAccumulativeRecurrent,
    MonthlyAccumulative,
    MonthlyAccumulativeRecurrent,
    QuarterlyAccumulative,
    YearlyAccumulative,
    /// Tag not known to this build; evaluates as inactive everywhere.
    Unknown(String),
}

/// Window granularity of an accumulative commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentPeriod {
    Week,
    Month,
    Quarter,
    Year,
}

impl RecurrenceKind {
    /// Parses a stored tag. Accepts canonical and legacy spellings.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "ONCE" | "UNICA" => Self::Once,
            "DAILY" | "DIARIA" => Self::Daily,
            "WEEKLY_FIXED_DAYS" | "WEEKLY_DIAS_FIJOS" | "SEMANAL_DIAS_FIJOS" => {
                Self::WeeklyFixedDays
            }
            "DAY_INTERVAL" | "INTERVALO_DIAS" => Self::DayInterval,
            "WEEKLY_INTERVAL_FIXED_DAYS" | "INTERVALO_SEMANAL_DIAS_FIJOS" => {
                Self::WeeklyIntervalFixedDays
            }
            "MONTHLY_FIXED_DAY" | "MENSUAL_DIA_FIJO" => Self::MonthlyFixedDay,
            "MONTHLY_INTERVAL_FIXED_DAY" | "INTERVALO_MENSUAL_DIA_FIJO" => {
                Self::MonthlyIntervalFixedDay
            }
            "YEARLY_FIXED_DATE" | "ANUAL_FECHA_FIJA" => Self::YearlyFixedDate,
            "WEEKLY_ACCUMULATIVE" | "SEMANAL_ACUMULATIVO" => Self::WeeklyAccumulative,
            "WEEKLY_ACCUMULATIVE_RECURRENT" | "SEMANAL_ACUMULATIVO_RECURRENTE" => {
                Self::WeeklyAccumulativeRecurrent
            }
            "MONTHLY_ACCUMULATIVE" | "MENSUAL_ACUMULATIVO" => Self::MonthlyAccumulative,
            "MONTHLY_ACCUMULATIVE_RECURRENT" | "MENSUAL_ACUMULATIVO_RECURRENTE" => {
                Self::MonthlyAccumulativeRecurrent
            }
            "QUARTERLY_ACCUMULATIVE" | "TRIMESTRAL_ACUMULATIVO" => Self::QuarterlyAccumulative,
            "YEARLY_ACCUMULATIVE" | "ANUAL_ACUMULATIVO" => Self::YearlyAccumulative,
            _ => Self::Unknown(tag.to_string()),
        }
    }

    /// Canonical storage tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Once => "ONCE",
            Self::Daily => "DAILY",
            Self::WeeklyFixedDays => "WEEKLY_FIXED_DAYS",
            Self::DayInterval => "DAY_INTERVAL",
            Self::WeeklyIntervalFixedDays => "WEEKLY_INTERVAL_FIXED_DAYS",
            Self::MonthlyFixedDay => "MONTHLY_FIXED_DAY",
            Self::MonthlyIntervalFixedDay => "MONTHLY_INTERVAL_FIXED_DAY",
            Self::YearlyFixedDate => "YEARLY_FIXED_DATE",
            Self::WeeklyAccumulative => "WEEKLY_ACCUMULATIVE",
            Self::WeeklyAccumulativeRecurrent => "WEEKLY_ACCUMULATIVE_RECURRENT",
            Self::MonthlyAccumulative => "MONTHLY_ACCUMULATIVE",
            Self::MonthlyAccumulativeRecurrent => "MONTHLY_ACCUMULATIVE_RECURRENT",
            Self::QuarterlyAccumulative => "QUARTERLY_ACCUMULATIVE",
            Self::YearlyAccumulative => "YEARLY_ACCUMULATIVE",
            Self::Unknown(tag) => tag.as_str(),
        }
    }

    /// Accumulative kinds are evaluated per period, never per day.
    pub fn is_accumulative(&self) -> bool {
        self.commitment_period().is_some()
    }

    pub fn commitment_period(&self) -> Option<CommitmentPeriod> {
        match self {
            Self::WeeklyAccumulative | Self::WeeklyAccumulativeRecurrent => {
                Some(CommitmentPeriod::Week)
            }
            Self::MonthlyAccumulative | Self::MonthlyAccumulativeRecurrent => {
                Some(CommitmentPeriod::Month)
            }
            Self::QuarterlyAccumulative => Some(CommitmentPeriod::Quarter),
            Self::YearlyAccumulative => Some(CommitmentPeriod::Year),
            _ => None,
        }
    }

    /// Recurrent commitments only apply every `interval`-th period.
    pub fn is_recurrent_commitment(&self) -> bool {
        matches!(
            self,
            Self::WeeklyAccumulativeRecurrent | Self::MonthlyAccumulativeRecurrent
        )
    }
}

impl From<String> for RecurrenceKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<RecurrenceKind> for String {
    fn from(value: RecurrenceKind) -> Self {
        value.as_str().to_string()
    }
}

impl Display for RecurrenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of weekdays a fixed-days rule fires on.
///
/// Serialized as single-letter codes `L M X J V S D` (Monday..Sunday).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct WeekdaySet(u8);

const WEEKDAY_LETTERS: [(char, Weekday); 7] = [
    ('L', Weekday::Mon),
    ('M', Weekday::Tue),
    ('X', Weekday::Wed),
    ('J', Weekday::Thu),
    ('V', Weekday::Fri),
    ('S', Weekday::Sat),
    ('D', Weekday::Sun),
];

impl WeekdaySet {
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut set = Self::default();
        for day in days {
            set.insert(day);
        }
        set
    }

    /// Builds a set from letter codes; unrecognized codes are ignored.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(codes.into_iter().filter_map(|code| parse_weekday(code.as_ref())))
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Letter codes in Monday..Sunday order.
    pub fn codes(&self) -> Vec<String> {
        WEEKDAY_LETTERS
            .iter()
            .filter(|(_, day)| self.contains(*day))
            .map(|(letter, _)| letter.to_string())
            .collect()
    }
}

fn parse_weekday(code: &str) -> Option<Weekday> {
    let trimmed = code.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => WEEKDAY_LETTERS
            .iter()
            .find(|(candidate, _)| *candidate == letter.to_ascii_uppercase())
            .map(|(_, day)| *day),
        (Some(_), Some(_)) => trimmed.parse::<Weekday>().ok(),
        _ => None,
    }
}

impl From<Vec<String>> for WeekdaySet {
    fn from(value: Vec<String>) -> Self {
        Self::from_codes(value)
    }
}

impl From<WeekdaySet> for Vec<String> {
    fn from(value: WeekdaySet) -> Self {
        value.codes()
    }
}
