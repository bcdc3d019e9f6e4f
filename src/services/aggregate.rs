//! Aggregation over entry snapshots
//!
//! Pure functions: totals, financial metrics, date-range filtering and
//! grouping by day, week or month. Nothing here touches storage.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{MilkError, MilkResult};
use crate::models::{Entry, Granularity};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Sum of quantities; 0 for no entries
pub fn total_quantity(entries: &[Entry]) -> f64 {
    entries.iter().map(|e| e.quantity).sum()
}

/// Number of distinct calendar days represented
pub fn unique_day_count(entries: &[Entry]) -> usize {
    entries.iter().map(Entry::day).collect::<HashSet<_>>().len()
}

/// Sum of animal counts
pub fn total_animal_units(entries: &[Entry]) -> u64 {
    entries.iter().map(|e| u64::from(e.animal_count)).sum()
}

/// Derived financial metrics for a set of entries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub total_quantity: f64,
    pub total_revenue: f64,
    pub avg_daily_revenue: f64,
    pub avg_per_animal: f64,
}

/// Compute financial metrics at the given price per kilogram
///
/// Divisors of zero yield a zero metric rather than NaN.
pub fn financials(entries: &[Entry], milk_price: f64) -> Financials {
    let total_quantity = total_quantity(entries);
    let total_revenue = total_quantity * milk_price;

    let days = unique_day_count(entries);
    let avg_daily_revenue = if days == 0 {
        0.0
    } else {
        total_revenue / days as f64
    };

    let animals = total_animal_units(entries);
    let avg_per_animal = if animals == 0 {
        0.0
    } else {
        total_quantity / animals as f64
    };

    Financials {
        total_quantity,
        total_revenue,
        avg_daily_revenue,
        avg_per_animal,
    }
}

/// Last representable instant of the calendar day containing `at`
pub fn end_of_day(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(last_instant_of_day())
}

/// 23:59:59.999999999; `NaiveTime` subtraction wraps around midnight
fn last_instant_of_day() -> NaiveTime {
    NaiveTime::MIN - Duration::nanoseconds(1)
}

/// Midnight at the start of the year containing `at`
fn start_of_year(at: NaiveDateTime) -> NaiveDateTime {
    let jan1 = at.date() - Duration::days(i64::from(at.ordinal0()));
    jan1.and_time(NaiveTime::MIN)
}

/// Entries dated within `[start, end]`, with `end` extended through its day
///
/// Input order is preserved.
pub fn filter_by_date_range(
    entries: &[Entry],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> MilkResult<Vec<Entry>> {
    let end_bound = end_of_day(end);
    if start > end_bound {
        return Err(MilkError::InvalidRange { start, end });
    }

    Ok(entries
        .iter()
        .filter(|e| e.date >= start && e.date <= end_bound)
        .cloned()
        .collect())
}

/// Week-of-year used by weekly reports
///
/// `ceil((days since Jan 1 00:00 + weekday of Jan 1 (Sunday = 0) + 1) / 7)`,
/// where elapsed days are fractional. This is not ISO 8601 numbering.
pub fn week_number(at: NaiveDateTime) -> u32 {
    let jan1 = start_of_year(at);

    let elapsed = (at - jan1).num_milliseconds() as f64 / MILLIS_PER_DAY;
    let offset = f64::from(jan1.weekday().num_days_from_sunday());

    ((elapsed + offset + 1.0) / 7.0).ceil() as u32
}

/// Identity of a report group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl GroupKey {
    /// Bucket a timestamp at the given granularity
    pub fn for_timestamp(at: NaiveDateTime, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Daily => GroupKey::Day(at.date()),
            Granularity::Weekly => GroupKey::Week {
                year: at.year(),
                week: week_number(at),
            },
            Granularity::Monthly => GroupKey::Month {
                year: at.year(),
                month: at.month(),
            },
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Day(date) => write!(f, "{}", date.format("%-d/%-m/%Y")),
            GroupKey::Week { year, week } => write!(f, "Week {}, {}", week, year),
            GroupKey::Month { year, month } => match NaiveDate::from_ymd_opt(*year, *month, 1) {
                Some(first) => write!(f, "{}", first.format("%B %Y")),
                None => write!(f, "{}-{:02}", year, month),
            },
        }
    }
}

/// Accumulated totals for one group
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: GroupKey,
    pub quantity: f64,
    pub animal_count: u64,
    pub entries: usize,
}

impl Group {
    fn new(key: GroupKey) -> Self {
        Self {
            key,
            quantity: 0.0,
            animal_count: 0,
            entries: 0,
        }
    }

    /// Mean animal count per entry, rounded to the nearest whole animal
    pub fn avg_animal_count(&self) -> u64 {
        if self.entries == 0 {
            return 0;
        }
        (self.animal_count as f64 / self.entries as f64).round() as u64
    }

    /// Quantity per animal across the group
    pub fn per_animal(&self) -> f64 {
        if self.animal_count == 0 {
            return 0.0;
        }
        self.quantity / self.animal_count as f64
    }
}

/// Bucket entries by granularity
///
/// Groups appear in order of their first occurrence in `entries`; sort the
/// input beforehand for chronological output.
pub fn group_by(entries: &[Entry], granularity: Granularity) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for entry in entries {
        let key = GroupKey::for_timestamp(entry.date, granularity);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Group::new(key));
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.quantity += entry.quantity;
        group.animal_count += u64::from(entry.animal_count);
        group.entries += 1;
    }

    tracing::debug!(
        entries = entries.len(),
        groups = groups.len(),
        %granularity,
        "Grouped entries"
    );

    groups
}
