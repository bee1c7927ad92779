use crate::error::{EngineError, EngineResult};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Day-level calendar for one locality: which dates count as working days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCalendar {
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCalendarConfig {
    pub working_days: Vec<Weekday>,
    pub holidays: Vec<NaiveDate>,
}

impl Default for DayCalendar {
    fn default() -> Self {
        Self::with_us_holidays(2025, 2025)
    }
}

impl DayCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Mon-Fri work week with US federal holidays across a year range.
    pub fn with_us_holidays(start_year: i32, end_year: i32) -> Self {
        let (start, end) = if start_year <= end_year {
            (start_year, end_year)
        } else {
            (end_year, start_year)
        };

        let mut calendar = Self {
            holidays: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        };
        for year in start..=end {
            calendar.add_us_holidays(year);
        }
        calendar
    }

    /// Mon-Fri work week with no holidays.
    pub fn weekdays_only() -> Self {
        Self {
            holidays: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }

    pub fn custom<I, J>(working_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let config = DayCalendarConfig {
            working_days: working_days.into_iter().collect(),
            holidays: holidays.into_iter().collect(),
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &DayCalendarConfig) -> Self {
        let working_set: HashSet<Weekday> = config.working_days.iter().copied().collect();
        if working_set.is_empty() {
            panic!("DayCalendar requires at least one working day");
        }
        let mut non_working_days = HashSet::new();
        for day in Self::ALL_WEEKDAYS {
            if !working_set.contains(&day) {
                non_working_days.insert(day);
            }
        }

        Self {
            holidays: config.holidays.iter().copied().collect(),
            non_working_days,
        }
    }

    /// Add standard US federal holidays for a given year
    fn add_us_holidays(&mut self, year: i32) {
        // New Year's Day
        self.holidays
            .insert(NaiveDate::from_ymd_opt(year, 1, 1).unwrap());

        // Martin Luther King Jr. Day (3rd Monday in January)
        self.holidays
            .insert(Self::nth_weekday(year, 1, Weekday::Mon, 3));

        // Presidents' Day (3rd Monday in February)
        self.holidays
            .insert(Self::nth_weekday(year, 2, Weekday::Mon, 3));

        // Memorial Day (last Monday in May)
        self.holidays
            .insert(Self::last_weekday(year, 5, Weekday::Mon));

        // Independence Day
        self.holidays
            .insert(NaiveDate::from_ymd_opt(year, 7, 4).unwrap());

        // Labor Day (1st Monday in September)
        self.holidays
            .insert(Self::nth_weekday(year, 9, Weekday::Mon, 1));

        // Columbus Day (2nd Monday in October)
        self.holidays
            .insert(Self::nth_weekday(year, 10, Weekday::Mon, 2));

        // Veterans Day
        self.holidays
            .insert(NaiveDate::from_ymd_opt(year, 11, 11).unwrap());

        // Thanksgiving (4th Thursday in November)
        self.holidays
            .insert(Self::nth_weekday(year, 11, Weekday::Thu, 4));

        // Christmas
        self.holidays
            .insert(NaiveDate::from_ymd_opt(year, 12, 25).unwrap());
    }

    /// Helper: Find the nth occurrence of a weekday in a month
    fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> NaiveDate {
        let mut date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        let mut count = 0;

        while date.month() == month {
            if date.weekday() == weekday {
                count += 1;
                if count == n {
                    return date;
                }
            }
            date += Duration::days(1);
        }
        panic!("Could not find {}th {} in {}/{}", n, weekday, month, year);
    }

    /// Helper: Find the last occurrence of a weekday in a month
    fn last_weekday(year: i32, month: u32, weekday: Weekday) -> NaiveDate {
        let mut date = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
        };
        date -= Duration::days(1); // Last day of the month

        while date.weekday() != weekday {
            date -= Duration::days(1);
        }
        date
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.holidays.extend(dates);
    }

    /// Add the same holiday (month/day) for every year in the range.
    pub fn add_recurring_holiday(&mut self, month: u32, day: u32, start_year: i32, end_year: i32) {
        for year in start_year..=end_year {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                self.holidays.insert(date);
            }
        }
    }

    /// Set custom working days (e.g., Mon-Sat for 6-day weeks)
    pub fn set_working_days(&mut self, days: Vec<Weekday>) {
        self.non_working_days.clear();
        for day in Self::ALL_WEEKDAYS {
            if !days.contains(&day) {
                self.non_working_days.insert(day);
            }
        }
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.holidays.contains(&date) && !self.non_working_days.contains(&date.weekday())
    }

    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        let mut count = 0;
        let mut current = start;
        while current <= end {
            if self.is_working_day(current) {
                count += 1;
            }
            current += Duration::days(1);
        }
        count
    }

    /// Working days in an ISO week, counted Monday through Sunday.
    pub fn working_days_in_iso_week(&self, iso_year: i32, week: u32) -> u32 {
        let Some(monday) = NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon) else {
            return 0;
        };
        self.count_working_days(monday, monday + Duration::days(6))
    }

    /// Working days per ISO week within one calendar month, ordered by week.
    ///
    /// A week straddling the month boundary contributes only the days that
    /// fall inside the month, so the same week can carry different weights
    /// for adjacent months.
    pub fn working_days_by_week_in_month(&self, year: i32, month: u32) -> Vec<(WeekOfYear, u32)> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };

        let mut per_week: BTreeMap<(i32, u32), u32> = BTreeMap::new();
        let mut current = first;
        while current.month() == month {
            let iso = current.iso_week();
            let entry = per_week.entry((iso.year(), iso.week())).or_insert(0);
            if self.is_working_day(current) {
                *entry += 1;
            }
            current += Duration::days(1);
        }

        per_week
            .into_iter()
            .map(|((iso_year, week), days)| (WeekOfYear::new(iso_year, week), days))
            .collect()
    }
}

/// An ISO week reference: (ISO year, week number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekOfYear {
    pub year: i32,
    pub week: u32,
}

impl WeekOfYear {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// First day (Monday) of the ISO week, when the reference is valid.
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    /// Last day (Sunday) of the ISO week.
    pub fn sunday(&self) -> Option<NaiveDate> {
        self.monday().map(|m| m + Duration::days(6))
    }
}

impl std::fmt::Display for WeekOfYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// Parameters for one (year, week, locality): working-day count, hours per
/// working day, and shrinkage fraction applied to productive time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekProfile {
    pub working_days: u32,
    pub hours_per_day: f64,
    pub shrinkage: f64,
}

impl WeekProfile {
    pub fn new(working_days: u32, hours_per_day: f64, shrinkage: f64) -> Self {
        Self {
            working_days,
            hours_per_day,
            shrinkage,
        }
    }

    /// Productive hours the profile yields for one full-time resource.
    pub fn productive_hours(&self) -> f64 {
        self.working_days as f64 * self.hours_per_day * (1.0 - self.shrinkage)
    }
}

/// Working-day calendar entries keyed by (year, ISO week, locality).
///
/// Lookups for entries that were never supplied fail loudly; a silently
/// defaulted working-day count would corrupt the downstream fairness math.
#[derive(Debug, Clone, Default)]
pub struct WeekCalendar {
    entries: HashMap<(i32, u32, String), WeekProfile>,
}

impl WeekCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, week: WeekOfYear, locality: impl Into<String>, profile: WeekProfile) {
        self.entries
            .insert((week.year, week.week, locality.into()), profile);
    }

    pub fn profile(&self, week: WeekOfYear, locality: &str) -> EngineResult<&WeekProfile> {
        self.entries
            .get(&(week.year, week.week, locality.to_string()))
            .ok_or_else(|| EngineError::MissingCalendarEntry {
                year: week.year,
                week: week.week,
                locality: locality.to_string(),
            })
    }

    pub fn contains(&self, week: WeekOfYear, locality: &str) -> bool {
        self.entries
            .contains_key(&(week.year, week.week, locality.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fill a whole ISO year of entries for one locality from its day
    /// calendar. Entries for other localities are untouched.
    pub fn derive_year(
        &mut self,
        locality: impl Into<String>,
        day_calendar: &DayCalendar,
        iso_year: i32,
        hours_per_day: f64,
        shrinkage: f64,
    ) {
        let locality = locality.into();
        // ISO years have 52 or 53 weeks; from_isoywd_opt rejects week 53
        // when the year is short.
        for week in 1..=53u32 {
            if NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon).is_none() {
                continue;
            }
            let days = day_calendar.working_days_in_iso_week(iso_year, week);
            self.insert(
                WeekOfYear::new(iso_year, week),
                locality.clone(),
                WeekProfile::new(days, hours_per_day, shrinkage),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straddled_month_splits_weeks_by_in_month_days() {
        // September 2025 starts on Labor Day (Monday). Its first ISO week
        // lies entirely in-month; the last week carries only Sep 29-30.
        let cal = DayCalendar::with_us_holidays(2025, 2025);
        let weeks = cal.working_days_by_week_in_month(2025, 9);
        assert_eq!(weeks.first().map(|(_, d)| *d), Some(4)); // Labor Day off
        assert_eq!(weeks.last().map(|(_, d)| *d), Some(2)); // Mon+Tue only
        let total: u32 = weeks.iter().map(|(_, d)| d).sum();
        assert_eq!(total, 21);
    }

    #[test]
    fn missing_entry_is_an_error_not_a_default() {
        let cal = WeekCalendar::new();
        let err = cal
            .profile(WeekOfYear::new(2025, 10), "Domestic")
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingCalendarEntry { .. }));
    }
}
