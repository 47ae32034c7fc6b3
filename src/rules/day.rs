use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use chrono::prelude::Datelike;

// Reexport Weekday from chrono as part of the public type.
pub use chrono::Weekday;

use crate::display::{write_days_offset, write_selector};

// DaySelector

/// All non-time selectors of a rule. Every empty member stands for the
/// universe.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct DaySelector {
    pub year: Vec<YearRange>,
    pub monthday: Vec<MonthdayRange>,
    pub week: Vec<WeekRange>,
    pub weekday: WeekdaySelector,
}

impl DaySelector {
    pub fn is_empty(&self) -> bool {
        self.year.is_empty()
            && self.monthday.is_empty()
            && self.week.is_empty()
            && self.weekday.is_empty()
    }
}

// WeekdaySelector

/// Weekday ranges and holiday tags of a rule.
///
/// `entries` is the ordered, comma separated list; an instant matches when
/// any entry matches. `holiday_and` holds holidays written in front of a
/// weekday sequence (`PH Mo-Fr`), which additionally constrain the entries.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct WeekdaySelector {
    pub holiday_and: Vec<WeekDayRange>,
    pub entries: Vec<WeekDayRange>,
}

impl WeekdaySelector {
    pub fn is_empty(&self) -> bool {
        self.holiday_and.is_empty() && self.entries.is_empty()
    }
}

impl fmt::Display for WeekdaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_selector(f, &self.holiday_and)?;

        if !self.holiday_and.is_empty() && !self.entries.is_empty() {
            write!(f, " ")?;
        }

        write_selector(f, &self.entries)
    }
}

// YearRange

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct YearRange {
    pub start: u16,
    pub end: YearRangeEnd,
    pub step: u16,
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum YearRangeEnd {
    /// A single year, as in `2020`.
    Single,
    /// A closed range, as in `2020-2035`.
    Until(u16),
    /// An open ended range, as in `2020+`.
    Open,
}

impl YearRange {
    /// Last matching year, if the range is bounded.
    pub(crate) fn end_year(&self) -> Option<u16> {
        match self.end {
            YearRangeEnd::Single => Some(self.start),
            YearRangeEnd::Until(end) => Some(end),
            YearRangeEnd::Open => None,
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;

        match self.end {
            YearRangeEnd::Single => {}
            YearRangeEnd::Until(end) => write!(f, "-{end}")?,
            YearRangeEnd::Open => write!(f, "+")?,
        }

        if self.step != 1 {
            write!(f, "/{}", self.step)?;
        }

        Ok(())
    }
}

// MonthdayRange

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum MonthdayRange {
    Month {
        start: (Option<u16>, Month),
        end: Option<(Option<u16>, Month)>,
    },
    Date {
        start: (Date, DateOffset),
        end: Option<(Date, DateOffset)>,
    },
}

impl fmt::Display for MonthdayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { start: (year, month), end } => {
                if let Some(year) = year {
                    write!(f, "{year} ")?;
                }

                write!(f, "{month}")?;

                if let Some((end_year, end_month)) = end {
                    write!(f, "-")?;

                    if let Some(end_year) = end_year {
                        write!(f, "{end_year} ")?;
                    }

                    write!(f, "{end_month}")?;
                }

                Ok(())
            }
            Self::Date { start: (start, start_offset), end } => {
                write!(f, "{start}{start_offset}")?;

                let Some((end, end_offset)) = end else {
                    return Ok(());
                };

                write!(f, "-")?;

                // Dates within the same month shorten to `Dec 25-26`.
                match (start, end) {
                    (
                        Date::Fixed { year: y1, month: m1, day: _ },
                        Date::Fixed { year: y2, month: m2, day },
                    ) if y1 == y2 && m1 == m2 && start_offset.is_none() => {
                        write!(f, "{day:02}")?;
                    }
                    _ => write!(f, "{end}")?,
                }

                write!(f, "{end_offset}")
            }
        }
    }
}

// Date

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Date {
    Fixed {
        year: Option<u16>,
        month: Month,
        day: u8,
    },
    Easter {
        year: Option<u16>,
    },
}

impl Date {
    #[inline]
    pub fn md(day: u8, month: Month) -> Self {
        Self::Fixed { day, month, year: None }
    }

    #[inline]
    pub fn ymd(day: u8, month: Month, year: u16) -> Self {
        Self::Fixed { day, month, year: Some(year) }
    }

    pub fn year(&self) -> Option<u16> {
        match self {
            Self::Fixed { year, .. } | Self::Easter { year } => *year,
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { year, month, day } => {
                if let Some(year) = year {
                    write!(f, "{year} ")?;
                }

                write!(f, "{month} {day:02}")
            }
            Self::Easter { year } => {
                if let Some(year) = year {
                    write!(f, "{year} ")?;
                }

                write!(f, "easter")
            }
        }
    }
}

// DateOffset

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct DateOffset {
    pub wday_offset: WeekDayOffset,
    pub day_offset: i64,
}

impl DateOffset {
    pub fn is_none(&self) -> bool {
        self.day_offset == 0 && matches!(self.wday_offset, WeekDayOffset::None)
    }

    #[inline]
    pub fn apply(&self, mut date: NaiveDate) -> NaiveDate {
        date += Duration::days(self.day_offset);

        match self.wday_offset {
            WeekDayOffset::None => {}
            WeekDayOffset::Prev(target) => {
                let diff = (7 + date.weekday() as i64 - target as i64) % 7;
                date -= Duration::days(diff)
            }
            WeekDayOffset::Next(target) => {
                let diff = (7 + target as i64 - date.weekday() as i64) % 7;
                date += Duration::days(diff)
            }
        }

        date
    }
}

impl fmt::Display for DateOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wday_offset {
            WeekDayOffset::None => {}
            WeekDayOffset::Next(wday) => write!(f, " +{}", wday_str(wday))?,
            WeekDayOffset::Prev(wday) => write!(f, " -{}", wday_str(wday))?,
        }

        write_days_offset(f, self.day_offset)
    }
}

// WeekDayOffset

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum WeekDayOffset {
    #[default]
    None,
    Next(Weekday),
    Prev(Weekday),
}

// WeekDayRange

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum WeekDayRange {
    Fixed {
        range: RangeInclusive<Weekday>,
        offset: i64,
        /// Nth occurrence of the weekday in its month, counted from the
        /// start of the month; all true when no mask was written.
        nth_from_start: [bool; 5],
        /// Same, counted from the end of the month.
        nth_from_end: [bool; 5],
    },
    Holiday {
        kind: HolidayKind,
        offset: i64,
    },
}

impl fmt::Display for WeekDayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { range, offset, nth_from_start, nth_from_end } => {
                write!(f, "{}", wday_str(*range.start()))?;

                if range.start() != range.end() {
                    write!(f, "-{}", wday_str(*range.end()))?;
                }

                if nth_from_start != &[true; 5] || nth_from_end != &[true; 5] {
                    write!(f, "[")?;
                    write_nth_mask(f, nth_from_start, nth_from_end)?;
                    write!(f, "]")?;
                }

                write_days_offset(f, *offset)
            }
            Self::Holiday { kind, offset } => {
                write!(f, "{kind}")?;
                write_days_offset(f, *offset)
            }
        }
    }
}

fn write_nth_mask(
    f: &mut fmt::Formatter<'_>,
    from_start: &[bool; 5],
    from_end: &[bool; 5],
) -> fmt::Result {
    let mut sep = "";
    let mut i = 0;

    while i < 5 {
        if from_start[i] {
            let mut j = i;

            while j + 1 < 5 && from_start[j + 1] {
                j += 1;
            }

            write!(f, "{sep}{}", i + 1)?;

            if j > i {
                write!(f, "-{}", j + 1)?;
            }

            sep = ",";
            i = j + 1;
        } else {
            i += 1;
        }
    }

    for (i, set) in from_end.iter().enumerate() {
        if *set {
            write!(f, "{sep}-{}", i + 1)?;
            sep = ",";
        }
    }

    Ok(())
}

pub(crate) fn wday_str(wday: Weekday) -> &'static str {
    match wday {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

// HolidayKind

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum HolidayKind {
    Public,
    School,
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "PH"),
            Self::School => write!(f, "SH"),
        }
    }
}

// WeekRange

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct WeekRange {
    pub range: RangeInclusive<u8>,
    pub step: u8,
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.range.start())?;

        if self.range.start() != self.range.end() {
            write!(f, "-{:02}", self.range.end())?;
        }

        if self.step != 1 {
            write!(f, "/{}", self.step)?;
        }

        Ok(())
    }
}

// Month

#[derive(Copy, Clone, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    #[inline]
    pub fn from_u8(x: u8) -> Option<Self> {
        Some(match x {
            1 => Self::January,
            2 => Self::February,
            3 => Self::March,
            4 => Self::April,
            5 => Self::May,
            6 => Self::June,
            7 => Self::July,
            8 => Self::August,
            9 => Self::September,
            10 => Self::October,
            11 => Self::November,
            12 => Self::December,
            _ => return None,
        })
    }

    #[inline]
    pub fn next(self) -> Self {
        let num = self as u8;
        Self::from_u8(num % 12 + 1).unwrap()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::January => "Jan",
            Self::February => "Feb",
            Self::March => "Mar",
            Self::April => "Apr",
            Self::May => "May",
            Self::June => "Jun",
            Self::July => "Jul",
            Self::August => "Aug",
            Self::September => "Sep",
            Self::October => "Oct",
            Self::November => "Nov",
            Self::December => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
