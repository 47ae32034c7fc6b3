use chrono::prelude::Datelike;
use chrono::{Duration, NaiveDate, Weekday};

use crate::context::Context;
use crate::expression::{DATE_LIMIT, DATE_START};
use crate::rules::day as ds;
use crate::utils::{count_days_in_month, easter, wrapping_range_contains};

/// Find the next date where `selector` flips by probing day by day. Selector
/// patterns are periodic, so a selector that stays put over its period's
/// worth of probing never changes at all.
fn probe_next_change<T: DateFilter>(
    selector: &T,
    date: NaiveDate,
    ctx: &Context,
    horizon: u32,
) -> Option<NaiveDate> {
    let current = selector.filter(date, ctx);
    let mut probe = date;

    for _ in 0..horizon {
        probe = probe.succ_opt()?;

        if selector.filter(probe, ctx) != current {
            return Some(probe);
        }
    }

    Some(DATE_LIMIT.date())
}

/// Generic trait to specify the behavior of a selector over dates.
pub(crate) trait DateFilter {
    fn filter(&self, date: NaiveDate, ctx: &Context) -> bool;

    /// Provide a lower bound to the next date with a different result to
    /// `filter`. `None` means no bound is known and the caller should probe
    /// day by day.
    fn next_change_hint(&self, _date: NaiveDate, _ctx: &Context) -> Option<NaiveDate> {
        None
    }
}

impl<T: DateFilter> DateFilter for [T] {
    fn filter(&self, date: NaiveDate, ctx: &Context) -> bool {
        self.is_empty() || self.iter().any(|x| x.filter(date, ctx))
    }

    fn next_change_hint(&self, date: NaiveDate, ctx: &Context) -> Option<NaiveDate> {
        self.iter()
            .map(|selector| selector.next_change_hint(date, ctx))
            .min()
            .unwrap_or_else(|| Some(DATE_LIMIT.date()))
    }
}

impl DateFilter for ds::DaySelector {
    fn filter(&self, date: NaiveDate, ctx: &Context) -> bool {
        self.year.as_slice().filter(date, ctx)
            && self.monthday.as_slice().filter(date, ctx)
            && self.week.as_slice().filter(date, ctx)
            && self.weekday.filter(date, ctx)
    }

    fn next_change_hint(&self, date: NaiveDate, ctx: &Context) -> Option<NaiveDate> {
        // If there is no date filter, then all dates shall match
        if self.is_empty() {
            return Some(DATE_LIMIT.date());
        }

        *[
            self.year.as_slice().next_change_hint(date, ctx),
            self.monthday.as_slice().next_change_hint(date, ctx),
            self.week.as_slice().next_change_hint(date, ctx),
            self.weekday.next_change_hint(date, ctx),
        ]
        .iter()
        .min()
        .unwrap()
    }
}

impl DateFilter for ds::WeekdaySelector {
    fn filter(&self, date: NaiveDate, ctx: &Context) -> bool {
        self.holiday_and.as_slice().filter(date, ctx) && self.entries.as_slice().filter(date, ctx)
    }

    fn next_change_hint(&self, date: NaiveDate, ctx: &Context) -> Option<NaiveDate> {
        (self.holiday_and.iter())
            .chain(self.entries.iter())
            .map(|selector| selector.next_change_hint(date, ctx))
            .min()
            .unwrap_or_else(|| Some(DATE_LIMIT.date()))
    }
}

// ---
// --- Year selector
// ---

impl DateFilter for ds::YearRange {
    fn filter(&self, date: NaiveDate, _ctx: &Context) -> bool {
        let Ok(year) = u16::try_from(date.year()) else {
            return false;
        };

        if year < self.start {
            return false;
        }

        if let Some(end) = self.end_year() {
            if year > end {
                return false;
            }
        }

        (year - self.start) % self.step == 0
    }

    fn next_change_hint(&self, date: NaiveDate, _ctx: &Context) -> Option<NaiveDate> {
        let Ok(curr_year) = u16::try_from(date.year()) else {
            return Some(DATE_LIMIT.date());
        };

        let next_year = {
            if let Some(end) = self.end_year() {
                if end < curr_year {
                    // 1. time exceeded the range, the state won't ever change
                    return Some(DATE_LIMIT.date());
                }

                if curr_year < self.start {
                    // 2. time didn't reach the range yet
                    self.start
                } else if self.step == 1 {
                    // 3. time is in the range and step is naive
                    end + 1
                } else if (curr_year - self.start) % self.step == 0 {
                    // 4. time matches the range with step >= 2
                    curr_year + 1
                } else {
                    // 5. time is in the range but doesn't match the step
                    let round_up = |x: u16, d: u16| d * x.div_ceil(d);
                    self.start + round_up(curr_year - self.start, self.step)
                }
            } else if curr_year < self.start {
                self.start
            } else if self.step == 1 {
                return Some(DATE_LIMIT.date());
            } else if (curr_year - self.start) % self.step == 0 {
                curr_year + 1
            } else {
                let round_up = |x: u16, d: u16| d * x.div_ceil(d);
                self.start + round_up(curr_year - self.start, self.step)
            }
        };

        Some(
            NaiveDate::from_ymd_opt(next_year.into(), 1, 1).unwrap_or_else(|| DATE_LIMIT.date()),
        )
    }
}

// ---
// --- Month-day selector
// ---

/// Get the first valid date before given "yyyy/mm/dd", for example if
/// 2021/02/30 is given, this will return February 28th as 2021 is not a
/// leap year.
fn valid_ymd_before(year: i32, month: u32, day: u32) -> NaiveDate {
    debug_assert!((1..=31).contains(&day));

    NaiveDate::from_ymd_opt(year, month, day)
        .into_iter()
        .chain(
            (28..day)
                .rev()
                .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day)),
        )
        .next()
        .unwrap_or_else(|| DATE_LIMIT.date())
}

/// Get the first valid date after given "yyyy/mm/dd", for example if
/// 2021/02/30 is given, this will return March 1st of 2021.
fn valid_ymd_after(year: i32, month: u32, day: u32) -> NaiveDate {
    debug_assert!((1..=31).contains(&day));

    NaiveDate::from_ymd_opt(year, month, day)
        .into_iter()
        .chain(
            (28..day)
                .rev()
                .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day)?.succ_opt()),
        )
        .next()
        .unwrap_or_else(|| DATE_LIMIT.date())
}

/// Project a date of the AST on a given year.
fn date_on_year(
    date: ds::Date,
    for_year: i32,
    date_builder: impl FnOnce(i32, u32, u32) -> NaiveDate,
) -> Option<NaiveDate> {
    match date {
        ds::Date::Easter { year: None } => easter(for_year),
        ds::Date::Easter { year: Some(year) } if i32::from(year) == for_year => {
            easter(year.into())
        }
        ds::Date::Fixed { year: None, month, day } => {
            Some(date_builder(for_year, month as u32, day.into()))
        }
        ds::Date::Fixed { year: Some(year), month, day } if i32::from(year) == for_year => {
            Some(date_builder(year.into(), month as u32, day.into()))
        }
        _ => None,
    }
}

impl DateFilter for ds::MonthdayRange {
    fn filter(&self, date: NaiveDate, _ctx: &Context) -> bool {
        let year = date.year();
        let month = date.month() as u8;

        match self {
            ds::MonthdayRange::Month { start: (start_year, start_month), end: None } => {
                start_year.map_or(true, |y| i32::from(y) == year)
                    && *start_month as u8 == month
            }
            ds::MonthdayRange::Month { start: (start_year, start_month), end: Some(end) } => {
                let (end_year, end_month) = *end;

                match start_year {
                    None => {
                        let range = (*start_month as u8)..=(end_month as u8);
                        wrapping_range_contains(&range, &month)
                    }
                    Some(start_year) => {
                        let start_ym = i32::from(*start_year) * 12 + *start_month as i32 - 1;

                        let end_year = end_year.map(i32::from).unwrap_or_else(|| {
                            if end_month >= *start_month {
                                (*start_year).into()
                            } else {
                                i32::from(*start_year) + 1
                            }
                        });

                        let end_ym = end_year * 12 + end_month as i32 - 1;
                        let ym = year * 12 + i32::from(month) - 1;
                        (start_ym..=end_ym).contains(&ym)
                    }
                }
            }
            ds::MonthdayRange::Date { start: (start, start_offset), end: None } => {
                [year - 1, year, year + 1].into_iter().any(|for_year| {
                    date_on_year(*start, for_year, valid_ymd_after)
                        .map(|resolved| start_offset.apply(resolved) == date)
                        .unwrap_or(false)
                })
            }
            ds::MonthdayRange::Date { start: (start, start_offset), end: Some(end_part) } => {
                let (end, end_offset) = *end_part;

                if start.year().is_some() || end.year().is_some() {
                    [(year, year), (year - 1, year), (year, year + 1)]
                        .into_iter()
                        .filter_map(|(year_start, year_end)| {
                            let year_start =
                                start.year().map(i32::from).unwrap_or(year_start);
                            let year_end = end.year().map(i32::from).unwrap_or(year_end);

                            let start = date_on_year(*start, year_start, valid_ymd_after)
                                .map(|d| start_offset.apply(d))?;

                            let end = date_on_year(end, year_end, valid_ymd_before)
                                .map(|d| end_offset.apply(d))?;

                            Some(start..=end)
                        })
                        .any(|range| range.start() <= range.end() && range.contains(&date))
                } else {
                    [year - 1, year].into_iter().any(|for_year| {
                        let Some(start) = date_on_year(*start, for_year, valid_ymd_after)
                            .map(|d| start_offset.apply(d))
                        else {
                            return false;
                        };

                        let Some(mut end_date) = date_on_year(end, for_year, valid_ymd_before)
                            .map(|d| end_offset.apply(d))
                        else {
                            return false;
                        };

                        if end_date < start {
                            let Some(wrapped) = date_on_year(end, for_year + 1, valid_ymd_before)
                                .map(|d| end_offset.apply(d))
                            else {
                                return false;
                            };

                            end_date = wrapped;
                        }

                        (start..=end_date).contains(&date)
                    })
                }
            }
        }
    }

    fn next_change_hint(&self, date: NaiveDate, ctx: &Context) -> Option<NaiveDate> {
        match self {
            ds::MonthdayRange::Month { start: (None, start_month), end } => {
                let month = date.month() as u8;

                let end_month = match end {
                    None => *start_month,
                    Some((None, end_month)) => *end_month,
                    Some((Some(_), _)) => return probe_next_change(self, date, ctx, 3000),
                };

                let range = (*start_month as u8)..=(end_month as u8);

                let naive = {
                    if wrapping_range_contains(&range, &month) {
                        NaiveDate::from_ymd_opt(date.year(), end_month.next() as u32, 1)?
                    } else {
                        NaiveDate::from_ymd_opt(date.year(), *start_month as u32, 1)?
                    }
                };

                if naive > date {
                    Some(naive)
                } else {
                    naive.with_year(naive.year() + 1)
                }
            }
            ds::MonthdayRange::Month { start: (Some(start_year), start_month), end } => {
                let start = NaiveDate::from_ymd_opt((*start_year).into(), *start_month as u32, 1)?;

                let (end_year, end_month) = match *end {
                    None => (i32::from(*start_year), *start_month),
                    Some((end_year, end_month)) => {
                        let end_year = end_year.map(i32::from).unwrap_or_else(|| {
                            if end_month >= *start_month {
                                (*start_year).into()
                            } else {
                                i32::from(*start_year) + 1
                            }
                        });

                        (end_year, end_month)
                    }
                };

                // First day after the range.
                let end = {
                    if (end_month as u32) < 12 {
                        NaiveDate::from_ymd_opt(end_year, end_month as u32 + 1, 1)?
                    } else {
                        NaiveDate::from_ymd_opt(end_year + 1, 1, 1)?
                    }
                };

                Some({
                    if date < start {
                        start
                    } else if date < end {
                        end
                    } else {
                        DATE_LIMIT.date()
                    }
                })
            }
            ds::MonthdayRange::Date {
                start: (start @ ds::Date::Fixed { year: Some(start_year), .. }, start_offset),
                end: Some((end @ ds::Date::Fixed { .. }, end_offset)),
            } => {
                // Fully resolvable thanks to the year qualification.
                let year_start = i32::from(*start_year);
                let year_end = end.year().map(i32::from).unwrap_or(year_start);

                let start = date_on_year(*start, year_start, valid_ymd_after)
                    .map(|d| start_offset.apply(d))?;

                let mut end = date_on_year(*end, year_end, valid_ymd_before)
                    .map(|d| end_offset.apply(d))?;

                if end < start {
                    end = end.with_year(end.year() + 1)?;
                }

                Some({
                    if date < start {
                        start
                    } else if date <= end {
                        end.succ_opt()?
                    } else {
                        DATE_LIMIT.date()
                    }
                })
            }
            // Easter anchored or yearless dates repeat at most every eighth
            // year (February 29th).
            ds::MonthdayRange::Date { .. } => probe_next_change(self, date, ctx, 3000),
        }
    }
}

// ---
// --- Weekday selector
// ---

impl DateFilter for ds::WeekDayRange {
    fn filter(&self, date: NaiveDate, ctx: &Context) -> bool {
        match self {
            ds::WeekDayRange::Fixed { range, offset, nth_from_start, nth_from_end } => {
                if (*range.start() as u8) > (*range.end() as u8) {
                    // Handle wrapping ranges
                    return ds::WeekDayRange::Fixed {
                        range: *range.start()..=Weekday::Sun,
                        offset: *offset,
                        nth_from_start: *nth_from_start,
                        nth_from_end: *nth_from_end,
                    }
                    .filter(date, ctx)
                        || ds::WeekDayRange::Fixed {
                            range: Weekday::Mon..=*range.end(),
                            offset: *offset,
                            nth_from_start: *nth_from_start,
                            nth_from_end: *nth_from_end,
                        }
                        .filter(date, ctx);
                }

                let date = date - Duration::days(*offset);

                if date < DATE_START.date() {
                    return false;
                }

                let pos_from_start = (date.day() as u8 - 1) / 7;
                let pos_from_end = (count_days_in_month(date) - date.day() as u8) / 7;
                let range_u8 = (*range.start() as u8)..=(*range.end() as u8);

                range_u8.contains(&(date.weekday() as u8))
                    && (nth_from_start[usize::from(pos_from_start)]
                        || nth_from_end[usize::from(pos_from_end)])
            }
            ds::WeekDayRange::Holiday { kind, offset } => match kind {
                ds::HolidayKind::Public => {
                    let date = date - Duration::days(*offset);
                    ctx.is_public_holiday(date)
                }
                ds::HolidayKind::School => {
                    log::warn!("school holidays are not supported, thus ignored");
                    false
                }
            },
        }
    }

    fn next_change_hint(&self, date: NaiveDate, ctx: &Context) -> Option<NaiveDate> {
        match self {
            ds::WeekDayRange::Holiday { kind: ds::HolidayKind::Public, offset } => Some({
                if !ctx.has_region() {
                    return Some(DATE_LIMIT.date());
                }

                let date_with_offset = date - Duration::days(*offset);

                if ctx.is_public_holiday(date_with_offset) {
                    date.succ_opt()?
                } else {
                    ctx.public_holiday_after(date_with_offset)
                        .map(|following| following + Duration::days(*offset))
                        .unwrap_or_else(|| DATE_LIMIT.date())
                }
            }),
            ds::WeekDayRange::Holiday { kind: ds::HolidayKind::School, .. } => {
                Some(DATE_LIMIT.date())
            }
            // Weekly pattern, modulated within months by the nth masks.
            ds::WeekDayRange::Fixed { .. } => probe_next_change(self, date, ctx, 430),
        }
    }
}

// ---
// --- Week selector
// ---

impl DateFilter for ds::WeekRange {
    fn filter(&self, date: NaiveDate, _ctx: &Context) -> bool {
        let week = date.iso_week().week() as u8;

        if !wrapping_range_contains(&self.range, &week) {
            return false;
        }

        let diff = {
            if week >= *self.range.start() {
                week - self.range.start()
            } else {
                week + 53 - self.range.start()
            }
        };

        diff % self.step == 0
    }

    fn next_change_hint(&self, date: NaiveDate, ctx: &Context) -> Option<NaiveDate> {
        // Week 53 only exists in some years, so the pattern can pause for
        // several years in a row.
        probe_next_change(self, date, ctx, 2750)
    }
}
