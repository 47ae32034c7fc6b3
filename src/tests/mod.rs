mod holiday_selector;
mod month_selector;
mod parser;
mod precondition;
mod rules;
mod year_selector;

use chrono::{NaiveDate, NaiveTime};

use crate::context::{Coordinates, StaticHolidays, SunEventProvider};
use crate::rules::time::TimeEvent;

/// Public holidays used by the evaluation tests. 2024-01-01 falls on a
/// Monday, which some scenarios rely on.
pub(crate) fn sample_holidays() -> StaticHolidays {
    let holiday = |y, m, d, name: &str| {
        (
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            name.to_string(),
        )
    };

    StaticHolidays::new([
        holiday(2020, 1, 1, "New Year's Day"),
        holiday(2020, 12, 25, "Christmas Day"),
        holiday(2024, 1, 1, "New Year's Day"),
        holiday(2024, 5, 1, "May Day"),
        holiday(2024, 12, 25, "Christmas Day"),
        holiday(2024, 12, 26, "Boxing Day"),
        holiday(2025, 1, 1, "New Year's Day"),
    ])
}

/// Sun events at fixed nominal times, enough to exercise variable time
/// resolution without an astronomy dependency.
#[derive(Debug)]
pub(crate) struct NominalSun;

impl SunEventProvider for NominalSun {
    fn sun_event(
        &self,
        event: TimeEvent,
        _date: NaiveDate,
        _coords: Coordinates,
    ) -> Option<NaiveTime> {
        let (hour, min) = match event {
            TimeEvent::Dawn => (6, 30),
            TimeEvent::Sunrise => (7, 30),
            TimeEvent::Sunset => (19, 30),
            TimeEvent::Dusk => (20, 30),
        };

        NaiveTime::from_hms_opt(hour, min, 0)
    }
}

#[macro_export]
macro_rules! date {
    ( $date: expr ) => {{
        use chrono::NaiveDate;
        NaiveDate::parse_from_str($date, "%Y-%m-%d").expect("invalid date literal")
    }};
}

#[macro_export]
macro_rules! datetime {
    ( $date: expr ) => {{
        use chrono::NaiveDateTime;
        NaiveDateTime::parse_from_str($date, "%Y-%m-%d %H:%M").expect("invalid datetime literal")
    }};
}

#[macro_export]
macro_rules! schedule_at {
    (
        $expression: expr,
        $date: expr
        $( , region = $region: expr )?
        $( , coords = $coords: expr )?
        $( , )?
    ) => {{
        #[allow(unused_mut)]
        let mut ctx = $crate::Context::default();

        $(
            ctx = ctx.with_region(
                std::sync::Arc::new($crate::tests::sample_holidays()),
                $region,
            );
        )?

        $(
            ctx = ctx.with_location(
                std::sync::Arc::new($crate::tests::NominalSun),
                $crate::Coordinates::new($coords.0, $coords.1).expect("invalid coordinates"),
            );
        )?

        $crate::parse($expression)
            .with_context(ctx)
            .schedule_at($crate::date!($date))
    }};
}
