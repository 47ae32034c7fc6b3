use std::ops::Range;

use chrono::NaiveDate;

use crate::context::Context;
use crate::extended_time::ExtendedTime;
use crate::rules::time as ts;
use crate::utils::{range_intersection, time_ranges_union};

/// Ranges covered by a time selector during `date`, clipped to the day
/// itself.
pub(crate) fn time_selector_intervals_at(
    ctx: &Context,
    time_selector: &ts::TimeSelector,
    date: NaiveDate,
) -> impl Iterator<Item = Range<ExtendedTime>> {
    time_ranges_union(as_naive(ctx, time_selector, date).into_iter().filter_map(
        |range| range_intersection(range, ExtendedTime::MIDNIGHT_00..ExtendedTime::MIDNIGHT_24),
    ))
}

/// Ranges covered during the day following `date` by spans that wrap past
/// midnight, expressed in next-day wall clock.
pub(crate) fn time_selector_intervals_at_next_day(
    ctx: &Context,
    time_selector: &ts::TimeSelector,
    date: NaiveDate,
) -> impl Iterator<Item = Range<ExtendedTime>> {
    time_ranges_union(
        as_naive(ctx, time_selector, date)
            .into_iter()
            .filter_map(|range| {
                range_intersection(range, ExtendedTime::MIDNIGHT_24..ExtendedTime::MIDNIGHT_48)
            })
            .map(|range| {
                let start = range.start.add_hours(-24).unwrap();
                let end = range.end.add_hours(-24).unwrap();
                start..end
            }),
    )
}

/// Check if a time selector always covers a full day, for any date.
pub(crate) fn is_immutable_full_day(time_selector: &ts::TimeSelector) -> bool {
    time_selector.is_empty()
        || time_selector.time.iter().all(ts::TimeSpan::is_immutable_full_day)
}

/// Project a time selector to concrete ranges at a given date. An empty
/// selector stands for the whole day.
fn as_naive(
    ctx: &Context,
    time_selector: &ts::TimeSelector,
    date: NaiveDate,
) -> Vec<Range<ExtendedTime>> {
    if time_selector.is_empty() {
        return vec![ExtendedTime::MIDNIGHT_00..ExtendedTime::MIDNIGHT_24];
    }

    (time_selector.time.iter())
        .filter_map(|span| span_as_naive(ctx, span, date))
        .collect()
}

fn span_as_naive(
    ctx: &Context,
    span: &ts::TimeSpan,
    date: NaiveDate,
) -> Option<Range<ExtendedTime>> {
    let start = time_as_naive(ctx, &span.start, date);

    // Points in time and subdivided ranges belong to the points-in-time
    // mode; validation reports them before evaluation can get here.
    let end = time_as_naive(ctx, span.end.as_ref()?, date);

    // If end < start, it actually wraps to next day
    let end = {
        if start <= end {
            end
        } else {
            end.add_hours(24)?
        }
    };

    Some(start..end)
}

fn time_as_naive(ctx: &Context, time: &ts::Time, date: NaiveDate) -> ExtendedTime {
    match time {
        ts::Time::Fixed(naive) => *naive,
        ts::Time::Variable(variable) => {
            let event: ExtendedTime = ctx.event_time(date, variable.event).into();

            event
                .add_minutes(variable.offset)
                .unwrap_or(ExtendedTime::MIDNIGHT_00)
        }
    }
}
