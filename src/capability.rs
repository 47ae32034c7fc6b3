use bitflags::bitflags;

use crate::context::Context;
use crate::error::Error;
use crate::rules::day::{HolidayKind, WeekDayRange, YearRangeEnd};
use crate::rules::time::Time;
use crate::rules::RuleSet;

bitflags! {
    /// Everything an expression needs from its evaluation context, folded
    /// from the rule set. The `NOT_IMPLEMENTED` bit collects constructs the
    /// grammar admits but the evaluator deliberately rejects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capability: u32 {
        /// A public holiday calendar is required (`PH`).
        const PUBLIC_HOLIDAY = 1 << 0;
        /// A school holiday calendar is required (`SH`).
        const SCHOOL_HOLIDAY = 1 << 1;
        /// Geographic coordinates are required (sun events).
        const LOCATION = 1 << 2;
        /// The expression only makes sense in points-in-time mode (bare
        /// timepoints, subdivided time ranges).
        const POINT_IN_TIME = 1 << 3;
        /// A recognized construct the evaluator does not implement.
        const NOT_IMPLEMENTED = 1 << 4;
    }
}

/// Fold the required capabilities out of a rule set.
pub(crate) fn required_capabilities(ruleset: &RuleSet) -> Capability {
    let mut res = Capability::empty();

    for rule in &ruleset.rules {
        for span in &rule.time_selector.time {
            for time in [Some(&span.start), span.end.as_ref()].into_iter().flatten() {
                if matches!(time, Time::Variable(_)) {
                    res |= Capability::LOCATION;
                }
            }

            match (&span.end, span.open_end) {
                // An open ended time with no upper bound (`10:00+`).
                (None, true) => res |= Capability::NOT_IMPLEMENTED,
                // A bare point in time (`10:00`).
                (None, false) => res |= Capability::POINT_IN_TIME,
                (Some(_), _) => {}
            }

            // Subdividing a range selects points in time, not a span.
            if span.repeats.is_some() {
                res |= Capability::POINT_IN_TIME;
            }
        }

        let weekdays = (rule.day_selector.weekday.holiday_and.iter())
            .chain(rule.day_selector.weekday.entries.iter());

        for weekday in weekdays {
            match weekday {
                WeekDayRange::Holiday { kind: HolidayKind::Public, .. } => {
                    res |= Capability::PUBLIC_HOLIDAY
                }
                WeekDayRange::Holiday { kind: HolidayKind::School, .. } => {
                    res |= Capability::SCHOOL_HOLIDAY
                }
                WeekDayRange::Fixed { .. } => {}
            }
        }

        for week in &rule.day_selector.week {
            if week.range.start() > week.range.end() {
                res |= Capability::NOT_IMPLEMENTED;
            }
        }

        for year in &rule.day_selector.year {
            if matches!(year.end, YearRangeEnd::Open) && year.step != 1 {
                res |= Capability::NOT_IMPLEMENTED;
            }
        }
    }

    res
}

/// Map missing capabilities to an error code; intrinsic defects win over
/// contextual ones.
pub(crate) fn validate(capabilities: Capability, ctx: &Context) -> Option<Error> {
    if capabilities.intersects(Capability::SCHOOL_HOLIDAY) {
        return Some(Error::UnsupportedFeature("school holidays"));
    }

    if capabilities.intersects(Capability::NOT_IMPLEMENTED) {
        return Some(Error::UnsupportedFeature("points in time or wrapping ranges"));
    }

    if capabilities.intersects(Capability::POINT_IN_TIME) {
        return Some(Error::IncompatibleMode);
    }

    if capabilities.intersects(Capability::LOCATION) && !ctx.has_location() {
        return Some(Error::MissingLocation);
    }

    if capabilities.intersects(Capability::PUBLIC_HOLIDAY) && !ctx.has_region() {
        return Some(Error::MissingRegion);
    }

    None
}
