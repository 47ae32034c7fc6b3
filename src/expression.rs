use std::cmp::max;
use std::fmt::Display;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::capability::{self, Capability};
use crate::context::Context;
use crate::date_filter::DateFilter;
use crate::error::Error;
use crate::extended_time::ExtendedTime;
use crate::interval::Interval;
use crate::precondition::precondition;
use crate::rules::time::Time;
use crate::rules::{RuleKind, RuleOperator, RuleSequence, RuleSet};
use crate::schedule::{Schedule, TimeRange};
use crate::time_filter::{
    is_immutable_full_day, time_selector_intervals_at, time_selector_intervals_at_next_day,
};

/// The lower bound of dates handled by the evaluator.
pub(crate) const DATE_START: NaiveDateTime = {
    let Some(date) = NaiveDate::from_ymd_opt(1900, 1, 1) else {
        unreachable!()
    };

    let Some(time) = NaiveTime::from_hms_opt(0, 0, 0) else {
        unreachable!()
    };

    NaiveDateTime::new(date, time)
};

/// The upper bound of dates handled by the evaluator.
pub(crate) const DATE_LIMIT: NaiveDateTime = {
    let Some(date) = NaiveDate::from_ymd_opt(10_000, 1, 1) else {
        unreachable!()
    };

    let Some(time) = NaiveTime::from_hms_opt(0, 0, 0) else {
        unreachable!()
    };

    NaiveDateTime::new(date, time)
};

/// How many days an interval begin is traced backwards before it is reported
/// as open.
const BACKWARD_WALK_LIMIT: i64 = 5000;

// Expression

/// A parsed opening hours expression together with its evaluation context.
///
/// Parsing never fails: a defective input yields an expression whose
/// [`error`](Expression::error) is set and which refuses to evaluate. The
/// inner rule set is immutable and shared, so cloning is cheap.
#[derive(Clone, Debug)]
pub struct Expression {
    rules: Arc<RuleSet>,
    error: Option<Error>,
    corrected: bool,
    ctx: Context,
}

impl Expression {
    /// Parse a raw expression, running the tolerant input preconditioner
    /// first.
    ///
    /// ```
    /// let expr = osm_hours::parse("mo-fr 10:00-20:00");
    /// assert_eq!(expr.error(), None);
    /// assert_eq!(expr.normalized(), "Mo-Fr 10:00-20:00");
    /// ```
    pub fn parse(raw: &str) -> Self {
        let cleaned = precondition(raw);

        match crate::parser::parse_tree(&cleaned.text) {
            Ok(rules) => Self {
                rules: Arc::new(rules),
                error: None,
                corrected: cleaned.corrected,
                ctx: Context::default(),
            },
            Err(err) => {
                log::debug!("failed to parse {raw:?}: {err}");

                Self {
                    rules: Arc::new(RuleSet::default()),
                    error: Some(err),
                    corrected: cleaned.corrected,
                    ctx: Context::default(),
                }
            }
        }
    }

    /// Set a new evaluation context for this expression.
    pub fn with_context(self, ctx: Context) -> Self {
        Self { ctx, ..self }
    }

    /// The parsed rule set. Empty when the expression has a syntax error.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Whether the preconditioner had to rewrite the input.
    pub fn was_corrected(&self) -> bool {
        self.corrected
    }

    /// Canonical textual form; parsing it back yields an equal rule set.
    pub fn normalized(&self) -> String {
        self.rules.to_string()
    }

    /// Everything this expression requires from collaborators.
    pub fn required_capabilities(&self) -> Capability {
        capability::required_capabilities(&self.rules)
    }

    /// Error code for this expression under its current context, `None`
    /// when it is evaluable.
    pub fn error(&self) -> Option<Error> {
        if let Some(err) = &self.error {
            return Some(err.clone());
        }

        capability::validate(self.required_capabilities(), &self.ctx)
    }

    // --
    // -- Evaluation
    // --

    /// Provide a lower bound to the next date when a different set of rules
    /// could match.
    fn next_change_hint(&self, date: NaiveDate) -> Option<NaiveDate> {
        (self.rules.rules.iter())
            .map(|rule| {
                if is_immutable_full_day(&rule.time_selector) && rule.day_selector.is_empty() {
                    Some(DATE_LIMIT.date())
                } else {
                    rule.day_selector.next_change_hint(date, &self.ctx)
                }
            })
            .min()
            .flatten()
    }

    /// No rule of the expression depends on the date.
    fn is_static(&self) -> bool {
        self.rules.rules.iter().all(|rule| {
            rule.day_selector.is_empty()
                && rule.time_selector.time.iter().all(|span| {
                    matches!(span.start, Time::Fixed(_))
                        && !matches!(span.end, Some(Time::Variable(_)))
                })
        })
    }

    /// Check that every rule either ignores the time of day or does not
    /// match `date`: in that case whole days share a single state until the
    /// rule matches change.
    fn can_long_jump(&self, date: NaiveDate) -> bool {
        self.rules.rules.iter().all(|rule| {
            is_immutable_full_day(&rule.time_selector)
                || !rule.day_selector.filter(date, &self.ctx)
        })
    }

    /// Get the schedule at a given day, folding every rule in source order.
    pub fn schedule_at(&self, date: NaiveDate) -> Schedule {
        if !(DATE_START.date()..DATE_LIMIT.date()).contains(&date) {
            return Schedule::new();
        }

        let mut prev_match = false;
        let mut prev_eval = None;

        for rules_seq in &self.rules.rules {
            let curr_match = rules_seq.day_selector.filter(date, &self.ctx);
            let curr_eval = rule_sequence_schedule_at(rules_seq, date, &self.ctx);

            let (new_match, new_eval) = match (rules_seq.operator, rules_seq.kind()) {
                // A matching normal rule overrides the whole day.
                (RuleOperator::Normal, RuleKind::Open | RuleKind::Unknown) => (
                    curr_match || prev_match,
                    if curr_match {
                        curr_eval
                    } else {
                        prev_eval.or(curr_eval)
                    },
                ),
                // A closed normal rule only cuts the ranges it targets, as
                // does an additional rule.
                (RuleOperator::Additional, _) | (RuleOperator::Normal, RuleKind::Closed) => (
                    prev_match || curr_match,
                    match (prev_eval, curr_eval) {
                        (Some(prev), Some(curr)) => Some(prev.addition(curr)),
                        (prev, curr) => prev.or(curr),
                    },
                ),
                // A fallback only applies when no previous rule matched.
                (RuleOperator::Fallback, _) => {
                    if prev_match {
                        (prev_match, prev_eval)
                    } else {
                        (curr_match, curr_eval)
                    }
                }
            };

            prev_match = new_match;
            prev_eval = new_eval;
        }

        prev_eval.unwrap_or_else(Schedule::new)
    }

    /// The interval covering `dt`: its state, maximal half open bounds and
    /// the comments raised by the matching rules.
    pub fn interval_at(&self, dt: NaiveDateTime) -> Result<Interval, Error> {
        if let Some(err) = self.error() {
            return Err(err);
        }

        let date = dt.date();
        let time = ExtendedTime::from(dt.time());

        let ranges: Vec<TimeRange> = self.schedule_at(date).into_iter().collect();

        let idx = ranges
            .iter()
            .position(|tr| tr.range.contains(&time))
            .expect("schedule does not tile the day");

        let current = ranges[idx].clone();

        // A date independent expression with a constant day is the same
        // interval for all eternity.
        if self.is_static() && ranges.len() == 1 {
            return Ok(Interval::new(current.kind, None, None, current.comments));
        }

        let (begin, open_begin) = self.trace_begin(date, &ranges, idx);
        let (end, open_end) = self.trace_end(date, &ranges, idx);

        Ok(Interval::new(
            current.kind,
            (!open_begin).then_some(begin),
            (!open_end).then_some(end),
            current.comments,
        ))
    }

    /// The earliest interval after `dt` whose state differs from the state
    /// at `dt`, or `None` when the current state lasts for the supported
    /// eternity.
    pub fn next_interval(&self, dt: NaiveDateTime) -> Result<Option<Interval>, Error> {
        let mut current = self.interval_at(dt)?;
        let kind = current.state();

        loop {
            let Some(end) = current.end() else {
                return Ok(None);
            };

            let next = self.interval_at(end)?;

            if next.state() != kind {
                return Ok(Some(next));
            }

            // Only the comment changed, keep walking.
            current = next;
        }
    }

    /// Extend the covering range backwards through midnights sharing the
    /// same state.
    fn trace_begin(
        &self,
        date: NaiveDate,
        ranges: &[TimeRange],
        idx: usize,
    ) -> (NaiveDateTime, bool) {
        let state = ranges[idx].as_state();
        let mut begin_date = date;
        let mut begin_time = ranges[idx].range.start;

        for prev_tr in ranges[..idx].iter().rev() {
            if prev_tr.as_state() == state {
                begin_time = prev_tr.range.start;
            } else {
                return (instant(begin_date, begin_time), false);
            }
        }

        let mut walked = 0;

        while begin_time == ExtendedTime::MIDNIGHT_00 {
            let Some(prev) = begin_date.pred_opt() else {
                return (instant(begin_date, begin_time), true);
            };

            walked += 1;

            if prev < DATE_START.date() || walked > BACKWARD_WALK_LIMIT {
                return (instant(begin_date, begin_time), true);
            }

            let prev_ranges: Vec<TimeRange> = self.schedule_at(prev).into_iter().collect();

            let mut extended = false;

            for prev_tr in prev_ranges.iter().rev() {
                if prev_tr.as_state() == state {
                    begin_date = prev;
                    begin_time = prev_tr.range.start;
                    extended = true;
                } else {
                    return (instant(begin_date, begin_time), false);
                }
            }

            if !extended {
                break;
            }
        }

        (instant(begin_date, begin_time), false)
    }

    /// Extend the covering range forwards through midnights sharing the
    /// same state, jumping over runs of constant days where possible.
    fn trace_end(&self, date: NaiveDate, ranges: &[TimeRange], idx: usize) -> (NaiveDateTime, bool) {
        let state = (ranges[idx].kind, ranges[idx].comments.clone());
        let mut end_date = date;
        let mut end_time = ranges[idx].range.end;
        let mut rest: Vec<TimeRange> = ranges[idx + 1..].to_vec();

        loop {
            for next_tr in &rest {
                if next_tr.as_state() == (state.0, &state.1) {
                    end_time = next_tr.range.end;
                } else {
                    return (instant(end_date, end_time), false);
                }
            }

            debug_assert_eq!(end_time, ExtendedTime::MIDNIGHT_24);

            // Advance to the next day with a possibly different schedule.
            let next_date = {
                if self.can_long_jump(end_date) {
                    let next_day = end_date + Duration::days(1);
                    max(self.next_change_hint(end_date).unwrap_or(next_day), next_day)
                } else {
                    end_date + Duration::days(1)
                }
            };

            if next_date >= DATE_LIMIT.date() {
                return (instant(end_date, end_time), true);
            }

            let mut next_ranges = self.schedule_at(next_date).into_iter();
            let first = next_ranges.next().expect("schedule does not tile the day");

            if first.as_state() == (state.0, &state.1) {
                end_date = next_date;
                end_time = first.range.end;
                rest = next_ranges.collect();
            } else {
                // The state flips exactly at the start of `next_date`.
                return (instant(next_date, ExtendedTime::MIDNIGHT_00), false);
            }
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rules)
    }
}

/// Build a point in time from a date and a possibly extended wall-clock
/// time.
fn instant(date: NaiveDate, time: ExtendedTime) -> NaiveDateTime {
    let (date, time) = {
        if time.hour() >= 24 {
            (
                date.succ_opt().unwrap_or(DATE_LIMIT.date()),
                time.add_hours(-24).unwrap(),
            )
        } else {
            (date, time)
        }
    };

    NaiveDateTime::new(date, time.try_into().expect("invalid wall-clock time"))
}

/// Intervals covered by a single rule during `date`, including the spill
/// from the previous day for time spans wrapping past midnight.
fn rule_sequence_schedule_at(
    rule_sequence: &RuleSequence,
    date: NaiveDate,
    ctx: &Context,
) -> Option<Schedule> {
    let from_today = Some(date)
        .filter(|date| rule_sequence.day_selector.filter(*date, ctx))
        .map(|date| time_selector_intervals_at(ctx, &rule_sequence.time_selector, date))
        .map(|ranges| {
            Schedule::from_ranges(ranges, rule_sequence.kind(), &rule_sequence.comments())
        });

    let from_yesterday = (date.pred_opt())
        .filter(|prev| rule_sequence.day_selector.filter(*prev, ctx))
        .map(|prev| time_selector_intervals_at_next_day(ctx, &rule_sequence.time_selector, prev))
        .map(|ranges| {
            Schedule::from_ranges(ranges, rule_sequence.kind(), &rule_sequence.comments())
        });

    match (from_today, from_yesterday) {
        (Some(sched_1), Some(sched_2)) => Some(sched_1.addition(sched_2)),
        (today, yesterday) => today.or(yesterday),
    }
}
