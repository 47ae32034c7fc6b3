use std::ops::RangeInclusive;
use std::sync::Arc;

use pest::iterators::Pair;
use pest::Parser;

use crate::error::{Error, Result};
use crate::extended_time::ExtendedTime;
use crate::rules as rl;
use crate::rules::day as ds;
use crate::rules::time as ts;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct OHParser;

/// Just used while collecting parsed nth entries
enum Sign {
    Neg,
    Pos,
}

enum PlusOrMinus {
    Plus,
    Minus,
}

/// Parse a preconditioned expression into its rule set.
pub(crate) fn parse_tree(data: &str) -> Result<rl::RuleSet> {
    let expression_pair = OHParser::parse(Rule::input_expression, data)
        .map_err(|err| Error::Syntax(err.to_string()))?
        .next()
        .expect("grammar error: no expression found");

    let rules = build_expression(expression_pair)?;
    Ok(rl::RuleSet { rules })
}

fn unexpected_token<T>(token: Rule, parent: Rule) -> T {
    unreachable!("Grammar error: found `{token:?}` inside of `{parent:?}`")
}

// ---
// --- Rule sequences
// ---

fn build_expression(pair: Pair<Rule>) -> Result<Vec<rl::RuleSequence>> {
    assert_eq!(pair.as_rule(), Rule::expression);
    let mut pairs = pair.into_inner();
    let mut rules = Vec::new();

    while let Some(pair) = pairs.next() {
        rules.push(match pair.as_rule() {
            Rule::rule_sequence => build_rule_sequence(pair, rl::RuleOperator::Normal),
            Rule::any_rule_separator => build_rule_sequence(
                pairs.next().expect("separator not followed by any rule"),
                build_any_rule_separator(pair),
            ),
            other => unexpected_token(other, Rule::expression),
        }?)
    }

    Ok(rules)
}

fn build_any_rule_separator(pair: Pair<Rule>) -> rl::RuleOperator {
    assert_eq!(pair.as_rule(), Rule::any_rule_separator);

    match pair
        .into_inner()
        .next()
        .expect("empty rule separator")
        .as_rule()
    {
        Rule::normal_rule_separator => rl::RuleOperator::Normal,
        Rule::additional_rule_separator => rl::RuleOperator::Additional,
        Rule::fallback_rule_separator => rl::RuleOperator::Fallback,
        // Rules only separated by spaces are independent.
        Rule::space_rule_separator => rl::RuleOperator::Normal,
        other => unexpected_token(other, Rule::any_rule_separator),
    }
}

fn build_rule_sequence(pair: Pair<Rule>, operator: rl::RuleOperator) -> Result<rl::RuleSequence> {
    assert_eq!(pair.as_rule(), Rule::rule_sequence);

    let mut always_open = false;
    let mut day_selector = ds::DaySelector::default();
    let mut time_selector = ts::TimeSelector::default();
    let mut wide_comment = None;
    let mut wide_range_colon = false;
    let mut state = None;
    let mut comment = None;

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::always_open => always_open = true,
            Rule::selector_sequence => {
                (day_selector, time_selector, wide_comment, wide_range_colon) =
                    build_selector_sequence(pair)?;
            }
            Rule::rules_modifier => (state, comment) = build_rules_modifier(pair),
            other => unexpected_token(other, Rule::rule_sequence),
        }
    }

    Ok(rl::RuleSequence {
        day_selector,
        time_selector,
        state,
        operator,
        comment: comment.map(|c: String| Arc::from(c.into_boxed_str())),
        wide_comment: wide_comment.map(|c: String| Arc::from(c.into_boxed_str())),
        wide_range_colon,
        always_open,
    })
}

// ---
// --- Rule modifier
// ---

fn build_rules_modifier(pair: Pair<Rule>) -> (Option<rl::StateModifier>, Option<String>) {
    assert_eq!(pair.as_rule(), Rule::rules_modifier);
    let mut state = None;
    let mut comment = None;

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::rules_modifier_enum => state = Some(build_rules_modifier_enum(pair)),
            Rule::comment => comment = Some(build_comment(pair)),
            other => unexpected_token(other, Rule::rules_modifier),
        }
    }

    (state, comment)
}

fn build_rules_modifier_enum(pair: Pair<Rule>) -> rl::StateModifier {
    assert_eq!(pair.as_rule(), Rule::rules_modifier_enum);

    let pair = pair
        .into_inner()
        .next()
        .expect("grammar error: empty rules modifier enum");

    match pair.as_rule() {
        Rule::rules_modifier_enum_closed => rl::StateModifier::Closed,
        Rule::rules_modifier_enum_off => rl::StateModifier::Off,
        Rule::rules_modifier_enum_open => rl::StateModifier::Open,
        Rule::rules_modifier_enum_unknown => rl::StateModifier::Unknown,
        other => unexpected_token(other, Rule::rules_modifier_enum),
    }
}

// ---
// --- Selectors
// ---

type SelectorSequence = (ds::DaySelector, ts::TimeSelector, Option<String>, bool);

fn build_selector_sequence(pair: Pair<Rule>) -> Result<SelectorSequence> {
    assert_eq!(pair.as_rule(), Rule::selector_sequence);

    let mut day_selector = ds::DaySelector::default();
    let mut time = Vec::new();
    let mut wide_comment = None;
    let mut wide_range_colon = false;

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::wide_range_selectors => {
                let (year, monthday, week, comment, colon) = build_wide_range_selectors(pair)?;
                day_selector.year = year;
                day_selector.monthday = monthday;
                day_selector.week = week;
                wide_comment = comment;
                wide_range_colon = colon;
            }
            Rule::small_range_selectors => {
                let (weekday, time_sel) = build_small_range_selectors(pair)?;
                day_selector.weekday = weekday;
                time = time_sel;
            }
            other => unexpected_token(other, Rule::selector_sequence),
        }
    }

    Ok((
        day_selector,
        ts::TimeSelector::new(time),
        wide_comment,
        wide_range_colon,
    ))
}

type WideRangeSelectors = (
    Vec<ds::YearRange>,
    Vec<ds::MonthdayRange>,
    Vec<ds::WeekRange>,
    Option<String>,
    bool,
);

fn build_wide_range_selectors(pair: Pair<Rule>) -> Result<WideRangeSelectors> {
    assert_eq!(pair.as_rule(), Rule::wide_range_selectors);

    let mut year_selector = Vec::new();
    let mut monthday_selector = Vec::new();
    let mut week_selector = Vec::new();
    let mut comment = None;
    let mut colon = false;

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::year_selector => year_selector = build_year_selector(pair)?,
            Rule::monthday_selector => monthday_selector = build_monthday_selector(pair)?,
            Rule::week_selector => week_selector = build_week_selector(pair)?,
            Rule::comment => comment = Some(build_comment(pair)),
            Rule::wide_range_colon => colon = true,
            other => unexpected_token(other, Rule::wide_range_selectors),
        }
    }

    Ok((
        year_selector,
        monthday_selector,
        week_selector,
        comment,
        colon,
    ))
}

fn build_small_range_selectors(
    pair: Pair<Rule>,
) -> Result<(ds::WeekdaySelector, Vec<ts::TimeSpan>)> {
    assert_eq!(pair.as_rule(), Rule::small_range_selectors);

    let mut weekday_selector = ds::WeekdaySelector::default();
    let mut time_selector = Vec::new();

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::weekday_selector => weekday_selector = build_weekday_selector(pair)?,
            Rule::time_selector => time_selector = build_time_selector(pair)?,
            other => unexpected_token(other, Rule::small_range_selectors),
        }
    }

    Ok((weekday_selector, time_selector))
}

// ---
// --- Time selector
// ---

fn build_time_selector(pair: Pair<Rule>) -> Result<Vec<ts::TimeSpan>> {
    assert_eq!(pair.as_rule(), Rule::time_selector);
    pair.into_inner().map(build_timespan).collect()
}

fn build_timespan(pair: Pair<Rule>) -> Result<ts::TimeSpan> {
    assert_eq!(pair.as_rule(), Rule::timespan);
    let mut pairs = pair.into_inner();

    let start = build_time(pairs.next().expect("empty timespan"))?;
    let mut end = None;
    let mut open_end = false;
    let mut repeats = None;

    for pair in pairs {
        match pair.as_rule() {
            Rule::extended_time => end = Some(build_extended_time(pair)?),
            Rule::timespan_plus => open_end = true,
            Rule::period => repeats = Some(build_period(pair)?),
            other => unexpected_token(other, Rule::timespan),
        }
    }

    // The lower bound must stay within the first day.
    if let ts::Time::Fixed(time) = start {
        if time > ExtendedTime::MIDNIGHT_24 {
            return Err(Error::Syntax(format!("time range starts at {time}")));
        }
    }

    // An end of 00:00 stands for the end of the day.
    if end == Some(ts::Time::Fixed(ExtendedTime::MIDNIGHT_00)) {
        end = Some(ts::Time::Fixed(ExtendedTime::MIDNIGHT_24));
    }

    Ok(ts::TimeSpan { start, end, open_end, repeats })
}

fn build_period(pair: Pair<Rule>) -> Result<u16> {
    assert_eq!(pair.as_rule(), Rule::period);
    let pair = pair.into_inner().next().expect("empty period");

    let mins = match pair.as_rule() {
        Rule::hour_minutes => {
            let time = build_hour_minutes(pair)?;
            time.mins_from_midnight()
        }
        Rule::minute => pair.as_str().parse().expect("invalid period minutes"),
        other => unexpected_token(other, Rule::period),
    };

    if mins == 0 {
        return Err(Error::Syntax("empty period".to_string()));
    }

    Ok(mins)
}

fn build_time(pair: Pair<Rule>) -> Result<ts::Time> {
    assert_eq!(pair.as_rule(), Rule::time);
    let inner = pair.into_inner().next().expect("empty time");

    Ok(match inner.as_rule() {
        Rule::hour_minutes => ts::Time::Fixed(build_hour_minutes(inner)?),
        Rule::variable_time => ts::Time::Variable(build_variable_time(inner)?),
        other => unexpected_token(other, Rule::time),
    })
}

fn build_extended_time(pair: Pair<Rule>) -> Result<ts::Time> {
    assert_eq!(pair.as_rule(), Rule::extended_time);
    let inner = pair.into_inner().next().expect("empty extended time");

    Ok(match inner.as_rule() {
        Rule::extended_hour_minutes => ts::Time::Fixed(build_hour_minutes(inner)?),
        Rule::variable_time => ts::Time::Variable(build_variable_time(inner)?),
        other => unexpected_token(other, Rule::extended_time),
    })
}

fn build_variable_time(pair: Pair<Rule>) -> Result<ts::VariableTime> {
    assert_eq!(pair.as_rule(), Rule::variable_time);
    let mut pairs = pair.into_inner();

    let event = build_event(pairs.next().expect("empty variable time"));

    let offset = {
        if pairs.peek().is_some() {
            let sign = build_plus_or_minus(pairs.next().unwrap());

            let mins: i16 = build_hour_minutes(pairs.next().expect("missing hour minutes"))?
                .mins_from_midnight()
                .try_into()
                .expect("offset overflow");

            match sign {
                PlusOrMinus::Plus => mins,
                PlusOrMinus::Minus => -mins,
            }
        } else {
            0
        }
    };

    Ok(ts::VariableTime { event, offset })
}

fn build_event(pair: Pair<Rule>) -> ts::TimeEvent {
    assert_eq!(pair.as_rule(), Rule::event);

    match pair.into_inner().next().expect("empty event").as_rule() {
        Rule::dawn => ts::TimeEvent::Dawn,
        Rule::sunrise => ts::TimeEvent::Sunrise,
        Rule::sunset => ts::TimeEvent::Sunset,
        Rule::dusk => ts::TimeEvent::Dusk,
        other => unexpected_token(other, Rule::event),
    }
}

// ---
// --- Weekday selector
// ---

fn build_weekday_selector(pair: Pair<Rule>) -> Result<ds::WeekdaySelector> {
    assert_eq!(pair.as_rule(), Rule::weekday_selector);

    let mut holiday_and = Vec::new();
    let mut entries = Vec::new();

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::holiday_sequence => {
                holiday_and = pair.into_inner().map(build_holiday).collect::<Result<_>>()?
            }
            Rule::weekday_sequence => {
                entries = pair
                    .into_inner()
                    .map(|pair| match pair.as_rule() {
                        Rule::weekday_range => build_weekday_range(pair),
                        Rule::holiday => build_holiday(pair),
                        other => unexpected_token(other, Rule::weekday_sequence),
                    })
                    .collect::<Result<_>>()?
            }
            other => unexpected_token(other, Rule::weekday_selector),
        }
    }

    Ok(ds::WeekdaySelector { holiday_and, entries })
}

fn build_weekday_range(pair: Pair<Rule>) -> Result<ds::WeekDayRange> {
    assert_eq!(pair.as_rule(), Rule::weekday_range);
    let mut pairs = pair.into_inner();

    let start = build_wday(pairs.next().expect("empty weekday range"));

    let end = {
        if pairs.peek().map(|x| x.as_rule()) == Some(Rule::wday) {
            build_wday(pairs.next().unwrap())
        } else {
            start
        }
    };

    let mut nth_from_start = [false; 5];
    let mut nth_from_end = [false; 5];

    while pairs.peek().map(|x| x.as_rule()) == Some(Rule::nth_entry) {
        let (sign, indices) = build_nth_entry(pairs.next().unwrap())?;

        let nth_array = match sign {
            Sign::Neg => &mut nth_from_end,
            Sign::Pos => &mut nth_from_start,
        };

        for i in indices {
            nth_array[usize::from(i - 1)] = true;
        }
    }

    if !nth_from_start.contains(&true) && !nth_from_end.contains(&true) {
        nth_from_start = [true; 5];
        nth_from_end = [true; 5];
    }

    let offset = {
        if let Some(pair) = pairs.next() {
            build_day_offset(pair)?
        } else {
            0
        }
    };

    Ok(ds::WeekDayRange::Fixed {
        range: start..=end,
        offset,
        nth_from_start,
        nth_from_end,
    })
}

fn build_holiday(pair: Pair<Rule>) -> Result<ds::WeekDayRange> {
    assert_eq!(pair.as_rule(), Rule::holiday);
    let mut pairs = pair.into_inner();

    let kind = match pairs.next().expect("empty holiday").as_rule() {
        Rule::public_holiday => ds::HolidayKind::Public,
        Rule::school_holiday => ds::HolidayKind::School,
        other => unexpected_token(other, Rule::holiday),
    };

    let offset = pairs.next().map(build_day_offset).unwrap_or(Ok(0))?;
    Ok(ds::WeekDayRange::Holiday { kind, offset })
}

fn build_nth_entry(pair: Pair<Rule>) -> Result<(Sign, RangeInclusive<u8>)> {
    assert_eq!(pair.as_rule(), Rule::nth_entry);
    let mut pairs = pair.into_inner();

    let sign = {
        if pairs.peek().map(|x| x.as_rule()) == Some(Rule::nth_minus) {
            pairs.next();
            Sign::Neg
        } else {
            Sign::Pos
        }
    };

    let start = build_nth(pairs.next().expect("empty nth entry"));
    let end = pairs.next().map(build_nth).unwrap_or(start);

    if start > end {
        return Err(Error::Syntax(format!("reversed nth range {start}-{end}")));
    }

    Ok((sign, start..=end))
}

fn build_nth(pair: Pair<Rule>) -> u8 {
    assert_eq!(pair.as_rule(), Rule::nth);
    pair.as_str().parse().expect("invalid nth format")
}

fn build_day_offset(pair: Pair<Rule>) -> Result<i64> {
    assert_eq!(pair.as_rule(), Rule::day_offset);
    let mut pairs = pair.into_inner();

    let sign = build_plus_or_minus(pairs.next().expect("empty day offset"));
    let val_abs = build_positive_number(pairs.next().expect("missing value"))?;

    let val_abs: i64 = val_abs.try_into().map_err(|_| Error::Syntax(format!(
        "day offset {val_abs} is too large"
    )))?;

    Ok(match sign {
        PlusOrMinus::Plus => val_abs,
        PlusOrMinus::Minus => -val_abs,
    })
}

// ---
// --- Week selector
// ---

fn build_week_selector(pair: Pair<Rule>) -> Result<Vec<ds::WeekRange>> {
    assert_eq!(pair.as_rule(), Rule::week_selector);
    pair.into_inner().map(build_week).collect()
}

fn build_week(pair: Pair<Rule>) -> Result<ds::WeekRange> {
    assert_eq!(pair.as_rule(), Rule::week);
    let mut pairs = pair.into_inner();

    let start = build_weeknum(pairs.next().expect("empty weeknum range"))?;

    let end = {
        if pairs.peek().map(|x| x.as_rule()) == Some(Rule::weeknum) {
            build_weeknum(pairs.next().unwrap())?
        } else {
            start
        }
    };

    let step = pairs.next().map(build_positive_number).transpose()?;

    let step: u8 = step
        .unwrap_or(1)
        .try_into()
        .map_err(|_| Error::Syntax("week step is too large".to_string()))?;

    if step == 0 {
        return Err(Error::Syntax("week step must be positive".to_string()));
    }

    Ok(ds::WeekRange { range: start..=end, step })
}

fn build_weeknum(pair: Pair<Rule>) -> Result<u8> {
    assert_eq!(pair.as_rule(), Rule::weeknum);
    let weeknum: u8 = pair.as_str().parse().expect("invalid weeknum format");

    if !(1..=53).contains(&weeknum) {
        return Err(Error::Syntax(format!("invalid week number {weeknum}")));
    }

    Ok(weeknum)
}

// ---
// --- Month-day selector
// ---

fn build_monthday_selector(pair: Pair<Rule>) -> Result<Vec<ds::MonthdayRange>> {
    assert_eq!(pair.as_rule(), Rule::monthday_selector);
    let mut ranges: Vec<ds::MonthdayRange> = Vec::new();

    for pair in pair.into_inner() {
        assert_eq!(pair.as_rule(), Rule::monthday_range);
        let range = build_monthday_range(pair, ranges.last())?;
        ranges.push(range);
    }

    Ok(ranges)
}

fn build_monthday_range(
    pair: Pair<Rule>,
    prev: Option<&ds::MonthdayRange>,
) -> Result<ds::MonthdayRange> {
    assert_eq!(pair.as_rule(), Rule::monthday_range);
    let mut pairs = pair.into_inner().peekable();

    match pairs.peek().expect("empty monthday range").as_rule() {
        Rule::month_range => build_month_range(pairs.next().unwrap()),
        Rule::daynum => build_monthday_continuation(pairs.next().unwrap(), prev),
        Rule::date_from => {
            let start = build_date_from(pairs.next().unwrap());
            let mut start_offset = ds::DateOffset::default();
            let mut end = None;
            let mut end_offset = ds::DateOffset::default();

            for pair in pairs {
                match pair.as_rule() {
                    Rule::date_offset if end.is_none() => {
                        start_offset = build_date_offset(pair)?
                    }
                    Rule::date_offset => end_offset = build_date_offset(pair)?,
                    Rule::date_to => end = Some(build_date_to(pair, start)?),
                    other => unexpected_token(other, Rule::monthday_range),
                }
            }

            Ok(ds::MonthdayRange::Date {
                start: (start, start_offset),
                end: end.map(|end| (end, end_offset)),
            })
        }
        other => unexpected_token(other, Rule::monthday_range),
    }
}

/// A bare day number continues the previous entry, as in `Dec 24-26,31`. It
/// inherits the month and must keep the day numbers increasing, otherwise
/// the intent is too ambiguous to recover.
fn build_monthday_continuation(
    pair: Pair<Rule>,
    prev: Option<&ds::MonthdayRange>,
) -> Result<ds::MonthdayRange> {
    let daynum = build_daynum(pair);

    let (year, month, last_day) = match prev {
        Some(ds::MonthdayRange::Date {
            start: (ds::Date::Fixed { year, month, day }, _),
            end: None,
        }) => (*year, *month, *day),
        Some(ds::MonthdayRange::Date {
            start: (ds::Date::Fixed { year, month, .. }, _),
            end:
                Some((
                    ds::Date::Fixed {
                        year: end_year,
                        month: end_month,
                        day: end_day,
                    },
                    _,
                )),
        }) if month == end_month && year == end_year => (*year, *month, *end_day),
        _ => {
            return Err(Error::Syntax(format!(
                "day number {daynum} does not follow a day of the same month"
            )))
        }
    };

    if daynum <= last_day {
        return Err(Error::Syntax(format!(
            "day numbers must be increasing, found {daynum} after {last_day}"
        )));
    }

    Ok(ds::MonthdayRange::Date {
        start: (
            ds::Date::Fixed { year, month, day: daynum },
            ds::DateOffset::default(),
        ),
        end: None,
    })
}

fn build_month_range(pair: Pair<Rule>) -> Result<ds::MonthdayRange> {
    assert_eq!(pair.as_rule(), Rule::month_range);

    let mut start_year = None;
    let mut start_month = None;
    let mut end_year = None;
    let mut end_month = None;

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::year if start_month.is_none() => start_year = Some(build_year(pair)),
            Rule::year => end_year = Some(build_year(pair)),
            Rule::month if start_month.is_none() => start_month = Some(build_month(pair)),
            Rule::month => end_month = Some(build_month(pair)),
            other => unexpected_token(other, Rule::month_range),
        }
    }

    let start_month = start_month.expect("month range without start month");

    Ok(ds::MonthdayRange::Month {
        start: (start_year, start_month),
        end: end_month.map(|month| (end_year, month)),
    })
}

fn build_date_offset(pair: Pair<Rule>) -> Result<ds::DateOffset> {
    assert_eq!(pair.as_rule(), Rule::date_offset);
    let mut pairs = pair.into_inner().peekable();

    let wday_offset = {
        if pairs.peek().map(|x| x.as_rule()) == Some(Rule::plus_or_minus) {
            let sign = build_plus_or_minus(pairs.next().unwrap());
            let wday = build_wday(pairs.next().expect("missing wday after sign"));

            match sign {
                PlusOrMinus::Plus => ds::WeekDayOffset::Next(wday),
                PlusOrMinus::Minus => ds::WeekDayOffset::Prev(wday),
            }
        } else {
            ds::WeekDayOffset::None
        }
    };

    let day_offset = pairs.next().map(build_day_offset).unwrap_or(Ok(0))?;

    Ok(ds::DateOffset { wday_offset, day_offset })
}

fn build_date_from(pair: Pair<Rule>) -> ds::Date {
    assert_eq!(pair.as_rule(), Rule::date_from);
    let mut pairs = pair.into_inner().peekable();

    let year = {
        if pairs.peek().map(|x| x.as_rule()) == Some(Rule::year) {
            Some(build_year(pairs.next().unwrap()))
        } else {
            None
        }
    };

    match pairs.peek().expect("empty date (from)").as_rule() {
        Rule::variable_date => ds::Date::Easter { year },
        Rule::month => ds::Date::Fixed {
            year,
            month: build_month(pairs.next().expect("missing month")),
            day: build_daynum(pairs.next().expect("missing day")),
        },
        other => unexpected_token(other, Rule::date_from),
    }
}

fn build_date_to(pair: Pair<Rule>, from: ds::Date) -> Result<ds::Date> {
    assert_eq!(pair.as_rule(), Rule::date_to);
    let pair = pair.into_inner().next().expect("empty date (to)");

    Ok(match pair.as_rule() {
        Rule::date_from => build_date_from(pair),
        Rule::daynum => {
            let daynum = build_daynum(pair);

            match from {
                ds::Date::Easter { .. } => {
                    return Err(Error::UnsupportedFeature(
                        "easter followed by a day number",
                    ));
                }
                ds::Date::Fixed { mut year, mut month, day } => {
                    if day > daynum {
                        month = month.next();

                        if month == ds::Month::January {
                            if let Some(x) = year.as_mut() {
                                *x += 1
                            }
                        }
                    }

                    ds::Date::Fixed { year, month, day: daynum }
                }
            }
        }
        other => unexpected_token(other, Rule::date_to),
    })
}

// ---
// --- Year selector
// ---

fn build_year_selector(pair: Pair<Rule>) -> Result<Vec<ds::YearRange>> {
    assert_eq!(pair.as_rule(), Rule::year_selector);
    pair.into_inner().map(build_year_range).collect()
}

fn build_year_range(pair: Pair<Rule>) -> Result<ds::YearRange> {
    assert_eq!(pair.as_rule(), Rule::year_range);
    let mut pairs = pair.into_inner();

    let start = build_year(pairs.next().expect("empty year range"));
    let mut end = ds::YearRangeEnd::Single;
    let mut step = None;

    for pair in pairs {
        match pair.as_rule() {
            Rule::year => end = ds::YearRangeEnd::Until(build_year(pair)),
            Rule::year_range_plus => end = ds::YearRangeEnd::Open,
            Rule::positive_number => step = Some(build_positive_number(pair)?),
            other => unexpected_token(other, Rule::year_range),
        }
    }

    if let ds::YearRangeEnd::Until(end) = end {
        if end < start {
            return Err(Error::Syntax(format!("reversed year range {start}-{end}")));
        }
    }

    let step: u16 = step
        .unwrap_or(1)
        .try_into()
        .map_err(|_| Error::Syntax("year step is too large".to_string()))?;

    if step == 0 {
        return Err(Error::Syntax("year step must be positive".to_string()));
    }

    Ok(ds::YearRange { start, end, step })
}

// ---
// --- Basic elements
// ---

fn build_plus_or_minus(pair: Pair<Rule>) -> PlusOrMinus {
    assert_eq!(pair.as_rule(), Rule::plus_or_minus);
    let pair = pair.into_inner().next().expect("empty plus or minus");

    match pair.as_rule() {
        Rule::plus => PlusOrMinus::Plus,
        Rule::minus => PlusOrMinus::Minus,
        other => unexpected_token(other, Rule::plus_or_minus),
    }
}

fn build_hour_minutes(pair: Pair<Rule>) -> Result<ExtendedTime> {
    assert!(matches!(
        pair.as_rule(),
        Rule::hour_minutes | Rule::extended_hour_minutes
    ));

    let mut pairs = pair.into_inner();

    let hour: u8 = pairs
        .next()
        .expect("missing hour")
        .as_str()
        .parse()
        .expect("invalid hour");

    let minutes: u8 = pairs
        .next()
        .expect("missing minutes")
        .as_str()
        .parse()
        .expect("invalid minutes");

    ExtendedTime::new(hour, minutes)
        .ok_or_else(|| Error::Syntax(format!("invalid time {hour}:{minutes:02}")))
}

fn build_wday(pair: Pair<Rule>) -> ds::Weekday {
    assert_eq!(pair.as_rule(), Rule::wday);

    match pair.as_str() {
        "Mo" => ds::Weekday::Mon,
        "Tu" => ds::Weekday::Tue,
        "We" => ds::Weekday::Wed,
        "Th" => ds::Weekday::Thu,
        "Fr" => ds::Weekday::Fri,
        "Sa" => ds::Weekday::Sat,
        "Su" => ds::Weekday::Sun,
        other => unreachable!("invalid weekday `{other}`"),
    }
}

fn build_daynum(pair: Pair<Rule>) -> u8 {
    assert_eq!(pair.as_rule(), Rule::daynum);
    let daynum: u8 = pair.as_str().parse().expect("invalid day number format");

    if daynum == 0 {
        log::warn!("found day number 0: specify the 1st or 31st instead");
        return 1;
    }

    if daynum > 31 {
        log::warn!("found day number {daynum}");
        return 31;
    }

    daynum
}

fn build_month(pair: Pair<Rule>) -> ds::Month {
    assert_eq!(pair.as_rule(), Rule::month);

    match pair.as_str() {
        "Jan" => ds::Month::January,
        "Feb" => ds::Month::February,
        "Mar" => ds::Month::March,
        "Apr" => ds::Month::April,
        "May" => ds::Month::May,
        "Jun" => ds::Month::June,
        "Jul" => ds::Month::July,
        "Aug" => ds::Month::August,
        "Sep" => ds::Month::September,
        "Oct" => ds::Month::October,
        "Nov" => ds::Month::November,
        "Dec" => ds::Month::December,
        other => unreachable!("invalid month `{other}`"),
    }
}

fn build_year(pair: Pair<Rule>) -> u16 {
    assert_eq!(pair.as_rule(), Rule::year);
    pair.as_str().parse().expect("invalid year format")
}

fn build_positive_number(pair: Pair<Rule>) -> Result<u64> {
    assert_eq!(pair.as_rule(), Rule::positive_number);
    pair.as_str().parse().map_err(|_| Error::Syntax(format!(
        "{} is not a reasonable number",
        pair.as_str()
    )))
}

fn build_comment(pair: Pair<Rule>) -> String {
    assert_eq!(pair.as_rule(), Rule::comment);

    pair.into_inner()
        .next()
        .expect("empty comment")
        .as_str()
        .to_string()
}
