//! Tolerant parser, normalizer, validator and evaluator for OSM
//! [`opening_hours`] expressions.
//!
//! Parsing is total: any input yields an [`Expression`], possibly carrying
//! an [`Error`] code. A tolerant preconditioner folds Unicode punctuation,
//! translates foreign day and month names and repairs the most common
//! real-world mis-encodings before the strict grammar runs, so that
//! `mo-fr 10h-20h` and `Mo-Fr 10:00-20:00` mean the same thing.
//!
//! ```
//! use chrono::NaiveDateTime;
//! use osm_hours::RuleKind;
//!
//! let expr = osm_hours::parse("Mo-Fr 08:00-12:00,13:00-17:30; Sa 08:00-12:00");
//! assert_eq!(expr.error(), None);
//!
//! let dt = NaiveDateTime::parse_from_str("2024-11-19 09:30", "%Y-%m-%d %H:%M").unwrap();
//! let interval = expr.interval_at(dt).unwrap();
//! assert_eq!(interval.state(), RuleKind::Open);
//! ```
//!
//! Holiday calendars and sun event times are not computed here: they are
//! supplied through the [`context`] collaborator traits, and expressions
//! requiring them without a configured provider report `MissingRegion` or
//! `MissingLocation` instead of evaluating.
//!
//! [`opening_hours`]: https://wiki.openstreetmap.org/wiki/Key:opening_hours

#[macro_use]
extern crate pest_derive;

pub mod capability;
pub mod context;
pub mod error;
pub mod extended_time;
pub mod interval;
pub mod rules;
#[macro_use]
pub mod schedule;
pub mod sorted_vec;

mod date_filter;
mod display;
mod expression;
mod parser;
mod precondition;
mod time_filter;
mod utils;

#[cfg(test)]
mod tests;

// Public re-exports
pub use crate::capability::Capability;
pub use crate::context::{Context, Coordinates, HolidayProvider, StaticHolidays, SunEventProvider};
pub use crate::error::Error;
pub use crate::expression::Expression;
pub use crate::extended_time::ExtendedTime;
pub use crate::interval::Interval;
pub use crate::rules::{RuleKind, RuleOperator, RuleSet, StateModifier};

/// Parse a raw opening hours expression. This never fails: defective inputs
/// yield an expression whose [`Expression::error`] is set.
pub fn parse(raw: &str) -> Expression {
    Expression::parse(raw)
}
