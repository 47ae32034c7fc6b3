pub mod day;
pub mod time;

use std::fmt;
use std::sync::Arc;

use crate::sorted_vec::UniqueSortedVec;

// RuleSet

/// The parsed form of an expression: an ordered list of rules. Displaying a
/// rule set yields the canonical text.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct RuleSet {
    pub rules: Vec<RuleSequence>,
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.rules.first() else {
            return Ok(());
        };

        write!(f, "{first}")?;

        for rule in &self.rules[1..] {
            let separator = match rule.operator {
                RuleOperator::Normal => "; ",
                RuleOperator::Additional => ", ",
                RuleOperator::Fallback => " || ",
            };

            write!(f, "{separator}{rule}")?;
        }

        Ok(())
    }
}

// RuleSequence

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct RuleSequence {
    pub day_selector: day::DaySelector,
    pub time_selector: time::TimeSelector,
    /// State token as written; `None` defaults to open. A rule carrying only
    /// a comment also defaults to open.
    pub state: Option<StateModifier>,
    pub operator: RuleOperator,
    pub comment: Option<Arc<str>>,
    /// Comment used as a wide-range selector (`"event": Mo 10:00-12:00`).
    pub wide_comment: Option<Arc<str>>,
    /// An explicit `:` was written after the wide-range selectors.
    pub wide_range_colon: bool,
    /// The rule is the `24/7` form.
    pub always_open: bool,
}

impl RuleSequence {
    /// Evaluated state of this rule.
    pub fn kind(&self) -> RuleKind {
        self.state.map(StateModifier::kind).unwrap_or(RuleKind::Open)
    }

    pub(crate) fn comments(&self) -> UniqueSortedVec<Arc<str>> {
        let mut all: Vec<Arc<str>> = Vec::new();
        all.extend(self.comment.clone());
        all.extend(self.wide_comment.clone());
        all.into()
    }
}

impl fmt::Display for RuleSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;

        let separate = |f: &mut fmt::Formatter<'_>, wrote: &mut bool| -> fmt::Result {
            if *wrote {
                write!(f, " ")?;
            }

            *wrote = true;
            Ok(())
        };

        if self.always_open {
            write!(f, "24/7")?;
            wrote = true;
        } else {
            if let Some(comment) = &self.wide_comment {
                write!(f, "\"{comment}\":")?;
                wrote = true;
            }

            if !self.day_selector.year.is_empty() {
                separate(f, &mut wrote)?;
                crate::display::write_selector(f, &self.day_selector.year)?;
            }

            if !self.day_selector.monthday.is_empty() {
                separate(f, &mut wrote)?;
                crate::display::write_selector(f, &self.day_selector.monthday)?;
            }

            if !self.day_selector.week.is_empty() {
                separate(f, &mut wrote)?;
                write!(f, "week ")?;
                crate::display::write_selector(f, &self.day_selector.week)?;
            }

            if self.wide_range_colon {
                write!(f, ":")?;
            }

            if !self.day_selector.weekday.is_empty() {
                separate(f, &mut wrote)?;
                write!(f, "{}", self.day_selector.weekday)?;
            }

            if !self.time_selector.is_empty() {
                separate(f, &mut wrote)?;
                write!(f, "{}", self.time_selector)?;
            }
        }

        if let Some(state) = self.state {
            separate(f, &mut wrote)?;
            write!(f, "{state}")?;
        }

        if let Some(comment) = &self.comment {
            separate(f, &mut wrote)?;
            write!(f, "\"{comment}\"")?;
        }

        Ok(())
    }
}

// StateModifier

/// The state token exactly as written. `off` and `closed` both evaluate to
/// [`RuleKind::Closed`] but normalize back to the word that was used.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum StateModifier {
    Open,
    Closed,
    Off,
    Unknown,
}

impl StateModifier {
    pub const fn kind(self) -> RuleKind {
        match self {
            Self::Open => RuleKind::Open,
            Self::Closed | Self::Off => RuleKind::Closed,
            Self::Unknown => RuleKind::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Off => "off",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StateModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// RuleKind

#[derive(Copy, Clone, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub enum RuleKind {
    Open,
    Closed,
    Unknown,
}

impl RuleKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// RuleOperator

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum RuleOperator {
    Normal,
    Additional,
    Fallback,
}
