use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::rules::RuleKind;
use crate::sorted_vec::UniqueSortedVec;

/// A maximal period of time over which the evaluated state and comment do
/// not change.
///
/// The period is half open: `begin` is the first instant included, `end` the
/// first instant excluded. A `None` bound stands for an open begin (since
/// the beginning of time) or an open end (for all eternity).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Interval {
    kind: RuleKind,
    begin: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    comments: UniqueSortedVec<Arc<str>>,
}

impl Interval {
    pub(crate) fn new(
        kind: RuleKind,
        begin: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        comments: UniqueSortedVec<Arc<str>>,
    ) -> Self {
        debug_assert!(match (begin, end) {
            (Some(b), Some(e)) => b < e,
            _ => true,
        });

        Self { kind, begin, end, comments }
    }

    /// The evaluated state over this interval.
    pub fn state(&self) -> RuleKind {
        self.kind
    }

    /// First instant included in the interval, or `None` for an open begin.
    pub fn begin(&self) -> Option<NaiveDateTime> {
        self.begin
    }

    /// First instant not included in the interval anymore, or `None` for an
    /// open end.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    pub fn has_open_begin(&self) -> bool {
        self.begin.is_none()
    }

    pub fn has_open_end(&self) -> bool {
        self.end.is_none()
    }

    /// Comments of the rules that produced this interval, distinct values
    /// joined with ` / `.
    pub fn comment(&self) -> Option<String> {
        if self.comments.is_empty() {
            return None;
        }

        Some(
            (self.comments.iter())
                .map(|comment| comment.as_ref())
                .collect::<Vec<_>>()
                .join(" / "),
        )
    }

    /// Check if this interval contains `dt`.
    pub fn contains(&self, dt: NaiveDateTime) -> bool {
        self.begin.map(|begin| begin <= dt).unwrap_or(true)
            && self.end.map(|end| dt < end).unwrap_or(true)
    }

    /// Check whether this interval overlaps with `other`.
    pub fn intersects(&self, other: &Interval) -> bool {
        let starts_before_other_ends = match (self.begin, other.end) {
            (Some(begin), Some(end)) => begin < end,
            _ => true,
        };

        let other_starts_before_self_ends = match (other.begin, self.end) {
            (Some(begin), Some(end)) => begin < end,
            _ => true,
        };

        starts_before_other_ends && other_starts_before_self_ends
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interval {
    /// Intervals order by their begin, an open begin coming first.
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |interval: &Self| {
            (
                interval.begin.unwrap_or(NaiveDateTime::MIN),
                interval.end.unwrap_or(NaiveDateTime::MAX),
                interval.kind,
            )
        };

        key(self)
            .cmp(&key(other))
            .then_with(|| self.comments.as_slice().cmp(other.comments.as_slice()))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.begin {
            Some(begin) => write!(f, "[{begin}, ")?,
            None => write!(f, "(-inf, ")?,
        }

        match self.end {
            Some(end) => write!(f, "{end})")?,
            None => write!(f, "+inf)")?,
        }

        write!(f, " {}", self.kind)?;

        if let Some(comment) = self.comment() {
            write!(f, " \"{comment}\"")?;
        }

        Ok(())
    }
}
