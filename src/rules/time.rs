use std::fmt;

use crate::display::write_selector;
use crate::extended_time::ExtendedTime;

// TimeSelector

/// List of time spans a rule applies to. An empty list stands for the whole
/// day, and is rendered as nothing.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct TimeSelector {
    pub time: Vec<TimeSpan>,
}

impl TimeSelector {
    #[inline]
    pub fn new(time: Vec<TimeSpan>) -> Self {
        Self { time }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

impl fmt::Display for TimeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_selector(f, &self.time)
    }
}

// TimeSpan

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: Time,
    /// `None` encodes a bare point in time (`10:00`), which only the
    /// points-in-time mode could evaluate.
    pub end: Option<Time>,
    pub open_end: bool,
    /// Period subdividing the span, in minutes.
    pub repeats: Option<u16>,
}

impl TimeSpan {
    #[inline]
    pub fn fixed_range(start: ExtendedTime, end: ExtendedTime) -> Self {
        Self {
            start: Time::Fixed(start),
            end: Some(Time::Fixed(end)),
            open_end: false,
            repeats: None,
        }
    }

    /// Check if this is the immutable full-day range `00:00-24:00`.
    pub fn is_immutable_full_day(&self) -> bool {
        self.start == Time::Fixed(ExtendedTime::MIDNIGHT_00)
            && self.end == Some(Time::Fixed(ExtendedTime::MIDNIGHT_24))
            && !self.open_end
            && self.repeats.is_none()
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;

        if let Some(end) = &self.end {
            write!(f, "-{end}")?;
        }

        if self.open_end {
            write!(f, "+")?;
        }

        if let Some(mins) = self.repeats {
            if mins < 60 {
                write!(f, "/{mins}")?;
            } else if mins % 60 == 0 {
                write!(f, "/{:02}", mins / 60)?;
            } else {
                write!(f, "/{:02}:{:02}", mins / 60, mins % 60)?;
            }
        }

        Ok(())
    }
}

// Time

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Time {
    Fixed(ExtendedTime),
    Variable(VariableTime),
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(time) => write!(f, "{time}"),
            Self::Variable(var) => write!(f, "{var}"),
        }
    }
}

// VariableTime

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct VariableTime {
    pub event: TimeEvent,
    /// Signed offset in minutes.
    pub offset: i16,
}

impl fmt::Display for VariableTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.offset == 0 {
            return write!(f, "{}", self.event);
        }

        let sign = if self.offset < 0 { '-' } else { '+' };
        let mins = self.offset.unsigned_abs();
        write!(f, "({}{}{:02}:{:02})", self.event, sign, mins / 60, mins % 60)
    }
}

// TimeEvent

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TimeEvent {
    Dawn,
    Sunrise,
    Sunset,
    Dusk,
}

impl TimeEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dawn => "dawn",
            Self::Sunrise => "sunrise",
            Self::Sunset => "sunset",
            Self::Dusk => "dusk",
        }
    }
}

impl fmt::Display for TimeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
