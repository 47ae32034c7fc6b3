use std::fmt;

use chrono::{NaiveTime, Timelike};

/// A wall-clock time which can exceed 24:00 to express a time that wraps
/// into the next calendar day, as in `Fr 20:00-26:00`.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExtendedTime {
    hour: u8,
    minute: u8,
}

impl fmt::Debug for ExtendedTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl fmt::Display for ExtendedTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl ExtendedTime {
    pub const MIDNIGHT_00: Self = Self { hour: 0, minute: 0 };
    pub const MIDNIGHT_24: Self = Self { hour: 24, minute: 0 };
    pub const MIDNIGHT_48: Self = Self { hour: 48, minute: 0 };

    /// Build a new extended time. Hours run from 0 to 48 and minutes from 0
    /// to 59; anything else returns `None`.
    #[inline]
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 48 || minute >= 60 {
            return None;
        }

        Some(Self { hour, minute })
    }

    #[inline]
    pub fn hour(self) -> u8 {
        self.hour
    }

    #[inline]
    pub fn minute(self) -> u8 {
        self.minute
    }

    #[inline]
    pub fn add_minutes(self, minutes: i16) -> Option<Self> {
        let total = i16::try_from(self.mins_from_midnight()).ok()? + minutes;
        Self::from_mins_from_midnight(u16::try_from(total).ok()?)
    }

    #[inline]
    pub fn add_hours(self, hours: i16) -> Option<Self> {
        let hour = u8::try_from(i16::from(self.hour) + hours).ok()?;
        Self::new(hour, self.minute)
    }

    #[inline]
    pub fn from_mins_from_midnight(minutes: u16) -> Option<Self> {
        let hour = u8::try_from(minutes / 60).ok()?;
        let minute = u8::try_from(minutes % 60).ok()?;
        Self::new(hour, minute)
    }

    #[inline]
    pub fn mins_from_midnight(self) -> u16 {
        u16::from(self.minute) + 60 * u16::from(self.hour)
    }
}

impl TryFrom<ExtendedTime> for NaiveTime {
    type Error = ();

    #[inline]
    fn try_from(time: ExtendedTime) -> Result<Self, Self::Error> {
        NaiveTime::from_hms_opt(time.hour.into(), time.minute.into(), 0).ok_or(())
    }
}

impl From<NaiveTime> for ExtendedTime {
    #[inline]
    fn from(time: NaiveTime) -> ExtendedTime {
        Self {
            hour: time.hour().try_into().expect("invalid NaiveTime"),
            minute: time.minute().try_into().expect("invalid NaiveTime"),
        }
    }
}
