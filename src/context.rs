use std::fmt::Debug;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::rules::time::TimeEvent;

// --
// -- Collaborator interfaces
// --

/// Supplies holiday calendars for a region. Implementations must answer
/// synchronously; expensive sources should cache internally.
pub trait HolidayProvider: Debug + Send + Sync {
    /// Public holidays of a region for a given year, sorted by date.
    fn public_holidays(&self, region: &str, year: i32) -> Vec<(NaiveDate, String)>;

    /// School holiday periods of a region for a given year, as inclusive
    /// date ranges. Expressions using these are reported as unsupported for
    /// now, so providers rarely bother implementing this.
    fn school_holidays(&self, _region: &str, _year: i32) -> Vec<(NaiveDate, NaiveDate)> {
        Vec::new()
    }
}

/// Supplies sun event times for a location. `None` is acceptable for polar
/// edge cases and falls back to nominal hours.
pub trait SunEventProvider: Debug + Send + Sync {
    fn sun_event(&self, event: TimeEvent, date: NaiveDate, coords: Coordinates)
        -> Option<NaiveTime>;
}

// --
// -- Coordinates
// --

/// A valid pair of geographic coordinates.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Validate a pair of latitude / longitude.
    ///
    /// Return `None` if values are out of range (`abs(lat) > 90` or
    /// `abs(lon) > 180`).
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }

        Some(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

// --
// -- Bundled providers
// --

/// Holiday provider backed by a fixed, sorted list of dates. Handy for
/// callers that already resolved their holidays and for tests.
#[derive(Clone, Debug, Default)]
pub struct StaticHolidays {
    dates: Vec<(NaiveDate, String)>,
}

impl StaticHolidays {
    pub fn new(dates: impl IntoIterator<Item = (NaiveDate, String)>) -> Self {
        let mut dates: Vec<_> = dates.into_iter().collect();
        dates.sort();
        Self { dates }
    }
}

impl HolidayProvider for StaticHolidays {
    fn public_holidays(&self, _region: &str, year: i32) -> Vec<(NaiveDate, String)> {
        (self.dates.iter())
            .filter(|(date, _)| date.year() == year)
            .cloned()
            .collect()
    }
}

// --
// -- Context
// --

/// All the context attached to a parsed expression that can alter its
/// evaluation semantics: which region holidays are resolved for and where
/// the sun events happen.
#[derive(Clone, Debug, Default)]
pub struct Context {
    pub(crate) holidays: Option<RegionHolidays>,
    pub(crate) location: Option<LocatedSun>,
}

#[derive(Clone, Debug)]
pub(crate) struct RegionHolidays {
    provider: Arc<dyn HolidayProvider>,
    region: String,
}

#[derive(Clone, Debug)]
pub(crate) struct LocatedSun {
    provider: Arc<dyn SunEventProvider>,
    coords: Coordinates,
}

impl Context {
    /// Attach a holiday provider together with the region to resolve.
    pub fn with_region(
        self,
        provider: Arc<dyn HolidayProvider>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            holidays: Some(RegionHolidays { provider, region: region.into() }),
            ..self
        }
    }

    /// Attach a sun event provider together with the coordinates of the
    /// evaluated place.
    pub fn with_location(self, provider: Arc<dyn SunEventProvider>, coords: Coordinates) -> Self {
        Self {
            location: Some(LocatedSun { provider, coords }),
            ..self
        }
    }

    pub(crate) fn has_region(&self) -> bool {
        self.holidays.is_some()
    }

    pub(crate) fn has_location(&self) -> bool {
        self.location.is_some()
    }

    pub(crate) fn is_public_holiday(&self, date: NaiveDate) -> bool {
        let Some(holidays) = &self.holidays else {
            return false;
        };

        (holidays.provider)
            .public_holidays(&holidays.region, date.year())
            .iter()
            .any(|(holiday, _)| *holiday == date)
    }

    /// First public holiday strictly after `date`, used as a change hint.
    pub(crate) fn public_holiday_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        let holidays = self.holidays.as_ref()?;

        for year in [date.year(), date.year() + 1] {
            let found = (holidays.provider)
                .public_holidays(&holidays.region, year)
                .into_iter()
                .map(|(holiday, _)| holiday)
                .find(|holiday| *holiday > date);

            if found.is_some() {
                return found;
            }
        }

        None
    }

    /// Wall-clock time of a sun event, with nominal fallbacks when no
    /// provider answers.
    pub(crate) fn event_time(&self, date: NaiveDate, event: TimeEvent) -> NaiveTime {
        (self.location.as_ref())
            .and_then(|sun| sun.provider.sun_event(event, date, sun.coords))
            .unwrap_or_else(|| default_event_time(event))
    }
}

fn default_event_time(event: TimeEvent) -> NaiveTime {
    match event {
        TimeEvent::Dawn => NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        TimeEvent::Sunrise => NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        TimeEvent::Sunset => NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        TimeEvent::Dusk => NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
    }
}
