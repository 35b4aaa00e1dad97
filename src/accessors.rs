//! Datetime field access for temporal coordinates
//!
//! [`DatetimeAccessor`] exposes calendar fields (year, month, day of year, ...)
//! of a datetime coordinate as integer coordinates along the same dimension.
//! These fields are commonly turned into group labels with
//! [`Coordinate::labels`].
//!
//! Fields are not calendar-aware: every timestamp is treated as proleptic
//! Gregorian.

use crate::coords::{CoordValues, Coordinate};
use crate::errors::{Result, ResampleError};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Calendar fields available through the accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Year,
    /// January=1, December=12
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Microsecond,
    /// Nanoseconds within the current microsecond
    Nanosecond,
    /// ISO week ordinal of the year
    WeekOfYear,
    /// Monday=0, Sunday=6
    DayOfWeek,
    DayOfYear,
    Quarter,
    DaysInMonth,
}

impl DateField {
    /// Get the string representation of the field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Microsecond => "microsecond",
            Self::Nanosecond => "nanosecond",
            Self::WeekOfYear => "weekofyear",
            Self::DayOfWeek => "dayofweek",
            Self::DayOfYear => "dayofyear",
            Self::Quarter => "quarter",
            Self::DaysInMonth => "days_in_month",
        }
    }

    fn extract(self, t: &NaiveDateTime) -> i64 {
        let subsecond = i64::from(t.nanosecond() % 1_000_000_000);
        match self {
            Self::Year => i64::from(t.year()),
            Self::Month => i64::from(t.month()),
            Self::Day => i64::from(t.day()),
            Self::Hour => i64::from(t.hour()),
            Self::Minute => i64::from(t.minute()),
            Self::Second => i64::from(t.second()),
            Self::Microsecond => subsecond / 1_000,
            Self::Nanosecond => subsecond % 1_000,
            Self::WeekOfYear => i64::from(t.iso_week().week()),
            Self::DayOfWeek => i64::from(t.weekday().num_days_from_monday()),
            Self::DayOfYear => i64::from(t.ordinal()),
            Self::Quarter => i64::from((t.month() - 1) / 3 + 1),
            Self::DaysInMonth => days_in_month(t.year(), t.month()),
        }
    }
}

fn days_in_month(year: i32, month: u32) -> i64 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(start), Some(end)) => (end - start).num_days(),
        // past the supported calendar range
        _ => 31,
    }
}

/// Field access over the values of a datetime coordinate
#[derive(Debug, Clone, Copy)]
pub struct DatetimeAccessor<'a> {
    coord: &'a Coordinate,
    times: &'a [NaiveDateTime],
}

impl<'a> DatetimeAccessor<'a> {
    /// Wraps a coordinate; fails unless it holds datetime values.
    pub fn new(coord: &'a Coordinate) -> Result<Self> {
        match coord.values() {
            CoordValues::Time(times) => Ok(Self { coord, times }),
            other => Err(ResampleError::NotDatetimeLike {
                accessor: "dt".to_string(),
                found: other.kind().to_string(),
            }),
        }
    }

    /// Extracts `field` as an integer coordinate along the same dimension.
    #[must_use]
    pub fn field(&self, field: DateField) -> Coordinate {
        let values = CoordValues::Int(self.times.iter().map(|t| field.extract(t)).collect());
        self.wrap(values)
    }

    fn wrap(&self, values: CoordValues) -> Coordinate {
        Coordinate::from_parts(self.coord.dim().map(str::to_string), values)
    }

    /// The year of the datetime
    #[must_use]
    pub fn year(&self) -> Coordinate {
        self.field(DateField::Year)
    }

    /// The month as January=1, December=12
    #[must_use]
    pub fn month(&self) -> Coordinate {
        self.field(DateField::Month)
    }

    /// The days of the datetime
    #[must_use]
    pub fn day(&self) -> Coordinate {
        self.field(DateField::Day)
    }

    #[must_use]
    pub fn hour(&self) -> Coordinate {
        self.field(DateField::Hour)
    }

    #[must_use]
    pub fn minute(&self) -> Coordinate {
        self.field(DateField::Minute)
    }

    #[must_use]
    pub fn second(&self) -> Coordinate {
        self.field(DateField::Second)
    }

    #[must_use]
    pub fn microsecond(&self) -> Coordinate {
        self.field(DateField::Microsecond)
    }

    #[must_use]
    pub fn nanosecond(&self) -> Coordinate {
        self.field(DateField::Nanosecond)
    }

    /// The week ordinal of the year
    #[must_use]
    pub fn weekofyear(&self) -> Coordinate {
        self.field(DateField::WeekOfYear)
    }

    #[must_use]
    pub fn week(&self) -> Coordinate {
        self.weekofyear()
    }

    /// The day of the week with Monday=0, Sunday=6
    #[must_use]
    pub fn dayofweek(&self) -> Coordinate {
        self.field(DateField::DayOfWeek)
    }

    #[must_use]
    pub fn weekday(&self) -> Coordinate {
        self.dayofweek()
    }

    /// The name of day in a week (ex: Friday)
    #[must_use]
    pub fn weekday_name(&self) -> Coordinate {
        let names = self
            .times
            .iter()
            .map(|t| {
                match t.weekday() {
                    chrono::Weekday::Mon => "Monday",
                    chrono::Weekday::Tue => "Tuesday",
                    chrono::Weekday::Wed => "Wednesday",
                    chrono::Weekday::Thu => "Thursday",
                    chrono::Weekday::Fri => "Friday",
                    chrono::Weekday::Sat => "Saturday",
                    chrono::Weekday::Sun => "Sunday",
                }
                .to_string()
            })
            .collect();
        self.wrap(CoordValues::Text(names))
    }

    /// The ordinal day of the year
    #[must_use]
    pub fn dayofyear(&self) -> Coordinate {
        self.field(DateField::DayOfYear)
    }

    /// The quarter of the date
    #[must_use]
    pub fn quarter(&self) -> Coordinate {
        self.field(DateField::Quarter)
    }

    /// The number of days in the month
    #[must_use]
    pub fn days_in_month(&self) -> Coordinate {
        self.field(DateField::DaysInMonth)
    }

    #[must_use]
    pub fn daysinmonth(&self) -> Coordinate {
        self.days_in_month()
    }
}
