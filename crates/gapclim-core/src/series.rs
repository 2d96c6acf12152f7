//! Calendar-ordered monthly data.
//!
//! All annual recurrences in the gap-model drivers run over exactly twelve
//! calendar months. [`MonthlySeries`] makes that length a type invariant and
//! [`MonthRange`] makes the end convention of a sub-season explicit, because
//! the source equations disagree on whether a season's end month is included.

use crate::errors::{GapClimError, GapClimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut, Range};

/// Floating point type used for all physical quantities.
pub type FloatValue = f64;

/// Number of months in a simulated year.
pub const MONTHS_PER_YEAR: usize = 12;

/// Calendar month, January first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; MONTHS_PER_YEAR] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Zero-based index (January = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Month> {
        Month::ALL.get(index).copied()
    }

    /// Northern-hemisphere meteorological season this month belongs to.
    pub fn meteorological_season(self) -> MeteorologicalSeason {
        match self {
            Month::March | Month::April | Month::May => MeteorologicalSeason::Spring,
            Month::June | Month::July | Month::August => MeteorologicalSeason::Summer,
            Month::September | Month::October | Month::November => MeteorologicalSeason::Fall,
            Month::December | Month::January | Month::February => MeteorologicalSeason::Winter,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Three-month meteorological seasons (spring = Mar-May, winter = Dec-Feb).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeteorologicalSeason {
    Spring,
    Summer,
    Fall,
    Winter,
}

/// Exactly twelve values in calendar order.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeries<T>([T; MONTHS_PER_YEAR]);

impl<T> MonthlySeries<T> {
    pub fn new(values: [T; MONTHS_PER_YEAR]) -> Self {
        Self(values)
    }

    /// Build a series by evaluating `f` for each month in calendar order.
    pub fn from_fn(mut f: impl FnMut(Month) -> T) -> Self {
        Self(std::array::from_fn(|i| f(Month::ALL[i])))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Iterate over `(month, value)` pairs in calendar order.
    pub fn iter_months(&self) -> impl Iterator<Item = (Month, &T)> {
        Month::ALL.into_iter().zip(self.0.iter())
    }

    pub fn get(&self, month: Month) -> &T {
        &self.0[month.index()]
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> MonthlySeries<U> {
        MonthlySeries(std::array::from_fn(|i| f(&self.0[i])))
    }
}

impl<T: Copy> MonthlySeries<T> {
    /// A series holding the same value in every month.
    pub fn filled(value: T) -> Self {
        Self([value; MONTHS_PER_YEAR])
    }

    /// Build a series from a slice, reporting a [`GapClimError::SeriesLength`]
    /// tagged with the site and series name if it does not hold 12 values.
    pub fn from_slice(site: &str, series: &str, values: &[T]) -> GapClimResult<Self> {
        let array: [T; MONTHS_PER_YEAR] =
            values.try_into().map_err(|_| GapClimError::SeriesLength {
                site: site.to_string(),
                series: series.to_string(),
                actual: values.len(),
            })?;
        Ok(Self(array))
    }
}

impl MonthlySeries<f64> {
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Sum of the values whose months fall inside `range`.
    pub fn sum_over(&self, range: MonthRange) -> f64 {
        self.0[range.indices()].iter().sum()
    }

    /// Coldest of December, January and February.
    pub fn winter_minimum(&self) -> f64 {
        self.0[Month::December.index()]
            .min(self.0[Month::January.index()])
            .min(self.0[Month::February.index()])
    }
}

impl<T> Index<usize> for MonthlySeries<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T> IndexMut<usize> for MonthlySeries<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.0[index]
    }
}

impl<T> Index<Month> for MonthlySeries<T> {
    type Output = T;

    fn index(&self, month: Month) -> &T {
        &self.0[month.index()]
    }
}

impl<T> IndexMut<Month> for MonthlySeries<T> {
    fn index_mut(&mut self, month: Month) -> &mut T {
        &mut self.0[month.index()]
    }
}

impl<T> From<[T; MONTHS_PER_YEAR]> for MonthlySeries<T> {
    fn from(values: [T; MONTHS_PER_YEAR]) -> Self {
        Self(values)
    }
}

impl<'a, T> IntoIterator for &'a MonthlySeries<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// How the end month of a configured season is interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonEnd {
    /// The end month is part of the season.
    Inclusive,
    /// The season stops before the end month.
    #[default]
    Exclusive,
}

impl fmt::Display for SeasonEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonEnd::Inclusive => write!(f, "inclusive"),
            SeasonEnd::Exclusive => write!(f, "exclusive"),
        }
    }
}

/// A contiguous run of months within one calendar year.
///
/// Stored half-open (`start..end`). Seasons that wrap around the new year
/// are not representable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MonthRange {
    start: usize,
    end: usize,
}

impl MonthRange {
    /// January through December.
    pub const FULL_YEAR: MonthRange = MonthRange {
        start: 0,
        end: MONTHS_PER_YEAR,
    };

    /// `start..=end`; both indices must be valid months and `start <= end`.
    pub fn inclusive(start: usize, end: usize) -> Option<Self> {
        (start <= end && end < MONTHS_PER_YEAR).then(|| Self {
            start,
            end: end + 1,
        })
    }

    /// `start..end`; `end` may be 12 and an empty range (`start == end`) is allowed.
    pub fn half_open(start: usize, end: usize) -> Option<Self> {
        (start <= end && end <= MONTHS_PER_YEAR).then_some(Self { start, end })
    }

    pub fn from_bounds(start: usize, end: usize, convention: SeasonEnd) -> Option<Self> {
        match convention {
            SeasonEnd::Inclusive => Self::inclusive(start, end),
            SeasonEnd::Exclusive => Self::half_open(start, end),
        }
    }

    /// Like [`MonthRange::from_bounds`] but reports invalid bounds against a site.
    pub fn for_site(
        site: &str,
        start: usize,
        end: usize,
        convention: SeasonEnd,
    ) -> GapClimResult<Self> {
        Self::from_bounds(start, end, convention).ok_or_else(|| GapClimError::InvalidMonthRange {
            site: site.to_string(),
            start,
            end,
            convention: convention.to_string(),
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last month of the range.
    pub fn end_exclusive(&self) -> usize {
        self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn months(&self) -> impl Iterator<Item = Month> {
        let (start, end) = (self.start, self.end);
        Month::ALL.into_iter().take(end).skip(start)
    }
}
