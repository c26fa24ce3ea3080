use std::collections::BTreeSet;

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{MonetizationType, NewTitleRow, ObjectType, TitleNode};

pub const DEFAULT_COUNTRY: &str = "AR";
pub const DEFAULT_LANGUAGE: &str = "es";
pub const DEFAULT_SCAN_COUNT: usize = 100;
pub const DEFAULT_SEARCH_COUNT: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("date window starts after it ends ({from} > {to})")]
    Inverted { from: NaiveDate, to: NaiveDate },
}

/// Inclusive range of calendar days, walked from `to` back to `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

/// Today on the local calendar, the day scan windows are anchored to.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, WindowError> {
        if from > to {
            return Err(WindowError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// The `days` days before `today` plus `today` itself.
    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        let from = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self { from, to: today }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn day_count(&self) -> u64 {
        (self.to - self.from).num_days() as u64 + 1
    }

    /// Days of the window, newest first.
    pub fn days_descending(&self) -> impl Iterator<Item = NaiveDate> {
        let from = self.from;
        std::iter::successors(Some(self.to), |day| day.pred_opt()).take_while(move |day| *day >= from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReleaseYearRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl ReleaseYearRange {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Immutable input of a new-titles scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFilters {
    pub country: String,
    pub language: String,
    pub providers: Vec<String>,
    pub object_types: Vec<ObjectType>,
    pub monetization_types: Vec<MonetizationType>,
    pub genres: Vec<String>,
    pub production_countries: Vec<String>,
    pub exclude_production_countries: Vec<String>,
    pub release_year: ReleaseYearRange,
    pub exclusive_only: bool,
    pub count: usize,
}

impl Default for ScanFilters {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            providers: Vec::new(),
            object_types: Vec::new(),
            monetization_types: Vec::new(),
            genres: Vec::new(),
            production_countries: Vec::new(),
            exclude_production_countries: Vec::new(),
            release_year: ReleaseYearRange::default(),
            exclusive_only: false,
            count: DEFAULT_SCAN_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    #[default]
    Popular,
    ReleaseDate,
    Alphabetical,
    Random,
}

/// Input of a single-page popular titles search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub country: String,
    pub language: String,
    pub providers: Vec<String>,
    pub object_types: Vec<ObjectType>,
    pub genres: Vec<String>,
    pub monetization_types: Vec<MonetizationType>,
    pub release_year: ReleaseYearRange,
    pub sort_by: SortBy,
    pub first: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            providers: Vec::new(),
            object_types: Vec::new(),
            genres: Vec::new(),
            monetization_types: Vec::new(),
            release_year: ReleaseYearRange::default(),
            sort_by: SortBy::default(),
            first: DEFAULT_SEARCH_COUNT,
        }
    }
}

/// Distinct platforms on which the title is included in a subscription.
///
/// Offers without a package count as one unnamed platform.
pub fn flatrate_platforms(node: &TitleNode) -> BTreeSet<Option<&str>> {
    node.offers
        .iter()
        .filter(|offer| offer.is_flatrate())
        .map(|offer| offer.package.as_ref().map(|p| p.technical_name.as_str()))
        .collect()
}

/// True when the title streams on exactly one subscription platform.
pub fn is_exclusive(node: &TitleNode) -> bool {
    flatrate_platforms(node).len() == 1
}

/// Calendar day on which the row's triggering offer changed, when known.
pub fn added_on(row: &NewTitleRow) -> Option<NaiveDate> {
    let offer = row.new_offer.as_ref()?;
    let raw = offer
        .last_change_date
        .as_deref()
        .or(offer.date_created.as_deref())?;
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Rows with an unknown change date are kept.
pub fn added_on_or_before(row: &NewTitleRow, ceiling: NaiveDate) -> bool {
    added_on(row).is_none_or(|day| day <= ceiling)
}

pub fn retain_added_on_or_before(rows: &mut Vec<NewTitleRow>, ceiling: NaiveDate) {
    rows.retain(|row| added_on_or_before(row, ceiling));
}
