use chrono::{Days, NaiveDate};
use scanner_core::{
    DateWindow, MonetizationType, ObjectType, ReleaseYearRange, ScanFilters, SearchFilters,
    SortBy, DEFAULT_SCAN_COUNT, DEFAULT_SEARCH_COUNT,
};
use serde::Deserialize;

use crate::errors::{AppError, AppResult};

const DEFAULT_WINDOW_DAYS: u64 = 7;

/// Body of `POST /api/new-titles`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTitlesRequest {
    pub providers: Vec<String>,
    pub object_types: Vec<ObjectType>,
    pub monetization_types: Vec<MonetizationType>,
    pub genres: Vec<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub added_before: Option<String>,
    pub first: Option<usize>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub exclusive_only: bool,
    pub production_countries: Vec<String>,
    pub exclude_production_countries: Vec<String>,
    pub release_year_from: Option<i32>,
    pub release_year_to: Option<i32>,
}

impl NewTitlesRequest {
    /// Missing ends default to the last week ending `today`.
    pub fn window(&self, today: NaiveDate) -> AppResult<DateWindow> {
        let to = parse_day("dateTo", self.date_to.as_deref())?.unwrap_or(today);
        let from = match parse_day("dateFrom", self.date_from.as_deref())? {
            Some(day) => day,
            None => today
                .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
                .unwrap_or(NaiveDate::MIN),
        };
        Ok(DateWindow::new(from, to)?)
    }

    pub fn added_before(&self) -> AppResult<Option<NaiveDate>> {
        parse_day("addedBefore", self.added_before.as_deref())
    }

    pub fn filters(&self, country: &str, language: &str) -> ScanFilters {
        ScanFilters {
            country: self.country.clone().unwrap_or_else(|| country.to_string()),
            language: self.language.clone().unwrap_or_else(|| language.to_string()),
            providers: self.providers.clone(),
            object_types: self.object_types.clone(),
            monetization_types: self.monetization_types.clone(),
            genres: self.genres.clone(),
            production_countries: self.production_countries.clone(),
            exclude_production_countries: self.exclude_production_countries.clone(),
            release_year: ReleaseYearRange {
                min: self.release_year_from,
                max: self.release_year_to,
            },
            exclusive_only: self.exclusive_only,
            count: self.first.unwrap_or(DEFAULT_SCAN_COUNT),
        }
    }
}

/// Body of `POST /api/titles`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitlesRequest {
    pub providers: Vec<String>,
    pub object_types: Vec<ObjectType>,
    pub genres: Vec<String>,
    pub monetization_types: Vec<MonetizationType>,
    pub release_year_from: Option<i32>,
    pub release_year_to: Option<i32>,
    pub sort_by: Option<SortBy>,
    pub first: Option<u32>,
    pub country: Option<String>,
    pub language: Option<String>,
}

impl TitlesRequest {
    pub fn filters(&self, country: &str, language: &str) -> SearchFilters {
        SearchFilters {
            country: self.country.clone().unwrap_or_else(|| country.to_string()),
            language: self.language.clone().unwrap_or_else(|| language.to_string()),
            providers: self.providers.clone(),
            object_types: self.object_types.clone(),
            genres: self.genres.clone(),
            monetization_types: self.monetization_types.clone(),
            release_year: ReleaseYearRange {
                min: self.release_year_from,
                max: self.release_year_to,
            },
            sort_by: self.sort_by.unwrap_or_default(),
            first: self.first.unwrap_or(DEFAULT_SEARCH_COUNT),
        }
    }
}

/// Query string of `GET /api/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocaleParams {
    pub country: Option<String>,
    pub language: Option<String>,
}

/// Accepts `YYYY-MM-DD` or any timestamp starting with it.
fn parse_day(field: &str, raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(Some)
        .ok_or_else(|| AppError::bad_request(format!("Fecha inválida en {field}: {raw}")))
}
