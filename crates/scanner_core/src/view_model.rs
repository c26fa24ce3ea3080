use std::fmt;

use chrono::NaiveDate;

use crate::model::{MonetizationType, NewTitleRow, ObjectType, Offer, TitleNode};

pub const JUSTWATCH_BASE_URL: &str = "https://www.justwatch.com";
const GENRES_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonetizationLabel {
    Streaming,
    Rent(String),
    Buy(String),
    Other(MonetizationType),
}

impl MonetizationLabel {
    pub fn for_offer(offer: &Offer) -> Self {
        match offer.monetization_type {
            MonetizationType::Flatrate => MonetizationLabel::Streaming,
            MonetizationType::Rent => MonetizationLabel::Rent(format_price(offer)),
            MonetizationType::Buy => MonetizationLabel::Buy(format_price(offer)),
            other => MonetizationLabel::Other(other),
        }
    }
}

impl fmt::Display for MonetizationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonetizationLabel::Streaming => write!(f, "Streaming"),
            MonetizationLabel::Rent(price) => write!(f, "Alquiler: {price}"),
            MonetizationLabel::Buy(price) => write!(f, "Compra: {price}"),
            MonetizationLabel::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// Everything a front-end needs to print one result entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRowView {
    pub position: usize,
    pub is_movie: bool,
    pub title: String,
    pub year: Option<i32>,
    pub imdb_score: Option<String>,
    pub platform: Option<String>,
    pub monetization: Option<MonetizationLabel>,
    pub quality: Option<String>,
    pub added: Option<String>,
    pub genres: Option<String>,
    pub runtime: Option<String>,
    pub url: String,
}

impl TitleRowView {
    fn from_node(position: usize, node: &TitleNode) -> Self {
        let content = node.content.clone().unwrap_or_default();
        let genres = content.genre_names().join(", ");
        Self {
            position,
            is_movie: node.object_type == Some(ObjectType::Movie),
            title: content.title.clone(),
            year: content.original_release_year,
            imdb_score: content.imdb_score().filter(|s| *s > 0.0).map(|s| format!("{s:.1}")),
            platform: None,
            monetization: None,
            quality: None,
            added: None,
            genres: (!genres.is_empty()).then_some(genres),
            runtime: content.runtime.filter(|m| *m > 0).map(format_runtime),
            url: title_url(&content.full_path),
        }
    }

    fn with_offer(mut self, offer: &Offer) -> Self {
        self.platform = Some(offer.platform_name().to_string());
        self.monetization = Some(MonetizationLabel::for_offer(offer));
        self
    }
}

/// View of a new-titles row; `position` is 1-based.
pub fn new_title_row_view(position: usize, row: &NewTitleRow) -> TitleRowView {
    let view = TitleRowView::from_node(position, &row.node);
    match &row.new_offer {
        Some(offer) => {
            let mut view = view.with_offer(offer);
            view.quality = offer.presentation_type.clone();
            view.added = Some(format_added_date(offer.last_change_date.as_deref()));
            view
        }
        None => view,
    }
}

/// View of a search result, genres shortened to fit one line.
pub fn title_row_view(position: usize, node: &TitleNode) -> TitleRowView {
    let mut view = TitleRowView::from_node(position, node);
    view.genres = view.genres.map(|g| truncate(&g, GENRES_WIDTH));
    match &node.watch_now_offer {
        Some(offer) => view.with_offer(offer),
        None => view,
    }
}

pub fn title_url(full_path: &str) -> String {
    format!("{JUSTWATCH_BASE_URL}{full_path}")
}

/// `112` becomes `1h 52m`, `45` becomes `45m`.
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// Day-first rendering (`5/1/2024`); `-` when absent, raw text when unparsable.
pub fn format_added_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "-".to_string();
    };
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(|day| day.format("%-d/%-m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_price(offer: &Offer) -> String {
    let currency = offer.currency.as_deref().unwrap_or("");
    let price = offer
        .retail_price
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    format!("{currency} {price}").trim().to_string()
}

/// Shortens to at most `length` characters, ending in `...` when cut.
pub fn truncate(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let kept: String = text.chars().take(length.saturating_sub(3)).collect();
    format!("{kept}...")
}
