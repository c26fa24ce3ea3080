//! Scanner core: upstream data model, filters, and the pure new-titles scan state machine.
pub mod catalog;
mod failure;
mod filters;
mod model;
mod scan;
mod view_model;

pub use catalog::{genre_by_code, provider_by_code, technical_name_for, Genre, Provider};
pub use failure::{FailureKind, UpstreamError};
pub use filters::{
    added_on, added_on_or_before, flatrate_platforms, is_exclusive, local_today,
    retain_added_on_or_before, DateWindow, ReleaseYearRange, ScanFilters, SearchFilters, SortBy,
    WindowError, DEFAULT_COUNTRY, DEFAULT_LANGUAGE, DEFAULT_SCAN_COUNT, DEFAULT_SEARCH_COUNT,
};
pub use model::{
    Credit, GenreTranslation, MonetizationType, NewTitleEdge, NewTitleRow, NewTitlesPage,
    ObjectType, Offer, Package, PageInfo, RetailPrice, Scoring, TitleContent, TitleNode,
};
pub use scan::{update, PageRequest, ScanMsg, ScanOutcome, ScanState, ScanStep};
pub use view_model::{
    format_added_date, format_price, format_runtime, new_title_row_view, title_row_view,
    title_url, truncate, MonetizationLabel, TitleRowView, JUSTWATCH_BASE_URL,
};
