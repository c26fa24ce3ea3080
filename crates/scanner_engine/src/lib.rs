//! Upstream access for the scanner: GraphQL transport, the new-titles scan
//! driver, sibling searches, exports and configuration.
mod config;
mod export;
mod pacing;
mod queries;
mod scanner;
mod search;
mod transport;

pub use config::{load_config, ScannerConfig, CONFIG_FILENAME};
pub use export::{
    export_filename, export_rows, rows_to_csv, rows_to_json, ExportError, ExportFormat,
};
pub use pacing::{Pacing, DEFAULT_PACING, DEFAULT_PACING_REASON};
pub use queries::{
    new_titles_request, popular_titles_request, suggested_titles_request, title_offers_request,
    TitleFilter,
};
pub use scanner::{NewTitlesScanner, DEFAULT_PAGE_SIZE};
pub use search::{ConnectionReport, SearchClient, TitleOffers, DEFAULT_NAME_SEARCH_COUNT};
pub use transport::{
    decode_body, execute_as, looks_like_html, GraphqlRequest, GraphqlTransport,
    ReqwestTransport, TransportSettings, DEFAULT_ENDPOINT,
};
