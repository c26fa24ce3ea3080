use std::sync::Arc;

use scanner_core::{
    technical_name_for, update, DateWindow, NewTitlesPage, PageRequest, ScanFilters, ScanMsg,
    ScanOutcome, ScanState, ScanStep, UpstreamError,
};
use scanner_logging::{scanner_debug, scanner_error, scanner_info, scanner_warn};
use serde::Deserialize;

use crate::pacing::Pacing;
use crate::queries::{new_titles_request, TitleFilter};
use crate::transport::{execute_as, GraphqlTransport};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NewTitlesData {
    new_titles: Option<NewTitlesPage>,
}

/// Walks the upstream new-titles listing one day at a time, newest day first.
#[derive(Clone)]
pub struct NewTitlesScanner {
    transport: Arc<dyn GraphqlTransport>,
    pacing: Pacing,
    page_size: u32,
}

impl NewTitlesScanner {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self {
            transport,
            pacing: Pacing::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub async fn scan(&self, window: DateWindow, filters: &ScanFilters) -> ScanOutcome {
        scanner_info!(
            "New titles scan {}..={} country={} language={} target={} exclusive_only={}",
            window.from(),
            window.to(),
            filters.country,
            filters.language,
            filters.count,
            filters.exclusive_only
        );
        if !filters.providers.is_empty() {
            let names: Vec<&str> = filters
                .providers
                .iter()
                .map(|code| technical_name_for(code))
                .collect();
            scanner_info!("Providers: {}", names.join(", "));
        }
        scanner_debug!(
            "Pacing {:?} per page ({})",
            self.pacing.interval(),
            self.pacing.reason()
        );
        let filter = TitleFilter::for_scan(filters);
        scanner_debug!("Title filter: {:?}", filter);

        let (mut state, mut step) = update(ScanState::new(window, filters), ScanMsg::Start);
        loop {
            match step {
                ScanStep::Fetch(request) => {
                    self.pacing.wait().await;
                    let msg = match self.fetch_page(filters, &filter, &request).await {
                        Ok(page) => ScanMsg::PageLoaded(page),
                        Err(failure) => {
                            scanner_error!(
                                "Page for {} failed after {} rows: {}",
                                request.day,
                                state.collected(),
                                failure
                            );
                            ScanMsg::PageFailed(failure)
                        }
                    };
                    (state, step) = update(state, msg);
                }
                ScanStep::Done(outcome) => {
                    log_outcome(&outcome, state.pages_loaded());
                    return outcome;
                }
            }
        }
    }

    async fn fetch_page(
        &self,
        filters: &ScanFilters,
        filter: &TitleFilter,
        request: &PageRequest,
    ) -> Result<NewTitlesPage, UpstreamError> {
        let graphql = new_titles_request(
            filters,
            filter,
            request.day,
            request.cursor.as_deref(),
            self.page_size,
        );
        let data: Option<NewTitlesData> = execute_as(self.transport.as_ref(), &graphql).await?;
        let page = data.and_then(|data| data.new_titles).unwrap_or_default();
        if !page.edges.is_empty() {
            scanner_info!("{}: {} titles listed upstream", request.day, page.total_count);
        }
        Ok(page)
    }
}

fn log_outcome(outcome: &ScanOutcome, pages: usize) {
    match outcome {
        ScanOutcome::Complete(rows) => {
            scanner_info!("Scan complete: {} rows from {} pages", rows.len(), pages);
        }
        ScanOutcome::Partial { rows, failure } => {
            scanner_warn!(
                "Returning {} partial rows after {} pages ({})",
                rows.len(),
                pages,
                failure.kind
            );
        }
        ScanOutcome::Fatal(failure) => {
            scanner_error!("Scan failed: {}", failure);
        }
    }
}
