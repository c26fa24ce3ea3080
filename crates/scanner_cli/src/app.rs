use std::sync::Arc;

use anyhow::{Context, Result};
use scanner_core::{local_today, ScanOutcome, TitleNode, UpstreamError};
use scanner_engine::{
    export_filename, export_rows, ExportFormat, NewTitlesScanner, ReqwestTransport, ScannerConfig,
    SearchClient,
};
use scanner_logging::{scanner_error, scanner_info, scanner_warn};
use tokio::runtime::Runtime;

use crate::prompts::{self, ExportChoice, MenuAction};
use crate::render;

const NAME_SEARCH_COUNT: u32 = 10;

/// Menu loop. Prompts block on the terminal; upstream calls run on `runtime`.
pub struct App {
    runtime: Runtime,
    scanner: NewTitlesScanner,
    search: SearchClient,
    config: ScannerConfig,
}

impl App {
    pub fn new(config: ScannerConfig) -> Result<Self> {
        let runtime = Runtime::new().context("failed to start the async runtime")?;
        let transport = Arc::new(
            ReqwestTransport::new(config.transport_settings())
                .context("failed to build the upstream client")?,
        );
        let scanner = NewTitlesScanner::new(transport.clone())
            .with_pacing(config.per_scan_pacing())
            .with_page_size(config.page_size);
        Ok(Self {
            runtime,
            scanner,
            search: SearchClient::new(transport),
            config,
        })
    }

    pub fn run(&self) -> Result<()> {
        render::banner();
        loop {
            let action = prompts::main_menu()?;
            scanner_info!("Menu action {:?}", action);
            let result = match action {
                MenuAction::NewTitles => self.new_titles(),
                MenuAction::FilteredSearch => self.filtered_search(),
                MenuAction::SearchByName => self.search_by_name(),
                MenuAction::Providers => {
                    render::providers();
                    Ok(())
                }
                MenuAction::Genres => {
                    render::genres();
                    Ok(())
                }
                MenuAction::Exit => {
                    render::goodbye();
                    return Ok(());
                }
            };
            if let Err(err) = result {
                scanner_error!("{:?} failed: {:#}", action, err);
                return Err(err);
            }
        }
    }

    fn new_titles(&self) -> Result<()> {
        let (window, filters) =
            prompts::scan_filters(local_today(), &self.config.country, &self.config.language)?;
        render::searching("Buscando títulos");

        let rows = match self.runtime.block_on(self.scanner.scan(window, &filters)) {
            ScanOutcome::Complete(rows) => rows,
            ScanOutcome::Partial { rows, failure } => {
                render::partial(&failure, rows.len());
                rows
            }
            ScanOutcome::Fatal(failure) => {
                render::failure(&failure);
                return Ok(());
            }
        };
        if rows.is_empty() {
            render::nothing_found();
            return Ok(());
        }
        render::new_titles(&rows);

        let format = match prompts::export_choice()? {
            ExportChoice::None => return Ok(()),
            ExportChoice::Json => ExportFormat::Json,
            ExportChoice::Csv => ExportFormat::Csv,
        };
        let filename = export_filename(local_today(), format);
        match export_rows(&rows, format, &self.config.export_dir, &filename) {
            Ok(path) => render::exported(&path),
            Err(err) => {
                scanner_warn!("Export to {:?} failed: {}", self.config.export_dir, err);
                eprintln!("No se pudo exportar: {err}");
            }
        }
        Ok(())
    }

    fn filtered_search(&self) -> Result<()> {
        let filters = prompts::search_filters(&self.config.country, &self.config.language)?;
        render::searching("Buscando títulos");
        let found = self.runtime.block_on(self.search.search_popular(&filters));
        show_titles(found);
        Ok(())
    }

    fn search_by_name(&self) -> Result<()> {
        let query = prompts::title_query()?;
        render::searching("Buscando");
        let found = self.runtime.block_on(self.search.search_by_name(
            &query,
            &self.config.country,
            &self.config.language,
            NAME_SEARCH_COUNT,
        ));
        show_titles(found);
        Ok(())
    }
}

/// Upstream failures are reported and the menu continues.
fn show_titles(found: Result<Vec<TitleNode>, UpstreamError>) {
    match found {
        Ok(nodes) if nodes.is_empty() => render::nothing_found(),
        Ok(nodes) => render::titles(&nodes),
        Err(err) => render::failure(&err),
    }
}
