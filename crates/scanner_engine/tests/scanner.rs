use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use scanner_core::{
    DateWindow, FailureKind, MonetizationType, ObjectType, ReleaseYearRange, ScanFilters,
    ScanOutcome, UpstreamError,
};
use scanner_engine::{GraphqlRequest, GraphqlTransport, NewTitlesScanner, Pacing};
use serde_json::{json, Value};
use tokio::time::Instant;

/// Answers requests from a fixed script and records what was asked.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, UpstreamError>>>,
    requests: Mutex<Vec<Value>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<Value, UpstreamError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn variables(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    fn requested_days(&self) -> Vec<String> {
        self.variables()
            .iter()
            .map(|vars| vars["date"].as_str().unwrap().to_string())
            .collect()
    }
}

#[async_trait::async_trait]
impl GraphqlTransport for ScriptedTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, UpstreamError> {
        self.requests.lock().unwrap().push(request.variables.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(page(&[], None)))
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn edge(id: &str) -> Value {
    json!({
        "cursor": id,
        "node": {
            "id": id,
            "objectType": "MOVIE",
            "content": { "title": id, "fullPath": format!("/ar/pelicula/{id}") },
            "offers": [{ "monetizationType": "FLATRATE", "package": { "technicalName": "netflix", "clearName": "Netflix" } }]
        },
        "newOffer": { "dateCreated": "2024-03-02", "monetizationType": "FLATRATE" }
    })
}

fn page(ids: &[&str], next: Option<&str>) -> Value {
    json!({
        "newTitles": {
            "totalCount": ids.len(),
            "edges": ids.iter().map(|id| edge(id)).collect::<Vec<_>>(),
            "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next }
        }
    })
}

fn scanner(transport: &Arc<ScriptedTransport>) -> NewTitlesScanner {
    NewTitlesScanner::new(transport.clone()).with_pacing(Pacing::per_scan(Duration::ZERO))
}

fn ids(outcome: &ScanOutcome) -> Vec<&str> {
    outcome.rows().iter().map(|row| row.node.id.as_str()).collect()
}

fn two_day_window() -> DateWindow {
    DateWindow::new(ymd(2024, 3, 1), ymd(2024, 3, 2)).unwrap()
}

#[tokio::test]
async fn two_days_are_merged_newest_first() {
    let transport = ScriptedTransport::new(vec![
        Ok(page(&["d2-1", "d2-2", "d2-3"], None)),
        Ok(page(&["d1-1", "d1-2"], None)),
    ]);
    let filters = ScanFilters {
        count: 10,
        ..ScanFilters::default()
    };

    let outcome = scanner(&transport).scan(two_day_window(), &filters).await;

    assert!(matches!(outcome, ScanOutcome::Complete(_)));
    assert_eq!(ids(&outcome), vec!["d2-1", "d2-2", "d2-3", "d1-1", "d1-2"]);
    assert_eq!(transport.requested_days(), vec!["2024-03-02", "2024-03-01"]);
}

#[tokio::test]
async fn reaching_the_target_skips_older_days() {
    let transport = ScriptedTransport::new(vec![
        Ok(page(&["d2-1", "d2-2", "d2-3"], Some("more"))),
        Ok(page(&["d1-1"], None)),
    ]);
    let filters = ScanFilters {
        count: 2,
        ..ScanFilters::default()
    };

    let outcome = scanner(&transport).scan(two_day_window(), &filters).await;

    assert_eq!(ids(&outcome), vec!["d2-1", "d2-2"]);
    assert_eq!(transport.requested_days(), vec!["2024-03-02"]);
}

#[tokio::test]
async fn cursor_is_followed_within_a_day() {
    let transport = ScriptedTransport::new(vec![
        Ok(page(&["a"], Some("cursor-1"))),
        Ok(page(&["b"], None)),
        Ok(page(&[], None)),
    ]);
    let filters = ScanFilters {
        count: 10,
        ..ScanFilters::default()
    };

    let outcome = scanner(&transport).scan(two_day_window(), &filters).await;

    assert_eq!(ids(&outcome), vec!["a", "b"]);
    let vars = transport.variables();
    assert_eq!(vars.len(), 3);
    assert_eq!(vars[0]["after"], Value::Null);
    assert_eq!(vars[1]["after"], "cursor-1");
    assert_eq!(vars[1]["date"], "2024-03-02");
    assert_eq!(vars[2]["after"], Value::Null);
    assert_eq!(vars[2]["date"], "2024-03-01");
}

#[tokio::test]
async fn request_variables_match_the_upstream_shape() {
    let transport = ScriptedTransport::new(vec![]);
    let filters = ScanFilters {
        providers: vec!["nfx".to_string()],
        monetization_types: vec![MonetizationType::Flatrate],
        release_year: ReleaseYearRange {
            min: Some(2000),
            max: None,
        },
        ..ScanFilters::default()
    };
    let window = DateWindow::new(ymd(2024, 3, 2), ymd(2024, 3, 2)).unwrap();

    scanner(&transport).scan(window, &filters).await;

    let vars = &transport.variables()[0];
    assert_eq!(vars["country"], "AR");
    assert_eq!(vars["language"], "es");
    assert_eq!(vars["first"], 50);
    assert_eq!(vars["platform"], "WEB");
    assert_eq!(vars["pageType"], "NEW");
    assert_eq!(vars["priceDrops"], false);
    assert_eq!(
        vars["filter"],
        json!({
            "packages": ["nfx"],
            "objectTypes": ["MOVIE"],
            "monetizationTypes": ["FLATRATE"],
            "ageCertifications": [],
            "excludeGenres": [],
            "genres": [],
            "presentationTypes": [],
            "productionCountries": [],
            "excludeProductionCountries": [],
            "subgenres": [],
            "excludeIrrelevantTitles": false,
            "releaseYear": { "min": 2000 }
        })
    );
}

#[tokio::test]
async fn explicit_object_types_replace_the_movie_default() {
    let transport = ScriptedTransport::new(vec![]);
    let filters = ScanFilters {
        object_types: vec![ObjectType::Show],
        ..ScanFilters::default()
    };
    let window = DateWindow::new(ymd(2024, 3, 2), ymd(2024, 3, 2)).unwrap();

    scanner(&transport).scan(window, &filters).await;

    assert_eq!(transport.variables()[0]["filter"]["objectTypes"], json!(["SHOW"]));
}

#[tokio::test]
async fn chosen_genres_narrow_the_listing() {
    let transport = ScriptedTransport::new(vec![]);
    let filters = ScanFilters {
        genres: vec!["drm".to_string(), "hrr".to_string()],
        ..ScanFilters::default()
    };
    let window = DateWindow::new(ymd(2024, 3, 2), ymd(2024, 3, 2)).unwrap();

    scanner(&transport).scan(window, &filters).await;

    assert_eq!(transport.variables()[0]["filter"]["genres"], json!(["drm", "hrr"]));
}

#[tokio::test]
async fn transient_failure_after_rows_returns_partial() {
    let transport = ScriptedTransport::new(vec![
        Ok(page(&["d2-1", "d2-2"], None)),
        Err(UpstreamError::new(FailureKind::SoftBlock, "html")),
    ]);

    let outcome = scanner(&transport)
        .scan(two_day_window(), &ScanFilters::default())
        .await;

    assert!(outcome.is_partial());
    assert_eq!(ids(&outcome), vec!["d2-1", "d2-2"]);
    assert_eq!(outcome.failure().unwrap().kind, FailureKind::SoftBlock);
}

#[tokio::test]
async fn failure_before_any_row_keeps_its_kind() {
    for kind in [
        FailureKind::Connection,
        FailureKind::HttpStatus(502),
        FailureKind::MalformedResponse,
        FailureKind::SoftBlock,
    ] {
        let transport = ScriptedTransport::new(vec![Err(UpstreamError::new(kind, "boom"))]);
        let outcome = scanner(&transport)
            .scan(two_day_window(), &ScanFilters::default())
            .await;
        assert!(outcome.is_fatal(), "{kind:?}");
        assert_eq!(outcome.failure().unwrap().kind, kind);
        assert_eq!(transport.variables().len(), 1);
    }
}

#[tokio::test]
async fn upstream_error_is_fatal_even_with_rows() {
    let transport = ScriptedTransport::new(vec![
        Ok(page(&["d2-1"], None)),
        Err(UpstreamError::new(FailureKind::Upstream, "bad filter")),
    ]);

    let outcome = scanner(&transport)
        .scan(two_day_window(), &ScanFilters::default())
        .await;

    assert!(outcome.is_fatal());
    assert!(outcome.rows().is_empty());
    assert_eq!(outcome.failure().unwrap().user_message(), "bad filter");
}

#[tokio::test]
async fn missing_listing_counts_as_an_empty_day() {
    let transport = ScriptedTransport::new(vec![
        Ok(Value::Null),
        Ok(json!({ "newTitles": null })),
    ]);

    let outcome = scanner(&transport)
        .scan(two_day_window(), &ScanFilters::default())
        .await;

    assert_eq!(outcome, ScanOutcome::Complete(Vec::new()));
    assert_eq!(transport.variables().len(), 2);
}

#[tokio::test]
async fn unexpected_listing_shape_is_malformed() {
    let transport = ScriptedTransport::new(vec![Ok(json!({ "newTitles": { "edges": 7 } }))]);

    let outcome = scanner(&transport)
        .scan(two_day_window(), &ScanFilters::default())
        .await;

    assert_eq!(
        outcome.failure().unwrap().kind,
        FailureKind::MalformedResponse
    );
}

#[tokio::test(start_paused = true)]
async fn every_page_fetch_is_paced() {
    let transport = ScriptedTransport::new(vec![
        Ok(page(&["a"], Some("next"))),
        Ok(page(&["b"], None)),
        Ok(page(&[], None)),
    ]);
    let scanner = NewTitlesScanner::new(transport.clone())
        .with_pacing(Pacing::per_scan(Duration::from_millis(200)));

    let started = Instant::now();
    scanner
        .scan(two_day_window(), &ScanFilters::default())
        .await;
    let elapsed = started.elapsed();

    assert_eq!(transport.variables().len(), 3);
    assert!(elapsed >= Duration::from_millis(600), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(800), "{elapsed:?}");
}
