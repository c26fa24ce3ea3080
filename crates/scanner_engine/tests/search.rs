use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use scanner_core::{MonetizationType, SearchFilters, SortBy, UpstreamError};
use scanner_engine::{GraphqlRequest, GraphqlTransport, SearchClient};
use serde_json::{json, Value};

/// Replies with one canned payload and keeps the last request.
struct CannedTransport {
    reply: Value,
    last: Mutex<Option<GraphqlRequest>>,
}

impl CannedTransport {
    fn new(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            reply,
            last: Mutex::new(None),
        })
    }

    fn last(&self) -> GraphqlRequest {
        self.last.lock().unwrap().clone().expect("a request was made")
    }
}

#[async_trait::async_trait]
impl GraphqlTransport for CannedTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, UpstreamError> {
        *self.last.lock().unwrap() = Some(request.clone());
        Ok(self.reply.clone())
    }
}

fn popular_reply() -> Value {
    json!({
        "popularTitles": {
            "edges": [
                { "node": { "id": "tm1", "content": { "title": "Matrix" }, "offers": [
                    { "monetizationType": "RENT", "package": { "clearName": "Apple TV", "technicalName": "itunes" } },
                    { "monetizationType": "FLATRATE", "package": { "clearName": "Max", "technicalName": "hbomax" } }
                ] } },
                { "node": { "id": "tm2", "content": { "title": "Matrix Reloaded" } } }
            ]
        }
    })
}

#[tokio::test]
async fn popular_search_attaches_watch_now_offer() {
    let transport = CannedTransport::new(popular_reply());
    let client = SearchClient::new(transport.clone());
    let filters = SearchFilters {
        genres: vec!["act".to_string()],
        monetization_types: vec![MonetizationType::Flatrate],
        ..SearchFilters::default()
    };

    let titles = client.search_popular(&filters).await.unwrap();

    assert_eq!(titles.len(), 2);
    let offer = titles[0].watch_now_offer.as_ref().unwrap();
    assert_eq!(offer.platform_name(), "Max");
    assert!(titles[1].watch_now_offer.is_none());

    let request = transport.last();
    assert_eq!(request.operation_name, "GetPopularTitles");
    assert_eq!(request.variables["first"], 40);
    assert_eq!(request.variables["popularTitlesSortBy"], "POPULAR");
    assert_eq!(request.variables["sortRandomSeed"], 0);
    assert_eq!(request.variables["popularAfterCursor"], "");
    assert_eq!(request.variables["popularTitlesFilter"]["genres"], json!(["act"]));
    assert_eq!(request.variables["popularTitlesFilter"]["objectTypes"], json!([]));
}

#[tokio::test]
async fn random_sort_sends_the_sort_key() {
    let transport = CannedTransport::new(popular_reply());
    let client = SearchClient::new(transport.clone());
    let filters = SearchFilters {
        sort_by: SortBy::Random,
        ..SearchFilters::default()
    };

    client.search_popular(&filters).await.unwrap();

    assert_eq!(transport.last().variables["popularTitlesSortBy"], "RANDOM");
}

#[tokio::test]
async fn name_search_uses_the_search_query_filter() {
    let transport = CannedTransport::new(popular_reply());
    let client = SearchClient::new(transport.clone());

    let titles = client.search_by_name("matrix", "AR", "es", 20).await.unwrap();

    assert_eq!(titles[1].title(), "Matrix Reloaded");
    let request = transport.last();
    assert_eq!(request.operation_name, "GetSuggestedTitles");
    assert_eq!(
        request.variables,
        json!({ "country": "AR", "language": "es", "first": 20, "filter": { "searchQuery": "matrix" } })
    );
}

#[tokio::test]
async fn connection_test_lists_titles() {
    let transport = CannedTransport::new(popular_reply());
    let client = SearchClient::new(transport.clone());

    let report = client.connection_test("AR", "es").await.unwrap();

    assert_eq!(report.titles, vec!["Matrix", "Matrix Reloaded"]);
    assert_eq!(transport.last().variables["first"], 5);
}

#[tokio::test]
async fn title_offers_are_grouped() {
    let transport = CannedTransport::new(json!({
        "node": {
            "id": "tm1",
            "__typename": "Movie",
            "offerCount": 3,
            "flatrate": [{ "monetizationType": "FLATRATE", "package": { "clearName": "Netflix", "technicalName": "netflix" } }],
            "buy": [],
            "rent": [{ "monetizationType": "RENT", "retailPrice": "$ 499" }],
            "free": []
        }
    }));
    let client = SearchClient::new(transport.clone());

    let offers = client.title_offers("tm1", "AR", "es").await.unwrap().unwrap();

    assert_eq!(offers.offer_count, 3);
    assert_eq!(offers.flatrate.len(), 1);
    assert_eq!(offers.rent[0].monetization_type, MonetizationType::Rent);
    let vars = transport.last().variables;
    assert_eq!(vars["nodeId"], "tm1");
    assert_eq!(vars["filterRent"], json!({ "monetizationTypes": ["RENT"], "bestOnly": true }));
}

#[tokio::test]
async fn unknown_node_has_no_offers() {
    let transport = CannedTransport::new(json!({ "node": null }));
    let client = SearchClient::new(transport);

    assert_eq!(client.title_offers("nope", "AR", "es").await.unwrap(), None);
}
