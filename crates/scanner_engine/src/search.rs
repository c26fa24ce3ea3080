use std::sync::Arc;

use scanner_core::{Offer, SearchFilters, SortBy, TitleNode, UpstreamError};
use scanner_logging::{scanner_info, scanner_warn};
use serde::{Deserialize, Serialize};

use crate::queries::{popular_titles_request, suggested_titles_request, title_offers_request};
use crate::transport::{execute_as, GraphqlTransport};

pub const DEFAULT_NAME_SEARCH_COUNT: u32 = 20;
const CONNECTION_TEST_QUERY: &str = "Matrix";
const CONNECTION_TEST_COUNT: u32 = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NodeEdge {
    node: TitleNode,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Connection {
    edges: Option<Vec<NodeEdge>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PopularTitlesData {
    popular_titles: Option<Connection>,
}

impl PopularTitlesData {
    fn into_nodes(self) -> Vec<TitleNode> {
        self.popular_titles
            .and_then(|connection| connection.edges)
            .unwrap_or_default()
            .into_iter()
            .map(|edge| edge.node)
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TitleOffersData {
    node: Option<TitleOffers>,
}

/// Offers of one title grouped the way the website shows them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleOffers {
    pub id: String,
    pub offer_count: u32,
    pub flatrate: Vec<Offer>,
    pub buy: Vec<Offer>,
    pub rent: Vec<Offer>,
    pub free: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionReport {
    pub titles: Vec<String>,
}

/// Single-page lookups that sit next to the new-titles scan.
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn GraphqlTransport>,
}

impl SearchClient {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self { transport }
    }

    /// One page of popular titles; each result gets its best offer as `watchNowOffer`.
    pub async fn search_popular(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<TitleNode>, UpstreamError> {
        let seed = match filters.sort_by {
            SortBy::Random => rand::random::<u32>(),
            _ => 0,
        };
        let request = popular_titles_request(filters, seed);
        let data: Option<PopularTitlesData> =
            execute_as(self.transport.as_ref(), &request).await?;
        let mut nodes = data.map(PopularTitlesData::into_nodes).unwrap_or_default();
        for node in &mut nodes {
            node.watch_now_offer = node.best_offer().cloned();
        }
        scanner_info!("Popular search returned {} titles", nodes.len());
        Ok(nodes)
    }

    pub async fn search_by_name(
        &self,
        query: &str,
        country: &str,
        language: &str,
        first: u32,
    ) -> Result<Vec<TitleNode>, UpstreamError> {
        scanner_info!("Searching titles named {:?}", query);
        let request = suggested_titles_request(query, country, language, first);
        let data: Option<PopularTitlesData> =
            execute_as(self.transport.as_ref(), &request).await?;
        let nodes = data.map(PopularTitlesData::into_nodes).unwrap_or_default();
        scanner_info!("Name search for {:?} found {} titles", query, nodes.len());
        Ok(nodes)
    }

    /// `None` when the upstream does not know the node id.
    pub async fn title_offers(
        &self,
        node_id: &str,
        country: &str,
        language: &str,
    ) -> Result<Option<TitleOffers>, UpstreamError> {
        let request = title_offers_request(node_id, country, language);
        let data: Option<TitleOffersData> = execute_as(self.transport.as_ref(), &request).await?;
        let offers = data.and_then(|data| data.node);
        if offers.is_none() {
            scanner_warn!("No offers node for {}", node_id);
        }
        Ok(offers)
    }

    /// Small fixed name search used to check that the upstream answers.
    pub async fn connection_test(
        &self,
        country: &str,
        language: &str,
    ) -> Result<ConnectionReport, UpstreamError> {
        let nodes = self
            .search_by_name(CONNECTION_TEST_QUERY, country, language, CONNECTION_TEST_COUNT)
            .await?;
        let titles = nodes
            .iter()
            .map(|node| node.title().to_string())
            .collect();
        Ok(ConnectionReport { titles })
    }
}
