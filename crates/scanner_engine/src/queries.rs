//! GraphQL documents and their variable sets.

use chrono::NaiveDate;
use scanner_core::{ObjectType, ReleaseYearRange, ScanFilters, SearchFilters, SortBy};
use serde::Serialize;
use serde_json::Value;

use crate::transport::GraphqlRequest;

pub const NEW_TITLES_QUERY: &str = r#"query GetNewTitles($country: Country!, $date: Date!, $language: Language!, $filter: TitleFilter, $after: String, $first: Int!, $platform: Platform!, $priceDrops: Boolean!, $pageType: NewPageType!) {
  newTitles(country: $country, date: $date, filter: $filter, after: $after, first: $first, priceDrops: $priceDrops, pageType: $pageType) {
    totalCount
    edges {
      cursor
      node {
        ... on MovieOrSeason {
          id
          objectId
          objectType
          content(country: $country, language: $language) {
            title
            originalReleaseYear
            posterUrl
            fullPath
            shortDescription
            runtime
            genres { translation(language: $language) }
            scoring { imdbScore }
            ... on MovieOrShowContent {
              originalTitle
              productionCountries
              credits { role name }
            }
          }
          offers(country: $country, platform: $platform) {
            package { technicalName clearName }
            monetizationType
          }
        }
      }
      newOffer: newOffer(platform: $platform) {
        dateCreated
        standardWebURL
        package { clearName technicalName }
        monetizationType
        presentationType
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#;

pub const POPULAR_TITLES_QUERY: &str = r#"query GetPopularTitles($country: Country!, $language: Language!, $first: Int!, $popularTitlesSortBy: PopularTitlesSorting!, $sortRandomSeed: Int!, $popularAfterCursor: String!, $popularTitlesFilter: TitleFilter!) {
  popularTitles(country: $country, first: $first, sortBy: $popularTitlesSortBy, sortRandomSeed: $sortRandomSeed, after: $popularAfterCursor, filter: $popularTitlesFilter) {
    edges {
      node {
        id
        objectId
        objectType
        content(country: $country, language: $language) {
          title
          originalTitle
          originalReleaseYear
          posterUrl
          fullPath
          shortDescription
          genres { translation(language: $language) }
          runtime
          scoring { imdbScore }
        }
        offers(country: $country, platform: WEB) {
          standardWebURL
          package { clearName technicalName }
          monetizationType
          presentationType
          retailPrice(language: $language)
          currency
        }
      }
    }
  }
}"#;

pub const SUGGESTED_TITLES_QUERY: &str = r#"query GetSuggestedTitles($country: Country!, $language: Language!, $first: Int!, $filter: TitleFilter) {
  popularTitles(country: $country, first: $first, filter: $filter) {
    edges {
      node {
        id
        objectType
        objectId
        content(country: $country, language: $language) {
          title
          originalTitle
          originalReleaseYear
          posterUrl
          fullPath
          shortDescription
          genres { translation(language: $language) }
          runtime
          scoring { imdbScore }
        }
      }
    }
  }
}"#;

pub const TITLE_OFFERS_QUERY: &str = r#"query GetTitleOffers($nodeId: ID!, $country: Country!, $language: Language!, $filterFlatrate: OfferFilter!, $filterBuy: OfferFilter!, $filterRent: OfferFilter!, $filterFree: OfferFilter!, $platform: Platform! = WEB) {
  node(id: $nodeId) {
    id
    __typename
    ... on MovieOrShowOrSeasonOrEpisode {
      offerCount(country: $country, platform: $platform)
      flatrate: offers(country: $country, platform: $platform, filter: $filterFlatrate) { ...TitleOffer }
      buy: offers(country: $country, platform: $platform, filter: $filterBuy) { ...TitleOffer }
      rent: offers(country: $country, platform: $platform, filter: $filterRent) { ...TitleOffer }
      free: offers(country: $country, platform: $platform, filter: $filterFree) { ...TitleOffer }
    }
  }
}
fragment TitleOffer on Offer {
  id
  presentationType
  monetizationType
  retailPrice(language: $language)
  type
  package { clearName technicalName }
  standardWebURL
}"#;

const PLATFORM_WEB: &str = "WEB";

/// The upstream `TitleFilter` input object.
///
/// Fields the tool never narrows on are still sent as empty lists, the same
/// shape the website posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleFilter {
    pub packages: Vec<String>,
    pub object_types: Vec<ObjectType>,
    pub monetization_types: Vec<String>,
    pub age_certifications: Vec<String>,
    pub exclude_genres: Vec<String>,
    pub genres: Vec<String>,
    pub presentation_types: Vec<String>,
    pub production_countries: Vec<String>,
    pub exclude_production_countries: Vec<String>,
    pub subgenres: Vec<String>,
    pub exclude_irrelevant_titles: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<ReleaseYearRange>,
}

impl TitleFilter {
    pub fn for_scan(filters: &ScanFilters) -> Self {
        let object_types = if filters.object_types.is_empty() {
            vec![ObjectType::Movie]
        } else {
            filters.object_types.clone()
        };
        Self {
            packages: filters.providers.clone(),
            object_types,
            monetization_types: filters
                .monetization_types
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            genres: filters.genres.clone(),
            production_countries: filters.production_countries.clone(),
            exclude_production_countries: filters.exclude_production_countries.clone(),
            release_year: bounded(filters.release_year),
            ..Self::default()
        }
    }

    pub fn for_search(filters: &SearchFilters) -> Self {
        Self {
            packages: filters.providers.clone(),
            object_types: filters.object_types.clone(),
            monetization_types: filters
                .monetization_types
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            genres: filters.genres.clone(),
            release_year: bounded(filters.release_year),
            ..Self::default()
        }
    }
}

fn bounded(range: ReleaseYearRange) -> Option<ReleaseYearRange> {
    (!range.is_unbounded()).then_some(range)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewTitlesVariables<'a> {
    country: &'a str,
    language: &'a str,
    first: u32,
    platform: &'static str,
    filter: &'a TitleFilter,
    date: String,
    price_drops: bool,
    page_type: &'static str,
    after: Option<&'a str>,
}

/// One page of the new-titles listing for `day`.
pub fn new_titles_request(
    filters: &ScanFilters,
    filter: &TitleFilter,
    day: NaiveDate,
    after: Option<&str>,
    page_size: u32,
) -> GraphqlRequest {
    let variables = NewTitlesVariables {
        country: &filters.country,
        language: &filters.language,
        first: page_size,
        platform: PLATFORM_WEB,
        filter,
        date: day.format("%Y-%m-%d").to_string(),
        price_drops: false,
        page_type: "NEW",
        after,
    };
    GraphqlRequest {
        operation_name: "GetNewTitles",
        query: NEW_TITLES_QUERY,
        variables: to_value(&variables),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PopularTitlesVariables<'a> {
    country: &'a str,
    language: &'a str,
    first: u32,
    popular_titles_sort_by: SortBy,
    sort_random_seed: u32,
    popular_after_cursor: &'static str,
    popular_titles_filter: TitleFilter,
}

pub fn popular_titles_request(filters: &SearchFilters, random_seed: u32) -> GraphqlRequest {
    let variables = PopularTitlesVariables {
        country: &filters.country,
        language: &filters.language,
        first: filters.first,
        popular_titles_sort_by: filters.sort_by,
        sort_random_seed: random_seed,
        popular_after_cursor: "",
        popular_titles_filter: TitleFilter::for_search(filters),
    };
    GraphqlRequest {
        operation_name: "GetPopularTitles",
        query: POPULAR_TITLES_QUERY,
        variables: to_value(&variables),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchQueryFilter<'a> {
    search_query: &'a str,
}

#[derive(Debug, Serialize)]
struct SuggestedTitlesVariables<'a> {
    country: &'a str,
    language: &'a str,
    first: u32,
    filter: SearchQueryFilter<'a>,
}

pub fn suggested_titles_request(
    query: &str,
    country: &str,
    language: &str,
    first: u32,
) -> GraphqlRequest {
    let variables = SuggestedTitlesVariables {
        country,
        language,
        first,
        filter: SearchQueryFilter {
            search_query: query,
        },
    };
    GraphqlRequest {
        operation_name: "GetSuggestedTitles",
        query: SUGGESTED_TITLES_QUERY,
        variables: to_value(&variables),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OfferFilter {
    monetization_types: &'static [&'static str],
    best_only: bool,
}

const fn best_of(monetization_types: &'static [&'static str]) -> OfferFilter {
    OfferFilter {
        monetization_types,
        best_only: true,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitleOffersVariables<'a> {
    node_id: &'a str,
    country: &'a str,
    language: &'a str,
    platform: &'static str,
    filter_flatrate: OfferFilter,
    filter_buy: OfferFilter,
    filter_rent: OfferFilter,
    filter_free: OfferFilter,
}

pub fn title_offers_request(node_id: &str, country: &str, language: &str) -> GraphqlRequest {
    let variables = TitleOffersVariables {
        node_id,
        country,
        language,
        platform: PLATFORM_WEB,
        filter_flatrate: best_of(&["FLATRATE", "FLATRATE_AND_BUY", "ADS", "FREE", "CINEMA"]),
        filter_buy: best_of(&["BUY"]),
        filter_rent: best_of(&["RENT"]),
        filter_free: best_of(&["ADS", "FREE"]),
    };
    GraphqlRequest {
        operation_name: "GetTitleOffers",
        query: TITLE_OFFERS_QUERY,
        variables: to_value(&variables),
    }
}

// Plain structs of strings, numbers and lists always serialize.
fn to_value<T: Serialize>(variables: &T) -> Value {
    serde_json::to_value(variables).unwrap_or(Value::Null)
}
