use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Movie,
    Show,
    ShowSeason,
    #[serde(other)]
    Other,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Movie => "MOVIE",
            ObjectType::Show => "SHOW",
            ObjectType::ShowSeason => "SHOW_SEASON",
            ObjectType::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonetizationType {
    Flatrate,
    FlatrateAndBuy,
    Rent,
    Buy,
    Free,
    Ads,
    Cinema,
    #[default]
    #[serde(other)]
    Other,
}

impl MonetizationType {
    pub fn as_str(self) -> &'static str {
        match self {
            MonetizationType::Flatrate => "FLATRATE",
            MonetizationType::FlatrateAndBuy => "FLATRATE_AND_BUY",
            MonetizationType::Rent => "RENT",
            MonetizationType::Buy => "BUY",
            MonetizationType::Free => "FREE",
            MonetizationType::Ads => "ADS",
            MonetizationType::Cinema => "CINEMA",
            MonetizationType::Other => "OTHER",
        }
    }
}

impl fmt::Display for MonetizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Localized prices arrive as preformatted strings, raw prices as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetailPrice {
    Amount(f64),
    Formatted(String),
}

impl fmt::Display for RetailPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetailPrice::Amount(value) => write!(f, "{value:.2}"),
            RetailPrice::Formatted(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub clear_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub technical_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// One availability entry of a title on a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub monetization_type: MonetizationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<RetailPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(
        default,
        rename = "standardWebURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub standard_web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Package>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_change_date: Option<String>,
}

impl Offer {
    pub fn is_flatrate(&self) -> bool {
        self.monetization_type == MonetizationType::Flatrate
    }

    pub fn platform_name(&self) -> &str {
        self.package.as_ref().map_or("-", |p| p.clear_name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoring {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_votes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_popularity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenreTranslation {
    #[serde(default, deserialize_with = "nullable")]
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credit {
    #[serde(default, deserialize_with = "nullable")]
    pub role: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleContent {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_release_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub full_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    pub genres: Vec<GenreTranslation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring: Option<Scoring>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub production_countries: Vec<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub credits: Vec<Credit>,
}

impl TitleContent {
    pub fn imdb_score(&self) -> Option<f64> {
        self.scoring.as_ref().and_then(|s| s.imdb_score)
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.translation.as_str()).collect()
    }
}

/// A movie or show as returned by the upstream catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleNode {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<TitleContent>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub offers: Vec<Offer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_now_offer: Option<Offer>,
}

impl TitleNode {
    /// First flatrate offer, else the first offer of any kind.
    pub fn best_offer(&self) -> Option<&Offer> {
        self.offers
            .iter()
            .find(|o| o.is_flatrate())
            .or_else(|| self.offers.first())
    }

    pub fn title(&self) -> &str {
        self.content.as_ref().map_or("", |c| c.title.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    #[serde(deserialize_with = "nullable")]
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTitleEdge {
    pub cursor: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub node: TitleNode,
    pub new_offer: Option<Offer>,
}

/// One page of the upstream "new titles" listing for a single day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTitlesPage {
    #[serde(deserialize_with = "nullable")]
    pub total_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub edges: Vec<NewTitleEdge>,
    pub page_info: Option<PageInfo>,
}

impl NewTitlesPage {
    /// Cursor for the following page, if the upstream reports one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.page_info
            .as_ref()
            .filter(|info| info.has_next_page)
            .and_then(|info| info.end_cursor.as_deref())
            .filter(|cursor| !cursor.is_empty())
    }
}

/// A title kept by a new-titles scan together with the offer that made it new.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTitleRow {
    pub node: TitleNode,
    pub new_offer: Option<Offer>,
}

impl From<NewTitleEdge> for NewTitleRow {
    fn from(edge: NewTitleEdge) -> Self {
        let new_offer = edge.new_offer.map(|mut offer| {
            offer.last_change_date = offer.date_created.clone();
            offer
        });
        Self {
            node: edge.node,
            new_offer,
        }
    }
}
