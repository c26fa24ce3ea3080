//! Static reference tables: streaming providers, genres and monetization labels.
//!
//! The upstream package listing is unreliable, so the known providers for the
//! Argentine market are kept here by hand.

use serde::Serialize;

use crate::model::MonetizationType;

/// A streaming provider identified by its short upstream package code.
///
/// Two providers are equal when their codes are equal.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub code: &'static str,
    pub technical_name: &'static str,
    pub clear_name: &'static str,
    pub short_name: &'static str,
}

impl PartialEq for Provider {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Provider {}

impl std::hash::Hash for Provider {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

const fn provider(
    code: &'static str,
    technical_name: &'static str,
    clear_name: &'static str,
    short_name: &'static str,
) -> Provider {
    Provider {
        code,
        technical_name,
        clear_name,
        short_name,
    }
}

pub const PROVIDERS: &[Provider] = &[
    provider("nfx", "netflix", "Netflix", "NFX"),
    provider("prv", "amazonprimevideo", "Amazon Prime Video", "PRV"),
    provider("dnp", "disneyplus", "Disney+", "DNP"),
    provider("hbm", "hbomax", "Max", "MAX"),
    provider("pmp", "paramountplus", "Paramount+", "PMP"),
    provider("atp", "appletvplus", "Apple TV+", "ATP"),
    provider("stv", "starplus", "Star+", "STV"),
    provider("cru", "crunchyroll", "Crunchyroll", "CRU"),
    provider("mbi", "mubi", "MUBI", "MBI"),
    provider("pks", "plutotv", "Pluto TV", "PKS"),
    provider("clv", "clarovideo", "Claro Video", "CLV"),
    provider("mvp", "movistarplay", "Movistar Play", "MVP"),
    provider("flt", "flow", "Flow", "FLT"),
    provider("itu", "itunes", "Apple TV", "ITU"),
    provider("gop", "googleplaymovies", "Google Play Movies", "GOP"),
    provider("cne", "cine", "Cine.ar", "CNE"),
];

/// Looks up a provider by its package code.
pub fn provider_by_code(code: &str) -> Option<&'static Provider> {
    PROVIDERS.iter().find(|p| p.code == code)
}

/// Maps a package code to the upstream technical name, passing unknown codes through.
pub fn technical_name_for(code: &str) -> &str {
    provider_by_code(code).map_or(code, |p| p.technical_name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub code: &'static str,
    pub translation: &'static str,
}

pub const GENRES: &[Genre] = &[
    Genre { code: "act", translation: "Acción y aventura" },
    Genre { code: "ani", translation: "Animación" },
    Genre { code: "cmy", translation: "Comedia" },
    Genre { code: "crm", translation: "Crimen" },
    Genre { code: "doc", translation: "Documental" },
    Genre { code: "drm", translation: "Drama" },
    Genre { code: "fml", translation: "Familia" },
    Genre { code: "fnt", translation: "Fantasía" },
    Genre { code: "hst", translation: "Historia" },
    Genre { code: "hrr", translation: "Terror" },
    Genre { code: "msc", translation: "Música" },
    Genre { code: "mys", translation: "Misterio" },
    Genre { code: "rma", translation: "Romance" },
    Genre { code: "scf", translation: "Ciencia ficción" },
    Genre { code: "spt", translation: "Deportes" },
    Genre { code: "trl", translation: "Thriller" },
    Genre { code: "war", translation: "Bélico" },
    Genre { code: "wst", translation: "Western" },
];

pub fn genre_by_code(code: &str) -> Option<&'static Genre> {
    GENRES.iter().find(|g| g.code == code)
}

/// Monetization types offered as filters, with their user-facing labels.
pub const MONETIZATION_CHOICES: &[(MonetizationType, &str)] = &[
    (MonetizationType::Flatrate, "Suscripción (streaming)"),
    (MonetizationType::Rent, "Alquiler"),
    (MonetizationType::Buy, "Compra"),
    (MonetizationType::Free, "Gratis"),
    (MonetizationType::Ads, "Gratis con anuncios"),
];
