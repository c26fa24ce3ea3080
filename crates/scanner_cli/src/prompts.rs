use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use scanner_core::catalog::{GENRES, MONETIZATION_CHOICES, PROVIDERS};
use scanner_core::{
    DateWindow, MonetizationType, ObjectType, ReleaseYearRange, ScanFilters, SearchFilters,
};

const INVALID_YEAR: &str = "Ingresá un año válido";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewTitles,
    FilteredSearch,
    SearchByName,
    Providers,
    Genres,
    Exit,
}

const MENU: &[(&str, MenuAction)] = &[
    ("🆕 Ver títulos agregados recientemente", MenuAction::NewTitles),
    ("🔍 Buscar títulos con filtros", MenuAction::FilteredSearch),
    ("🔎 Buscar por nombre", MenuAction::SearchByName),
    ("📋 Ver plataformas disponibles", MenuAction::Providers),
    ("🎭 Ver géneros disponibles", MenuAction::Genres),
    ("❌ Salir", MenuAction::Exit),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    LastDays(u64),
    Custom,
}

const PERIODS: &[(&str, Period)] = &[
    ("Última semana", Period::LastDays(7)),
    ("Últimos 15 días", Period::LastDays(15)),
    ("Último mes", Period::LastDays(30)),
    ("Últimos 3 meses", Period::LastDays(90)),
    ("Elegir fechas desde/hasta", Period::Custom),
];

const COUNTS: &[usize] = &[20, 50, 100, 200];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportChoice {
    None,
    Json,
    Csv,
}

/// Answers shared by the new-titles scan and the filtered search.
#[derive(Debug, Clone, Default, PartialEq)]
struct CommonAnswers {
    providers: Vec<String>,
    object_types: Vec<ObjectType>,
    genres: Vec<String>,
    monetization_types: Vec<MonetizationType>,
    release_year: ReleaseYearRange,
}

pub fn main_menu() -> Result<MenuAction> {
    let labels: Vec<&str> = MENU.iter().map(|(label, _)| *label).collect();
    let choice = Select::new()
        .with_prompt("¿Qué querés hacer?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(MENU[choice].1)
}

pub fn scan_filters(
    today: NaiveDate,
    country: &str,
    language: &str,
) -> Result<(DateWindow, ScanFilters)> {
    let common = common_answers()?;
    let window = period(today)?;
    let exclusive_only = Confirm::new()
        .with_prompt("¿Solo títulos exclusivos de una plataforma?")
        .default(false)
        .interact()?;
    let count = result_count()?;
    let filters = new_titles_filters(common, exclusive_only, count, country, language);
    Ok((window, filters))
}

/// The new-titles listing narrows to movies when no type is sent, so "all
/// types" names both kinds explicitly.
fn new_titles_filters(
    common: CommonAnswers,
    exclusive_only: bool,
    count: usize,
    country: &str,
    language: &str,
) -> ScanFilters {
    let object_types = if common.object_types.is_empty() {
        vec![ObjectType::Movie, ObjectType::Show]
    } else {
        common.object_types
    };
    ScanFilters {
        country: country.to_string(),
        language: language.to_string(),
        providers: common.providers,
        object_types,
        monetization_types: common.monetization_types,
        genres: common.genres,
        release_year: common.release_year,
        exclusive_only,
        count,
        ..ScanFilters::default()
    }
}

pub fn search_filters(country: &str, language: &str) -> Result<SearchFilters> {
    let common = common_answers()?;
    let count = result_count()?;
    Ok(SearchFilters {
        country: country.to_string(),
        language: language.to_string(),
        providers: common.providers,
        object_types: common.object_types,
        genres: common.genres,
        monetization_types: common.monetization_types,
        release_year: common.release_year,
        first: u32::try_from(count).unwrap_or(u32::MAX),
        ..SearchFilters::default()
    })
}

pub fn title_query() -> Result<String> {
    let query: String = Input::new()
        .with_prompt("Ingresá el nombre de la película o serie")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().is_empty() {
                Err("Ingresá algo para buscar")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(query.trim().to_string())
}

pub fn export_choice() -> Result<ExportChoice> {
    let options = [
        ("No, volver al menú", ExportChoice::None),
        ("Exportar a JSON", ExportChoice::Json),
        ("Exportar a CSV", ExportChoice::Csv),
    ];
    let labels: Vec<&str> = options.iter().map(|(label, _)| *label).collect();
    let choice = Select::new()
        .with_prompt("¿Querés exportar los resultados?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(options[choice].1)
}

fn common_answers() -> Result<CommonAnswers> {
    let provider_labels: Vec<&str> = PROVIDERS.iter().map(|p| p.clear_name).collect();
    let providers = MultiSelect::new()
        .with_prompt("Seleccioná las plataformas (Enter para todas)")
        .items(&provider_labels)
        .max_length(15)
        .interact()?
        .into_iter()
        .map(|index| PROVIDERS[index].code.to_string())
        .collect();

    let kinds = [
        ("Todos", None),
        ("Solo películas", Some(ObjectType::Movie)),
        ("Solo series", Some(ObjectType::Show)),
    ];
    let kind_labels: Vec<&str> = kinds.iter().map(|(label, _)| *label).collect();
    let kind = Select::new()
        .with_prompt("¿Qué tipo de contenido?")
        .items(&kind_labels)
        .default(0)
        .interact()?;
    let object_types = kinds[kind].1.into_iter().collect();

    let genre_labels: Vec<&str> = GENRES.iter().map(|g| g.translation).collect();
    let genres = MultiSelect::new()
        .with_prompt("Seleccioná géneros (Enter para todos)")
        .items(&genre_labels)
        .max_length(15)
        .interact()?
        .into_iter()
        .map(|index| GENRES[index].code.to_string())
        .collect();

    let monetization_labels: Vec<&str> = MONETIZATION_CHOICES
        .iter()
        .map(|(_, label)| *label)
        .collect();
    let preselected: Vec<bool> = MONETIZATION_CHOICES
        .iter()
        .map(|(kind, _)| *kind == MonetizationType::Flatrate)
        .collect();
    let monetization_types = MultiSelect::new()
        .with_prompt("Tipo de disponibilidad")
        .items(&monetization_labels)
        .defaults(&preselected)
        .interact()?
        .into_iter()
        .map(|index| MONETIZATION_CHOICES[index].0)
        .collect();

    let release_year = ReleaseYearRange {
        min: year_input("Año de estreno desde (vacío para sin límite)")?,
        max: year_input("Año de estreno hasta (vacío para sin límite)")?,
    };

    Ok(CommonAnswers {
        providers,
        object_types,
        genres,
        monetization_types,
        release_year,
    })
}

fn year_input(prompt: &str) -> Result<Option<i32>> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &'static str> {
            parse_year(input).map(|_| ())
        })
        .interact_text()?;
    Ok(parse_year(&raw).unwrap_or(None))
}

fn period(today: NaiveDate) -> Result<DateWindow> {
    let labels: Vec<&str> = PERIODS.iter().map(|(label, _)| *label).collect();
    let choice = Select::new()
        .with_prompt("¿Agregados en qué período?")
        .items(&labels)
        .default(0)
        .interact()?;
    match PERIODS[choice].1 {
        Period::LastDays(days) => Ok(DateWindow::last_days(today, days)),
        Period::Custom => custom_window(today),
    }
}

fn custom_window(today: NaiveDate) -> Result<DateWindow> {
    let from = day_input("Desde (AAAA-MM-DD)")?;
    let to_raw: String = Input::new()
        .with_prompt("Hasta (AAAA-MM-DD)")
        .default(today.format("%Y-%m-%d").to_string())
        .validate_with(move |input: &String| -> Result<(), String> {
            parse_window(from, input).map(|_| ())
        })
        .interact_text()?;
    parse_window(from, &to_raw).map_err(anyhow::Error::msg)
}

fn day_input(prompt: &str) -> Result<NaiveDate> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &'static str> {
            parse_day(input).map(|_| ())
        })
        .interact_text()?;
    parse_day(&raw).map_err(anyhow::Error::msg)
}

fn result_count() -> Result<usize> {
    let labels: Vec<String> = COUNTS.iter().map(|n| format!("{n} resultados")).collect();
    let choice = Select::new()
        .with_prompt("¿Cuántos resultados?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(COUNTS[choice])
}

/// Blank means unbounded.
fn parse_year(input: &str) -> Result<Option<i32>, &'static str> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<i32>() {
        Ok(year) if (1800..=9999).contains(&year) => Ok(Some(year)),
        _ => Err(INVALID_YEAR),
    }
}

fn parse_day(input: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| "Ingresá una fecha AAAA-MM-DD")
}

fn parse_window(from: NaiveDate, to_input: &str) -> Result<DateWindow, String> {
    let to = parse_day(to_input)?;
    DateWindow::new(from, to)
        .map_err(|_| format!("La fecha hasta debe ser igual o posterior a {from}"))
}
