use scanner_core::{
    format_added_date, format_runtime, new_title_row_view, title_row_view, truncate,
    MonetizationLabel, MonetizationType, NewTitleRow, ObjectType, Offer, Package, RetailPrice,
    Scoring, TitleContent, TitleNode,
};

fn node() -> TitleNode {
    TitleNode {
        id: "tm1".to_string(),
        object_type: Some(ObjectType::Movie),
        content: Some(TitleContent {
            title: "Relatos salvajes".to_string(),
            original_release_year: Some(2014),
            full_path: "/ar/pelicula/relatos-salvajes".to_string(),
            runtime: Some(122),
            scoring: Some(Scoring {
                imdb_score: Some(8.14),
                ..Scoring::default()
            }),
            ..TitleContent::default()
        }),
        ..TitleNode::default()
    }
}

fn rent_offer() -> Offer {
    Offer {
        id: None,
        monetization_type: MonetizationType::Rent,
        presentation_type: Some("HD".to_string()),
        retail_price: Some(RetailPrice::Amount(3.5)),
        currency: Some("USD".to_string()),
        standard_web_url: None,
        package: Some(Package {
            clear_name: "Apple TV".to_string(),
            technical_name: "itunes".to_string(),
            ..Package::default()
        }),
        date_created: Some("2024-01-05".to_string()),
        last_change_date: Some("2024-01-05".to_string()),
    }
}

#[test]
fn runtime_is_split_into_hours_and_minutes() {
    assert_eq!(format_runtime(112), "1h 52m");
    assert_eq!(format_runtime(45), "45m");
    assert_eq!(format_runtime(120), "2h 0m");
}

#[test]
fn added_date_is_rendered_day_first() {
    assert_eq!(format_added_date(Some("2024-01-05")), "5/1/2024");
    assert_eq!(format_added_date(Some("2024-11-25T10:00:00Z")), "25/11/2024");
    assert_eq!(format_added_date(None), "-");
}

#[test]
fn truncate_counts_characters() {
    assert_eq!(truncate("Acción", 10), "Acción");
    assert_eq!(truncate("Acción y aventura", 9), "Acción...");
}

#[test]
fn new_title_view_carries_offer_details() {
    let row = NewTitleRow {
        node: node(),
        new_offer: Some(rent_offer()),
    };
    let view = new_title_row_view(3, &row);

    assert_eq!(view.position, 3);
    assert!(view.is_movie);
    assert_eq!(view.imdb_score.as_deref(), Some("8.1"));
    assert_eq!(view.platform.as_deref(), Some("Apple TV"));
    assert_eq!(
        view.monetization,
        Some(MonetizationLabel::Rent("USD 3.50".to_string()))
    );
    assert_eq!(view.monetization.unwrap().to_string(), "Alquiler: USD 3.50");
    assert_eq!(view.quality.as_deref(), Some("HD"));
    assert_eq!(view.added.as_deref(), Some("5/1/2024"));
    assert_eq!(view.runtime.as_deref(), Some("2h 2m"));
    assert_eq!(view.url, "https://www.justwatch.com/ar/pelicula/relatos-salvajes");
}

#[test]
fn search_view_without_offer_has_no_platform() {
    let view = title_row_view(1, &node());
    assert_eq!(view.platform, None);
    assert_eq!(view.monetization, None);
    assert_eq!(view.genres, None);
}
