use pretty_assertions::assert_eq;
use scanner_core::FailureKind;
use scanner_engine::{
    suggested_titles_request, GraphqlTransport, ReqwestTransport, TransportSettings,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(TransportSettings {
        endpoint: format!("{}/graphql", server.uri()),
        ..TransportSettings::default()
    })
    .expect("client builds")
}

#[tokio::test]
async fn posts_browser_headers_and_returns_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("origin", "https://www.justwatch.com"))
        .and(header("referer", "https://www.justwatch.com/"))
        .and(header_exists("device-id"))
        .and(header_exists("user-agent"))
        .and(body_partial_json(json!({
            "operationName": "GetSuggestedTitles",
            "variables": { "country": "AR", "first": 5, "filter": { "searchQuery": "Matrix" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "popularTitles": { "edges": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let request = suggested_titles_request("Matrix", "AR", "es", 5);
    let data = transport.execute(&request).await.expect("success");
    assert_eq!(data, json!({ "popularTitles": { "edges": [] } }));
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .execute(&suggested_titles_request("x", "AR", "es", 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.user_message(), "Error HTTP 503: Service Unavailable");
}

#[tokio::test]
async fn html_page_is_a_soft_block() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<!DOCTYPE html><title>Just a moment</title>", "text/html"),
        )
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .execute(&suggested_titles_request("x", "AR", "es", 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::SoftBlock);
}

#[tokio::test]
async fn unparsable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"data\": ", "application/json"))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .execute(&suggested_titles_request("x", "AR", "es", 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
    assert_eq!(err.user_message(), "Error al parsear respuesta de JustWatch");
}

#[tokio::test]
async fn graphql_errors_are_upstream_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Variable \"$country\" got invalid value" }]
        })))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .execute(&suggested_titles_request("x", "ZZ", "es", 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Upstream);
    assert_eq!(err.user_message(), "Variable \"$country\" got invalid value");
}

#[tokio::test]
async fn unreachable_endpoint_is_a_connection_failure() {
    let transport = ReqwestTransport::new(TransportSettings {
        endpoint: "http://127.0.0.1:9/graphql".to_string(),
        ..TransportSettings::default()
    })
    .expect("client builds");

    let err = transport
        .execute(&suggested_titles_request("x", "AR", "es", 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Connection);
    assert!(err.user_message().starts_with("Error de conexión con JustWatch: "));
}

#[tokio::test]
async fn transport_keeps_the_settings_it_was_built_with() {
    let server = MockServer::start().await;
    let transport = transport_for(&server);

    assert_eq!(transport.settings().endpoint, format!("{}/graphql", server.uri()));
    assert!(transport.settings().accept_language.starts_with("es-AR"));
}
