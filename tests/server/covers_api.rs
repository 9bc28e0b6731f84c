use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::{PLACEHOLDER_BYTES, PLACEHOLDER_PATH, spawn_app, spawn_app_with_mocks};

async fn mount_placeholder(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(PLACEHOLDER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PLACEHOLDER_BYTES, "image/png"))
        .mount(server)
        .await;
}

async fn mount_google(server: &MockServer, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_open_library(server: &MockServer, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn header<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn isbn_query_resolves_to_open_library_template() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover?isbn=9780439708180&size=L&format=json"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({
            "ok": true,
            "isbn": "9780439708180",
            "source": "openlibrary",
            "coverUrl": "https://covers.openlibrary.org/b/isbn/9780439708180-L.jpg",
        })
    );
}

#[tokio::test]
async fn isbn_query_proxies_the_cover_image() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_google(server, json!({}), 0).await;
    mount_open_library(server, json!({}), 0).await;

    Mock::given(method("GET"))
        .and(path("/b/isbn/9780439708180-L.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"cover-jpeg".to_vec(), "image/jpeg"))
        .expect(1)
        .mount(server)
        .await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover?isbn=9780439708180&size=l"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), Some("image/jpeg"));
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, max-age=86400")
    );
    assert_eq!(header(&response, "x-cover-source"), Some("openlibrary"));
    assert_eq!(header(&response, "x-isbn"), Some("9780439708180"));
    assert_eq!(
        response.bytes().await.expect("Failed to read body").as_ref(),
        b"cover-jpeg"
    );
}

#[tokio::test]
async fn title_query_uses_google_isbn() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();

    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "intitle:Dune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "volumeInfo": {
                    "industryIdentifiers": [
                        { "type": "ISBN_10", "identifier": "0441013597" },
                        { "type": "ISBN_13", "identifier": "9780441013593" }
                    ]
                }
            }]
        })))
        .expect(1)
        .mount(server)
        .await;
    mount_open_library(server, json!({ "docs": [{ "isbn": ["1111111111"] }] }), 0).await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover?title=Dune&format=json"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], true);
    assert_eq!(body["isbn"], "9780441013593");
    assert_eq!(body["source"], "openlibrary");
    assert_eq!(
        body["coverUrl"],
        format!("{}/b/isbn/9780441013593-M.jpg", server.uri())
    );
}

#[tokio::test]
async fn google_thumbnail_is_reported_as_google() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_google(
        server,
        json!({
            "items": [{
                "volumeInfo": {
                    "imageLinks": { "thumbnail": "http://books.google.com/books/content?id=B1hSG45JCX4C" }
                }
            }]
        }),
        1,
    )
    .await;
    mount_open_library(server, json!({}), 0).await;

    let body: Value = reqwest::Client::new()
        .get(app.api_url("/cover?title=Dune&format=json"))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["ok"], true);
    assert_eq!(body["source"], "google");
    assert_eq!(body["isbn"], Value::Null);
    assert_eq!(
        body["coverUrl"],
        "https://books.google.com/books/content?id=B1hSG45JCX4C"
    );
}

#[tokio::test]
async fn open_library_is_consulted_only_after_google_misses() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_google(server, json!({ "totalItems": 0 }), 1).await;
    mount_open_library(server, json!({ "docs": [{ "cover_i": 8231856 }] }), 1).await;

    let body: Value = reqwest::Client::new()
        .get(app.api_url("/cover?title=Dune&size=S&format=json"))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["ok"], true);
    assert_eq!(body["source"], "openlibrary");
    assert_eq!(
        body["coverUrl"],
        format!("{}/b/id/8231856-S.jpg", server.uri())
    );
}

#[tokio::test]
async fn unknown_title_serves_placeholder_tagged_none() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_google(server, json!({ "totalItems": 0 }), 1).await;
    mount_open_library(server, json!({ "numFound": 0, "docs": [] }), 1).await;
    mount_placeholder(server).await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover?title=Unknown+Book+Xyz"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cover-source"), Some("none"));
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, max-age=3600")
    );
    assert!(header(&response, "x-isbn").is_none());
    assert_eq!(
        response.bytes().await.expect("Failed to read body").as_ref(),
        PLACEHOLDER_BYTES
    );
}

#[tokio::test]
async fn no_parameters_serve_placeholder_without_provider_calls() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_google(server, json!({}), 0).await;
    mount_open_library(server, json!({}), 0).await;
    mount_placeholder(server).await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cover-source"), Some("none"));
    assert_eq!(
        response.bytes().await.expect("Failed to read body").as_ref(),
        PLACEHOLDER_BYTES
    );
}

#[tokio::test]
async fn no_parameters_in_json_mode_report_placeholder() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();

    let body: Value = reqwest::Client::new()
        .get(app.api_url("/cover?format=json"))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(
        body,
        json!({
            "ok": false,
            "isbn": null,
            "source": "none",
            "coverUrl": format!("{}{PLACEHOLDER_PATH}", server.uri()),
        })
    );
}

#[tokio::test]
async fn failing_providers_still_answer_with_placeholder() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();

    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(server)
        .await;
    mount_placeholder(server).await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover?title=Dune"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cover-source"), Some("none"));
    assert_eq!(
        response.bytes().await.expect("Failed to read body").as_ref(),
        PLACEHOLDER_BYTES
    );
}

#[tokio::test]
async fn missing_cover_image_falls_back_to_placeholder() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_placeholder(server).await;

    Mock::given(method("GET"))
        .and(path("/b/isbn/0000000000-M.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(server)
        .await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover?isbn=0000000000"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cover-source"), Some("none"));
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, max-age=3600")
    );
    assert!(header(&response, "x-isbn").is_none());
}

#[tokio::test]
async fn non_image_cover_body_falls_back_to_placeholder() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_placeholder(server).await;

    Mock::given(method("GET"))
        .and(path("/b/isbn/123-M.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<script>alert(1)</script>".to_vec(), "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover?isbn=123"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), Some("image/png"));
    assert_eq!(header(&response, "x-cover-source"), Some("none"));
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, max-age=3600")
    );
    assert_eq!(
        response.bytes().await.expect("Failed to read body").as_ref(),
        PLACEHOLDER_BYTES
    );
}

#[tokio::test]
async fn blank_size_uses_medium_template() {
    let app = spawn_app().await;

    let body: Value = reqwest::Client::new()
        .get(app.api_url("/cover?isbn=9780439708180&size=&format=json"))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(
        body["coverUrl"],
        "https://covers.openlibrary.org/b/isbn/9780439708180-M.jpg"
    );
}

#[tokio::test]
async fn unreachable_cover_host_is_tagged_error() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_placeholder(server).await;
    mount_google(
        server,
        json!({
            "items": [{
                "volumeInfo": { "imageLinks": { "thumbnail": "https://127.0.0.1:9/thumb.jpg" } }
            }]
        }),
        1,
    )
    .await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover?title=Dune"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cover-source"), Some("error"));
    assert_eq!(
        response.bytes().await.expect("Failed to read body").as_ref(),
        PLACEHOLDER_BYTES
    );
}

#[tokio::test]
async fn unreachable_placeholder_serves_built_in_image() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_google(server, json!({}), 1).await;
    mount_open_library(server, json!({}), 1).await;

    Mock::given(method("GET"))
        .and(path(PLACEHOLDER_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(server)
        .await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover?title=Nothing+Here"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), Some("image/svg+xml"));
    assert_eq!(header(&response, "x-cover-source"), Some("none"));
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("<svg"));
}

#[tokio::test]
async fn responses_carry_nosniff_header() {
    let app = spawn_app_with_mocks().await;
    let server = app.mock_server();
    mount_placeholder(server).await;

    let response = reqwest::Client::new()
        .get(app.api_url("/cover"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(header(&response, "x-content-type-options"), Some("nosniff"));
}
