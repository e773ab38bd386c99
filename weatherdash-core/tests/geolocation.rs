//! Integration tests for the IP geolocator using wiremock.

use weatherdash_core::{Coordinates, GeolocationError, Geolocator, geolocation::IpGeolocator};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn geolocator(template: ResponseTemplate) -> (MockServer, IpGeolocator) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(template)
        .mount(&server)
        .await;
    let geolocator = IpGeolocator::new(format!("{}/json/", server.uri()));
    (server, geolocator)
}

fn failed_message(result: Result<Coordinates, GeolocationError>) -> String {
    match result {
        Err(GeolocationError::Failed(message)) => message,
        other => panic!("expected a failed lookup, got {other:?}"),
    }
}

#[tokio::test]
async fn test_success_yields_coordinates() {
    let (_server, geolocator) = geolocator(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({
            "status": "success",
            "country": "United Kingdom",
            "city": "London",
            "lat": 51.5074,
            "lon": -0.1278,
            "query": "203.0.113.7"
        }),
    ))
    .await;

    let coords = geolocator.locate().await.unwrap();
    assert_eq!(coords, Coordinates { lat: 51.5074, lon: -0.1278 });
    assert_eq!(coords.query(), "51.5074,-0.1278");
}

#[tokio::test]
async fn test_fail_status_carries_message() {
    let (_server, geolocator) = geolocator(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({
            "status": "fail",
            "message": "private range",
            "query": "192.168.0.1"
        }),
    ))
    .await;

    assert_eq!(failed_message(geolocator.locate().await), "private range");
}

#[tokio::test]
async fn test_missing_position_is_failure() {
    let (_server, geolocator) = geolocator(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "success" })),
    )
    .await;

    assert_eq!(failed_message(geolocator.locate().await), "lookup returned no position");
}

#[tokio::test]
async fn test_server_error_is_failure() {
    let (_server, geolocator) =
        geolocator(ResponseTemplate::new(500).set_body_string("internal error")).await;

    let message = failed_message(geolocator.locate().await);
    assert!(message.contains("500"), "{message}");
}

#[tokio::test]
async fn test_malformed_body_is_failure() {
    let (_server, geolocator) =
        geolocator(ResponseTemplate::new(200).set_body_string("not json")).await;

    assert!(matches!(geolocator.locate().await, Err(GeolocationError::Failed(_))));
}
