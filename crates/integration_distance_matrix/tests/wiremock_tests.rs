//! Integration tests for the distance matrix client (wiremock-based)

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_distance_matrix::{
    Avoid, DISTANCE_MATRIX_PATH, DistanceMatrixClient, DistanceMatrixConfig, DistanceMatrixError,
    DistanceMatrixRequest, ElementStatus, HttpDistanceMatrixClient, TokenBucketLimiter,
    TransitMode, TransitRoutingPreference, TravelMode, Units,
};

const fn sydney_to_parramatta_json() -> &'static str {
    r#"{
        "destination_addresses" : [ "Parramatta NSW, Australia" ],
        "origin_addresses" : [ "Sydney NSW, Australia", "Pyrmont NSW, Australia" ],
        "rows" : [
            {
                "elements" : [
                    {
                        "distance" : { "text" : "23.8 km", "value" : 23846 },
                        "duration" : { "text" : "37 mins", "value" : 2215 },
                        "status" : "OK"
                    }
                ]
            },
            {
                "elements" : [
                    {
                        "distance" : { "text" : "22.2 km", "value" : 22242 },
                        "duration" : { "text" : "34 mins", "value" : 2058 },
                        "status" : "OK"
                    }
                ]
            }
        ],
        "status" : "OK"
    }"#
}

const fn two_by_two_json() -> &'static str {
    r#"{
        "destination_addresses" : [ "Perth WA, Australia", "Parramatta NSW, Australia" ],
        "origin_addresses" : [ "Sydney NSW, Australia", "Pyrmont NSW, Australia" ],
        "rows" : [
            { "elements" : [
                { "distance" : { "text" : "3,934 km", "value" : 3934000 },
                  "duration" : { "text" : "1 day 16 hours", "value" : 145000 },
                  "status" : "OK" },
                { "distance" : { "text" : "23.8 km", "value" : 23846 },
                  "duration" : { "text" : "37 mins", "value" : 2215 },
                  "status" : "OK" }
            ] },
            { "elements" : [
                { "distance" : { "text" : "3,935 km", "value" : 3935000 },
                  "duration" : { "text" : "1 day 16 hours", "value" : 145100 },
                  "status" : "OK" },
                { "distance" : { "text" : "22.2 km", "value" : 22242 },
                  "duration" : { "text" : "34 mins", "value" : 2058 },
                  "status" : "OK" }
            ] }
        ],
        "status" : "OK"
    }"#
}

fn client_for_mock(server: &MockServer) -> HttpDistanceMatrixClient {
    HttpDistanceMatrixClient::new(&DistanceMatrixConfig::for_testing(server.uri())).unwrap()
}

fn sydney_pyrmont_to_parramatta() -> DistanceMatrixRequest {
    DistanceMatrixRequest::new(["Sydney", "Pyrmont"], ["Parramatta"])
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |r| r.len())
}

#[tokio::test]
async fn test_sydney_pyrmont_to_parramatta() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .and(query_param("origins", "Sydney|Pyrmont"))
        .and(query_param("destinations", "Parramatta"))
        .and(query_param("key", "AIzaNotReallyAnAPIKey"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sydney_to_parramatta_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let response = client
        .execute(&CancellationToken::new(), &sydney_pyrmont_to_parramatta())
        .await
        .unwrap();

    assert_eq!(
        response.origin_addresses,
        vec!["Sydney NSW, Australia", "Pyrmont NSW, Australia"]
    );
    assert_eq!(response.destination_addresses, vec!["Parramatta NSW, Australia"]);
    assert_eq!(response.rows.len(), 2);

    let first = &response.rows[0].elements;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].status, ElementStatus::Ok);
    assert_eq!(first[0].duration, Some(Duration::from_secs(2215)));
    let distance = first[0].distance.as_ref().unwrap();
    assert_eq!(distance.human_readable, "23.8 km");
    assert_eq!(distance.meters, 23846);

    let second = &response.rows[1].elements;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].duration, Some(Duration::from_secs(2058)));
    assert_eq!(second[0].distance.as_ref().unwrap().meters, 22242);
}

#[tokio::test]
async fn test_request_url_encoding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(two_by_two_json()))
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let request = DistanceMatrixRequest::new(["Sydney", "Pyrmont"], ["Perth", "Parramatta"])
        .with_mode(TravelMode::Transit)
        .with_language("en")
        .with_avoid(Avoid::Tolls)
        .with_units(Units::Imperial)
        .with_departure_time("now")
        .with_transit_mode(TransitMode::Rail)
        .with_transit_routing_preference(TransitRoutingPreference::LessWalking);

    client
        .execute(&CancellationToken::new(), &request)
        .await
        .unwrap();
    client
        .execute(&CancellationToken::new(), &request)
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);

    let expected = "avoid=tolls&departure_time=now&destinations=Perth%7CParramatta\
                    &key=AIzaNotReallyAnAPIKey&language=en&mode=transit\
                    &origins=Sydney%7CPyrmont&transit_mode=rail\
                    &transit_routing_preference=less_walking&units=imperial";
    for request in &received {
        assert_eq!(request.url.path(), DISTANCE_MATRIX_PATH);
        assert_eq!(request.url.query(), Some(expected));
    }
}

#[tokio::test]
async fn test_missing_origins_sends_nothing() {
    let server = MockServer::start().await;
    let client = client_for_mock(&server);

    let request = DistanceMatrixRequest::new(Vec::<String>::new(), ["Parramatta"]);
    let err = client
        .execute(&CancellationToken::new(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, DistanceMatrixError::MissingOrigins));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_missing_destinations_sends_nothing() {
    let server = MockServer::start().await;
    let client = client_for_mock(&server);

    let request = DistanceMatrixRequest::new(["Sydney", "Pyrmont"], Vec::<String>::new());
    let err = client
        .execute(&CancellationToken::new(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, DistanceMatrixError::MissingDestinations));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_departure_and_arrival_time() {
    let server = MockServer::start().await;
    let client = client_for_mock(&server);

    let request = DistanceMatrixRequest::new(["Sydney", "Pyrmont"], ["Parramatta", "Perth"])
        .with_departure_time("now")
        .with_arrival_time("1770804000");
    let err = client
        .execute(&CancellationToken::new(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, DistanceMatrixError::ConflictingTimeParameters));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_transit_modifiers_without_transit_mode() {
    let server = MockServer::start().await;
    let client = client_for_mock(&server);

    let request = DistanceMatrixRequest::new(["Sydney"], ["Parramatta"])
        .with_transit_mode(TransitMode::Bus);
    let err = client
        .execute(&CancellationToken::new(), &request)
        .await
        .unwrap_err();
    assert!(matches!(err, DistanceMatrixError::InvalidModifierForMode { .. }));

    let request = DistanceMatrixRequest::new(["Sydney"], ["Parramatta"])
        .with_transit_routing_preference(TransitRoutingPreference::FewerTransfers);
    let err = client
        .execute(&CancellationToken::new(), &request)
        .await
        .unwrap_err();
    assert!(matches!(err, DistanceMatrixError::InvalidModifierForMode { .. }));

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_cancelled_before_dispatch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(two_by_two_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let request = DistanceMatrixRequest::new(["Sydney", "Pyrmont"], ["Parramatta", "Perth"]);
    let err = client.execute(&cancel, &request).await.unwrap_err();

    assert!(matches!(err, DistanceMatrixError::Cancelled));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_cancelled_in_flight() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sydney_to_parramatta_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = client
        .execute(&cancel, &sydney_pyrmont_to_parramatta())
        .await
        .unwrap_err();

    assert!(matches!(err, DistanceMatrixError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_failing_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"status" : "ERROR"}"#))
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let err = client
        .execute(&CancellationToken::new(), &sydney_pyrmont_to_parramatta())
        .await
        .unwrap_err();

    match &err {
        DistanceMatrixError::TransportError { status, body } => {
            assert_eq!(*status, Some(500));
            assert!(body.contains("ERROR"));
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_large_error_body_is_capped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("é".repeat(100_000)))
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let err = client
        .execute(&CancellationToken::new(), &sydney_pyrmont_to_parramatta())
        .await
        .unwrap_err();

    match err {
        DistanceMatrixError::TransportError { status, body } => {
            assert_eq!(status, Some(502));
            assert!(body.len() <= 512);
            assert!(body.len() >= 500);
            assert!(body.chars().all(|c| c == 'é'));
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_service_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status" : "ERROR"}"#))
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let err = client
        .execute(&CancellationToken::new(), &sydney_pyrmont_to_parramatta())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DistanceMatrixError::ServiceError { ref status, .. } if status == "ERROR"
    ));
}

#[tokio::test]
async fn test_over_query_limit_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "destination_addresses": [],
                "origin_addresses": [],
                "rows": [],
                "status": "OVER_QUERY_LIMIT",
                "error_message": "You have exceeded your rate-limit for this API."
            }"#,
        ))
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let err = client
        .execute(&CancellationToken::new(), &sydney_pyrmont_to_parramatta())
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(err.to_string().contains("exceeded your rate-limit"));
}

#[tokio::test]
async fn test_element_not_found_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "destination_addresses": [ "Parramatta NSW, Australia", "" ],
                "origin_addresses": [ "Sydney NSW, Australia" ],
                "rows": [{
                    "elements": [
                        {
                            "distance": { "text": "23.8 km", "value": 23846 },
                            "duration": { "text": "37 mins", "value": 2215 },
                            "status": "OK"
                        },
                        { "status": "NOT_FOUND" }
                    ]
                }],
                "status": "OK"
            }"#,
        ))
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let request = DistanceMatrixRequest::new(["Sydney"], ["Parramatta", "Atlantis"]);
    let response = client
        .execute(&CancellationToken::new(), &request)
        .await
        .unwrap();

    let elements = &response.rows[0].elements;
    assert!(elements[0].is_ok());
    assert_eq!(elements[0].distance.as_ref().unwrap().meters, 23846);
    assert_eq!(elements[1].status, ElementStatus::NotFound);
    assert!(elements[1].distance.is_none());
    assert!(elements[1].duration.is_none());
}

#[tokio::test]
async fn test_dimension_mismatch_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(sydney_to_parramatta_json()))
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let request = DistanceMatrixRequest::new(["Sydney", "Pyrmont"], ["Parramatta", "Perth"]);
    let err = client
        .execute(&CancellationToken::new(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, DistanceMatrixError::DecodeError(_)));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for_mock(&server);
    let err = client
        .execute(&CancellationToken::new(), &sydney_pyrmont_to_parramatta())
        .await
        .unwrap_err();

    assert!(matches!(err, DistanceMatrixError::DecodeError(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_missing_api_key_sends_nothing() {
    let server = MockServer::start().await;

    let config = DistanceMatrixConfig {
        api_key: None,
        api_key_env: "DISTANCE_MATRIX_TEST_SURELY_UNSET_VAR".to_string(),
        ..DistanceMatrixConfig::for_testing(server.uri())
    };
    let client = HttpDistanceMatrixClient::new(&config).unwrap();

    let err = client
        .execute(&CancellationToken::new(), &sydney_pyrmont_to_parramatta())
        .await
        .unwrap_err();

    assert!(matches!(err, DistanceMatrixError::ConfigurationError(_)));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(sydney_to_parramatta_json()))
        .expect(4)
        .mount(&server)
        .await;

    let client = Arc::new(
        client_for_mock(&server).with_rate_limiter(Arc::new(TokenBucketLimiter::new(10))),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .execute(&CancellationToken::new(), &sydney_pyrmont_to_parramatta())
                    .await
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.rows.len(), 2);
    }
}
