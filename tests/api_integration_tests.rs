//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles, decoding served feeds with prost.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use gtfs_rt_feed::gtfs_rt::feed_header::Incrementality;
use gtfs_rt_feed::gtfs_rt::FeedMessage;
use gtfs_rt_feed::{api::create_router, spawn_expiry_task, AppState, FeedStore};
use prost::Message;
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(FeedStore::default()))
}

async fn body_bytes(body: Body) -> axum::body::Bytes {
    axum::body::to_bytes(body, usize::MAX).await.unwrap()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

fn put_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

const TRIP: &str = r#"{
    "id": "1|12345|0|86|1012030",
    "route_id": "re70",
    "direction_id": 1,
    "headsign": "Berlin Hbf",
    "planned_departure": "2030-01-01T10:00:00+01:00",
    "stopovers": [
        {"stop_id": "s1", "stop_sequence": 1,
         "departure": "2030-01-01T10:00:00+01:00", "departure_delay": 60},
        {"stop_id": "s2", "stop_sequence": 2,
         "arrival": "2030-01-01T10:20:00+01:00", "arrival_delay": 120,
         "departure": "2030-01-01T10:21:00+01:00", "departure_delay": 120},
        {"stop_id": "s3", "stop_sequence": 3, "cancelled": true}
    ]
}"#;

const MOVEMENT: &str = r#"{
    "trip_id": "1|12345|0|86|1012030",
    "route_id": "re70",
    "vehicle_id": "re70-4711",
    "location": {"latitude": 52.5251, "longitude": 13.3694},
    "next_stopovers": [
        {"stop_id": "s2", "arrival": "2030-01-01T10:20:00+01:00",
         "departure": "2030-01-01T10:21:00+01:00"}
    ]
}"#;

async fn fetch_feed(app: &Router) -> FeedMessage {
    let response = app.clone().oneshot(get("/feed.pb")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    FeedMessage::decode(body_bytes(response.into_body()).await).unwrap()
}

// == Feed Endpoint Tests ==

#[tokio::test]
async fn test_empty_feed() {
    let app = create_test_app();

    let feed = fetch_feed(&app).await;

    assert_eq!(feed.header.gtfs_realtime_version, "2.0");
    assert_eq!(feed.header.incrementality(), Incrementality::Differential);
    assert!(feed.header.timestamp.is_some());
    assert!(feed.entity.is_empty());
}

#[tokio::test]
async fn test_root_serves_feed() {
    let app = create_test_app();

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/x-protobuf"
    );
}

#[tokio::test]
async fn test_trip_and_movement_feed() {
    let app = create_test_app();

    let response = app.clone().oneshot(put_json("/trips", TRIP)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "trip_update:trip:1|12345|0|86|1012030");
    assert_eq!(json["entities"], 1);

    let response = app
        .clone()
        .oneshot(put_json("/movements", MOVEMENT))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "vehicle_position:trip:1|12345|0|86|1012030");
    assert_eq!(json["entities"], 2);

    let feed = fetch_feed(&app).await;
    assert_eq!(feed.entity.len(), 2);

    let trip_update = feed.entity[0].trip_update.as_ref().unwrap();
    assert_eq!(trip_update.trip.route_id(), "re70");
    assert_eq!(trip_update.trip.start_time(), "10:00:00");
    assert_eq!(trip_update.trip.start_date(), "20300101");
    assert_eq!(trip_update.stop_time_update.len(), 3);
    assert!(trip_update.stop_time_update[0].arrival.is_none());
    assert_eq!(
        trip_update.stop_time_update[1].arrival.as_ref().unwrap().delay(),
        120
    );

    let vehicle = feed.entity[1].vehicle.as_ref().unwrap();
    assert_eq!(vehicle.vehicle.as_ref().unwrap().id(), "re70-4711");
    let position = vehicle.position.as_ref().unwrap();
    assert!((position.latitude - 52.5251).abs() < 1e-4);
}

#[tokio::test]
async fn test_feed_is_cached_until_mutation() {
    let app = create_test_app();
    app.clone().oneshot(put_json("/trips", TRIP)).await.unwrap();

    let first = app.clone().oneshot(get("/feed.pb")).await.unwrap();
    let first_etag = first.headers()[header::ETAG].clone();
    let first_body = body_bytes(first.into_body()).await;

    let second = app.clone().oneshot(get("/feed.pb")).await.unwrap();
    assert_eq!(second.headers()[header::ETAG], first_etag);
    assert_eq!(body_bytes(second.into_body()).await, first_body);

    app.clone()
        .oneshot(put_json("/movements", MOVEMENT))
        .await
        .unwrap();

    let third = app.clone().oneshot(get("/feed.pb")).await.unwrap();
    assert_ne!(third.headers()[header::ETAG], first_etag);
}

#[tokio::test]
async fn test_if_none_match_not_modified() {
    let app = create_test_app();
    app.clone().oneshot(put_json("/trips", TRIP)).await.unwrap();

    let response = app.clone().oneshot(get("/feed.pb")).await.unwrap();
    let etag = response.headers()[header::ETAG].clone();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/feed.pb")
                .header(header::IF_NONE_MATCH, etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(body_bytes(response.into_body()).await.is_empty());
}

#[tokio::test]
async fn test_feed_gzip_compression() {
    let app = create_test_app();
    for id in 0..10 {
        let body = format!(r#"{{"id":"trip-{}","route_id":"re70","headsign":"Berlin Hbf"}}"#, id);
        app.clone().oneshot(put_json("/trips", body)).await.unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/feed.pb")
                .header(header::ACCEPT_ENCODING, "gzip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");
}

// == Write Endpoint Tests ==

#[tokio::test]
async fn test_rewrite_keeps_single_entity() {
    let app = create_test_app();

    app.clone().oneshot(put_json("/trips", TRIP)).await.unwrap();
    let response = app.clone().oneshot(put_json("/trips", TRIP)).await.unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["entities"], 1);
    assert_eq!(fetch_feed(&app).await.entity.len(), 1);
}

#[tokio::test]
async fn test_unidentifiable_trip_rejected() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(put_json("/trips", r#"{"route_id":"re70"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Unidentifiable"));
    assert!(fetch_feed(&app).await.entity.is_empty());
}

#[tokio::test]
async fn test_invalid_location_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json(
            "/movements",
            r#"{"trip_id":"t1","location":{"latitude":91.0,"longitude":13.4}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = create_test_app();

    let response = app.oneshot(put_json("/trips", "not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Delete Endpoint Tests ==

#[tokio::test]
async fn test_delete_entity() {
    let app = create_test_app();
    app.clone().oneshot(put_json("/trips", TRIP)).await.unwrap();
    app.clone()
        .oneshot(put_json("/movements", MOVEMENT))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(delete("/entities/trip_update:trip:1%7C12345%7C0%7C86%7C1012030"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["entities"], 1);

    let feed = fetch_feed(&app).await;
    assert_eq!(feed.entity.len(), 1);
    assert!(feed.entity[0].vehicle.is_some());

    let response = app
        .clone()
        .oneshot(delete("/entities/trip_update:trip:1%7C12345%7C0%7C86%7C1012030"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_flush_entities() {
    let app = create_test_app();
    app.clone().oneshot(put_json("/trips", TRIP)).await.unwrap();
    app.clone()
        .oneshot(put_json("/movements", MOVEMENT))
        .await
        .unwrap();

    let response = app.clone().oneshot(delete("/entities")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["flushed"], 2);

    let feed = fetch_feed(&app).await;
    assert!(feed.entity.is_empty());
    assert_eq!(feed.header.incrementality(), Incrementality::Differential);
}

// == Stats and Health Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();
    app.clone().oneshot(put_json("/trips", TRIP)).await.unwrap();
    app.clone()
        .oneshot(put_json("/trips", r#"{"headsign":"nowhere"}"#))
        .await
        .unwrap();
    fetch_feed(&app).await;
    fetch_feed(&app).await;

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["writes"], 1);
    assert_eq!(json["rejected"], 1);
    assert_eq!(json["entities"], 1);
    assert_eq!(json["builds"], 1);
    assert_eq!(json["cache_hits"], 1);
    assert_eq!(json["cache_hit_rate"], 0.5);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}

// == Expiry Tests ==

#[tokio::test(start_paused = true)]
async fn test_entities_expire_from_served_feed() {
    let state = AppState::new(FeedStore::new(Duration::from_secs(300)));
    let expiry_handle = spawn_expiry_task(state.feed.clone());
    let app = create_router(state);

    app.clone().oneshot(put_json("/trips", TRIP)).await.unwrap();
    app.clone()
        .oneshot(put_json("/movements", MOVEMENT))
        .await
        .unwrap();
    assert_eq!(fetch_feed(&app).await.entity.len(), 2);

    tokio::time::sleep(Duration::from_secs(240)).await;
    assert_eq!(fetch_feed(&app).await.entity.len(), 2);

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert!(fetch_feed(&app).await.entity.is_empty());

    expiry_handle.abort();
}
