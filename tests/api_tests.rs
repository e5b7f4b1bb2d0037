//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Integration tests for the HTTP surface, driving the router directly with
// `tower::ServiceExt::oneshot` rather than binding a real listener.
//--------------------------------------------------------------------------------------------------

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use hyper::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use lob_engine::api::Api;
use lob_engine::{EngineHandle, EventFanout, Simulator};

async fn setup_test_router() -> Router {
    let engine = EngineHandle::spawn(200);
    let fanout = Arc::new(EventFanout::new());
    let simulator = Simulator::new(engine.clone(), fanout.clone());
    let simulator_control = simulator.control();

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let api = Api::new(addr, engine, fanout, simulator_control);
    api.routes()
}

async fn parse_json_response(response: Response<Body>) -> Value {
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = setup_test_router().await;

    let response =
        app.clone().oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_order() {
    let app = setup_test_router().await;

    let json_body = json!({
        "client": "alice",
        "side": "BUY",
        "price": 100.50,
        "volume": 10
    });

    let response = app
        .clone()
        .oneshot(
            Request::post("/order")
                .header("Content-Type", "application/json")
                .body(Body::from(json_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_json_response(response).await;
    assert_eq!(body["order_id"], 1);
    assert!(body["trades_executed"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_order() {
    let app = setup_test_router().await;

    let json_body = json!({ "client": "alice", "side": "BUY", "price": 100.50, "volume": 10 });
    let create_response = app
        .clone()
        .oneshot(
            Request::post("/order")
                .header("Content-Type", "application/json")
                .body(Body::from(json_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(create_response.status(), StatusCode::CREATED);
    let body = parse_json_response(create_response).await;
    let order_id = body["order_id"].as_u64().unwrap();

    let url = format!("/order/{order_id}");
    let cancel_response =
        app.clone().oneshot(Request::delete(&url).body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(cancel_response.status(), StatusCode::OK);
    let body = parse_json_response(cancel_response).await;
    assert_eq!(body["order_id"], order_id);
}

#[tokio::test]
async fn test_cancel_unknown_order_returns_not_found() {
    let app = setup_test_router().await;

    let response =
        app.clone().oneshot(Request::delete("/order/999").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_depth_reflects_resting_orders() {
    let app = setup_test_router().await;

    for (side, price, volume) in [("BUY", 99.0, 2), ("SELL", 101.0, 3)] {
        let json_body = json!({ "client": "bot", "side": side, "price": price, "volume": volume });
        app.clone()
            .oneshot(
                Request::post("/order")
                    .header("Content-Type", "application/json")
                    .body(Body::from(json_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
    }

    let response =
        app.clone().oneshot(Request::get("/lob?levels=5").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_json_response(response).await;
    assert_eq!(body["bids"][0]["price"], 99.0);
    assert_eq!(body["bids"][0]["volume"], 2);
    assert_eq!(body["asks"][0]["price"], 101.0);
    assert_eq!(body["asks"][0]["volume"], 3);
}

#[tokio::test]
async fn test_get_depth_rejects_out_of_range_levels() {
    let app = setup_test_router().await;

    let response =
        app.clone().oneshot(Request::get("/lob?levels=0").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trade_log_reflects_executed_trades() {
    let app = setup_test_router().await;

    let buy = json!({ "client": "maker", "side": "BUY", "price": 100.0, "volume": 5 });
    app.clone()
        .oneshot(
            Request::post("/order")
                .header("Content-Type", "application/json")
                .body(Body::from(buy.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let sell = json!({ "client": "taker", "side": "SELL", "price": 99.0, "volume": 5 });
    app.clone()
        .oneshot(
            Request::post("/order")
                .header("Content-Type", "application/json")
                .body(Body::from(sell.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let response =
        app.clone().oneshot(Request::get("/trades").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_json_response(response).await;
    let trades = body["trades"].as_array().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0]["volume"], 5);
}

#[tokio::test]
async fn test_simulator_status_toggle_roundtrip() {
    let app = setup_test_router().await;

    let response =
        app.clone().oneshot(Request::get("/simulator/status").body(Body::empty()).unwrap()).await.unwrap();
    let body = parse_json_response(response).await;
    assert_eq!(body["active"], false);

    let toggle = json!({ "active": true });
    let response = app
        .clone()
        .oneshot(
            Request::post("/simulator/toggle")
                .header("Content-Type", "application/json")
                .body(Body::from(toggle.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let body = parse_json_response(response).await;
    assert_eq!(body["active"], true);

    let response =
        app.clone().oneshot(Request::get("/simulator/status").body(Body::empty()).unwrap()).await.unwrap();
    let body = parse_json_response(response).await;
    assert_eq!(body["active"], true);
}
