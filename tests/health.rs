mod common;

use axum::extract::State;
use axum_restaurant_api::routes::health::health_check;

#[tokio::test]
async fn health_check_reports_database() {
    let state = common::test_state().await;
    let response = health_check(State(state)).await.expect("healthy");
    assert!(response.0.success);
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "ok");
}
