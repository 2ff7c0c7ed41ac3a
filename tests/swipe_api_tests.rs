//! `/swipe` integration tests

mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};

use rendezvous::api::services::ApiResponse;
use rendezvous::runtime::modes::configure_app;
use rendezvous::storage::Needs;

use common::setup;

#[actix_rt::test]
async fn test_swipe_detects_match() {
    let env = setup().await;
    let ada = env.create_user("ada@example.com", Needs::Host).await;
    let bob = env.create_user("bob@example.com", Needs::Tenant).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &env.ctx))).await;

    let swipe = |from: &rendezvous::storage::User, to: i32, liked: bool| {
        TestRequest::post()
            .uri("/swipe")
            .insert_header((AUTHORIZATION, env.bearer_for(from)))
            .set_json(json!({ "target_id": to, "liked": liked }))
            .to_request()
    };

    let resp = test::call_service(&app, swipe(&ada, bob.id, true)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    let data = body.data.unwrap();
    assert_eq!(data["matched"], false);
    assert_eq!(data["swipe"]["user_id"], ada.id);
    assert_eq!(data["swipe"]["target_id"], bob.id);

    let resp = test::call_service(&app, swipe(&bob, ada.id, true)).await;
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.data.unwrap()["matched"], true);

    // 改成 pass 后不再配对
    let resp = test::call_service(&app, swipe(&bob, ada.id, false)).await;
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.data.unwrap()["matched"], false);
    assert!(env.ctx.user_service.matches(ada.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_swipe_is_upserted() {
    let env = setup().await;
    let ada = env.create_user("ada@example.com", Needs::Host).await;
    let bob = env.create_user("bob@example.com", Needs::Tenant).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &env.ctx))).await;

    for liked in [true, false, true] {
        let req = TestRequest::post()
            .uri("/swipe")
            .insert_header((AUTHORIZATION, env.bearer_for(&ada)))
            .set_json(json!({ "target_id": bob.id, "liked": liked }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = TestRequest::get()
        .uri("/swipe")
        .insert_header((AUTHORIZATION, env.bearer_for(&ada)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    let swipes = body.data.unwrap();
    let swipes = swipes.as_array().unwrap();
    assert_eq!(swipes.len(), 1);
    assert_eq!(swipes[0]["liked"], true);
}

#[actix_rt::test]
async fn test_swipe_rejections() {
    let env = setup().await;
    let ada = env.create_user("ada@example.com", Needs::Host).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &env.ctx))).await;

    let req = TestRequest::post()
        .uri("/swipe")
        .insert_header((AUTHORIZATION, env.bearer_for(&ada)))
        .set_json(json!({ "target_id": ada.id, "liked": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 5000);

    let req = TestRequest::post()
        .uri("/swipe")
        .insert_header((AUTHORIZATION, env.bearer_for(&ada)))
        .set_json(json!({ "target_id": 9999, "liked": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 5001);

    let req = TestRequest::post()
        .uri("/swipe")
        .set_json(json!({ "target_id": 1, "liked": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
