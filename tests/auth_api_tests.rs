//! `/auth` integration tests

mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};

use rendezvous::api::services::ApiResponse;
use rendezvous::runtime::modes::configure_app;
use rendezvous::storage::Needs;

use common::{PASSWORD, basic, setup};

#[actix_rt::test]
async fn test_sign_in_with_body_credential() {
    let env = setup().await;
    let user = env.create_user("ada@example.com", Needs::Host).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &env.ctx))).await;

    let req = TestRequest::post()
        .uri("/auth/token")
        .set_json(json!({ "Authorization": basic("ada@example.com", PASSWORD) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 0);
    let data = body.data.unwrap();
    assert_eq!(data["grant_type"], "password");
    assert_eq!(data["scope"], "*");
    assert_eq!(data["expires_in"], "1h");

    let token = data["access_token"].as_str().unwrap();
    let claims = env.ctx.jwt.validate_access_token(token).unwrap();
    assert_eq!(claims.id, user.id);
    assert_eq!(claims.sub, "ada@example.com");
}

#[actix_rt::test]
async fn test_sign_in_with_authorization_header() {
    let env = setup().await;
    env.create_user("bob@example.com", Needs::Tenant).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &env.ctx))).await;

    let req = TestRequest::post()
        .uri("/auth/token")
        .insert_header((AUTHORIZATION, basic("bob@example.com", PASSWORD)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_sign_in_failures() {
    let env = setup().await;
    env.create_user("carl@example.com", Needs::Duo).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &env.ctx))).await;

    // 密码错误和邮箱不存在返回同一个错误
    for credential in [
        basic("carl@example.com", "wrong"),
        basic("nobody@example.com", PASSWORD),
    ] {
        let req = TestRequest::post()
            .uri("/auth/token")
            .set_json(json!({ "Authorization": credential }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: ApiResponse<Value> = test::read_body_json(resp).await;
        assert_eq!(body.code, 2000);
        assert_eq!(
            body.message,
            "Connexion impossible, utilisateur ou mot de passe incorrect"
        );
    }

    // 没有凭据
    let req = TestRequest::post().uri("/auth/token").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 2003);

    // 不是 Basic
    let req = TestRequest::post()
        .uri("/auth/token")
        .set_json(json!({ "Authorization": "Bearer abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_session_returns_current_user() {
    let env = setup().await;
    let user = env.create_user("dora@example.com", Needs::Host).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &env.ctx))).await;

    let req = TestRequest::get()
        .uri("/auth/session")
        .insert_header((AUTHORIZATION, env.bearer_for(&user)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    let returned = &body.data.unwrap()["user"];
    assert_eq!(returned["id"], user.id);
    assert_eq!(returned["email"], "dora@example.com");
    assert_eq!(returned["needs"], "H");
    assert!(returned.get("password").is_none());
}

#[actix_rt::test]
async fn test_session_requires_valid_token() {
    let env = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &env.ctx))).await;

    let resp =
        test::call_service(&app, TestRequest::get().uri("/auth/session").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get()
        .uri("/auth/session")
        .insert_header((AUTHORIZATION, "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 2002);
}
