//! WebSocket gateway tests against a real server on an ephemeral port

mod common;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, HttpServer, dev::ServerHandle};
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};

use rendezvous::gateway::GatewaySettings;
use rendezvous::runtime::lifetime::startup::StartupContext;
use rendezvous::runtime::modes::configure_app;
use rendezvous::storage::{Needs, User};

use common::{TestEnv, setup};

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

fn start_server(env: &TestEnv) -> (String, ServerHandle) {
    start_server_with(env.ctx.clone())
}

fn start_server_with(ctx: StartupContext) -> (String, ServerHandle) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    let server = HttpServer::new(move || App::new().configure(|cfg| configure_app(cfg, &ctx)))
        .workers(1)
        .listen(listener)
        .expect("bind test server")
        .disable_signals()
        .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{}", addr), handle)
}

async fn connect(base: &str, env: &TestEnv, user: &User) -> Socket {
    let url = format!(
        "{}/ws?me={}&token=Bearer%20{}",
        base,
        user.id,
        env.token_for(user)
    );
    let (_resp, socket) = awc::Client::default()
        .ws(url)
        .connect()
        .await
        .expect("websocket connect");

    wait_until(|| env.ctx.registry.is_connected(user.id)).await;
    socket
}

async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..100 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(3), socket.next())
            .await
            .expect("frame in time")
            .expect("response frame")
            .expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json"),
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {:?}", other),
        }
    }
}

/// 在 `window` 内没有收到任何文本帧
async fn assert_no_text(socket: &mut Socket, window: Duration) {
    let deadline = tokio::time::Instant::now() + window;
    loop {
        match tokio::time::timeout_at(deadline, socket.next()).await {
            Err(_) => return,
            Ok(Some(Ok(Frame::Ping(_) | Frame::Pong(_)))) => continue,
            Ok(other) => panic!("expected no frame, got {:?}", other),
        }
    }
}

async fn send_json(socket: &mut Socket, value: Value) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("send text");
}

#[actix_rt::test]
async fn test_message_is_relayed_and_acked() {
    let env = setup().await;
    let ada = env.create_user("ada@example.com", Needs::Host).await;
    let bob = env.create_user("bob@example.com", Needs::Tenant).await;
    let (base, _server) = start_server(&env);

    let mut ada_socket = connect(&base, &env, &ada).await;
    let mut bob_socket = connect(&base, &env, &bob).await;

    send_json(
        &mut ada_socket,
        json!({"event": "message", "data": {"user_id": bob.id, "message": "salut"}}),
    )
    .await;

    assert_eq!(
        next_json(&mut bob_socket).await,
        json!({"event": "message", "data": {"from": ada.id, "message": "salut"}})
    );
    assert_eq!(
        next_json(&mut ada_socket).await,
        json!({"event": "ack", "data": "ok"})
    );
}

#[actix_rt::test]
async fn test_offline_and_malformed_frames_are_ignored() {
    let env = setup().await;
    let ada = env.create_user("ada@example.com", Needs::Host).await;
    let bob = env.create_user("bob@example.com", Needs::Tenant).await;
    let (base, _server) = start_server(&env);

    let mut ada_socket = connect(&base, &env, &ada).await;

    // 收件人不在线：没有 ack
    send_json(
        &mut ada_socket,
        json!({"event": "message", "data": {"user_id": 4242, "message": "anyone?"}}),
    )
    .await;
    ada_socket
        .send(Message::Text("not-json".into()))
        .await
        .expect("send text");

    let mut bob_socket = connect(&base, &env, &bob).await;
    send_json(
        &mut ada_socket,
        json!({"event": "message", "data": {"user_id": bob.id, "message": "hello"}}),
    )
    .await;

    // 第一帧就是这次投递的 ack，说明前面两帧都没有回复
    assert_eq!(
        next_json(&mut ada_socket).await,
        json!({"event": "ack", "data": "ok"})
    );
    assert_eq!(next_json(&mut bob_socket).await["data"]["message"], "hello");
}

#[actix_rt::test]
async fn test_disconnect_unregisters_user() {
    let env = setup().await;
    let ada = env.create_user("ada@example.com", Needs::Host).await;
    let (base, _server) = start_server(&env);

    let mut socket = connect(&base, &env, &ada).await;
    assert_eq!(env.ctx.registry.len(), 1);

    socket
        .send(Message::Close(None))
        .await
        .expect("send close");
    drop(socket);

    wait_until(|| !env.ctx.registry.is_connected(ada.id)).await;
    assert!(env.ctx.registry.is_empty());
}

#[actix_rt::test]
async fn test_upgrade_refused_without_valid_token() {
    let env = setup().await;
    let ada = env.create_user("ada@example.com", Needs::Host).await;
    let bob = env.create_user("bob@example.com", Needs::Tenant).await;
    let (base, _server) = start_server(&env);

    let urls = [
        format!("{}/ws?me={}", base, ada.id),
        format!("{}/ws?me={}&token=Bearer%20garbage", base, ada.id),
        // token 属于 ada，me 却是 bob
        format!(
            "{}/ws?me={}&token=Bearer%20{}",
            base,
            bob.id,
            env.token_for(&ada)
        ),
    ];

    for url in urls {
        let result = awc::Client::default().ws(url).connect().await;
        match result {
            Err(awc::error::WsClientError::InvalidResponseStatus(status)) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("upgrade should be refused"),
        }
    }
    assert!(env.ctx.registry.is_empty());
}

#[actix_rt::test]
async fn test_silent_client_is_dropped_after_timeout() {
    let env = setup().await;
    let ada = env.create_user("ada@example.com", Needs::Host).await;

    let mut ctx = env.ctx.clone();
    ctx.gateway = GatewaySettings {
        heartbeat: Duration::from_millis(100),
        client_timeout: Duration::from_millis(300),
    };
    let (base, _server) = start_server_with(ctx);

    // 客户端从不回 pong
    let mut socket = connect(&base, &env, &ada).await;
    wait_until(|| !env.ctx.registry.is_connected(ada.id)).await;

    loop {
        let frame = tokio::time::timeout(Duration::from_secs(3), socket.next())
            .await
            .expect("close frame in time")
            .expect("frame before end of stream")
            .expect("frame");
        match frame {
            Frame::Ping(_) => continue,
            Frame::Close(reason) => {
                let reason = reason.expect("close reason");
                assert_eq!(reason.description.as_deref(), Some("heartbeat timeout"));
                break;
            }
            other => panic!("expected ping or close, got {:?}", other),
        }
    }
    assert!(env.ctx.registry.is_empty());
}

#[actix_rt::test]
async fn test_second_socket_sends_but_does_not_receive() {
    let env = setup().await;
    let ada = env.create_user("ada@example.com", Needs::Host).await;
    let bob = env.create_user("bob@example.com", Needs::Tenant).await;
    let (base, _server) = start_server(&env);

    let mut first = connect(&base, &env, &ada).await;
    let mut second = connect(&base, &env, &ada).await;
    let mut bob_socket = connect(&base, &env, &bob).await;

    send_json(
        &mut bob_socket,
        json!({"event": "message", "data": {"user_id": ada.id, "message": "coucou"}}),
    )
    .await;
    assert_eq!(
        next_json(&mut first).await,
        json!({"event": "message", "data": {"from": bob.id, "message": "coucou"}})
    );
    assert_eq!(next_json(&mut bob_socket).await["event"], "ack");
    assert_no_text(&mut second, Duration::from_millis(300)).await;

    // 重复连接仍然可以发送
    send_json(
        &mut second,
        json!({"event": "message", "data": {"user_id": bob.id, "message": "from second"}}),
    )
    .await;
    assert_eq!(next_json(&mut bob_socket).await["data"]["message"], "from second");
    assert_eq!(next_json(&mut second).await["event"], "ack");

    // 重复连接断开不影响第一个连接
    second.send(Message::Close(None)).await.expect("send close");
    drop(second);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(env.ctx.registry.is_connected(ada.id));

    send_json(
        &mut bob_socket,
        json!({"event": "message", "data": {"user_id": ada.id, "message": "still here"}}),
    )
    .await;
    assert_eq!(next_json(&mut first).await["data"]["message"], "still here");
}
