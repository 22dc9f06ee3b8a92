//! Every verb against the live mock server through `ReqwestTransport`.
//!
//! # Design
//! Starts the mock server on a random port, then drives `RequestExecutor`
//! over real HTTP. The server echoes what it received and replays scripted
//! statuses, so composition and retry behaviour are checked on the wire.

use std::net::SocketAddr;
use std::time::Duration;

use mock_server::{Recorded, Script};
use request_core::{
    ApiError, ClientConfig, ReqwestTransport, RequestDescriptor, RequestExecutor, RetryPolicy,
};
use serde_json::json;

async fn start_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await.unwrap() });
    addr
}

fn executor(addr: SocketAddr) -> RequestExecutor<ReqwestTransport> {
    let config = ClientConfig::new("http://127.0.0.1", addr.port(), Duration::from_secs(5));
    RequestExecutor::new(ReqwestTransport::new().unwrap(), config)
        .with_retry_policy(RetryPolicy::with_delay(Duration::from_millis(10)))
}

async fn script(exec: &RequestExecutor<ReqwestTransport>, statuses: Vec<u16>) {
    let descriptor = RequestDescriptor::new("/_mock/script")
        .with_json_body(&Script { statuses })
        .unwrap();
    exec.post(&descriptor).await.unwrap();
}

async fn recorded(exec: &RequestExecutor<ReqwestTransport>) -> Vec<Recorded> {
    exec.get(&RequestDescriptor::new("/_mock/requests"))
        .await
        .unwrap()
        .json()
        .unwrap()
}

#[tokio::test]
async fn relative_get_sends_default_and_caller_headers_and_query() {
    let addr = start_server().await;
    let exec = executor(addr);

    let descriptor = RequestDescriptor::new("/users")
        .header("X-Tag", "one")
        .header("X-Tag", "two")
        .query("sort", "name")
        .query("sort", "age");
    let response = exec.get(&descriptor).await.unwrap();
    assert_eq!(response.status, 200);

    let echoed: Recorded = response.json().unwrap();
    assert_eq!(echoed.method, "GET");
    assert_eq!(echoed.path, "/users");
    assert_eq!(echoed.header_values("content-type"), vec!["application/json"]);
    assert_eq!(echoed.header_values("x-tag"), vec!["one", "two"]);
    assert_eq!(
        echoed.query,
        vec![("sort".to_string(), "name".to_string()), ("sort".to_string(), "age".to_string())]
    );
}

#[tokio::test]
async fn post_sends_json_text_and_put_patch_send_json() {
    let addr = start_server().await;
    let exec = executor(addr);
    let body = json!({"title": "Buy milk", "completed": false});

    let echoed: Recorded = exec
        .post(&RequestDescriptor::new("/todos").with_body(body.clone()))
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(echoed.method, "POST");
    assert_eq!(echoed.body, serde_json::to_string(&body).unwrap());

    for (method, response) in [
        ("PUT", exec.put(&RequestDescriptor::new("/todos/1").with_body(body.clone())).await),
        ("PATCH", exec.patch(&RequestDescriptor::new("/todos/1").with_body(body.clone())).await),
    ] {
        let echoed: Recorded = response.unwrap().json().unwrap();
        assert_eq!(echoed.method, method);
        let sent: serde_json::Value = serde_json::from_str(&echoed.body).unwrap();
        assert_eq!(sent, body);
        assert_eq!(echoed.header_values("content-type"), vec!["application/json"]);
    }
}

#[tokio::test]
async fn delete_sends_no_body() {
    let addr = start_server().await;
    let exec = executor(addr);

    let echoed: Recorded = exec
        .delete(&RequestDescriptor::new("/todos/1").with_body(json!({"ignored": true})))
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(echoed.method, "DELETE");
    assert!(echoed.body.is_empty());
}

#[tokio::test]
async fn absolute_path_skips_default_headers() {
    let addr = start_server().await;
    let exec = executor(addr);

    let descriptor = RequestDescriptor::absolute(format!("http://{addr}/elsewhere?x=1"))
        .header("X-Tag", "dropped")
        .query("y", "dropped");
    let echoed: Recorded = exec.get(&descriptor).await.unwrap().json().unwrap();

    assert_eq!(echoed.path, "/elsewhere");
    assert_eq!(echoed.query, vec![("x".to_string(), "1".to_string())]);
    assert!(echoed.header_values("content-type").is_empty());
    assert!(echoed.header_values("x-tag").is_empty());
}

#[tokio::test]
async fn redirect_statuses_are_retried_until_success() {
    let addr = start_server().await;
    let exec = executor(addr);
    script(&exec, vec![304, 302]).await;

    let response = exec.get(&RequestDescriptor::new("/flaky")).await.unwrap();
    assert_eq!(response.status, 200);

    let seen = recorded(&exec).await;
    let flaky: Vec<_> = seen.iter().filter(|r| r.path == "/flaky").collect();
    assert_eq!(flaky.len(), 3);
}

#[tokio::test]
async fn error_statuses_are_not_retried() {
    let addr = start_server().await;
    let exec = executor(addr);
    script(&exec, vec![404, 200]).await;

    let err = exec.get(&RequestDescriptor::new("/missing")).await.unwrap_err();
    match err {
        ApiError::Transport(failure) => {
            assert_eq!(failure.status, 404);
            let echoed: Recorded = serde_json::from_str(&failure.body).unwrap();
            assert_eq!(echoed.path, "/missing");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }

    script(&exec, vec![503]).await;
    let err = exec.post(&RequestDescriptor::new("/busy")).await.unwrap_err();
    assert_eq!(err.status(), Some(503));

    let seen = recorded(&exec).await;
    assert_eq!(seen.iter().filter(|r| r.path == "/missing").count(), 1);
    assert_eq!(seen.iter().filter(|r| r.path == "/busy").count(), 1);
}

#[tokio::test]
async fn persistent_redirects_time_out() {
    let addr = start_server().await;
    let config = ClientConfig::new("http://127.0.0.1", addr.port(), Duration::from_millis(300));
    let exec = RequestExecutor::new(ReqwestTransport::new().unwrap(), config)
        .with_retry_policy(RetryPolicy::with_delay(Duration::from_millis(50)));
    script(&exec, vec![304; 1000]).await;

    let err = exec.get(&RequestDescriptor::new("/loop")).await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout { .. }));
}

#[tokio::test]
async fn unreachable_backend_fails_with_status_zero() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig::new("http://127.0.0.1", port, Duration::from_secs(5));
    let exec = RequestExecutor::new(ReqwestTransport::new().unwrap(), config);

    let err = exec.get(&RequestDescriptor::new("/anything")).await.unwrap_err();
    assert_eq!(err.status(), Some(0));
}
