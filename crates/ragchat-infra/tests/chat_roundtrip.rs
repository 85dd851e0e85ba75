//! End-to-end: controller over SQLite and HTTP against an in-process chat
//! service.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use ragchat_core::chat::controller::{
    ChatController, ControllerSettings, SendOutcome, FALLBACK_REPLY,
};
use ragchat_infra::http::HttpChatClient;
use ragchat_infra::sqlite::kv::SqliteKvStore;
use ragchat_infra::sqlite::pool::DatabasePool;
use ragchat_types::message::Message;

/// Server-side chat histories keyed by session id.
#[derive(Clone, Default)]
struct FakeService {
    histories: Arc<Mutex<HashMap<String, Vec<String>>>>,
    resets: Arc<Mutex<Vec<String>>>,
}

async fn chat(State(svc): State<FakeService>, Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default().to_string();
    let session = body["session_id"].as_str().unwrap_or_default().to_string();

    let mut histories = svc.histories.lock().unwrap();
    let history = histories.entry(session).or_default();
    history.push(query.clone());
    Json(json!({ "answer": format!("answer #{} to {query}", history.len()) }))
}

async fn reset(State(svc): State<FakeService>, Json(body): Json<Value>) -> Json<Value> {
    let session = body["session_id"].as_str().unwrap_or_default().to_string();
    svc.histories.lock().unwrap().remove(&session);
    svc.resets.lock().unwrap().push(session);
    Json(json!({ "message": "Session reset successfully" }))
}

async fn serve(svc: FakeService) -> String {
    let router = Router::new()
        .route("/chat", post(chat))
        .route("/reset-session", post(reset))
        .with_state(svc);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn controller(
    data_dir: &Path,
    base_url: &str,
) -> ChatController<SqliteKvStore, HttpChatClient> {
    let pool = DatabasePool::open_in(data_dir).await.unwrap();
    let store = SqliteKvStore::new(pool, "default");
    let backend = HttpChatClient::new(base_url, None).unwrap();
    ChatController::open(store, backend, ControllerSettings::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn transcript_and_session_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let svc = FakeService::default();
    let base = serve(svc.clone()).await;

    let first = controller(dir.path(), &base).await;
    let session = first.session_id().await.unwrap();
    first.send("hello").await.unwrap();
    first.send("and again").await.unwrap();
    drop(first);

    let second = controller(dir.path(), &base).await;
    assert_eq!(second.session_id().await.unwrap(), session);
    assert_eq!(
        second.transcript().await,
        vec![
            Message::user("hello"),
            Message::bot("answer #1 to hello"),
            Message::user("and again"),
            Message::bot("answer #2 to and again"),
        ]
    );

    let histories = svc.histories.lock().unwrap();
    assert_eq!(histories[session.as_str()], vec!["hello", "and again"]);
}

#[tokio::test]
async fn reset_starts_a_fresh_server_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let svc = FakeService::default();
    let base = serve(svc.clone()).await;

    let chat = controller(dir.path(), &base).await;
    chat.send("hello").await.unwrap();
    let old = chat.session_id().await.unwrap();

    let report = chat.reset().await.unwrap();
    assert!(report.acknowledged());
    assert_eq!(svc.resets.lock().unwrap().as_slice(), [old.to_string()]);

    let outcome = chat.send("hello").await.unwrap();
    let SendOutcome::Completed(exchange) = outcome else {
        panic!("expected a completed exchange");
    };
    assert_eq!(exchange.session_id, report.current);
    assert_eq!(exchange.reply, Message::bot("answer #1 to hello"));
    drop(chat);

    let reopened = controller(dir.path(), &base).await;
    assert_eq!(reopened.session_id().await.unwrap(), report.current);
    assert_eq!(reopened.transcript().await.len(), 2);
}

#[tokio::test]
async fn unreachable_service_falls_back_and_still_resets() {
    let dir = tempfile::tempdir().unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let chat = controller(dir.path(), &base).await;
    chat.send("hello").await.unwrap();
    assert_eq!(
        chat.transcript().await,
        vec![Message::user("hello"), Message::bot(FALLBACK_REPLY)]
    );

    let old = chat.session_id().await.unwrap();
    let report = chat.reset().await.unwrap();
    assert!(!report.acknowledged());
    assert_ne!(report.current, old);
    assert!(chat.transcript().await.is_empty());
}
