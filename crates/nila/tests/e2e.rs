// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete chat pipeline.
//!
//! Each test builds an isolated TestHarness (temp SQLite, mock responder)
//! or a dispatcher over a wiremock backend. Tests are independent and
//! order-insensitive.

use std::sync::Arc;
use std::time::Duration;

use nila_chat::{ChatEvent, Dispatcher, FallbackPolicy, SendResult};
use nila_config::NilaConfig;
use nila_core::NilaError;
use nila_core::traits::{KeyValueStore, ResponderAdapter};
use nila_core::types::{ChatRequest, Message, MessageStatus, Sender};
use nila_guard::CrisisKeywordSet;
use nila_responder::HttpResponder;
use nila_storage::{
    GUEST_USER_ID, SqliteStore, clear_history, get_or_create_user_id, load_history, save_history,
};
use nila_test_utils::{MemoryStore, MockResponder, TestHarness};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ERROR_REPLY: &str = "Nila is sleeping right now (Network Error). Please try again later.";

/// URL of a local port nothing is listening on.
fn closed_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn mock_dispatcher(replies: &[&str]) -> Dispatcher {
    let responder = MockResponder::with_replies(replies.iter().map(|r| r.to_string()).collect());
    Dispatcher::new(
        Arc::new(CrisisKeywordSet::builtin()),
        Arc::new(responder),
        FallbackPolicy::default(),
        Duration::from_secs(5),
    )
}

fn assert_interleaved(messages: &[Message]) {
    for (i, message) in messages.iter().enumerate() {
        let expected = if i % 2 == 0 { Sender::User } else { Sender::Assistant };
        assert_eq!(message.sender(), expected, "message {i}");
    }
}

fn http_dispatcher(endpoint: &str) -> Dispatcher {
    let mut config = NilaConfig::default();
    config.responder.endpoint = endpoint.to_string();
    config.responder.timeout_secs = 5;
    let responder = HttpResponder::new(&config.responder).unwrap();
    Dispatcher::from_config(&config, Arc::new(responder))
}

// ---- Remote responder over HTTP ----

#[tokio::test]
async fn test_http_reply_is_appended() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(serde_json::json!({"message": "hello", "user_id": "u-1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "hi there"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = http_dispatcher(&server.uri());
    let result = dispatcher.send("hello", "u-1").await;

    assert_eq!(
        result,
        SendResult::Replied {
            status: MessageStatus::Ok
        }
    );
    let messages = dispatcher.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text(), "hello");
    assert_eq!(messages[1].text(), "hi there");
    assert_eq!(messages[1].status(), MessageStatus::Ok);
}

#[tokio::test]
async fn test_connection_refused_gives_error_message() {
    let dispatcher = http_dispatcher(&closed_local_url());
    let mut events = dispatcher.events();
    dispatcher.send("hello", "u-1").await;

    let messages = dispatcher.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender(), Sender::User);
    assert_eq!(messages[1].text(), ERROR_REPLY);
    assert_eq!(messages[1].status(), MessageStatus::Error);
    assert_eq!(events.try_recv().unwrap(), ChatEvent::Sent);
    assert_eq!(events.try_recv().unwrap(), ChatEvent::Failed);
}

#[tokio::test]
async fn test_connection_refused_is_a_request_failure() {
    let mut config = NilaConfig::default();
    config.responder.endpoint = closed_local_url();
    let responder = HttpResponder::new(&config.responder).unwrap();

    let err = responder
        .respond(ChatRequest {
            message: "hello".into(),
            user_id: "u-1".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, NilaError::Responder { .. }));
    assert!(err.to_string().contains("HTTP request failed"), "got: {err}");
}

#[tokio::test]
async fn test_server_error_gives_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dispatcher = http_dispatcher(&server.uri());
    dispatcher.send("hello", "u-1").await;

    assert!(dispatcher.messages()[1].is_error());
}

#[tokio::test]
async fn test_malformed_payload_gives_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"answer": 1})))
        .mount(&server)
        .await;

    let dispatcher = http_dispatcher(&server.uri());
    dispatcher.send("hello", "u-1").await;

    assert_eq!(dispatcher.messages()[1].text(), ERROR_REPLY);
}

#[tokio::test]
async fn test_sleeping_backend_gives_canned_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"response": "Nila is sleeping"})),
        )
        .mount(&server)
        .await;

    let dispatcher = http_dispatcher(&server.uri());
    dispatcher.send("hello", "u-1").await;

    let reply = &dispatcher.messages()[1];
    assert_eq!(reply.status(), MessageStatus::Ok);
    assert!(
        NilaConfig::default()
            .fallback
            .canned_replies
            .iter()
            .any(|c| c == reply.text())
    );
}

#[tokio::test]
async fn test_guard_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dispatcher = http_dispatcher(&server.uri());
    let result = dispatcher.send("I want to kill myself", "u-1").await;

    assert_eq!(result, SendResult::GuardTriggered);
    assert!(dispatcher.messages().is_empty());
}

// ---- Harness: dispatcher + storage ----

#[tokio::test]
async fn test_harness_persists_conversation() {
    let harness = TestHarness::builder()
        .with_mock_replies(vec!["First reply".into(), "Second reply".into()])
        .build()
        .await
        .unwrap();

    harness.send_message("Message 1").await.unwrap();
    harness.send_message("Message 2").await.unwrap();

    let stored = harness.stored_history().await.unwrap();
    let texts: Vec<&str> = stored.iter().map(|m| m.text()).collect();
    assert_eq!(texts, ["Message 1", "First reply", "Message 2", "Second reply"]);
    assert_eq!(stored, harness.dispatcher.messages());
}

#[tokio::test]
async fn test_harness_user_id_is_sent_to_responder() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.send_message("hello").await.unwrap();

    let requests = harness.mock_responder.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_id, harness.user_id);
    assert_ne!(harness.user_id, GUEST_USER_ID);
}

#[tokio::test]
async fn test_harness_guard_leaves_storage_unchanged() {
    let harness = TestHarness::builder()
        .with_extra_keywords(vec!["no way out".into()])
        .build()
        .await
        .unwrap();

    let result = harness.send_message("there is No Way Out").await.unwrap();

    assert_eq!(result, SendResult::GuardTriggered);
    assert!(harness.stored_history().await.unwrap().is_empty());
    assert_eq!(harness.mock_responder.call_count().await, 0);
}

#[tokio::test]
async fn test_harness_failure_then_recovery() {
    let harness = TestHarness::builder()
        .with_canned_index(1)
        .build()
        .await
        .unwrap();
    harness.add_responder_failure("connection reset").await;
    harness.add_responder_reply("").await;
    harness.add_responder_reply("glad you're back").await;

    harness.send_message("one").await.unwrap();
    harness.send_message("two").await.unwrap();
    harness.send_message("three").await.unwrap();

    let messages = harness.dispatcher.messages();
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[1].status(), MessageStatus::Error);
    assert_eq!(messages[3].text(), harness.config.fallback.canned_replies[1]);
    assert_eq!(messages[5].text(), "glad you're back");
}

#[tokio::test(start_paused = true)]
async fn test_harness_slow_responder_times_out() {
    let harness = TestHarness::builder()
        .with_responder_delay(Duration::from_secs(90))
        .with_reply_timeout(Duration::from_secs(30))
        .build()
        .await
        .unwrap();

    let result = harness.send_message("hello").await.unwrap();

    assert_eq!(
        result,
        SendResult::Replied {
            status: MessageStatus::Error
        }
    );
}

#[tokio::test]
async fn test_harness_does_not_save_guarded_or_skipped_sends() {
    let harness = TestHarness::builder()
        .with_mock_replies(vec!["hi".into()])
        .build()
        .await
        .unwrap();
    harness.send_message("hello").await.unwrap();
    assert_eq!(harness.stored_history().await.unwrap().len(), 2);

    clear_history(harness.store.as_ref(), &harness.config.storage.history_key)
        .await
        .unwrap();
    assert_eq!(
        harness.send_message("better off dead").await.unwrap(),
        SendResult::GuardTriggered
    );
    assert_eq!(harness.send_message("   ").await.unwrap(), SendResult::Skipped);

    assert!(harness.stored_history().await.unwrap().is_empty());
    assert_eq!(harness.dispatcher.messages().len(), 2);
}

// ---- Restart: save, reload, continue ----

#[tokio::test]
async fn test_conversation_continues_after_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let db_path = dir.path().join("nila.db");
    let key = NilaConfig::default().storage.history_key;

    {
        let store = SqliteStore::open(&db_path).await.unwrap();
        let dispatcher = mock_dispatcher(&["noted"]);
        dispatcher.send("remember me", "u-1").await;
        save_history(&store, &key, &dispatcher.messages()).await.unwrap();
    }

    let store = SqliteStore::open(&db_path).await.unwrap();
    let history = load_history(&store, &key).await.unwrap();
    let dispatcher = mock_dispatcher(&["welcome back"]).with_history(history);
    dispatcher.send("I'm back", "u-1").await;
    save_history(&store, &key, &dispatcher.messages()).await.unwrap();

    let messages = load_history(&store, &key).await.unwrap();
    assert_eq!(messages, dispatcher.messages());
    assert_eq!(messages.len(), 4);
    assert_interleaved(&messages);
    let texts: Vec<&str> = messages.iter().map(|m| m.text()).collect();
    assert_eq!(texts, ["remember me", "noted", "I'm back", "welcome back"]);
}

#[tokio::test]
async fn test_memory_store_round_trip_without_sqlite() {
    let store = MemoryStore::new();
    let key = NilaConfig::default().storage.history_key;
    let user_key = NilaConfig::default().storage.user_id_key;

    let user_id = get_or_create_user_id(&store, &user_key).await;
    assert_eq!(get_or_create_user_id(&store, &user_key).await, user_id);

    let first = mock_dispatcher(&["hi there"]);
    first.send("hello", &user_id).await;
    save_history(&store, &key, &first.messages()).await.unwrap();

    let second = mock_dispatcher(&["still here"])
        .with_history(load_history(&store, &key).await.unwrap());
    second.send("are you there?", &user_id).await;
    save_history(&store, &key, &second.messages()).await.unwrap();

    let stored = load_history(&store, &key).await.unwrap();
    assert_eq!(stored.len(), 4);
    assert_interleaved(&stored);
    assert_eq!(stored[3].text(), "still here");
    assert_eq!(store.entries().await.len(), 2);
}

#[tokio::test]
async fn test_memory_store_corrupt_history_loads_empty() {
    let store = MemoryStore::new();
    let key = NilaConfig::default().storage.history_key;
    store.set(&key, "[{\"broken\"").await.unwrap();

    let dispatcher =
        mock_dispatcher(&["fresh start"]).with_history(load_history(&store, &key).await.unwrap());
    dispatcher.send("hello", "u-1").await;

    assert_eq!(dispatcher.messages().len(), 2);
}
