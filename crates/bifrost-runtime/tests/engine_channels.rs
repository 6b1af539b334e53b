//! Integration tests for engine start-up and the notification and common
//! channels.

use bifrost_event::{MethodCall, Reply};
use bifrost_runtime::channel::MethodCallHandler;
use bifrost_runtime::page::PageOptions;
use bifrost_runtime::testing::{FakeEngine, FakeRuntime, Journal, RecordingHost};
use bifrost_runtime::{Bifrost, ChannelError, EngineError};
use bifrost_types::ErrorCode;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

fn recorder() -> (Arc<Mutex<Vec<Value>>>, impl Fn(&Value) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |args: &Value| sink.lock().push(args.clone()))
}

#[test]
fn start_is_once_only() {
    let bifrost = Bifrost::default();
    let runtime = Arc::new(FakeRuntime::new());

    assert_eq!(bifrost.start(runtime.clone(), None), Ok(true));
    assert_eq!(bifrost.start(runtime.clone(), None), Ok(false));
    assert_eq!(runtime.runs(), ["main"]);
}

#[test]
fn failed_start_leaves_no_engine() {
    let bifrost = Bifrost::default();
    let err = bifrost
        .start(Arc::new(FakeRuntime::failing("entrypoint missing")), None)
        .unwrap_err();

    assert!(matches!(err, EngineError::StartFailed { .. }));
    assert!(err.to_string().contains("entrypoint missing"));

    let journal = Journal::new();
    let err = bifrost
        .create_page(PageOptions::new("/a"), RecordingHost::new("a", &journal))
        .unwrap_err();
    assert_eq!(err, EngineError::NotRunning);
}

#[tokio::test]
async fn notifications_reach_registered_handlers() {
    let runtime = FakeRuntime::new();
    let fake = FakeEngine::new(&runtime.messenger(), &Journal::new());
    let bifrost = Bifrost::default();

    // Registration works before the engine runs.
    let (seen, handler) = recorder();
    bifrost.register_notification("cart.updated", handler);
    bifrost.start(Arc::new(runtime), None).unwrap();

    let hit = fake.notify("cart.updated", json!({"items": 3})).wait(None).await;
    assert_eq!(hit, Ok(json!(true)));
    assert_eq!(*seen.lock(), [json!({"items": 3})]);

    let miss = fake.notify("cart.cleared", Value::Null).wait(None).await;
    assert_eq!(miss, Ok(json!(false)));

    assert!(bifrost.unregister_notification("cart.updated"));
    let after = fake.notify("cart.updated", json!({"items": 4})).wait(None).await;
    assert_eq!(after, Ok(json!(false)));
    assert_eq!(seen.lock().len(), 1);
}

#[tokio::test]
async fn common_channel_is_passed_through() {
    let runtime = FakeRuntime::new();
    let fake = FakeEngine::new(&runtime.messenger(), &Journal::new());
    let handler: Arc<dyn MethodCallHandler> = Arc::new(|call: MethodCall, reply: Reply| {
        if call.method == "echo" {
            reply.success(call.arguments);
        } else {
            reply.not_implemented();
        }
    });

    let bifrost = Bifrost::default();
    bifrost.start(Arc::new(runtime), Some(handler)).unwrap();

    let echoed = fake.call_common("echo", json!([1, "two"])).wait(None).await;
    assert_eq!(echoed, Ok(json!([1, "two"])));

    let unknown = fake.call_common("other", Value::Null).wait(None).await;
    assert!(matches!(unknown, Err(ChannelError::NotImplemented { .. })));
}

#[tokio::test]
async fn common_channel_without_handler_drops_calls() {
    let runtime = FakeRuntime::new();
    let fake = FakeEngine::new(&runtime.messenger(), &Journal::new());
    let bifrost = Bifrost::default();
    bifrost.start(Arc::new(runtime), None).unwrap();

    let err = fake
        .call_common("echo", Value::Null)
        .wait(None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CHANNEL_BUFFER_FULL");
}

#[tokio::test]
async fn detached_plugin_stops_serving_pop_requests() {
    let runtime = FakeRuntime::new();
    let journal = Journal::new();
    let fake = FakeEngine::attach(&runtime.messenger(), &journal);
    let bifrost = Bifrost::default();
    bifrost.start(Arc::new(runtime), None).unwrap();

    let host = RecordingHost::new("a", &journal);
    let page = bifrost
        .create_page(PageOptions::new("/a"), host.clone())
        .unwrap();
    page.on_appear();

    let engine = bifrost.engine().unwrap();
    assert!(engine.on_plugin_detached());

    let result = fake.pop_view_controller().wait(None).await;
    assert!(result.is_err());
    assert!(!host.events().iter().any(|e| e.contains(":pop:")));

    assert!(engine.on_plugin_attached());
    assert_eq!(fake.pop_view_controller().wait(None).await, Ok(Value::Null));
    assert_eq!(host.events().last().map(String::as_str), Some("host:a:pop:1"));
}
