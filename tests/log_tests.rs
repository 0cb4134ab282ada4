//! Log access tests: tail callbacks, downloads, and the watch registry

mod helpers;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use helpers::TestHarness;
use nslogger::handlers::callbacks::handle_callback;

const CHAT: i64 = 20;
const OP: &str = "opA";
const OP_ID: i64 = 1;

async fn harness_with_bot() -> TestHarness {
    let h = TestHarness::new().await;
    h.grant_operator(OP, OP_ID).await;
    h.ctx.db.bots.add_bot("alpha", "alpha.log", OP).await.unwrap();
    h
}

fn write_log(h: &TestHarness, name: &str, lines: &[&str]) {
    let path = h.dir.path().join(name);
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

#[tokio::test]
async fn tail_callback_sends_last_lines() {
    let h = harness_with_bot().await;
    write_log(&h, "alpha.log", &["one", "two", "three"]);

    let query = h.callback(CHAT, OP, OP_ID, "log:alpha:2");
    handle_callback(&h.ctx, &query).await.unwrap();

    let message = h.gateway.last_message();
    assert!(message.text.contains("two\nthree"));
    assert!(!message.text.contains("one\ntwo\nthree"));
    let answers = h.gateway.answers.lock().unwrap();
    assert!(answers.last().unwrap().1.as_deref().unwrap().contains("Logs delivered"));
}

#[tokio::test]
async fn tail_callback_reports_missing_file() {
    let h = harness_with_bot().await;

    let query = h.callback(CHAT, OP, OP_ID, "log:alpha:20");
    handle_callback(&h.ctx, &query).await.unwrap();

    assert!(h.gateway.last_message().text.contains("File missing or empty"));
}

#[tokio::test]
async fn download_callback_sends_the_file() {
    let h = harness_with_bot().await;
    write_log(&h, "alpha.log", &["payload"]);

    let query = h.callback(CHAT, OP, OP_ID, "download:alpha");
    handle_callback(&h.ctx, &query).await.unwrap();

    let documents = h.gateway.documents.lock().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].0, CHAT);
    assert!(documents[0].1.ends_with("alpha.log"));
    assert!(documents[0].2.contains("alpha"));
}

#[tokio::test]
async fn watch_forwards_new_content_until_stopped() {
    let h = harness_with_bot().await;
    write_log(&h, "alpha.log", &["old line"]);

    let query = h.callback(CHAT, OP, OP_ID, "watch:alpha");
    handle_callback(&h.ctx, &query).await.unwrap();
    assert_eq!(h.ctx.watches.watching(CHAT).await.as_deref(), Some("alpha"));

    write_log(&h, "alpha.log", &["fresh line"]);
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let texts = h.gateway.texts();
    let forwarded = texts.iter().find(|text| text.contains("New log entries"));
    let forwarded = forwarded.expect("watch should forward appended content");
    assert!(forwarded.contains("fresh line"));
    assert!(!forwarded.contains("old line"));

    assert_eq!(h.ctx.watches.unsubscribe(CHAT).await.as_deref(), Some("alpha"));
    assert_eq!(h.ctx.watches.unsubscribe(CHAT).await, None);

    // No forwarding after cancellation.
    let sent_before = h.gateway.texts().len();
    write_log(&h, "alpha.log", &["after stop"]);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(h.gateway.texts().len(), sent_before);
}

#[tokio::test]
async fn resubscribing_replaces_the_previous_watch() {
    let h = harness_with_bot().await;
    h.ctx.db.bots.add_bot("beta", "beta.log", OP).await.unwrap();
    write_log(&h, "alpha.log", &["a"]);
    write_log(&h, "beta.log", &["b"]);

    let gateway: Arc<dyn nslogger::services::MessagingGateway> = h.gateway.clone();
    h.ctx
        .watches
        .subscribe(CHAT, "alpha", h.dir.path().join("alpha.log"), gateway.clone())
        .await
        .unwrap();
    h.ctx
        .watches
        .subscribe(CHAT, "beta", h.dir.path().join("beta.log"), gateway)
        .await
        .unwrap();

    assert_eq!(h.ctx.watches.watching(CHAT).await.as_deref(), Some("beta"));

    // Only the beta watch is live: appending to alpha stays silent.
    write_log(&h, "alpha.log", &["alpha update"]);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(h.gateway.texts().iter().all(|text| !text.contains("alpha update")));

    h.ctx.watches.unsubscribe(CHAT).await;
}

#[tokio::test]
async fn unwatch_callback_stops_the_watch() {
    let h = harness_with_bot().await;
    write_log(&h, "alpha.log", &["line"]);

    let query = h.callback(CHAT, OP, OP_ID, "watch:alpha");
    handle_callback(&h.ctx, &query).await.unwrap();

    let query = h.callback(CHAT, OP, OP_ID, "unwatch:alpha");
    handle_callback(&h.ctx, &query).await.unwrap();

    assert_eq!(h.ctx.watches.watching(CHAT).await, None);
    assert!(h.gateway.last_message().text.contains("stopped"));
}
