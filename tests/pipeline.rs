// tests/pipeline.rs
//
// Background pipeline scenarios against recording stubs (no network).

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{harness, harness_with, RecordingNotifier, StubGenerator, StubNews};
use viber_news_bot::command::Category;
use viber_news_bot::dispatch::{help_text, no_news_text, Dispatch, SEARCHING_TEXT};
use viber_news_bot::summarize::UNAVAILABLE_TEXT;

async fn run_to_end(dispatch: Dispatch) {
    match dispatch {
        Dispatch::Scheduled(handle) => handle.await.expect("pipeline task panicked"),
        Dispatch::Menu => panic!("expected a scheduled pipeline"),
    }
}

#[tokio::test]
async fn zero_articles_sends_no_news_and_skips_summarizer() {
    let h = harness(StubNews::with_articles(0), StubGenerator::replying("unused"));

    run_to_end(h.dispatcher.dispatch("u1", Some(Category::Science)).await).await;

    assert_eq!(
        h.notifier.texts(),
        vec![SEARCHING_TEXT.to_string(), no_news_text(Category::Science)]
    );
    assert_eq!(h.generator.call_count(), 0);
    assert_eq!(*h.news.calls.lock(), vec![Category::Science]);
}

#[tokio::test]
async fn failed_fetch_reads_the_same_as_empty() {
    let h = harness(StubNews::failing(), StubGenerator::replying("unused"));

    run_to_end(h.dispatcher.dispatch("u1", Some(Category::Health)).await).await;

    let texts = h.notifier.texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[1], no_news_text(Category::Health));
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn summarizer_sees_one_line_per_article() {
    let h = harness(StubNews::with_articles(3), StubGenerator::replying("Summary X"));

    run_to_end(h.dispatcher.dispatch("u1", Some(Category::General)).await).await;

    let prompts = h.generator.prompts.lock().clone();
    assert_eq!(prompts.len(), 1, "summarizer must be called exactly once");
    let lines: Vec<&str> = prompts[0]
        .lines()
        .filter(|l| l.starts_with("Title: "))
        .collect();
    assert_eq!(
        lines,
        vec![
            "Title: Headline 1. Source: Source 1.",
            "Title: Headline 2. Source: Source 2.",
            "Title: Headline 3. Source: Source 3.",
        ]
    );
    assert_eq!(h.notifier.texts().last().map(String::as_str), Some("Summary X"));
}

#[tokio::test]
async fn summarizer_failure_still_sends_one_final_message() {
    let h = harness(StubNews::with_articles(2), StubGenerator::failing("timeout"));

    run_to_end(h.dispatcher.dispatch("u1", Some(Category::Sports)).await).await;

    assert_eq!(
        h.notifier.texts(),
        vec![SEARCHING_TEXT.to_string(), UNAVAILABLE_TEXT.to_string()]
    );
}

#[tokio::test]
async fn tech_scenario_sends_searching_then_summary_to_sender() {
    let h = harness(StubNews::with_articles(2), StubGenerator::replying("Summary X"));

    run_to_end(h.dispatcher.dispatch("u1", Some(Category::Technology)).await).await;

    let sent = h.notifier.messages();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m.receiver == "u1"));
    assert!(sent.iter().all(|m| m.keyboard.is_none()));
    assert_eq!(sent[0].text, SEARCHING_TEXT);
    assert_eq!(sent[1].text, "Summary X");
    assert_eq!(*h.news.calls.lock(), vec![Category::Technology]);
}

#[tokio::test]
async fn unrecognized_sends_menu_inline_without_upstream_calls() {
    let h = harness(StubNews::with_articles(2), StubGenerator::replying("unused"));

    let d = h.dispatcher.dispatch("u1", None).await;
    assert!(matches!(d, Dispatch::Menu));

    // Inline path: the message is already recorded when dispatch returns.
    let sent = h.notifier.messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].receiver, "u1");
    assert_eq!(sent[0].text, help_text());
    let kb = sent[0].keyboard.as_ref().expect("menu keyboard");
    assert_eq!(kb.buttons.len(), 6);

    assert_eq!(h.news.call_count(), 0);
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn push_failures_do_not_stop_the_pipeline() {
    let h = harness_with(
        StubNews::with_articles(1),
        StubGenerator::replying("Summary X"),
        RecordingNotifier::failing(),
        4,
    );

    run_to_end(h.dispatcher.dispatch("u1", Some(Category::General)).await).await;

    // Both pushes were attempted even though each one failed.
    assert_eq!(h.notifier.texts(), vec![SEARCHING_TEXT.to_string(), "Summary X".to_string()]);
    assert_eq!(h.generator.call_count(), 1);
}

#[tokio::test]
async fn in_flight_pipelines_are_capped() {
    let h = harness_with(
        StubNews::with_articles(1).delayed(Duration::from_millis(100)),
        StubGenerator::replying("ok"),
        RecordingNotifier::default(),
        2,
    );

    let mut handles = Vec::new();
    for i in 0..6 {
        match h.dispatcher.dispatch(&format!("u{i}"), Some(Category::General)).await {
            Dispatch::Scheduled(handle) => handles.push(handle),
            Dispatch::Menu => panic!("expected a scheduled pipeline"),
        }
    }
    for handle in handles {
        handle.await.expect("pipeline task panicked");
    }

    assert_eq!(h.news.completed.load(Ordering::SeqCst), 6);
    assert!(h.news.max_running.load(Ordering::SeqCst) <= 2);
    assert_eq!(h.notifier.messages().len(), 12);
}

#[tokio::test]
async fn concurrent_senders_each_get_their_own_pair() {
    let h = harness(
        StubNews::with_articles(1).delayed(Duration::from_millis(20)),
        StubGenerator::replying("digest"),
    );

    let a = h.dispatcher.dispatch("alice", Some(Category::Science)).await;
    let b = h.dispatcher.dispatch("bob", Some(Category::Politics)).await;
    run_to_end(a).await;
    run_to_end(b).await;

    for who in ["alice", "bob"] {
        let mine: Vec<String> = h
            .notifier
            .messages()
            .into_iter()
            .filter(|m| m.receiver == who)
            .map(|m| m.text)
            .collect();
        assert_eq!(mine, vec![SEARCHING_TEXT.to_string(), "digest".to_string()], "receiver={who}");
    }
}
