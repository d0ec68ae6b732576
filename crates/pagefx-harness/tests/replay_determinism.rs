#![forbid(unsafe_code)]

//! End-to-end replay tests.
//!
//! Each test builds a fixture from JSON, replays it, and checks the step
//! records and final page state.
//!
//! Run: `cargo test -p pagefx-harness --test replay_determinism`

use pagefx_harness::{Fixture, HarnessError, ReplayReport, replay};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn faq_items(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "tag": "li",
                "children": [
                    { "tag": "div", "classes": "faq-question", "text": format!("Q{i}") },
                    { "tag": "div", "classes": "faq-answer", "children": [
                        { "tag": "p", "text": format!("A{i}"), "height": 40 }
                    ] }
                ]
            })
        })
        .collect()
}

fn page(events: Value) -> Fixture {
    let fixture = json!({
        "config": { "faq": { "sample_size": 3 } },
        "seed": 11,
        "nodes": [
            { "tag": "header", "classes": "header" },
            { "tag": "div", "classes": "row", "children": [
                { "tag": "div", "classes": "card-content", "top": 0, "height": 10 },
                { "tag": "div", "classes": "card-content", "top": 0, "height": 20 },
                { "tag": "div", "classes": "card-content", "top": 0, "height": 15 },
                { "tag": "div", "classes": "card-content", "top": 40, "height": 8 },
                { "tag": "div", "classes": "card-content", "top": 40, "height": 12 }
            ] },
            { "tag": "ul", "classes": "faq-list", "children": faq_items(4) }
        ],
        "events": events
    });
    Fixture::from_json(&fixture.to_string()).unwrap()
}

fn ev(at_ms: u64, event: Value) -> Value {
    json!({ "at_ms": at_ms, "event": event })
}

fn kinds(report: &ReplayReport, step: usize) -> Vec<String> {
    report.steps[step]
        .effects
        .iter()
        .map(|effect| effect["kind"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn px(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some((*v).to_string())).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn same_seed_replays_identically() {
    let fixture = page(json!([
        ev(0, json!({ "type": "ready" })),
        ev(5, json!({ "type": "click", "selector": ".faq-question", "index": 1 })),
    ]));
    let a = replay(&fixture, None).unwrap().to_jsonl().unwrap();
    let b = replay(&fixture, None).unwrap().to_jsonl().unwrap();
    assert_eq!(a, b);
}

#[test]
fn seed_argument_overrides_fixture_seed() {
    let fixture = page(json!([ev(0, json!({ "type": "ready" }))]));
    assert_eq!(replay(&fixture, None).unwrap().seed, 11);
    assert_eq!(replay(&fixture, Some(99)).unwrap().seed, 99);
}

#[test]
fn ready_renders_bounded_sample() {
    let fixture = page(json!([ev(0, json!({ "type": "ready" }))]));
    let report = replay(&fixture, None).unwrap();

    assert_eq!(kinds(&report, 0), vec!["header", "faq_rendered"]);
    let rendered = &report.steps[0].effects[1];
    assert_eq!(rendered["sources"], 4);
    assert_eq!(rendered["rendered"], 3);
    assert_eq!(rendered["interactive"], 3);

    let faq = report.state.faq.as_ref().unwrap();
    assert_eq!(faq.len(), 3);
    let mut questions: Vec<&str> = faq.iter().map(|item| item.question.as_str()).collect();
    questions.sort_unstable();
    questions.dedup();
    assert_eq!(questions.len(), 3);
    for item in faq {
        assert!(item.interactive);
        assert!(!item.expanded);
        assert_eq!(item.max_height.as_deref(), Some("0"));
    }
}

#[test]
fn header_follows_scroll_threshold() {
    let fixture = page(json!([
        ev(0, json!({ "type": "ready" })),
        ev(10, json!({ "type": "scroll", "offset": 40 })),
        ev(20, json!({ "type": "scroll", "offset": 41 })),
        ev(30, json!({ "type": "scroll", "offset": 0 })),
    ]));
    let report = replay(&fixture, None).unwrap();

    let header = |step: usize| report.steps[step].effects[0].clone();
    assert_eq!(header(1), json!({ "kind": "header", "active": false, "changed": false }));
    assert_eq!(header(2), json!({ "kind": "header", "active": true, "changed": true }));
    assert_eq!(header(3), json!({ "kind": "header", "active": false, "changed": true }));
    assert_eq!(report.state.header_active, Some(false));
}

#[test]
fn load_equalizes_each_visual_row() {
    let fixture = page(json!([ev(0, json!({ "type": "load" }))]));
    let report = replay(&fixture, None).unwrap();

    assert_eq!(
        report.steps[0].effects,
        vec![json!({
            "kind": "equalized",
            "containers": 1,
            "skipped": 0,
            "blocks": 5,
            "rows": 2,
        })]
    );
    assert_eq!(
        report.state.block_heights,
        vec![px(&["20px", "20px", "20px", "12px", "12px"])]
    );
    assert_eq!(report.state.equalize_passes, 1);
}

#[test]
fn resize_burst_coalesces_into_one_pass() {
    let fixture = page(json!([
        ev(0, json!({ "type": "resize" })),
        ev(100, json!({ "type": "resize" })),
        ev(200, json!({ "type": "tick" })),
        ev(250, json!({ "type": "tick" })),
        ev(400, json!({ "type": "tick" })),
    ]));
    let report = replay(&fixture, None).unwrap();

    assert_eq!(
        report.steps[0].effects,
        vec![json!({ "kind": "resize_scheduled", "deadline_ms": 150, "replaced": false })]
    );
    assert_eq!(
        report.steps[1].effects,
        vec![json!({ "kind": "resize_scheduled", "deadline_ms": 250, "replaced": true })]
    );

    let passes: Vec<u32> = report.steps.iter().map(|s| s.equalize_passes).collect();
    assert_eq!(passes, vec![0, 0, 0, 1, 0]);
    assert_eq!(report.state.equalize_passes, 1);
}

#[test]
fn resize_after_deadline_starts_new_burst() {
    let fixture = page(json!([
        ev(0, json!({ "type": "resize" })),
        ev(200, json!({ "type": "resize" })),
    ]));
    let report = replay(&fixture, None).unwrap();

    assert_eq!(kinds(&report, 1), vec!["equalized", "resize_scheduled"]);
    assert_eq!(
        report.steps[1].effects[1],
        json!({ "kind": "resize_scheduled", "deadline_ms": 350, "replaced": false })
    );
    let passes: Vec<(String, u32)> = report
        .steps
        .iter()
        .map(|s| (s.event.clone(), s.equalize_passes))
        .collect();
    assert_eq!(
        passes,
        vec![
            ("resize".to_string(), 0),
            ("resize".to_string(), 1),
            ("flush".to_string(), 1),
        ]
    );
    assert_eq!(report.state.equalize_passes, 2);
}

#[test]
fn pending_pass_is_flushed_after_script() {
    let fixture = page(json!([ev(30, json!({ "type": "resize" }))]));
    let report = replay(&fixture, None).unwrap();

    assert_eq!(report.steps.len(), 2);
    let flush = &report.steps[1];
    assert_eq!(flush.event, "flush");
    assert_eq!(flush.at_ms, 180);
    assert_eq!(flush.equalize_passes, 1);
    assert_eq!(kinds(&report, 1), vec!["equalized"]);
}

#[test]
fn click_expands_then_collapses() {
    let fixture = page(json!([
        ev(0, json!({ "type": "ready" })),
        ev(10, json!({ "type": "click", "selector": ".faq-question", "index": 2 })),
    ]));
    let report = replay(&fixture, None).unwrap();
    assert_eq!(
        report.steps[1].effects,
        vec![json!({ "kind": "faq_expanded", "index": 2, "max_height": 40.0 })]
    );
    let faq = report.state.faq.as_ref().unwrap();
    assert!(faq[2].expanded);
    assert_eq!(faq[2].max_height.as_deref(), Some("40px"));
    assert!(!faq[0].expanded);

    let fixture = page(json!([
        ev(0, json!({ "type": "ready" })),
        ev(10, json!({ "type": "click", "selector": ".faq-question", "index": 2 })),
        ev(20, json!({ "type": "click", "selector": ".faq-question", "index": 2 })),
    ]));
    let report = replay(&fixture, None).unwrap();
    assert_eq!(
        report.steps[2].effects,
        vec![json!({ "kind": "faq_collapsed", "index": 2 })]
    );
    let faq = report.state.faq.as_ref().unwrap();
    assert!(!faq[2].expanded);
    assert_eq!(faq[2].max_height.as_deref(), Some("0"));
}

#[test]
fn click_outside_questions_has_no_effect() {
    let fixture = page(json!([
        ev(0, json!({ "type": "ready" })),
        ev(10, json!({ "type": "click", "selector": ".faq-answer", "index": 0 })),
        ev(20, json!({ "type": "click", "selector": "header" })),
    ]));
    let report = replay(&fixture, None).unwrap();
    assert!(report.steps[1].effects.is_empty());
    assert!(report.steps[2].effects.is_empty());
    assert_eq!(report.steps[1].events_processed, 1);
}

#[test]
fn missing_faq_list_is_logged_once() {
    let fixture = Fixture::from_json(
        &json!({
            "nodes": [ { "tag": "header", "classes": "header" } ],
            "events": [
                { "at_ms": 0, "event": { "type": "ready" } },
                { "at_ms": 5, "event": { "type": "ready" } }
            ]
        })
        .to_string(),
    )
    .unwrap();
    let report = replay(&fixture, None).unwrap();

    assert_eq!(kinds(&report, 0), vec!["header", "faq_unavailable"]);
    assert_eq!(report.steps[0].logs.len(), 1);
    assert!(report.steps[0].logs[0].contains("FAQ list not found"));
    assert!(report.steps[0].logs[0].contains(".faq-list"));

    assert_eq!(kinds(&report, 1), vec!["header"]);
    assert!(report.steps[1].logs.is_empty());
    assert_eq!(report.state.faq, None);
}

#[test]
fn unknown_click_target_fails() {
    let fixture = page(json!([
        ev(0, json!({ "type": "ready" })),
        ev(10, json!({ "type": "click", "selector": ".faq-question", "index": 9 })),
    ]));
    let err = replay(&fixture, None).unwrap_err();
    assert!(matches!(err, HarnessError::ClickTarget { index: 9, .. }));
}

#[test]
fn events_are_replayed_in_time_order() {
    let fixture = page(json!([
        ev(50, json!({ "type": "load" })),
        ev(0, json!({ "type": "ready" })),
    ]));
    let report = replay(&fixture, None).unwrap();
    let order: Vec<&str> = report.steps.iter().map(|s| s.event.as_str()).collect();
    assert_eq!(order, vec!["ready", "load"]);
    let times: Vec<u64> = report.steps.iter().map(|s| s.at_ms).collect();
    assert_eq!(times, vec![0, 50]);
}

#[test]
fn jsonl_ends_with_page_state() {
    let fixture = page(json!([
        ev(0, json!({ "type": "ready" })),
        ev(10, json!({ "type": "load" })),
    ]));
    let jsonl = replay(&fixture, None).unwrap().to_jsonl().unwrap();
    let lines: Vec<Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["type"], "step");
    assert_eq!(lines[0]["step"], 1);
    assert_eq!(lines[0]["event"], "ready");
    assert!(lines[0].get("seed").is_none());
    assert_eq!(lines[1]["type"], "step");
    assert_eq!(lines[2]["type"], "page_state");
    assert_eq!(lines[2]["seed"], 11);
    assert_eq!(lines[2]["header_active"], false);
    assert_eq!(lines[2]["equalize_passes"], 1);
}

#[test]
fn demo_fixture_replays() {
    let fixture = Fixture::demo().unwrap();
    let report = replay(&fixture, None).unwrap();

    assert_eq!(report.steps.len(), fixture.events.len());
    assert_eq!(report.state.header_active, Some(false));
    assert_eq!(
        report.state.block_heights,
        vec![
            px(&["180px", "180px", "180px", "110px", "110px"]),
            px(&["75px", "75px"]),
            vec![],
        ]
    );
    assert_eq!(report.state.equalize_passes, 2);
    assert_eq!(report.state.faq.as_ref().map(Vec::len), Some(5));
}
