use std::sync::Arc;

use story_core::{kwargs, BoundStory, EventStore, InMemoryEventStore, RunStatus, StoryEventKind};
mod test_support;
use test_support::*;

#[test]
fn record_sequence_for_failure_scenario() {
    let execution = bind(Simple, "x").execute(kwargs! { "foo" => 3, "bar" => 2 });
    // StoryStarted, one (S F), two (S X), StoryFinished
    assert_eq!(execution.variants(), vec!["I", "S", "F", "S", "X", "C"]);
    let seqs: Vec<u64> = execution.events.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, (0..6).collect::<Vec<u64>>());
    assert!(execution.events.iter().all(|e| e.run_id == execution.run_id));
    assert!(matches!(execution.events.last().map(|e| &e.kind),
                     Some(StoryEventKind::StoryFinished { status: RunStatus::Failed })));
}

#[test]
fn started_event_carries_trace_fingerprint() {
    let story = bind(Pipe, "x");
    let execution = story.execute(story_core::Arguments::none());
    match &execution.events[0].kind {
        StoryEventKind::StoryStarted { story: label, trace_fingerprint } => {
            assert_eq!(label, "Pipe.x");
            assert_eq!(trace_fingerprint, story.trace().fingerprint());
        }
        other => panic!("unexpected first event {other:?}"),
    }
}

#[test]
fn injected_entry_is_labelled_with_real_story() {
    let story = BoundStory::bind(SubstoryDI::new(bind(Pipe, "x")), "y").expect("compile");
    let execution = story.execute(kwargs! { "spam" => 3 });
    let entered = execution.events.iter().find_map(|e| match &e.kind {
                                              StoryEventKind::SubstoryEntered { name, story, injected, depth } => {
                                                  Some((name.clone(), story.clone(), *injected, *depth))
                                              }
                                              _ => None,
                                          });
    assert_eq!(entered, Some(("x".to_string(), "Pipe.x".to_string(), true, 1)));
}

#[test]
fn event_store_receives_every_run() {
    let store = Arc::new(InMemoryEventStore::new());
    let story = bind(Simple, "x").with_event_store(store.clone());

    let first = story.execute(kwargs! { "foo" => 1, "bar" => 3 });
    let second = story.execute(kwargs! { "foo" => 3, "bar" => 2 });

    assert_eq!(store.runs(), vec![first.run_id, second.run_id]);
    assert_eq!(store.list(first.run_id), first.events);
    assert_eq!(store.list(second.run_id).len(), second.events.len());
}

#[test]
fn events_serialize_to_json() {
    let execution = bind(Simple, "x").execute(kwargs! { "foo" => 1, "bar" => 3 });
    let json = serde_json::to_value(&execution.events).expect("serialize");
    let back: Vec<story_core::StoryEvent> = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, execution.events);
}
