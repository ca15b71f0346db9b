use std::sync::Arc;

use story_core::trace::Action;
use story_core::{BoundStory, CompileError};
mod test_support;
use test_support::*;

#[test]
fn class_substory_is_inlined_between_markers() {
    let story = bind(SimpleSubstory, "y");
    assert_eq!(story.trace().labels(),
               vec!["SimpleSubstory.start",
                    "SimpleSubstory.before",
                    "enter:SimpleSubstory.x",
                    "SimpleSubstory.one",
                    "SimpleSubstory.two",
                    "SimpleSubstory.three",
                    "exit:SimpleSubstory.x",
                    "SimpleSubstory.after"]);
    assert!(story.trace().is_balanced());
}

#[test]
fn injected_substory_keeps_its_own_owner() {
    let x = bind(Simple, "x");
    let story = BoundStory::bind(SubstoryDI::new(x.clone()), "y").expect("compile");
    let trace = story.trace();
    assert!(trace.is_balanced());

    let owners: Vec<&str> = trace.instructions()
                                 .iter()
                                 .filter(|i| i.is_step())
                                 .map(|i| i.owner.name)
                                 .collect();
    assert_eq!(owners, vec!["SubstoryDI", "SubstoryDI", "Simple", "Simple", "Simple", "SubstoryDI"]);

    // Cada paso se ejecuta contra la instancia que lo declaró.
    let steps: Vec<_> = trace.instructions().iter().filter(|i| i.is_step()).collect();
    assert!(steps[0].owner.downcast::<SubstoryDI>().is_some());
    assert!(steps[2].owner.downcast::<Simple>().is_some());
    assert!(steps[2].owner.downcast::<SubstoryDI>().is_none());

    // El marcador de entrada apunta a la raíz de la historia inyectada.
    let entered = trace.instructions().iter().find_map(|i| match &i.action {
                                                  Action::Enter { story, alias, injected } => {
                                                      Some((Arc::clone(story), alias.clone(), *injected))
                                                  }
                                                  _ => None,
                                              });
    let (origin, alias, injected) = entered.expect("enter marker");
    assert!(Arc::ptr_eq(&origin, x.trace().root()));
    assert_eq!(alias, "x");
    assert!(injected);
}

#[test]
fn nested_substories_stay_balanced() {
    let story = bind(Nested, "outer");
    let trace = story.trace();
    assert!(trace.is_balanced());
    assert_eq!(trace.labels().iter().filter(|l| l.starts_with("enter:")).count(), 2);
    assert_eq!(trace.labels().iter().filter(|l| l.starts_with("exit:")).count(), 2);
}

#[test]
fn injected_story_nested_twice_is_balanced() {
    let z = bind(SimpleSubstory, "z");
    let story = BoundStory::bind(SubstoryDI::new(z), "y").expect("compile");
    assert!(story.trace().is_balanced());
    assert_eq!(story.trace()
                    .labels()
                    .iter()
                    .filter(|l| l.starts_with("enter:"))
                    .cloned()
                    .collect::<Vec<_>>(),
               vec!["enter:SimpleSubstory.z", "enter:SimpleSubstory.x"]);
}

#[test]
fn unknown_names_fail_at_compile_time() {
    let err = BoundStory::bind(Arc::new(Broken), "x").unwrap_err();
    assert_eq!(err,
               CompileError::UnknownCapability { host: "Broken",
                                                 story: "Broken.x".into(),
                                                 name: "nope".into() });

    let err = BoundStory::bind(Arc::new(Simple), "missing").unwrap_err();
    assert!(matches!(err, CompileError::UnknownStory { .. }));
}

#[test]
fn recursive_substories_are_rejected() {
    let err = BoundStory::bind(Arc::new(Looping), "a").unwrap_err();
    match err {
        CompileError::RecursiveStory { path, .. } => {
            assert_eq!(path, vec!["Looping.a", "Looping.b", "Looping.a"]);
        }
        other => panic!("expected recursion error, got {other:?}"),
    }
}

#[test]
fn duplicate_capabilities_are_rejected() {
    let err = BoundStory::bind(Arc::new(Duplicated), "x").unwrap_err();
    assert!(matches!(err, CompileError::DuplicateCapability { ref name, .. } if name == "x"));

    let shadowed = StepAndInjected { inner: bind(Simple, "x") };
    let err = BoundStory::bind(Arc::new(shadowed), "y").unwrap_err();
    assert!(matches!(err, CompileError::DuplicateCapability { ref name, .. } if name == "x"));
}

#[test]
fn fingerprint_is_stable_per_shape() {
    let a = bind(Simple, "x");
    let b = bind(Simple, "x");
    assert_eq!(a.trace().fingerprint(), b.trace().fingerprint());
    assert_eq!(a.trace().fingerprint().len(), 64);

    let c = bind(Pipe, "x");
    assert_ne!(a.trace().fingerprint(), c.trace().fingerprint());
}

#[test]
fn clones_share_the_compiled_trace() {
    let a = bind(Simple, "x");
    let b = a.clone();
    assert!(Arc::ptr_eq(a.trace(), b.trace()));
    assert_eq!(a.label(), "Simple.x");
    assert_eq!(a.arguments(), &["foo".to_string(), "bar".to_string()]);
}
