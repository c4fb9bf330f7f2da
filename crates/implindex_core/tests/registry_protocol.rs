use implindex_core::{
    Descriptor, Fragment, ImplementorRegistry, MergePolicy, RegistryError, SharedIndex,
    SubmitOutcome,
};
use parking_lot::Mutex;
use std::sync::Arc;

type Received = Arc<Mutex<Vec<Arc<Fragment>>>>;

fn recording_consumer() -> (Received, impl FnMut(Arc<Fragment>) + Send + 'static) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    (received, move |fragment| sink.lock().push(fragment))
}

fn single(symbol: &str, descriptors: &[&str]) -> Fragment {
    Fragment::new().with_symbol(symbol, descriptors.iter().copied())
}

#[test]
fn queued_fragments_flush_in_submission_order() {
    let registry = ImplementorRegistry::new();
    let symbols: Vec<String> = (0..16).map(|i| format!("Sym{i}")).collect();
    for symbol in &symbols {
        registry
            .submit(single(symbol, &["impl X"]))
            .expect("submit should queue");
    }

    let (received, consumer) = recording_consumer();
    let report = registry.attach(consumer).expect("attach");
    assert_eq!(report.flushed, symbols.len());

    let delivered: Vec<String> = received
        .lock()
        .iter()
        .map(|fragment| fragment.entries()[0].symbol.clone())
        .collect();
    assert_eq!(delivered, symbols);
}

#[test]
fn submissions_before_and_after_attach_are_each_delivered_once() {
    let registry = ImplementorRegistry::new();
    registry.submit(single("Before1", &["a"])).expect("submit");
    registry.submit(single("Before2", &["b"])).expect("submit");

    let (received, consumer) = recording_consumer();
    registry.attach(consumer).expect("attach");

    assert_eq!(
        registry.submit(single("After1", &["c"])).expect("submit"),
        SubmitOutcome::Forwarded
    );
    registry.submit(single("After2", &["d"])).expect("submit");

    let delivered: Vec<String> = received
        .lock()
        .iter()
        .flat_map(|fragment| fragment.symbols().map(str::to_string).collect::<Vec<_>>())
        .collect();
    assert_eq!(delivered, vec!["Before1", "Before2", "After1", "After2"]);
    assert_eq!(registry.delivered_count(), 4);
}

#[test]
fn attaching_with_empty_queue_delivers_nothing() {
    let registry = ImplementorRegistry::new();
    let (received, consumer) = recording_consumer();
    let report = registry.attach(consumer).expect("attach with empty queue");
    assert_eq!(report.flushed, 0);
    assert!(received.lock().is_empty());
    assert!(registry.is_attached());
}

#[test]
fn overlapping_symbols_are_delivered_as_separate_fragments() {
    let registry = ImplementorRegistry::new();
    registry
        .submit(single("Foo", &["impl A for Foo"]))
        .expect("submit");
    registry
        .submit(single("Foo", &["impl B for Foo"]))
        .expect("overlapping symbol is not an error");

    let (received, consumer) = recording_consumer();
    registry.attach(consumer).expect("attach");

    let received = received.lock();
    assert_eq!(received.len(), 2);
    assert_eq!(
        received[0].get("Foo"),
        Some(&[Descriptor::new("impl A for Foo")][..])
    );
    assert_eq!(
        received[1].get("Foo"),
        Some(&[Descriptor::new("impl B for Foo")][..])
    );
}

#[test]
fn second_attach_is_rejected_without_second_flush() {
    let registry = ImplementorRegistry::new();
    registry.submit(single("Foo", &["impl A for Foo"])).expect("submit");

    let (first, consumer) = recording_consumer();
    registry.attach(consumer).expect("first attach");

    let (second, consumer) = recording_consumer();
    let err = registry.attach(consumer).expect_err("second attach must fail");
    assert_eq!(err, RegistryError::DuplicateAttachment);
    assert!(err.to_string().contains("already attached"));

    assert_eq!(first.lock().len(), 1);
    assert!(second.lock().is_empty());
    assert_eq!(registry.delivered_count(), 1);
}

#[test]
fn scenario_submit_then_attach() {
    let registry = ImplementorRegistry::new();
    registry
        .submit(single("Foo", &["impl A for Foo"]))
        .expect("submit Foo");
    registry
        .submit(single("Bar", &["impl B for Bar", "impl C for Bar"]))
        .expect("submit Bar");

    let (received, consumer) = recording_consumer();
    registry.attach(consumer).expect("attach");

    let received = received.lock();
    assert_eq!(received.len(), 2);
    assert_eq!(*received[0], single("Foo", &["impl A for Foo"]));
    assert_eq!(
        *received[1],
        single("Bar", &["impl B for Bar", "impl C for Bar"])
    );
}

#[test]
fn scenario_attach_then_submit_empty_list() {
    let registry = ImplementorRegistry::new();
    let (received, consumer) = recording_consumer();
    registry.attach(consumer).expect("attach");
    assert!(received.lock().is_empty());

    registry
        .submit(Fragment::new().with_symbol("Baz", Vec::<Descriptor>::new()))
        .expect("empty descriptor list is valid");

    let received = received.lock();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].get("Baz"), Some(&[][..]));
}

#[test]
fn scenario_same_fragment_submitted_twice() {
    let registry = ImplementorRegistry::new();
    let fragment = Arc::new(single("Foo", &["impl A for Foo"]));
    registry.submit(Arc::clone(&fragment)).expect("first submit");
    registry.submit(Arc::clone(&fragment)).expect("second submit");

    let (received, consumer) = recording_consumer();
    registry.attach(consumer).expect("attach");

    let received = received.lock();
    assert_eq!(received.len(), 2);
    assert!(Arc::ptr_eq(&received[0], &fragment));
    assert!(Arc::ptr_eq(&received[1], &fragment));
}

#[test]
fn shared_index_consumer_can_be_read_while_attached() {
    let registry = ImplementorRegistry::new();
    let index = SharedIndex::new(MergePolicy::Append);
    registry
        .submit(Fragment::scoped("core::default::Default").with_symbol("Foo", ["impl A for Foo"]))
        .expect("submit");
    registry.attach(index.clone()).expect("attach index");
    registry
        .submit(single("Foo", &["impl B for Foo"]))
        .expect("submit");

    let snapshot = index.snapshot();
    assert_eq!(snapshot.fragment_count(), 2);
    assert_eq!(
        snapshot.descriptors("Foo"),
        Some(
            &[
                Descriptor::new("impl A for Foo"),
                Descriptor::new("impl B for Foo")
            ][..]
        )
    );
}
