//! Concurrent resolution of independent documents with one shared resolver.

mod fixtures;

use std::sync::Arc;
use std::thread;

use fixtures::{scenario_a, scenario_b, tables};
use sieve_coref::{Document, Resolution, Resolver};

#[test]
fn test_resolver_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resolver>();
    assert_send_sync::<Resolution>();
}

#[test]
fn test_concurrent_matches_sequential() {
    let resolver = Arc::new(Resolver::with_defaults(tables()));
    let docs: Vec<Document> = (0..16)
        .map(|i| if i % 2 == 0 { scenario_a() } else { scenario_b() })
        .collect();
    let expected: Vec<Resolution> = docs.iter().map(|d| resolver.resolve(d)).collect();

    let handles: Vec<_> = docs
        .into_iter()
        .map(|doc| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || resolver.resolve(&doc))
        })
        .collect();

    for (handle, want) in handles.into_iter().zip(expected) {
        assert_eq!(handle.join().unwrap(), want);
    }
}

#[test]
fn test_scoped_threads_share_borrowed_resolver() {
    let resolver = Resolver::with_defaults(tables());
    let doc = scenario_a();
    let results: Vec<Resolution> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| resolver.resolve(&doc)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
