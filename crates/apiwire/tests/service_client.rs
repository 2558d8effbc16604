//! ServiceClient lifecycle tests.
//!
//! These cover lazy construction, identity of the shared transport client
//! and dispatcher, overrides, and the proxy cache under concurrent access.
//! No network traffic is involved.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use apiwire::{Dispatcher, HttpLogLevel, RemoteService, ServiceClient, Timeouts, TransportClient};

/// Declares a proxy type whose constructions are counted.
macro_rules! counted_service {
    ($name:ident, $counter:ident) => {
        static $counter: AtomicUsize = AtomicUsize::new(0);

        #[derive(Debug)]
        struct $name {
            dispatcher: Dispatcher,
        }

        impl RemoteService for $name {
            fn create(dispatcher: Dispatcher) -> Self {
                $counter.fetch_add(1, Ordering::SeqCst);
                Self { dispatcher }
            }
        }
    };
}

counted_service!(EchoService, ECHO_CREATED);
counted_service!(UserService, USER_CREATED);
counted_service!(RacedService, RACED_CREATED);
counted_service!(ScenarioService, SCENARIO_CREATED);

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_default_timeout_is_fifteen_seconds() {
    let client = ServiceClient::new("https://example.test");
    let transport = client.transport_client().unwrap();
    assert_eq!(
        transport.timeouts(),
        Timeouts::uniform(Duration::from_secs(15))
    );
}

#[test]
fn test_explicit_timeout() {
    let client = ServiceClient::with_timeout("https://example.test", 30);
    let timeouts = client.transport_client().unwrap().timeouts();
    assert_eq!(timeouts.connect, Duration::from_secs(30));
    assert_eq!(timeouts.read, Duration::from_secs(30));
    assert_eq!(timeouts.write, Duration::from_secs(30));
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_transport_client_is_singleton() {
    let client = ServiceClient::new("https://example.test");
    let first = client.transport_client().unwrap();
    let second = client.transport_client().unwrap();
    assert!(std::ptr::eq(first, second));
    assert!(TransportClient::ptr_eq(first, second));
}

#[test]
fn test_dispatcher_is_singleton() {
    let client = ServiceClient::new("https://example.test");
    let first = client.dispatcher().unwrap();
    let second = client.dispatcher().unwrap();
    assert!(Dispatcher::ptr_eq(first, second));
    assert!(TransportClient::ptr_eq(
        first.transport(),
        client.transport_client().unwrap()
    ));
}

#[test]
fn test_service_is_cached_per_type() {
    let client = ServiceClient::new("https://example.test");

    let echo_a = client.service::<EchoService>().unwrap();
    let echo_b = client.service::<EchoService>().unwrap();
    let users = client.service::<UserService>().unwrap();

    assert!(Arc::ptr_eq(&echo_a, &echo_b));
    assert_eq!(ECHO_CREATED.load(Ordering::SeqCst), 1);
    assert_eq!(USER_CREATED.load(Ordering::SeqCst), 1);
    assert_eq!(client.cached_services(), 2);

    // Both proxies route through the one shared dispatcher.
    assert!(Dispatcher::ptr_eq(&echo_a.dispatcher, &users.dispatcher));
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_transport_override_before_dispatcher() {
    let mut client = ServiceClient::new("https://example.test");
    let custom = TransportClient::custom(
        reqwest::Client::new(),
        Timeouts::uniform(Duration::from_secs(3)),
        HttpLogLevel::None,
    );
    client.set_transport_client(custom.clone());

    let dispatcher = client.dispatcher().unwrap();
    assert!(TransportClient::ptr_eq(dispatcher.transport(), &custom));
    assert_eq!(
        dispatcher.transport().timeouts().read,
        Duration::from_secs(3)
    );
}

#[test]
fn test_dispatcher_override() {
    let mut client = ServiceClient::new("https://example.test");
    let transport = client.transport_client().unwrap().clone();
    let custom = Dispatcher::new("https://other.example.test/v2", transport).unwrap();
    client.set_dispatcher(custom.clone());

    let dispatcher = client.dispatcher().unwrap();
    assert!(Dispatcher::ptr_eq(dispatcher, &custom));
    assert_eq!(
        dispatcher.base_url().as_str(),
        "https://other.example.test/v2/"
    );
}

#[test]
fn test_custom_key_and_factory() {
    let client = ServiceClient::new("https://example.test");
    let built = AtomicUsize::new(0);

    let make = |dispatcher: Dispatcher| {
        built.fetch_add(1, Ordering::SeqCst);
        dispatcher.base_url().to_string()
    };
    let first = client.service_with("base-url", make).unwrap();
    let second = client
        .service_with("base-url", |_: Dispatcher| String::from("ignored"))
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.as_str(), "https://example.test/");
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Deferred configuration errors
// ============================================================================

#[test]
fn test_malformed_base_url_fails_at_first_service() {
    let client = ServiceClient::new("example.test without scheme");
    let err = client.service::<EchoService>().unwrap_err();
    assert!(matches!(err, apiwire::Error::Config(_)));
    assert_eq!(client.cached_services(), 0);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_first_access_builds_one_proxy() {
    const THREADS: usize = 16;
    let client = ServiceClient::new("https://example.test");

    let proxies: Vec<Arc<RacedService>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| scope.spawn(|| client.service::<RacedService>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(RACED_CREATED.load(Ordering::SeqCst), 1);
    for proxy in &proxies {
        assert!(Arc::ptr_eq(proxy, &proxies[0]));
    }
}

#[test]
fn test_concurrent_first_access_builds_one_dispatcher() {
    const THREADS: usize = 16;
    let client = ServiceClient::new("https://example.test");

    let shared: Vec<(&Dispatcher, &TransportClient)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let client = &client;
                scope.spawn(move || {
                    // Half the threads reach the transport first.
                    if i % 2 == 0 {
                        let transport = client.transport_client().unwrap();
                        (client.dispatcher().unwrap(), transport)
                    } else {
                        let dispatcher = client.dispatcher().unwrap();
                        (dispatcher, client.transport_client().unwrap())
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let (dispatcher, transport) = shared[0];
    assert!(TransportClient::ptr_eq(dispatcher.transport(), transport));
    for (other_dispatcher, other_transport) in &shared {
        assert!(Dispatcher::ptr_eq(other_dispatcher, dispatcher));
        assert!(TransportClient::ptr_eq(other_transport, transport));
    }
}

#[test]
fn test_two_threads_share_proxy_and_dispatcher() {
    let client = Arc::new(ServiceClient::new("https://api.example.com/"));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let client = Arc::clone(&client);
            thread::spawn(move || client.service::<ScenarioService>().unwrap())
        })
        .collect();
    let proxies: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(Arc::ptr_eq(&proxies[0], &proxies[1]));
    assert_eq!(SCENARIO_CREATED.load(Ordering::SeqCst), 1);
    assert!(Dispatcher::ptr_eq(
        &proxies[0].dispatcher,
        client.dispatcher().unwrap()
    ));
}
