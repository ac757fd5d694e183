use std::collections::BTreeMap;
use std::time::Duration;

use portwatch::poller::Poller;
use portwatch::prober::{TcpProber, PROBE_TIMEOUT};
use portwatch::store::StatusStore;
use portwatch::targets::targets_from_map;
use portwatch::types::Verdict;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

async fn closed_port() -> u16 {
    let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
    l.local_addr().unwrap().port()
}

#[tokio::test]
async fn one_cycle_reports_open_and_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open_port = listener.local_addr().unwrap().port();
    let shut_port = closed_port().await;

    let mut ports = BTreeMap::new();
    ports.insert(open_port.to_string(), "http".to_string());
    ports.insert(shut_port.to_string(), "nothing".to_string());
    let targets = targets_from_map(&ports).unwrap();

    let store = StatusStore::new();
    let poller = Poller::new(targets, store.clone(), TcpProber::new("127.0.0.1", PROBE_TIMEOUT));
    poller.run_cycle().await;

    let snap = store.read_all().await;
    let mut expected = BTreeMap::new();
    expected.insert("http".to_string(), Verdict::Open);
    expected.insert("nothing".to_string(), Verdict::Closed);
    assert_eq!(snap, expected);
}

#[tokio::test]
async fn verdict_follows_listener_across_cycles() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut ports = BTreeMap::new();
    ports.insert(port.to_string(), "svc".to_string());
    let store = StatusStore::new();
    let poller = Poller::new(
        targets_from_map(&ports).unwrap(),
        store.clone(),
        TcpProber::new("127.0.0.1", PROBE_TIMEOUT),
    );

    poller.run_cycle().await;
    assert_eq!(store.read_all().await["svc"], Verdict::Open);

    drop(listener);
    poller.run_cycle().await;
    assert_eq!(store.read_all().await["svc"], Verdict::Closed);
}

#[tokio::test]
async fn spawned_poller_fills_store_then_stops() {
    let shut_port = closed_port().await;
    let mut ports = BTreeMap::new();
    ports.insert(shut_port.to_string(), "nothing".to_string());

    let store = StatusStore::new();
    let handle = Poller::new(
        targets_from_map(&ports).unwrap(),
        store.clone(),
        TcpProber::new("127.0.0.1", PROBE_TIMEOUT),
    )
    .spawn(CancellationToken::new());

    let mut filled = false;
    for _ in 0..50 {
        if store.read_all().await.contains_key("nothing") {
            filled = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(filled, "first cycle should run right away");

    let first = store.read_all().await;
    assert_eq!(first, store.read_all().await);

    tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
        .await
        .expect("poller stops promptly");
}
