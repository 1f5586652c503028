#![allow(dead_code)]

use std::path::Path;
use todo_store::{StoreSnapshot, TodoStore};
use tokio::time::{sleep, timeout, Duration};

/// Wait until every scheduled background save has finished
pub async fn wait_for_saves(store: &TodoStore) {
    timeout(Duration::from_secs(5), async {
        while store.in_flight_saves() > 0 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("background saves did not finish in time");
}

/// Poll `path` until its snapshot satisfies `predicate`
pub async fn wait_for_file<F>(path: &Path, predicate: F) -> StoreSnapshot
where
    F: Fn(&StoreSnapshot) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(bytes) = tokio::fs::read(path).await {
                if let Ok(snapshot) = StoreSnapshot::from_json_bytes(&bytes) {
                    if predicate(&snapshot) {
                        return snapshot;
                    }
                }
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("data file never reached the expected state")
}

/// Wait for background saves, then write the final state explicitly
pub async fn settle(store: &TodoStore) {
    wait_for_saves(store).await;
    store.save_now().await.unwrap();
}
