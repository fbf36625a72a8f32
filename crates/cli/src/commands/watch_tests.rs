// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::TestContext;
use crate::sync::test_helpers::MockRemote;
use std::pin::Pin;

struct AlwaysOnline;

impl ReachabilityProbe for AlwaysOnline {
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async { true })
    }
}

#[tokio::test]
async fn test_watch_syncs_when_remote_reachable() {
    let ctx = TestContext::new();
    ctx.create_producteur("A");
    let remote = MockRemote::new();
    let engine = Arc::new(SyncEngine::new(ctx.log.clone(), remote.clone()));

    let log = ctx.log.clone();
    let shutdown = async move {
        for _ in 0..200 {
            if log.pending_count() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    run_impl(engine, &AlwaysOnline, Duration::from_millis(10), shutdown).await;

    assert_eq!(ctx.log.pending_count(), 0);
    assert_eq!(remote.calls().len(), 1);
    assert!(ctx.log.last_sync().is_some());
}
