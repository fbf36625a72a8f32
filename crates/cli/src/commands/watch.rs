// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running connectivity watch.
//!
//! Probes the remote on an interval and syncs automatically each time it
//! becomes reachable again, until interrupted.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::sync::{
    parse_base_url, poll_reachability, spawn_auto_sync, ConnectivityMonitor, ReachabilityProbe,
    RemoteApi, SyncEngine, TcpProbe,
};

use super::{open_log, open_remote, runtime};

pub fn run() -> Result<()> {
    let (log, config, _) = open_log()?;
    let remote = open_remote(&config)?;
    let url = parse_base_url(&config.remote.url)?;
    let probe = TcpProbe::for_url(&url, config.connectivity.probe_timeout())?;
    let interval = config.connectivity.probe_interval();

    tracing::info!(
        remote = %config.remote.url,
        probe = %probe.address(),
        pending = log.pending_count(),
        "watching connectivity"
    );

    let engine = Arc::new(SyncEngine::new(log, remote));
    runtime()?.block_on(async move {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        };
        run_impl(engine, &probe, interval, shutdown).await
    });

    tracing::info!("watch stopped");
    Ok(())
}

/// Internal implementation that accepts its collaborators for testing.
///
/// Returns once `shutdown` completes.
pub(crate) async fn run_impl<R, P>(
    engine: Arc<SyncEngine<R>>,
    probe: &P,
    interval: Duration,
    shutdown: impl Future<Output = ()>,
) where
    R: RemoteApi + 'static,
    P: ReachabilityProbe + ?Sized,
{
    let monitor = ConnectivityMonitor::new(false);
    let cancel = CancellationToken::new();
    let auto_sync = spawn_auto_sync(engine, &monitor, cancel.clone());

    tokio::select! {
        _ = poll_reachability(probe, &monitor, interval, cancel.clone()) => {}
        _ = shutdown => {}
    }

    cancel.cancel();
    if let Err(e) = auto_sync.await {
        tracing::error!("auto sync task failed: {}", e);
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
