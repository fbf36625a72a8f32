// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Online/offline tracking and the automatic sync trigger.
//!
//! A [`ConnectivityMonitor`] holds the current state. Something feeding it
//! (a [`ReachabilityProbe`] polled by [`poll_reachability`], or the host
//! application) flips the state, and [`spawn_auto_sync`] runs one sync pass
//! each time it goes from offline to online.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::engine::SyncEngine;
use super::remote::RemoteApi;
use crate::error::{Error, Result};

/// Current online state, readable synchronously and observable.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<bool>>,
    drops: Arc<AtomicU64>,
}

impl ConnectivityMonitor {
    /// Creates a monitor in the given state.
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        ConnectivityMonitor {
            tx: Arc::new(tx),
            drops: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Sets the state and returns true if it changed.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                if !online {
                    self.drops.fetch_add(1, Ordering::AcqRel);
                }
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!(online, "connectivity changed");
        }
        changed
    }

    /// Number of online to offline transitions so far.
    ///
    /// A receiver may see several quick changes as one; comparing this count
    /// tells whether the link went down in between.
    pub fn drop_count(&self) -> u64 {
        self.drops.load(Ordering::Acquire)
    }

    /// Returns a receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Source of reachability for the remote.
pub trait ReachabilityProbe: Send + Sync {
    /// Returns true if the remote can currently be reached.
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Probes reachability with a TCP connect to the remote's host and port.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        TcpProbe {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Builds a probe for the host and port of `url`.
    pub fn for_url(url: &Url, timeout: Duration) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::Config(format!("remote url '{}' has no host", url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::Config(format!("remote url '{}' has no port", url)))?;
        Ok(Self::new(host.trim_matches(['[', ']']), port, timeout))
    }

    /// Returns `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ReachabilityProbe for TcpProbe {
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            let connect = TcpStream::connect((self.host.as_str(), self.port));
            match tokio::time::timeout(self.timeout, connect).await {
                Ok(Ok(_)) => true,
                Ok(Err(e)) => {
                    tracing::debug!(address = %self.address(), error = %e, "probe failed");
                    false
                }
                Err(_) => {
                    tracing::debug!(address = %self.address(), "probe timed out");
                    false
                }
            }
        })
    }
}

/// Probes every `interval` and feeds the result into `monitor` until
/// `cancel` fires.
pub async fn poll_reachability<P: ReachabilityProbe + ?Sized>(
    probe: &P,
    monitor: &ConnectivityMonitor,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        let online = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            online = probe.probe() => online,
        };
        monitor.set_online(online);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Runs one sync pass each time `monitor` goes from offline to online.
///
/// The starting state is the state when this is called, so a change made
/// right after it returns is seen as a transition. Results and errors are
/// logged. The task ends when `cancel` fires.
pub fn spawn_auto_sync<R: RemoteApi + 'static>(
    engine: Arc<SyncEngine<R>>,
    monitor: &ConnectivityMonitor,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let monitor = monitor.clone();
    let mut rx = monitor.subscribe();
    let mut was_online = *rx.borrow_and_update();
    let mut drops = monitor.drop_count();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                changed = rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }

            let online = *rx.borrow_and_update();
            // went down and back up since the last look, possibly during a run
            let seen = monitor.drop_count();
            let reconnected = seen != drops;
            drops = seen;
            if online && (!was_online || reconnected) {
                match engine.try_sync_all().await {
                    Ok(Some(summary)) => tracing::info!(
                        synced = summary.synced,
                        failed = summary.failed,
                        skipped = summary.skipped,
                        "automatic sync finished"
                    ),
                    Ok(None) => tracing::debug!("automatic sync skipped, run in progress"),
                    Err(e) => tracing::error!("automatic sync failed: {}", e),
                }
            }
            was_online = online;
        }
    })
}
