//! TCP Server
//!
//! Accepts connections and services them strictly one at a time. A slow
//! peer stalls the whole server; no connection is ever handled in parallel.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{CftpError, Result};
use crate::transfer::TransferEngine;
use super::Session;

/// First pause after a failed accept; doubled per consecutive failure
const ACCEPT_BACKOFF_BASE: Duration = Duration::from_millis(50);

/// Longest pause between accept attempts
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// TCP server for CFTP
pub struct Server {
    config: Config,
    engine: TransferEngine,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listening socket
    ///
    /// The configuration is expected to be validated already.
    pub fn bind(config: Config) -> Result<Self> {
        let listener = TcpListener::bind(config.socket_addr())?;
        let engine = TransferEngine::new(config.limits(), config.staging_dir.clone());

        tracing::debug!("Bound to address {}", listener.local_addr()?);

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that stops `run` after the connection in progress
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        let mut wake_addr = self.local_addr()?;
        if wake_addr.ip().is_unspecified() {
            wake_addr.set_ip(match wake_addr {
                SocketAddr::V4(_) => [127, 0, 0, 1].into(),
                SocketAddr::V6(_) => std::net::Ipv6Addr::LOCALHOST.into(),
            });
        }

        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            wake_addr,
        })
    }

    /// Accept and service connections until shut down (blocking)
    ///
    /// Per-connection errors are logged; the loop keeps going. Repeated
    /// accept failures back off before the next attempt.
    pub fn run(&self) -> Result<()> {
        tracing::info!("Listening on port {}", self.local_addr()?.port());

        let mut failures = 0u32;
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.serve_one() {
                Ok(()) => failures = 0,
                Err(e) => {
                    failures = failures.saturating_add(1);
                    let delay = accept_backoff(failures);
                    tracing::error!("{}, retrying in {:?}", e, delay);
                    std::thread::sleep(delay);
                }
            }
        }

        Ok(())
    }

    /// Accept one connection and service it fully
    ///
    /// Only a failed accept is returned; session errors are logged here.
    pub fn serve_one(&self) -> Result<()> {
        let (stream, _) = self
            .listener
            .accept()
            .map_err(|e| CftpError::Transport(format!("Accept error: {}", e)))?;

        if self.shutdown.load(Ordering::Relaxed) {
            return Ok(());
        }

        if let Err(e) = self.handle(stream) {
            tracing::warn!("Session ended with error: {}", e);
        }
        Ok(())
    }

    fn handle(&self, stream: TcpStream) -> Result<()> {
        let mut session = Session::new(stream, &self.engine, &self.config.serve_dir)?;
        session.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;
        tracing::debug!("Connection established from {}", session.peer_addr());
        session.handle()
    }
}

/// Stops a running server from another thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Signal the server to stop and wake its blocking accept
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
        let _ = TcpStream::connect(self.wake_addr);
    }
}

/// Pause before the next accept after `failures` consecutive failures
fn accept_backoff(failures: u32) -> Duration {
    let shift = failures.saturating_sub(1).min(16);
    ACCEPT_BACKOFF_BASE
        .saturating_mul(1 << shift)
        .min(ACCEPT_BACKOFF_MAX)
}
