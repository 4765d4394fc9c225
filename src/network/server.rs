//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel;

use crate::config::Config;
use crate::error::{BoardError, Result};

use super::{Connection, Handler};

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TCP server for Badgeboard
///
/// One acceptor (the thread calling `run`) feeds accepted streams through a
/// bounded channel to `config.workers` worker threads.
pub struct Server {
    config: Config,
    handler: Arc<Handler>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listen address
    pub fn bind(config: Config, handler: Arc<Handler>) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            BoardError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;

        Ok(Self {
            config,
            handler,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Flag that stops the accept loop once set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Start the server (blocking until shutdown)
    ///
    /// Open connections are served to completion before this returns.
    pub fn run(&self) -> Result<()> {
        self.listener.set_nonblocking(true)?;
        tracing::info!("Listening on {}", self.local_addr()?);

        let (sender, receiver) = channel::bounded::<TcpStream>(self.config.workers * 2);

        let mut workers = Vec::with_capacity(self.config.workers);
        for i in 0..self.config.workers {
            let receiver = receiver.clone();
            let handler = Arc::clone(&self.handler);
            let read_ms = self.config.read_timeout_ms;
            let write_ms = self.config.write_timeout_ms;

            let worker = thread::Builder::new()
                .name(format!("badgeboard-worker-{}", i))
                .spawn(move || {
                    for stream in receiver.iter() {
                        serve(stream, Arc::clone(&handler), read_ms, write_ms);
                    }
                })?;
            workers.push(worker);
        }
        drop(receiver);

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    tracing::trace!("Accepted connection from {}", addr);
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", addr, e);
                        continue;
                    }
                    if sender.send(stream).is_err() {
                        return Err(BoardError::Network(
                            "all worker threads have exited".to_string(),
                        ));
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!("Shutting down, waiting for {} workers", workers.len());
        drop(sender);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        Ok(())
    }
}

/// Serve one accepted stream on a worker thread
fn serve(stream: TcpStream, handler: Arc<Handler>, read_ms: u64, write_ms: u64) {
    let mut connection = match Connection::new(stream, handler) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!("Failed to set up connection: {}", e);
            return;
        }
    };

    if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
        tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
    }

    if let Err(e) = connection.handle() {
        tracing::debug!("Connection {} closed with error: {}", connection.peer_addr(), e);
    }
}
