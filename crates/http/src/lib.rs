//! HTTP surface of the hostname resolver.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

mod error;
mod routes;

pub use error::Error;
pub use routes::{
    INTERNAL_ERROR_MESSAGE, LookupParams, MAC2HOSTNAME_PATH, MISSING_MAC_MESSAGE, router,
};

use std::net::SocketAddr;

use axum::Router;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

/// Plain HTTP server for the lookup endpoint.
pub struct HttpServer {
    listen_addr: SocketAddr,
    local_addr: RwLock<Option<SocketAddr>>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl HttpServer {
    /// Creates a new instance of `HttpServer`.
    #[must_use]
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            local_addr: RwLock::new(None),
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// Binds the listener and serves `router` until [`Self::shutdown`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] on a second call and [`Error::Bind`] if the
    /// address cannot be bound.
    pub async fn start(&self, router: Router) -> Result<JoinHandle<()>, Error> {
        if self.task_tracker.is_closed() {
            return Err(Error::AlreadyStarted);
        }

        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(Error::Bind)?;
        let local_addr = listener.local_addr()?;
        *self.local_addr.write() = Some(local_addr);

        let shutdown_token = self.shutdown_token.clone();
        let handle = self.task_tracker.spawn(async move {
            // In-flight lookups finish before the server exits.
            let result = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown_token.cancelled_owned())
                .await;

            info!("http server exited {:?}", result);
        });

        self.task_tracker.close();

        info!("http server listening on {local_addr}");

        Ok(handle)
    }

    /// The bound address, once started. Differs from the configured one for port 0.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.read()
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn shutdown(&self) {
        info!("http server shutting down...");

        self.shutdown_token.cancel();
        self.task_tracker.wait().await;

        info!("http server shutdown");
    }
}
