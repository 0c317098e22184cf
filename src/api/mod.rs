//! HTTP API server for the Roku bridge

pub mod accessories;
pub mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::accessory::RokuAccessory;

/// Shared state for API handlers
#[derive(Debug, Default)]
pub struct ApiState {
    /// Published accessories in connect order
    pub accessories: Vec<Arc<RokuAccessory>>,
}

impl ApiState {
    /// Find an accessory by id
    #[must_use]
    pub fn accessory(&self, id: &str) -> Option<Arc<RokuAccessory>> {
        self.accessories.iter().find(|a| a.id() == id).cloned()
    }
}

/// Build the router with all routes
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .nest("/api/accessories", accessories::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
}

/// HTTP API server with its listener already bound
#[derive(Debug)]
pub struct ApiServer {
    state: Arc<ApiState>,
    listener: TcpListener,
}

impl ApiServer {
    /// Bind the API port for the given accessories
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be bound
    pub async fn bind(accessories: Vec<Arc<RokuAccessory>>, port: u16) -> Result<Self> {
        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            crate::Error::Config(format!("failed to bind API server on {addr}: {e}"))
        })?;

        Ok(Self {
            state: Arc::new(ApiState { accessories }),
            listener,
        })
    }

    /// Address the listener is bound to
    ///
    /// # Errors
    ///
    /// Returns error if the socket address cannot be read
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the HTTP server until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns error if the server stops with an I/O failure
    pub async fn serve(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!(%addr, "API server listening");
        }

        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
