//! Server startup and binding
//!
//! Provides functionality to start the Axum server with configurable host/port
//! and graceful shutdown on Ctrl-C.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ServerConfig};
use crate::routes;

/// Server instance that can be started
pub struct Server {
    /// Server configuration
    config: Arc<ServerConfig>,
    /// The built router
    router: Router,
}

impl Server {
    /// Create a new server instance with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        let config = Arc::new(config);
        let router = routes::build_router(config.clone());

        Self { config, router }
    }

    /// Get the socket address the server will bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = self.config.socket_addr();
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    /// Get the configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server until Ctrl-C
    ///
    /// Binds to the configured host/port and serves requests. In-flight
    /// requests get `shutdown_timeout_secs` to finish after the signal.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let grace = Duration::from_secs(self.config.shutdown_timeout_secs);
        self.run_with_listener(listener, shutdown_signal(grace)).await?;
        Ok(())
    }

    /// Run the server on an already bound listener until `shutdown` resolves
    ///
    /// This is useful for testing where you want to use a listener bound to port 0
    /// to get a random available port.
    pub async fn run_with_listener<S>(
        self,
        listener: TcpListener,
        shutdown: S,
    ) -> Result<(), std::io::Error>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "Server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Create a test server and return the bound address
    ///
    /// This binds to port 0 to get a random available port, starts the server
    /// in a background task, and returns the actual bound address.
    #[cfg(test)]
    pub async fn spawn_test_server(
        config: ServerConfig,
    ) -> (SocketAddr, tokio::sync::oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();

        let server = Self::new(config);
        let handle = tokio::spawn(async move {
            server
                .run_with_listener(listener, async {
                    stopped.await.ok();
                })
                .await
                .ok();
        });

        (addr, stop, handle)
    }
}

/// Resolve on Ctrl-C, then arm a hard deadline for draining connections.
async fn shutdown_signal(grace: Duration) {
    wait_for_signal(tokio::signal::ctrl_c()).await;
    tracing::info!(grace_secs = grace.as_secs(), "Shutdown signal received");

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!("Graceful shutdown timed out, exiting");
        std::process::exit(1);
    });
}

/// Wait for `signal`; never resolves if the handler cannot be installed.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal, serving until killed");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn test_server_socket_addr() {
        let mut config = ServerConfig::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;

        let server = Server::new(config);
        let addr = server.socket_addr().unwrap();

        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_server_socket_addr_rejects_hostname() {
        let mut config = ServerConfig::default();
        config.host = "not a host".to_string();

        let server = Server::new(config);
        assert!(matches!(
            server.socket_addr(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_server_config_access() {
        let mut config = ServerConfig::default();
        config.port = 9999;

        let server = Server::new(config);

        assert_eq!(server.config().port, 9999);
    }

    #[tokio::test]
    async fn test_signal_handler_failure_keeps_serving() {
        let failed = async {
            Err::<(), _>(std::io::Error::new(std::io::ErrorKind::Other, "no signal handler"))
        };
        let waited = tokio::time::timeout(Duration::from_millis(100), wait_for_signal(failed)).await;
        assert!(waited.is_err());

        let received = tokio::time::timeout(Duration::from_millis(100), wait_for_signal(async { Ok(()) })).await;
        assert!(received.is_ok());
    }

    #[tokio::test]
    async fn test_server_health_endpoint() {
        let (addr, stop, handle) = Server::spawn_test_server(ServerConfig::default()).await;

        let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "healthy");

        stop.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_solve_end_to_end() {
        let (addr, stop, handle) = Server::spawn_test_server(ServerConfig::default()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("http://{}/api/v1/root/solve", addr))
            .json(&json!({"method": "newton", "f": "x^2 - 2", "x0": 1.0, "tol": 1e-10}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["converged"], true);
        assert_relative_eq!(body["root"].as_f64().unwrap(), 2f64.sqrt(), epsilon = 1e-9);

        stop.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_body_shape() {
        let (addr, stop, handle) = Server::spawn_test_server(ServerConfig::default()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("http://{}/api/v1/root/bracket", addr))
            .json(&json!({"f": "3x+*", "a": 0.0, "b": 1.0}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
        assert_eq!(body.as_object().unwrap().len(), 1);

        stop.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_unknown_route_returns_404() {
        let (addr, stop, handle) = Server::spawn_test_server(ServerConfig::default()).await;

        let response = reqwest::get(format!("http://{}/unknown/path", addr))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        stop.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_multiple_servers_on_different_ports() {
        let (addr1, stop1, handle1) = Server::spawn_test_server(ServerConfig::default()).await;
        let (addr2, stop2, handle2) = Server::spawn_test_server(ServerConfig::default()).await;

        assert_ne!(addr1.port(), addr2.port());

        for addr in [addr1, addr2] {
            let response = reqwest::get(format!("http://{}/ready", addr)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        stop1.send(()).unwrap();
        stop2.send(()).unwrap();
        handle1.await.unwrap();
        handle2.await.unwrap();
    }
}
