//! The forgemock binary: bind and serve the mock server.
//!
//! Configuration comes from the environment:
//!
//! - `FORGEMOCK_ADDR` - bind address, default `127.0.0.1:8080`
//! - `FORGEMOCK_BASE_URL` - advertised base URL, default `http://<addr>`
//! - `RUST_LOG` - tracing filter, default `forgemock=info`

use forgemock_server::{MockServer, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("forgemock=info")),
        )
        .init();

    let addr =
        std::env::var("FORGEMOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let base_url =
        std::env::var("FORGEMOCK_BASE_URL").unwrap_or_else(|_| format!("http://{addr}"));

    let config = ServerConfig::new().addr(addr).base_url(base_url);
    MockServer::new(config).serve().await
}
