mod application;
mod domain;
mod infrastructure;
mod presentation;

#[cfg(test)]
mod testing;

use infrastructure::{AppConfig, AppContainer, init_logging};
use presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_logging(&config.logging)?;

    tracing::info!("Starting docchat v{}", env!("CARGO_PKG_VERSION"));

    let container = AppContainer::new(&config).await?;
    let server = HttpServer::new(
        container.chat_handler.clone(),
        container.document_handler.clone(),
        config.server.clone(),
    );

    server.run().await
}
