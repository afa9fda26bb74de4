use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::handler::RequestHandler;
use crate::static_files::ResourceResolver;
use crate::store::RecordStore;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!(
        root = %cfg.static_files.root.display(),
        store = %cfg.store.path.display(),
        "Listening on {}",
        cfg.server.listen_addr
    );

    let handler = RequestHandler::new(
        ResourceResolver::new(cfg.static_files.root.clone()),
        RecordStore::new(cfg.store.path.clone()),
    );

    serve(listener, handler, cfg.server.read_timeout()).await
}

/// Accepts connections forever, one task per connection.
pub async fn serve(listener: TcpListener, handler: RequestHandler, read_timeout: Duration) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("[{}] CONNECTED", peer);

        let handler = handler.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, handler, read_timeout);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
            info!("[{}] DISCONNECTED", peer);
        });
    }
}
