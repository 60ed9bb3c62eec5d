use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mock_prana::Sidecar;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8078".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "mock prana sidecar listening");

    let sidecar = Sidecar::new()
        .property("eureka.vipAddress", "quotes-vip")
        .property("eureka.port", "5000")
        .host("quotes", "quotes-vip", "h1.internal")
        .host("quotes", "quotes-vip", "h2.internal");
    mock_prana::run(listener, sidecar).await
}
