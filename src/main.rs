use myx_console::config::DevServerConfig;
use myx_console::devserver;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = DevServerConfig::from_env().expect("invalid dev server configuration");

    if let Err(e) = devserver::serve(config).await {
        tracing::error!(error = %e, "dev server stopped");
        std::process::exit(1);
    }
}
