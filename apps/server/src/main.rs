use anyhow::Context;
use ogmap::domain::config::ApiConfig;
use ogmap::kernel::config::load_config;
use ogmap_logger::Logger;
use ogmap_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Explicit file path; otherwise `ogmap.{toml,yaml,json}` in the working directory is optional.
    let path = std::env::var("OGMAP_CONFIG").ok();
    let cfg: ApiConfig = load_config(path).context("Critical: Configuration is malformed")?;

    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    Server::builder().config(cfg).build()?.run().await
}
