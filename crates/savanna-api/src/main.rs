use savanna_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (database, seed settings, routes)
    let (_state, router) = savanna_api::setup::initialize_app(config.clone()).await?;

    savanna_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
