use trendai::configuration::get_configuration;
use trendai::startup::Application;
use trendai::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("trendai".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_configuration()?;
    let app = Application::build(config).await?;
    tracing::info!("Listening on port {}", app.port());
    app.run_until_stopped().await?;

    Ok(())
}
