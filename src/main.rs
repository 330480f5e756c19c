use anyhow::Context;
use campaign_mailer::{app::App, config::get_configuration, store::PgStore, telemetry::get_subscriber};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration().context("Failed to read configuration.")?;

    get_subscriber(&config.log_level, std::io::stderr).init();

    let db = PgPoolOptions::new()
        .max_connections(50)
        .connect_lazy_with(config.database.with_db());
    let store = PgStore::new(db);
    store
        .migrate()
        .await
        .context("The migrations should run without error.")?;

    let app = App::with(&config).await?;
    tracing::info!(port = app.port(), "starting server");
    app.serve(store).await.context("The server should be running")?;

    Ok(())
}
