use anyhow::Context;
use gatehouse::{config, startup::App, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load `.env` into the process environment before anything reads it.
    dotenvy::dotenv().ok();

    // telemetry
    let subscriber = telemetry::get_subscriber("gatehouse", "info", std::io::stdout);
    telemetry::init_subscriber(subscriber);

    // config
    let config = config::get().context("Failed to read configuration")?;

    // build and run the one application object for this process
    let app = App::build(&config)
        .await
        .context("Failed to build application")?;
    app.run_until_stopped().await
}
