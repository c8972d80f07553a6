use dotenvy::dotenv;
use stock_service::config::Settings;
use stock_service::{build_server, create_pool, run_migrations, BoxError};

#[actix_web::main]
async fn main() -> Result<(), BoxError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env()?;

    let pool = create_pool(&settings.database_url, settings.pool_size)?;
    run_migrations(&pool)?;

    log::info!(
        "Starting server at http://{}:{}",
        settings.host,
        settings.port
    );

    build_server(pool, &settings.host, settings.port)?.await?;
    Ok(())
}
