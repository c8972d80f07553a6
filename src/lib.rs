pub mod application;
pub mod config;
pub mod credentials;
pub mod db;
pub mod domain;
pub mod errors;
#[cfg(feature = "graphql")]
pub mod graphql;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use domain::catalog::MAX_IMAGE_BYTES;
use errors::AppError;
use handlers::ApiDoc;
use infrastructure::catalog_repo::DieselCatalogRepository;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), BoxError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        log::info!("Applied migration {}", version);
    }
    Ok(())
}

/// Services shared by every worker.
pub struct AppState {
    pub orders: OrderService<DieselOrderRepository>,
    pub catalog: CatalogService<DieselCatalogRepository>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            orders: OrderService::new(DieselOrderRepository::new(pool.clone())),
            catalog: CatalogService::new(DieselCatalogRepository::new(pool)),
        }
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState::new(pool));
    let openapi = ApiDoc::openapi();
    #[cfg(feature = "graphql")]
    let schema = web::Data::new(graphql::build_schema(state.clone()));

    Ok(HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _| {
                AppError::NotFound(err.to_string()).into()
            }))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(handlers::categories::list_categories))
                    .route("", web::post().to(handlers::categories::save_category))
                    .route("/{id}", web::get().to(handlers::categories::get_category)),
            )
            .service(
                web::scope("/items")
                    .route("", web::get().to(handlers::items::list_items))
                    .route("", web::post().to(handlers::items::save_item))
                    .route("/{id}", web::get().to(handlers::items::get_item))
                    .service(
                        web::resource("/{id}/images")
                            .app_data(web::PayloadConfig::new(MAX_IMAGE_BYTES))
                            .route(web::post().to(handlers::images::upload_image))
                            .route(web::get().to(handlers::images::list_images)),
                    ),
            )
            .service(
                web::scope("/images")
                    .route("/{id}", web::get().to(handlers::images::download_image))
                    .route("/{id}", web::delete().to(handlers::images::delete_image)),
            )
            .service(
                web::scope("/market-places")
                    .route("", web::get().to(handlers::market_places::list_market_places))
                    .route("", web::post().to(handlers::market_places::save_market_place))
                    .route("/{id}", web::get().to(handlers::market_places::get_market_place)),
            )
            .service(
                web::scope("/{collection:purchases|sales}")
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("", web::post().to(handlers::orders::save_order))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}", web::delete().to(handlers::orders::delete_order)),
            );

        #[cfg(feature = "graphql")]
        let app = app.app_data(schema.clone()).service(
            web::resource("/graphql")
                .route(web::post().to(graphql::graphql_handler))
                .route(web::get().to(graphql::graphql_sdl)),
        );

        app
    })
    .bind((host.to_string(), port))?
    .run())
}
