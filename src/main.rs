use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use recruiter_rater::config::{LoggingSettings, Settings};
use recruiter_rater::core::RatingWorkflow;
use recruiter_rater::error::{handle_json_payload_error, handle_query_payload_error};
use recruiter_rater::routes::{self, AppState};
use recruiter_rater::services::PostgresClient;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("error"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(format!("Configuration error: {e}")));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Recruiter Rater API...");

    let postgres = match PostgresClient::from_settings(&settings.database).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to connect to PostgreSQL: {}", e);
            return Err(std::io::Error::other(format!("PostgreSQL connection error: {e}")));
        }
    };

    let workflow = RatingWorkflow::new(postgres.clone(), postgres.clone(), settings.rating.strategy);

    info!("Rating workflow initialized with {:?} strategy", settings.rating.strategy);

    let app_state = AppState {
        recruiters: postgres.clone(),
        reviews: postgres,
        workflow,
        recent_limit: settings.reviews.recent_limit,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting HTTP server on {}:{}", host, port);

    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec!["Accept", "Authorization", "Content-Type", "X-CSRF-Token"])
            .expose_headers(vec!["Link"])
            .max_age(300);

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .shutdown_timeout(settings.server.shutdown_timeout_secs);

    if let Some(workers) = settings.server.workers {
        server = server.workers(workers);
    }

    // SIGINT/SIGTERM trigger a graceful shutdown
    server.bind((host, port))?.run().await?;

    info!("Server exited");

    Ok(())
}
