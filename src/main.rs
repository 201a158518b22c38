use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;

use account_service::auth::SessionRegistry;
use account_service::configuration::get_configuration;
use account_service::notification_client::NotificationClient;
use account_service::startup::run;
use account_service::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let connection_string = configuration.database.connection_string();
    tracing::info!("Attempting to connect to database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    tracing::info!("Database connection pool created successfully");

    let address = format!("127.0.0.1:{}", configuration.application.port);
    tracing::info!("Binding server to address: {}", address);

    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    // Logged-out tokens live here for the life of the process. A restart
    // empties the set; unexpired tokens become usable again until they
    // expire on their own.
    let registry = SessionRegistry::new();

    let notifier = NotificationClient::new(
        configuration.notification.base_url.clone(),
        reqwest::Client::new(),
    );

    let server = run(
        listener,
        pool,
        configuration.jwt.clone(),
        registry,
        notifier,
    )?;
    tracing::info!("Server started successfully");

    let _ = server.await;

    Ok(())
}
