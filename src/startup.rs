use actix_web::{middleware::Logger, web, App, HttpServer};
use actix_web::dev::Server;
use sqlx::PgPool;
use std::net::TcpListener;

use crate::auth::SessionRegistry;
use crate::configuration::JwtSettings;
use crate::logger::LoggerMiddleware;
use crate::middleware::AuthMiddleware;
use crate::notification_client::NotificationClient;
use crate::routes::{
    create_profile, delete_profile, get_profile, health_check, list_profiles, list_registered,
    login, logout, register, update_profile,
};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_config: JwtSettings,
    registry: SessionRegistry,
    notifier: NotificationClient,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let jwt_config_data = web::Data::new(jwt_config.clone());
    let registry_data = web::Data::new(registry.clone());
    let notifier_data = web::Data::new(notifier);

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(connection.clone())
            .app_data(jwt_config_data.clone())
            .app_data(registry_data.clone())
            .app_data(notifier_data.clone())

            // Public routes (no authentication required)
            .route("/health_check", web::get().to(health_check))
            .route("/register", web::post().to(register))
            .route("/registeredusers", web::get().to(list_registered))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/getbyid/{profile_id}", web::get().to(get_profile))

            // Protected routes (require a live bearer token)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware::new(jwt_config.clone(), registry.clone()))
                    .route("/getallusers", web::get().to(list_profiles))
                    .route("/adduser", web::post().to(create_profile))
                    .route("/updateuser/{profile_id}", web::put().to(update_profile))
                    .route("/deleteuser/{profile_id}", web::delete().to(delete_profile)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
