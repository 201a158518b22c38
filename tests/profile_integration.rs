use account_service::auth::SessionRegistry;
use account_service::configuration::{get_configuration, DatabaseSettings};
use account_service::notification_client::NotificationClient;
use account_service::startup::run;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    let connection_pool = configure_database(&configuration.database).await;

    let notifier = NotificationClient::new(
        configuration.notification.base_url.clone(),
        reqwest::Client::new(),
    );

    let server = run(
        listener,
        connection_pool.clone(),
        configuration.jwt.clone(),
        SessionRegistry::new(),
        notifier,
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
    }
}

async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");
    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

/// Register a throwaway account and return a bearer token for it.
async fn bearer_token(app: &TestApp) -> String {
    let client = reqwest::Client::new();

    client
        .post(&format!("{}/register", &app.address))
        .json(&json!({ "name": "operator", "password": "pw1" }))
        .send()
        .await
        .expect("Failed to execute request.");

    let response = client
        .post(&format!("{}/login", &app.address))
        .form(&[("username", "operator"), ("password", "pw1")])
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    format!(
        "Bearer {}",
        body["access_token"].as_str().expect("No access token")
    )
}

fn sample_profile(id: i64) -> Value {
    json!({ "id": id, "name": "John Doe", "city": "Busan", "isMale": true })
}

#[tokio::test]
async fn add_profile_returns_201_and_getbyid_is_public() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let auth = bearer_token(&app).await;

    let response = client
        .post(&format!("{}/adduser", &app.address))
        .header("Authorization", &auth)
        .json(&sample_profile(7))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(201, response.status().as_u16());

    // The by-id read requires no token
    let response = client
        .get(&format!("{}/getbyid/7", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], 7);
    assert_eq!(body["name"], "John Doe");
    assert_eq!(body["city"], "Busan");
    assert_eq!(body["isMale"], true);
}

#[tokio::test]
async fn add_duplicate_profile_id_returns_409() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let auth = bearer_token(&app).await;

    let first = client
        .post(&format!("{}/adduser", &app.address))
        .header("Authorization", &auth)
        .json(&sample_profile(7))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(201, first.status().as_u16());

    let second = client
        .post(&format!("{}/adduser", &app.address))
        .header("Authorization", &auth)
        .json(&sample_profile(7))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(409, second.status().as_u16());
}

#[tokio::test]
async fn add_profile_returns_400_for_empty_fields() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let auth = bearer_token(&app).await;

    let response = client
        .post(&format!("{}/adduser", &app.address))
        .header("Authorization", &auth)
        .json(&json!({ "id": 7, "name": "", "city": "Busan", "isMale": true }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn update_profile_returns_202_with_new_values() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let auth = bearer_token(&app).await;

    client
        .post(&format!("{}/adduser", &app.address))
        .header("Authorization", &auth)
        .json(&sample_profile(7))
        .send()
        .await
        .expect("Failed to execute request.");

    let response = client
        .put(&format!("{}/updateuser/7", &app.address))
        .header("Authorization", &auth)
        .json(&json!({ "id": 7, "name": "Jane Doe", "city": "Seoul", "isMale": false }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(202, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Jane Doe");
    assert_eq!(body["city"], "Seoul");
    assert_eq!(body["isMale"], false);

    let stored: (String,) = sqlx::query_as("SELECT city FROM profiles WHERE id = 7")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch profile");
    assert_eq!(stored.0, "Seoul");
}

#[tokio::test]
async fn update_missing_profile_returns_404() {
    let app = spawn_app().await;
    let auth = bearer_token(&app).await;

    let response = reqwest::Client::new()
        .put(&format!("{}/updateuser/999", &app.address))
        .header("Authorization", &auth)
        .json(&sample_profile(999))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn delete_profile_returns_the_deleted_row() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let auth = bearer_token(&app).await;

    client
        .post(&format!("{}/adduser", &app.address))
        .header("Authorization", &auth)
        .json(&sample_profile(7))
        .send()
        .await
        .expect("Failed to execute request.");

    let response = client
        .delete(&format!("{}/deleteuser/7", &app.address))
        .header("Authorization", &auth)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], 7);

    // A second delete finds nothing
    let response = client
        .delete(&format!("{}/deleteuser/7", &app.address))
        .header("Authorization", &auth)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn getbyid_returns_404_for_missing_profile() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(&format!("{}/getbyid/12345", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn list_profiles_requires_authentication() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let unauthenticated = client
        .get(&format!("{}/getallusers", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, unauthenticated.status().as_u16());

    let auth = bearer_token(&app).await;
    client
        .post(&format!("{}/adduser", &app.address))
        .header("Authorization", &auth)
        .json(&sample_profile(1))
        .send()
        .await
        .expect("Failed to execute request.");
    client
        .post(&format!("{}/adduser", &app.address))
        .header("Authorization", &auth)
        .json(&sample_profile(2))
        .send()
        .await
        .expect("Failed to execute request.");

    let response = client
        .get(&format!("{}/getallusers", &app.address))
        .header("Authorization", &auth)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().expect("Expected a JSON array").len(), 2);
}

#[tokio::test]
async fn mutating_profile_routes_require_authentication() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let add = client
        .post(&format!("{}/adduser", &app.address))
        .json(&sample_profile(7))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, add.status().as_u16());

    let update = client
        .put(&format!("{}/updateuser/7", &app.address))
        .json(&sample_profile(7))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, update.status().as_u16());

    let delete = client
        .delete(&format!("{}/deleteuser/7", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, delete.status().as_u16());
}
