use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use assetdesk::config::{Config, RegistrationMode};

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
    pub backup_dir: std::path::PathBuf,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Register a user with a full company profile, return (body, status).
    pub async fn register(&self, email: &str, password: &str, name: &str) -> (Value, StatusCode) {
        let local = email.split('@').next().unwrap_or("user");
        let resp = self
            .client
            .post(self.url("/api/v1/auth/register"))
            .json(&json!({
                "email": email,
                "password": password,
                "name": name,
                "department": "IT",
                "phone": "555-0100",
                "company_email": format!("{local}@example.com"),
            }))
            .send()
            .await
            .expect("register request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register the bootstrap user (first account = admin), return its token.
    pub async fn bootstrap(&self) -> String {
        let (body, status) = self
            .register("admin@test.com", "Admin-Passw0rd!", "Admin")
            .await;
        assert_eq!(status, StatusCode::OK, "bootstrap register failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Register a second, non-admin user and return its token.
    pub async fn register_member(&self, email: &str, name: &str) -> String {
        let (body, status) = self.register(email, "Member-Passw0rd!", name).await;
        assert_eq!(status, StatusCode::OK, "member register failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Create an equipment item, return the JSON.
    pub async fn create_equipment(&self, token: &str, serial: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/equipment",
                token,
                &json!({
                    "equipment_type": "laptop",
                    "brand": "Dell",
                    "model": "XPS 13",
                    "serial_number": serial,
                    "purchase_date": "2024-01-15",
                    "warranty_expiry": "2027-01-15",
                    "location": "HQ - Floor 2",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create equipment failed: {body}");
        body
    }

    /// Create a support ticket, return the JSON.
    pub async fn create_ticket(&self, token: &str, title: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/support-tickets",
                token,
                &json!({
                    "title": title,
                    "description": "Something is broken",
                    "priority": "high",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create ticket failed: {body}");
        body
    }

    /// Count audit rows for one object.
    pub async fn audit_count(&self, model_name: &str, object_id: &str) -> i64 {
        let id: Uuid = object_id.parse().expect("invalid object id");
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM audit_log WHERE model_name = $1 AND object_id = $2",
        )
        .bind(model_name)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .expect("audit count query failed")
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!(
        "assetdesk_test_{}",
        Uuid::now_v7().to_string().replace('-', "")
    );

    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let backup_dir = std::env::temp_dir().join(format!("{db_name}_backups"));
    let media_dir = std::env::temp_dir().join(format!("{db_name}_media"));

    let config = Config {
        database_url: test_url,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to a random port
        base_url: "http://localhost:0".to_string(),
        registration: RegistrationMode::Open,
        company_email_domain: "example.com".to_string(),
        backup_dir: backup_dir.clone(),
        media_dir,
        backup_retention_days: 30,
        trusted_proxies: vec![],
        log_level: "warn".to_string(),
        smtp: None,
        admin_email: None,
    };

    let app = assetdesk::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
        backup_dir,
    }
}

/// Drop the test database (and scratch dirs) after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    let backup_dir = app.backup_dir.clone();
    app.pool.close().await;

    let _ = std::fs::remove_dir_all(backup_dir);

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
