use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;

use courtside_backend::auth::{Claims, JwtAuthenticator, Principal};
use courtside_backend::config::settings::{
    get_config, get_jwt_settings, AuthMode, DatabaseSettings, Settings,
};
use courtside_backend::models::user::UserRole;
use courtside_backend::run;
use courtside_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub jwt: JwtAuthenticator,
}

impl TestApp {
    /// Mints a bearer token for a fresh principal with `role`.
    pub fn bearer_for(&self, role: UserRole) -> (Principal, String) {
        let principal = Principal {
            user_id: Uuid::new_v4(),
            name: "Test Player".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            role,
        };
        let token = self
            .jwt
            .encode(&Claims::for_principal(&principal, 1))
            .expect("Failed to sign token");
        (principal, format!("Bearer {}", token))
    }
}

fn test_configuration(auth_mode: AuthMode) -> Settings {
    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.auth.mode = auth_mode;
    configuration
}

fn start(configuration: Settings, connection_pool: PgPool) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let jwt = JwtAuthenticator::new(get_jwt_settings(&configuration));
    let server = run(
        listener,
        connection_pool.clone(),
        get_jwt_settings(&configuration),
        configuration.auth.mode,
        configuration.card,
        configuration.application.cors_origins,
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
        jwt,
    }
}

/// Server whose pool never connects unless a handler touches the database.
pub async fn spawn_app(auth_mode: AuthMode) -> TestApp {
    Lazy::force(&TRACING);

    let configuration = test_configuration(auth_mode);
    let connection_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy(configuration.database.connection_string().expose_secret())
        .expect("Failed to create lazy pool");
    start(configuration, connection_pool)
}

/// Server backed by a freshly created and migrated database.
pub async fn spawn_app_with_db(auth_mode: AuthMode) -> TestApp {
    Lazy::force(&TRACING);

    let mut configuration = test_configuration(auth_mode);
    configuration.database.db_name = Uuid::new_v4().to_string();
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database).await;
    start(configuration, connection_pool)
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}
