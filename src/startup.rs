//! src/startup.rs
use crate::configuration::{DatabaseSettings, Settings, Theme};
use crate::routes::{health_check, home, subscribe};
use crate::store::PostgresStore;
use crate::subscription::SubscriptionController;
use actix_session::storage::RedisSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::FlashMessagesFramework;
use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", config.application.host, config.application.port);
        let tcp_listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {}", address))?;
        let port = tcp_listener.local_addr()?.port();

        let connection = get_connection_pool(&config.database)
            .context("Failed to create the Postgres connection pool")?;
        let controller = SubscriptionController::new(Arc::new(PostgresStore::new(connection)));

        let server = run(
            tcp_listener,
            controller,
            config.application.theme,
            config.application.hmac_secret,
            config.redis_uri,
        )
        .await?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn get_connection_pool(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy(config.connection_string().expose_secret())
}

async fn run(
    listener: TcpListener,
    controller: SubscriptionController,
    theme: Theme,
    hmac_secret: Secret<String>,
    redis_uri: Secret<String>,
) -> Result<Server, anyhow::Error> {
    let controller = web::Data::new(controller);
    let theme = web::Data::new(theme);

    let secret_key = Key::try_from(hmac_secret.expose_secret().as_bytes())
        .context("The hmac secret must be at least 64 bytes long")?;
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();
    let redis_store = RedisSessionStore::new(redis_uri.expose_secret())
        .await
        .context("Failed to connect to Redis")?;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(SessionMiddleware::new(redis_store.clone(), secret_key.clone()))
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/subscriptions", web::post().to(subscribe))
            // serving HTML
            .route("/", web::get().to(home))
            .app_data(controller.clone())
            .app_data(theme.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
