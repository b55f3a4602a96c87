// API server implementation
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;

use crate::auth::TokenManager;
use crate::storage::{Registry, UploadStore};
use super::routes;

/// API server configuration
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            enable_cors: false,
        }
    }
}

/// Shared state handed to every request handler
pub struct AppState {
    pub registry: Registry,
    pub uploads: Arc<dyn UploadStore + Send + Sync>,
    pub tokens: TokenManager,
}

impl AppState {
    /// Create the shared state
    pub fn new(
        registry: Registry,
        uploads: Arc<dyn UploadStore + Send + Sync>,
        tokens: TokenManager,
    ) -> Self {
        AppState {
            registry,
            uploads,
            tokens,
        }
    }
}

/// API server
pub struct Server {
    config: ServerConfig,
    state: web::Data<AppState>,
}

impl Server {
    /// Create a new API server
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        Server {
            config,
            state: web::Data::new(state),
        }
    }

    /// Run the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let state = self.state.clone();
        let enable_cors = self.config.enable_cors;

        info!(
            "Starting server at http://{}:{}",
            self.config.host, self.config.port
        );

        HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600)
            } else {
                Cors::default()
            };

            App::new()
                .app_data(state.clone())
                .wrap(cors)
                .configure(routes::configure)
        })
        .workers(self.config.workers)
        .bind((self.config.host.as_str(), self.config.port))?
        .run()
        .await
    }
}
