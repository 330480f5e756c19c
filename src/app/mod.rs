use std::{io, sync::Arc};

use anyhow::{anyhow, Context};
use axum::http::{header, HeaderName, Method, Request};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::email::EmailClient;
use crate::notification::Dispatcher;
use crate::store::{NotificationLog, SubscriberStore};

mod email;
mod error;
mod health;
mod notification;
mod subscription;

#[derive(Clone)]
pub struct AppState {
    dispatcher: Dispatcher,
    subscribers: Arc<dyn SubscriberStore>,
}

fn app_router() -> Router<AppState> {
    health::router()
        .merge(email::router())
        .merge(notification::router())
        .merge(subscription::router())
}

/// Browsers call the API straight from the campaign pages.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

pub struct App {
    listener: TcpListener,
    port: u16,
    email_client: EmailClient,
    site_url: String,
}

impl App {
    pub async fn with(config: &Settings) -> anyhow::Result<Self> {
        let email_settings = &config.email_client;
        let email_client = EmailClient::new(
            email_settings.base_url.clone(),
            email_settings
                .sender()
                .map_err(|e| anyhow!(e))
                .context("The sender email should be valid.")?,
            email_settings.api_key.clone(),
            email_settings
                .reply_to()
                .map_err(|e| anyhow!(e))
                .context("The reply-to email should be valid.")?,
            email_settings.timeout(),
        );
        if email_settings.api_key.is_none() {
            tracing::warn!("no email provider API key configured, every send will fail");
        }

        let listener = TcpListener::bind(format!(
            "{}:{}",
            config.application.host, config.application.port
        ))
        .await
        .context("The listener should be able to bind the address.")?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            listener,
            port,
            email_client,
            site_url: config.application.site_url.clone(),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn serve<S>(self, store: S) -> Result<(), io::Error>
    where
        S: NotificationLog + SubscriberStore + 'static,
    {
        let store = Arc::new(store);
        let dispatcher = Dispatcher::new(self.email_client, store.clone(), self.site_url);

        let app = app_router()
            .with_state(AppState {
                dispatcher,
                subscribers: store,
            })
            .layer(cors_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                    let id = uuid::Uuid::new_v4();
                    tracing::info_span!(
                        "request",
                        method = ?request.method(),
                        uri = ?request.uri(),
                        %id,
                    )
                }),
            );

        axum::serve(self.listener, app.into_make_service()).await
    }
}
