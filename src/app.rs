//! Application state and router assembly.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::require_api_key;
use crate::config::{AppConfig, OAuthSettings};
use crate::error::ApiError;
use crate::handlers::{
    handle_authorize, handle_callback, handle_create_thread, handle_create_tweet,
    handle_get_tweet, handle_health, handle_oauth_refresh, handle_oauth_token,
    handle_reply_to_tweet, handle_search_tweets,
};
use crate::oauth::{DisabledTokenEndpoint, HttpTokenEndpoint, OAuthError, TokenEndpoint};
use crate::twitter::{TweetClient, XApiClient};

/// State shared by every request: the gate secret and the upstream clients.
#[derive(Clone)]
pub struct AppState {
    pub api_key: Arc<str>,
    pub oauth: Option<Arc<OAuthSettings>>,
    pub twitter: Arc<dyn TweetClient>,
    pub tokens: Arc<dyn TokenEndpoint>,
}

impl AppState {
    /// Wires the real Twitter/X client and token endpoint. Both share one
    /// `reqwest::Client` that lives as long as the server.
    pub fn from_config(config: AppConfig) -> Self {
        let http = reqwest::Client::new();

        let tokens: Arc<dyn TokenEndpoint> = match &config.oauth {
            Some(settings) => Arc::new(HttpTokenEndpoint::new(
                http.clone(),
                settings.token_url.clone(),
            )),
            None => Arc::new(DisabledTokenEndpoint),
        };
        let twitter = Arc::new(XApiClient::new(
            http,
            config.api_base_url,
            config.access_token,
        ));

        AppState {
            api_key: Arc::from(config.api_key),
            oauth: config.oauth.map(Arc::new),
            twitter,
            tokens,
        }
    }

    pub fn oauth_settings(&self) -> Result<&OAuthSettings, ApiError> {
        self.oauth
            .as_deref()
            .ok_or(ApiError::OAuth(OAuthError::NotConfigured))
    }
}

/// Builds the HTTP application with all routes and middleware.
///
/// # Routes
///
/// Open:
/// - `GET /health`
/// - `POST /oauth/token`
/// - `GET /authorize`, `GET /callback` (browser redirect flow)
///
/// Behind the bearer gate:
/// - `POST /tweet`, `POST /tweet/:tweet_id/reply`, `POST /thread`
/// - `GET /tweet/:tweet_id`, `GET /tweets/search`
/// - `POST /oauth/refresh`
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/tweet", post(handle_create_tweet))
        .route("/tweet/:tweet_id", get(handle_get_tweet))
        .route("/tweet/:tweet_id/reply", post(handle_reply_to_tweet))
        .route("/thread", post(handle_create_thread))
        .route("/tweets/search", get(handle_search_tweets))
        .route("/oauth/refresh", post(handle_oauth_refresh))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(handle_health))
        .route("/oauth/token", post(handle_oauth_token))
        .route("/authorize", get(handle_authorize))
        .route("/callback", get(handle_callback))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
