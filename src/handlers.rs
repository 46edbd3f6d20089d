//! HTTP route handlers for the tweetrelay service.
//!
//! Each handler validates its input first and only then calls upstream, so a
//! request missing a required field never reaches Twitter/X or the OAuth
//! provider. Results are reshaped into small JSON projections.

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{
        header::{COOKIE, LOCATION, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{AppendHeaders, IntoResponse, Json, Response},
};
use cookie::{time::Duration, Cookie, SameSite};
use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::{ApiError, Result};
use crate::oauth::{
    build_authorization_url, exchange_authorization_code, generate_code_challenge,
    generate_code_verifier, generate_state, refresh_access_token, TokenResponse,
};
use crate::twitter::{post_thread, Author, SearchProduct, Tweet};

/// Cookie binding a redirect to the `state` it was issued with.
pub const STATE_COOKIE: &str = "oauth_state";
/// Cookie carrying the PKCE verifier between `/authorize` and `/callback`.
pub const VERIFIER_COOKIE: &str = "oauth_verifier";
const FLOW_COOKIE_MINUTES: i64 = 10;
const DEFAULT_SEARCH_COUNT: u32 = 20;

/// Parses a request body as JSON. Empty or invalid bodies yield `None`.
fn parse_json_body(body: &Bytes) -> Option<Value> {
    serde_json::from_slice(body).ok()
}

/// Returns a string field of the body if it is present and not blank.
fn required_text<'a>(data: Option<&'a Value>, field: &str) -> Option<&'a str> {
    data?
        .get(field)?
        .as_str()
        .filter(|text| !text.trim().is_empty())
}

fn author_json(author: Option<&Author>) -> Value {
    match author {
        Some(author) => json!({
            "id": author.id,
            "name": author.name,
            "username": author.username
        }),
        None => Value::Null,
    }
}

fn search_result_json(tweet: &Tweet) -> Value {
    json!({
        "id": tweet.id,
        "text": tweet.text,
        "author": author_json(tweet.author.as_ref()),
        "created_at": tweet.created_at.map(|dt| dt.to_rfc3339())
    })
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "tweetrelay"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "tweetrelay"}))
}

/// Handles POST requests to the `/tweet` endpoint.
///
/// # Request
///
/// ```json
/// { "text": "Hello world" }
/// ```
///
/// # Success Response
///
/// ```json
/// { "id": "1445880548472328192", "text": "Hello world" }
/// ```
pub async fn handle_create_tweet(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>> {
    let data = parse_json_body(&body);
    let text = required_text(data.as_ref(), "text")
        .ok_or_else(|| ApiError::bad_request("No tweet text provided"))?;

    let tweet = state.twitter.create_tweet(text, None).await?;
    info!("Tweet {} posted", tweet.id);
    Ok(Json(json!({"id": tweet.id, "text": tweet.text})))
}

/// Handles POST requests to the `/tweet/:tweet_id/reply` endpoint.
pub async fn handle_reply_to_tweet(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<Value>> {
    let Path(tweet_id) = path?;
    let data = parse_json_body(&body);
    let text = required_text(data.as_ref(), "text")
        .ok_or_else(|| ApiError::bad_request("No reply text provided"))?;

    let tweet = state.twitter.create_tweet(text, Some(tweet_id.as_str())).await?;
    info!("Reply {} posted to tweet {}", tweet.id, tweet_id);
    Ok(Json(json!({
        "id": tweet.id,
        "text": tweet.text,
        "in_reply_to": tweet_id
    })))
}

/// Handles POST requests to the `/thread` endpoint.
///
/// The body must be `{"tweets": ["first", "second", ...]}` with at least one
/// non-blank text. A failure part way through returns a 500; tweets posted
/// before the failure are not deleted.
pub async fn handle_create_thread(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>> {
    let data = parse_json_body(&body);
    let texts = data
        .as_ref()
        .and_then(|data| data.get("tweets"))
        .and_then(|tweets| tweets.as_array())
        .and_then(|items| {
            items
                .iter()
                .map(|item| {
                    item.as_str()
                        .filter(|text| !text.trim().is_empty())
                        .map(str::to_string)
                })
                .collect::<Option<Vec<String>>>()
        })
        .filter(|texts| !texts.is_empty())
        .ok_or_else(|| ApiError::bad_request("No tweets provided"))?;

    let thread = post_thread(state.twitter.as_ref(), &texts).await?;
    let thread: Vec<Value> = thread
        .iter()
        .map(|tweet| json!({"id": tweet.id, "text": tweet.text}))
        .collect();

    Ok(Json(json!({ "thread": thread })))
}

/// Handles GET requests to the `/tweet/:tweet_id` endpoint.
///
/// # Success Response
///
/// ```json
/// {
///   "id": "20",
///   "text": "just setting up my twttr",
///   "author": { "id": "12", "name": "jack", "username": "jack" }
/// }
/// ```
pub async fn handle_get_tweet(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<Value>> {
    let Path(tweet_id) = path?;
    let tweet = state
        .twitter
        .get_tweet(&tweet_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tweet not found".to_string()))?;

    Ok(Json(json!({
        "id": tweet.id,
        "text": tweet.text,
        "author": author_json(tweet.author.as_ref())
    })))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    /// `Latest` (default) or `Top`
    pub product: Option<String>,
    pub count: Option<String>,
}

/// Handles GET requests to the `/tweets/search?query=...` endpoint.
pub async fn handle_search_tweets(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(params) = query?;
    let query = params
        .query
        .as_deref()
        .filter(|query| !query.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No search query provided"))?;

    let product = match params.product.as_deref() {
        None => SearchProduct::default(),
        Some(raw) => SearchProduct::parse(raw)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid search product '{}'", raw)))?,
    };

    let count = match params.count.as_deref() {
        None => DEFAULT_SEARCH_COUNT,
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid count '{}'", raw)))?,
    };

    let tweets = state.twitter.search_tweets(query, product, count).await?;
    let tweets: Vec<Value> = tweets.iter().map(search_result_json).collect();

    Ok(Json(json!({ "tweets": tweets })))
}

/// Handles POST requests to the `/oauth/token` endpoint.
///
/// Body: `{"code": "...", "code_verifier": "..."}` where `code_verifier` is
/// only needed when the code was issued against a PKCE challenge. The
/// provider's response is returned unchanged.
pub async fn handle_oauth_token(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<TokenResponse> {
    let data = parse_json_body(&body);
    let code = required_text(data.as_ref(), "code")
        .ok_or_else(|| ApiError::bad_request("No authorization code provided"))?;
    let code_verifier = required_text(data.as_ref(), "code_verifier");

    let settings = state.oauth_settings()?;
    let token = exchange_authorization_code(state.tokens.as_ref(), settings, code, code_verifier)
        .await?;
    Ok(token)
}

/// Handles POST requests to the `/oauth/refresh` endpoint.
///
/// Body: `{"refresh_token": "..."}`. The provider's response is returned unchanged.
pub async fn handle_oauth_refresh(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<TokenResponse> {
    let data = parse_json_body(&body);
    let refresh_token = required_text(data.as_ref(), "refresh_token")
        .ok_or_else(|| ApiError::bad_request("No refresh token provided"))?;

    let settings = state.oauth_settings()?;
    let token = refresh_access_token(state.tokens.as_ref(), settings, refresh_token).await?;
    Ok(token)
}

fn flow_cookie(name: &'static str, value: String, secure: bool) -> String {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::minutes(FLOW_COOKIE_MINUTES))
        .build()
        .to_string()
}

fn expired_cookie(name: &'static str) -> String {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .build()
        .to_string()
}

fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw))
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Handles GET requests to the `/authorize` endpoint.
///
/// Redirects the browser to the provider with a fresh `state` and PKCE
/// challenge. Both the state and the verifier are kept in short-lived
/// HttpOnly cookies so `/callback` can check and use them.
pub async fn handle_authorize(State(state): State<AppState>) -> Result<Response> {
    let settings = state.oauth_settings()?;

    let oauth_state = generate_state();
    let code_verifier = generate_code_verifier();
    let url = build_authorization_url(
        settings,
        &oauth_state,
        &generate_code_challenge(&code_verifier),
    )?;
    let secure = settings.redirect_uri.starts_with("https://");

    info!("Redirecting to OAuth provider at {}", settings.authorize_url);
    Ok((
        StatusCode::FOUND,
        AppendHeaders([
            (LOCATION, url.to_string()),
            (SET_COOKIE, flow_cookie(STATE_COOKIE, oauth_state, secure)),
            (SET_COOKIE, flow_cookie(VERIFIER_COOKIE, code_verifier, secure)),
        ]),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Handles GET requests to the `/callback` endpoint.
///
/// # Errors
///
/// - 400 when the provider reports an error
/// - 400 when `code` is missing
/// - 400 when `state` does not match the value issued by `/authorize`
pub async fn handle_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: std::result::Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response> {
    let Query(params) = query?;
    if let Some(error) = params.error {
        warn!("OAuth provider returned an error: {}", error);
        let message = match params.error_description {
            Some(description) => format!("OAuth provider error: {} ({})", error, description),
            None => format!("OAuth provider error: {}", error),
        };
        return Err(ApiError::BadRequest(message));
    }

    let code = params
        .code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No authorization code provided"))?;

    let expected_state = read_cookie(&headers, STATE_COOKIE);
    match (params.state.as_deref(), expected_state.as_deref()) {
        (Some(received), Some(expected)) if received == expected => {}
        _ => {
            warn!("OAuth callback state does not match the issued state");
            return Err(ApiError::bad_request("Invalid OAuth state"));
        }
    }

    let settings = state.oauth_settings()?;
    let code_verifier = read_cookie(&headers, VERIFIER_COOKIE);
    let token = exchange_authorization_code(
        state.tokens.as_ref(),
        settings,
        &code,
        code_verifier.as_deref(),
    )
    .await?;

    Ok((
        AppendHeaders([
            (SET_COOKIE, expired_cookie(STATE_COOKIE)),
            (SET_COOKIE, expired_cookie(VERIFIER_COOKIE)),
        ]),
        token,
    )
        .into_response())
}
