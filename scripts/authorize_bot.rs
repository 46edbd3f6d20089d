//! Twitter Bot Authorization Script
//!
//! This script helps you obtain OAuth 2.0 User Context tokens for the relay.
//! It reads `CLIENT_ID`, `CLIENT_SECRET` and `REDIRECT_URI` from the environment,
//! prints the authorization URL, and exchanges the code you paste back.

use std::io::{self, Write};

use tweetrelay::oauth::{
    build_authorization_url, exchange_authorization_code, generate_code_challenge,
    generate_code_verifier, generate_state, HttpTokenEndpoint,
};
use tweetrelay::OAuthSettings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("🤖 Twitter Bot Authorization Helper");
    println!("=====================================");

    let settings = OAuthSettings::from_env()
        .ok_or("Set CLIENT_ID, CLIENT_SECRET and REDIRECT_URI before running this script")?;

    // Generate PKCE parameters
    let state = generate_state();
    let code_verifier = generate_code_verifier();
    let auth_url = build_authorization_url(
        &settings,
        &state,
        &generate_code_challenge(&code_verifier),
    )?;

    println!("\n🔗 Authorization Steps:");
    println!("1. Open this URL in your browser:");
    println!("   {}", auth_url);
    println!("\n2. Authorize the application");
    println!("3. Check that the 'state' parameter of the callback URL is {}", state);
    println!("4. Copy the 'code' parameter from the callback URL and paste it below");

    print!("\nEnter the authorization code: ");
    io::stdout().flush()?;
    let mut auth_code = String::new();
    io::stdin().read_line(&mut auth_code)?;
    let auth_code = auth_code.trim();
    if auth_code.is_empty() {
        return Err("Authorization code is required".into());
    }

    println!("\n🔄 Exchanging code for access token...");
    let endpoint = HttpTokenEndpoint::new(reqwest::Client::new(), settings.token_url.clone());
    let token = exchange_authorization_code(
        &endpoint,
        &settings,
        auth_code,
        Some(code_verifier.as_str()),
    )
    .await?;

    if !(200..300).contains(&token.status) {
        return Err(format!("Token exchange failed ({}): {}", token.status, token.body).into());
    }

    let access_token = token
        .body
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or("No access_token in response")?;

    println!("\n✅ Success! Your access token is:");
    println!("{}", access_token);
    println!("\n📝 Add this to your environment variables:");
    println!("export xapi_access_token=\"{}\"", access_token);

    if let Some(refresh_token) = token.body.get("refresh_token").and_then(|v| v.as_str()) {
        println!("\n🔄 Refresh token (keep it with your other secrets):");
        println!("{}", refresh_token);
    }

    Ok(())
}
