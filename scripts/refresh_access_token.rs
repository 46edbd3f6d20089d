//! Twitter Bot Token Refresh Utility
//!
//! This script refreshes an OAuth 2.0 User Context access token when it
//! expires, using the OAuth client from `CLIENT_ID`, `CLIENT_SECRET` and
//! `REDIRECT_URI`.

use std::io::{self, Write};

use tweetrelay::oauth::{refresh_access_token, HttpTokenEndpoint};
use tweetrelay::OAuthSettings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("🔄 Twitter Bot Token Refresh Utility");
    println!("====================================");

    let settings = OAuthSettings::from_env()
        .ok_or("Set CLIENT_ID, CLIENT_SECRET and REDIRECT_URI before running this script")?;

    print!("Enter your refresh token: ");
    io::stdout().flush()?;
    let mut refresh_token = String::new();
    io::stdin().read_line(&mut refresh_token)?;
    let refresh_token = refresh_token.trim();
    if refresh_token.is_empty() {
        return Err("Refresh token is required".into());
    }

    println!("\n🔄 Refreshing access token...");
    let endpoint = HttpTokenEndpoint::new(reqwest::Client::new(), settings.token_url.clone());
    let token = refresh_access_token(&endpoint, &settings, refresh_token).await?;

    if !(200..300).contains(&token.status) {
        return Err(format!("Token refresh failed ({}): {}", token.status, token.body).into());
    }

    let access_token = token
        .body
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or("No access_token in response")?;

    println!("\n✅ Success! Your new access token is:");
    println!("{}", access_token);
    println!("\n📝 Update your access token:");
    println!("   export xapi_access_token=\"{}\"", access_token);

    // A rotated refresh token invalidates the old one
    if let Some(new_refresh_token) = token.body.get("refresh_token").and_then(|v| v.as_str()) {
        println!("\n⚠️  IMPORTANT: Your old refresh token is now invalid!");
        println!("   New refresh token: {}", new_refresh_token);
    }

    Ok(())
}
