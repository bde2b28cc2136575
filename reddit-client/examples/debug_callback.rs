use reddit_client::{RedditOAuth2Config, RedditOAuthClient};
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Debug Callback URL Parsing ===\n");

    let config = RedditOAuth2Config::new(
        "test_client_id".to_string(),
        "http://localhost:8080/Reddit.NET/oauthRedirect".to_string(),
        "redditberner/1.0 debug".to_string(),
    );
    let mut client = RedditOAuthClient::new(config)?;

    let scopes = client.config().scopes.clone();
    let (auth_url, csrf_token) = client.generate_auth_url(&scopes)?;

    println!("Generated auth URL: {}", auth_url);
    println!("CSRF token: {}\n", csrf_token.secret());

    let valid = format!(
        "http://localhost:8080/Reddit.NET/oauthRedirect?code=test123&state={}",
        csrf_token.secret()
    );
    let test_urls = vec![
        valid.as_str(),
        "http://localhost:8080/Reddit.NET/oauthRedirect?error=access_denied&state=abc123",
        "http://localhost:8080/Reddit.NET/oauthRedirect?code=test123", // Missing state
        "invalid-url",
    ];

    for (i, test_url) in test_urls.iter().enumerate() {
        println!("Test {}: {}", i + 1, test_url);
        match client.handle_callback(test_url, &csrf_token) {
            Ok(code) => println!("Success: got code {}", code.secret()),
            Err(e) => println!("Error: {}", e),
        }
        println!();
    }

    println!("=== Interactive Test ===");
    println!("Paste a callback URL here:");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if !input.is_empty() {
        match client.handle_callback(input, &csrf_token) {
            Ok(code) => println!("Success: got code {}", code.secret()),
            Err(e) => println!("Error: {}", e),
        }
    }

    Ok(())
}
