use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use std::time::Duration;

/// Client for the short-lived API calls (Discord, compiler, config store).
pub fn create_api_client() -> Client {
    let builder = Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(60))
        .tcp_keepalive(Duration::from_secs(30))
        .user_agent("dappsmith/0.1");

    build_client(builder)
}

/// Client for OpenRouter completions. Generation can take well over a
/// minute, hence the long request timeout.
pub fn create_ai_client() -> Client {
    let mut headers = HeaderMap::new();
    headers.insert("HTTP-Referer", HeaderValue::from_static("https://dappsmith.dev"));
    headers.insert("X-Title", HeaderValue::from_static("dappsmith"));

    let builder = Client::builder()
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(10))
        .default_headers(headers)
        .user_agent("dappsmith/0.1");

    build_client(builder)
}

fn build_client(builder: reqwest::ClientBuilder) -> Client {
    builder.build().expect("Failed to build client")
}
