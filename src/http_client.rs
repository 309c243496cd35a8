use std::time::Duration;

use anyhow::{Context, Result, bail};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "sgl-terminal/0.1 (+https://sgl.tds104-senac.online/)";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// GET `url` (with optional query pairs) and return the body as text.
/// Non-2xx responses become errors carrying a short body snippet.
pub fn fetch_text(url: &str, query: &[(&str, &str)]) -> Result<String> {
    let client = http_client()?;
    let mut request = client.get(url);
    if !query.is_empty() {
        request = request.query(query);
    }
    let resp = request.send().with_context(|| format!("request failed: {url}"))?;
    let status = resp.status();
    let body = resp
        .text()
        .with_context(|| format!("failed to read response body: {url}"))?;
    if !status.is_success() {
        let snippet: String = body.trim().chars().take(200).collect();
        bail!("http {status} from {url}: {snippet}");
    }
    Ok(body)
}
