use std::time::Duration;

use anyhow::Result;

const BODY_SNIPPET_CHARS: usize = 200;

pub(crate) fn build_client(timeout_ms: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    Ok(client)
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) async fn body_snippet(resp: reqwest::Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    body.chars().take(BODY_SNIPPET_CHARS).collect()
}
