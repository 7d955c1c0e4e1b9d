use std::{
    fs::File,
    io::{
        BufWriter,
        Write,
    },
    path::Path,
    time::Duration,
};

use reqwest::{
    header::{
        ACCEPT_ENCODING,
        USER_AGENT,
    },
    Client,
};

use crate::core::SukiyakiError;

pub fn http_client() -> Result<Client, SukiyakiError> {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| SukiyakiError::Custom(format!("HTTP client build failed: {e}")))
}

/// Downloads `url` into `path`, retrying twice with escalating delays. Meant
/// for large one-shot artifacts (the analyzer dictionary), not for lookups.
pub async fn download_to_file(client: &Client, url: &str, path: &Path) -> Result<(), SukiyakiError> {
    let mut attempts: usize = 0;
    loop {
        attempts += 1;

        let resp = client
            .get(url)
            .header(USER_AGENT, "sukiyaki/0.1 (+reqwest)")
            .header(ACCEPT_ENCODING, "identity")
            .send()
            .await;

        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                if attempts < 3 {
                    tokio::time::sleep(Duration::from_secs(2 * attempts as u64)).await;
                    continue;
                }
                return Err(SukiyakiError::Custom(format!("Failed HTTP GET {}: {}", url, e)));
            }
        };

        if !resp.status().is_success() {
            return Err(SukiyakiError::Custom(format!(
                "HTTP error {} from {}",
                resp.status(),
                resp.url()
            )));
        }

        match resp.bytes().await {
            Ok(bytes) if !bytes.is_empty() => {
                let mut writer = BufWriter::new(File::create(path).map_err(|e| {
                    SukiyakiError::Custom(format!("Create download file {:?} failed: {}", path, e))
                })?);
                writer.write_all(&bytes)?;
                writer.flush().ok();
                return Ok(());
            }
            Ok(_) | Err(_) => {
                if attempts < 3 {
                    tokio::time::sleep(Duration::from_secs(2 * attempts as u64)).await;
                    continue;
                }
                return Err(SukiyakiError::Custom(
                    "Failed to copy response body to file".to_string(),
                ));
            }
        }
    }
}
