use std::time::Duration;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use renova_contracts::render::SourceImage;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;

use crate::capabilities::ImageFetcher;

/// Downloads reference photos over HTTP(S); also accepts base64 `data:` URLs
/// the chat layer uses for fresh uploads.
pub struct HttpImageFetcher {
    http: HttpClient,
    timeout: Duration,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: HttpClient::new(),
            timeout,
        }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<SourceImage> {
        let url = url.trim();
        if url.starts_with("data:") {
            return decode_data_url(url);
        }
        let response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .with_context(|| format!("source image request failed ({url})"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("source image request failed ({}): {url}", status.as_u16());
        }
        let header_mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or_default().trim().to_string());
        let bytes = response
            .bytes()
            .context("source image body read failed")?
            .to_vec();
        let mime_type = resolve_mime(header_mime.as_deref(), &bytes)?;
        Ok(SourceImage { bytes, mime_type })
    }
}

fn decode_data_url(url: &str) -> Result<SourceImage> {
    let Some((header, data)) = url["data:".len()..].split_once(',') else {
        bail!("malformed data URL");
    };
    let Some(declared) = header.strip_suffix(";base64") else {
        bail!("data URL is not base64 encoded");
    };
    let bytes = BASE64
        .decode(data.trim().as_bytes())
        .context("data URL base64 decode failed")?;
    let mime_type = resolve_mime(Some(declared), &bytes)?;
    Ok(SourceImage { bytes, mime_type })
}

/// Trusts an `image/*` declaration, otherwise sniffs the bytes.
fn resolve_mime(declared: Option<&str>, bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        bail!("source image is empty");
    }
    if let Some(mime) = declared.filter(|value| value.starts_with("image/")) {
        return Ok(mime.to_string());
    }
    let format = image::guess_format(bytes).context("source is not a recognised image")?;
    Ok(format.to_mime_type().to_string())
}
