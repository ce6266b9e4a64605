//! Remote size probing.
//!
//! Servers that reject HEAD requests (common for redirected release assets)
//! usually still honor a single-byte ranged GET, so the probe falls back to
//! reading the total from the `Content-Range` header.

use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, HeaderMap, RANGE};

/// Determine the size of a remote file in bytes.
///
/// Returns `0` when the size cannot be determined; size-unknown is a valid
/// outcome, not a failure, and every transport error is swallowed.
pub async fn probe_size(client: &Client, url: &str) -> u64 {
    if let Some(len) = head_length(client, url).await {
        return len;
    }
    ranged_length(client, url).await.unwrap_or(0)
}

async fn head_length(client: &Client, url: &str) -> Option<u64> {
    let response = client.head(url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    header_value(response.headers(), CONTENT_LENGTH.as_str())
}

/// Fetch a single byte and read the total size from `Content-Range`
/// ("bytes 0-0/12345"), falling back to that response's `Content-Length`.
async fn ranged_length(client: &Client, url: &str) -> Option<u64> {
    let response = client
        .get(url)
        .header(RANGE, "bytes=0-0")
        .send()
        .await
        .ok()?;

    if let Some(total) = response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|range| range.to_str().ok())
        .and_then(|range| range.rsplit('/').next())
        .and_then(|total| total.parse::<u64>().ok())
    {
        return Some(total);
    }

    header_value(response.headers(), CONTENT_LENGTH.as_str())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

/// Format a byte count as a human-readable size.
///
/// `0` renders as `"unknown"`. Bytes are truncated (`512B`); KB and above
/// round to the nearest whole unit (`1536` → `2KB`); past GB the value is
/// rendered with one decimal in TB.
pub fn format_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "unknown".to_string();
    }
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            if unit == "B" {
                return format!("{}{unit}", size as u64);
            }
            return format!("{size:.0}{unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1}TB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_zero_is_unknown() {
        assert_eq!(format_size(0), "unknown");
    }

    #[test]
    fn test_format_size_bytes_truncate() {
        assert_eq!(format_size(1), "1B");
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(1023), "1023B");
    }

    #[test]
    fn test_format_size_kb_rounds() {
        assert_eq!(format_size(1024), "1KB");
        assert_eq!(format_size(1536), "2KB");
    }

    #[test]
    fn test_format_size_mb() {
        // 42,000,000 / 1024 / 1024 ≈ 40.05
        assert_eq!(format_size(42_000_000), "40MB");
        assert_eq!(format_size(75 * 1024 * 1024), "75MB");
    }

    #[test]
    fn test_format_size_gb() {
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3GB");
    }

    #[test]
    fn test_format_size_tb_has_decimal() {
        let two_and_a_half_tb = 2u64 * 1024 * 1024 * 1024 * 1024 + 512 * 1024 * 1024 * 1024;
        assert_eq!(format_size(two_and_a_half_tb), "2.5TB");
    }

    #[tokio::test]
    async fn test_probe_size_swallows_transport_errors() {
        let client = Client::new();
        // Unroutable scheme/host: both probe stages fail, size is "unknown".
        let size = probe_size(&client, "file:///does/not/exist").await;
        assert_eq!(size, 0);
    }

    #[test]
    fn test_content_range_total_parsing() {
        let total = "bytes 0-0/12345".rsplit('/').next().unwrap();
        assert_eq!(total.parse::<u64>().unwrap(), 12345);
    }
}
