use anyhow::{Context, Result};
use futures::StreamExt;
use rand::Rng;
use reqwest::Client;
use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::options::Options;

/// Minimum gap between two progress reports.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(30);

const SUFFIX_LEN: usize = 8;
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates `wallpaper-<8 base-36 chars>.jpg`. The suffix only keeps
/// repeated runs from clobbering each other; it is not a content hash.
fn unique_name() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("wallpaper-{}.jpg", suffix)
}

/// Streams the image at `url` into a uniquely named JPEG under the target
/// directory, reporting percent complete to `reporter` along the way.
///
/// Reports are throttled to one per 30 ms and skipped entirely when the
/// server sends no content length; a final `100.0` is always delivered on
/// success. Transport errors propagate without cleaning up the partial file.
pub async fn download<F>(options: &Options, url: &str, mut reporter: F) -> Result<PathBuf>
where
    F: FnMut(f64),
{
    let dir = if options.dir == "." {
        env::current_dir()?
    } else {
        PathBuf::from(&options.dir)
    };
    let target = dir.join(unique_name());

    let parsed = Url::parse(url).with_context(|| format!("invalid url: {}", url))?;
    debug!(url = %parsed, target = %target.display(), "requesting image");

    let client = Client::new();
    let response = client
        .get(parsed.as_str())
        .send()
        .await?
        .error_for_status()?;
    let total = response.content_length().filter(|t| *t > 0);

    let mut file = File::create(&target)
        .await
        .with_context(|| format!("failed to create {}", target.display()))?;

    let mut stream = response.bytes_stream();
    let mut received: u64 = 0;
    let mut last_report: Option<Instant> = None;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        received += chunk.len() as u64;

        if let Some(total) = total {
            let due = last_report.map_or(true, |t| t.elapsed() >= PROGRESS_INTERVAL);
            if due {
                reporter(received as f64 / total as f64 * 100.0);
                last_report = Some(Instant::now());
            }
        }
    }

    file.flush().await?;

    // Throttling may have swallowed the exact final update.
    reporter(100.0);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_name_has_expected_shape() {
        let name = unique_name();
        let suffix = name
            .strip_prefix("wallpaper-")
            .and_then(|s| s.strip_suffix(".jpg"))
            .expect("wallpaper-<suffix>.jpg");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn unique_names_differ_between_calls() {
        assert_ne!(unique_name(), unique_name());
    }
}
