use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::ytmusic_rs::{BrowserCredentials, SetupError};

pub const INSTRUCTIONS: &str = "\
Steps:
1. Open YouTube Music in your browser and log in
2. Open Developer Tools (F12)
3. Go to the Network tab
4. Interact with YouTube Music (search for a song)
5. Find a POST request to 'youtubei/v1/...' in the Network tab
6. Copy its request headers
7. Save them to the headers file (default: raw_headers.txt)";

/// Turn captured browser headers into a credentials file.
///
/// Returns the serialized credentials. Any existing file at
/// `credentials_file` is overwritten.
pub fn bootstrap(headers_file: &Path, credentials_file: &Path) -> Result<String> {
    if !headers_file.is_file() {
        return Err(SetupError::HeadersFileNotFound(headers_file.to_path_buf()).into());
    }

    let raw = std::fs::read_to_string(headers_file)
        .wrap_err_with(|| format!("Failed to read headers file: {}", headers_file.display()))?;
    let credentials = BrowserCredentials::from_raw_headers(&raw)?;
    let token = credentials.save(credentials_file)?;

    tracing::info!(
        "Configuration headers saved to {}",
        credentials_file.display()
    );
    Ok(token)
}
