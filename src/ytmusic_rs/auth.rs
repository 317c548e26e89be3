use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, OptionExt, Result, eyre};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use super::{USER_AGENT, YTM_DOMAIN};

/// Headers that must be present in a captured request.
const REQUIRED_HEADERS: [&str; 2] = ["cookie", "x-goog-authuser"];

/// Headers from the capture that are specific to the captured request.
const IGNORED_HEADERS: [&str; 3] = ["host", "content-length", "accept-encoding"];

/// Headers that are managed by the HTTP client and never forwarded verbatim.
const TRANSPORT_HEADERS: [&str; 4] = [
    "host",
    "content-length",
    "accept-encoding",
    "content-encoding",
];

/// Cookies that carry the SAPISID used to sign requests, in preference order.
const SAPISID_COOKIES: [&str; 2] = ["__Secure-3PAPISID", "SAPISID"];

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Input file {} does not exist", .0.display())]
    HeadersFileNotFound(PathBuf),
    #[error("The following entries are missing in your headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),
}

/// Browser credentials: the request headers of a logged-in YouTube Music
/// session, keyed by lower-cased header name.
///
/// Serialized as a flat JSON object with sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrowserCredentials {
    headers: BTreeMap<String, String>,
}

impl BrowserCredentials {
    /// Derive credentials from raw headers copied out of the browser's
    /// network tab.
    ///
    /// Accepts both the `name: value` per line format and Chrome's format
    /// where the name (with a trailing colon) and the value sit on separate
    /// lines.
    pub fn from_raw_headers(raw: &str) -> Result<Self, SetupError> {
        let mut headers = BTreeMap::new();
        let mut remembered_key: Option<String> = None;

        for line in raw.lines() {
            let line = line.trim_end_matches('\r');
            match line.split_once(": ") {
                Some((key, value)) => {
                    // HTTP/2 pseudo headers like `:authority`
                    if key.starts_with(':') {
                        continue;
                    }
                    headers.insert(key.trim().to_lowercase(), value.to_string());
                }
                None => {
                    let token = line.trim();
                    if token.is_empty() || token.starts_with(':') {
                        continue;
                    }
                    if let Some(key) = token.strip_suffix(':') {
                        remembered_key = Some(key.to_lowercase());
                    } else if let Some(key) = remembered_key.take() {
                        headers.insert(key, token.to_string());
                    }
                }
            }
        }

        let missing: Vec<String> = REQUIRED_HEADERS
            .iter()
            .filter(|name| !headers.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SetupError::MissingHeaders(missing));
        }

        for name in IGNORED_HEADERS {
            headers.remove(name);
        }
        for (name, value) in default_headers() {
            headers.insert(name.to_string(), value.to_string());
        }

        Ok(Self { headers })
    }

    /// Load credentials previously written by [`BrowserCredentials::save`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read credentials file: {}", path.display()))?;
        let headers: BTreeMap<String, String> = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse credentials file: {}", path.display()))?;

        let credentials = Self {
            headers: headers
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect(),
        };
        credentials.sapisid().ok_or_eyre(
            "Your cookie is missing the required value __Secure-3PAPISID; capture the headers again",
        )?;

        Ok(credentials)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("Failed to serialize credentials")
    }

    /// Write the credentials to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<String> {
        let json = self.to_json()?;
        std::fs::write(path, &json)
            .wrap_err_with(|| format!("Failed to write credentials file: {}", path.display()))?;
        Ok(json)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Origin used for request signing.
    pub fn origin(&self) -> &str {
        self.get("origin")
            .or_else(|| self.get("x-origin"))
            .unwrap_or(YTM_DOMAIN)
    }

    pub fn sapisid(&self) -> Option<String> {
        let cookie = self.get("cookie")?;
        SAPISID_COOKIES.iter().find_map(|wanted| {
            cookie.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == *wanted).then(|| value.to_string())
            })
        })
    }

    /// Headers to forward on every request.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            if TRANSPORT_HEADERS.contains(&name.as_str()) {
                continue;
            }
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .wrap_err_with(|| format!("Invalid header name in credentials: {name}"))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| eyre!("Invalid value for header {name}: {e}"))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

fn default_headers() -> [(&'static str, &'static str); 6] {
    [
        ("user-agent", USER_AGENT),
        ("accept", "*/*"),
        ("accept-encoding", "gzip, deflate"),
        ("content-type", "application/json"),
        ("content-encoding", "gzip"),
        ("origin", YTM_DOMAIN),
    ]
}

/// `SAPISIDHASH` authorization value for a request made at `timestamp`.
pub fn sapisid_authorization(sapisid: &str, origin: &str, timestamp: i64) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("{timestamp} {sapisid} {origin}").as_bytes());
    let hash = hasher.finalize();
    format!("SAPISIDHASH {timestamp}_{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_HEADERS: &str = "\
:authority: music.youtube.com
Host: music.youtube.com
Content-Length: 1024
Accept-Encoding: br
Cookie: VISITOR_INFO1_LIVE=abc; __Secure-3PAPISID=abcDEF123/xyz; PREF=f6=8
X-Goog-AuthUser: 0
X-Goog-Visitor-Id: CgtZ
User-Agent: Mozilla/5.0 (X11; Linux x86_64)
";

    #[test]
    fn test_from_raw_headers_lowercases_and_filters() {
        let credentials = BrowserCredentials::from_raw_headers(RAW_HEADERS).unwrap();

        assert_eq!(credentials.get("x-goog-authuser"), Some("0"));
        assert_eq!(credentials.get("x-goog-visitor-id"), Some("CgtZ"));
        assert_eq!(credentials.get("host"), None);
        assert_eq!(credentials.get("content-length"), None);
        assert_eq!(credentials.get(":authority"), None);
    }

    #[test]
    fn test_from_raw_headers_applies_default_headers() {
        let credentials = BrowserCredentials::from_raw_headers(RAW_HEADERS).unwrap();

        assert_eq!(credentials.get("user-agent"), Some(USER_AGENT));
        assert_eq!(credentials.get("origin"), Some(YTM_DOMAIN));
        assert_eq!(credentials.get("accept-encoding"), Some("gzip, deflate"));
        assert_eq!(credentials.get("content-type"), Some("application/json"));
    }

    #[test]
    fn test_from_raw_headers_chrome_split_lines() {
        let raw = "cookie:\n__Secure-3PAPISID=abc\nx-goog-authuser:\n1\n";
        let credentials = BrowserCredentials::from_raw_headers(raw).unwrap();

        assert_eq!(credentials.get("cookie"), Some("__Secure-3PAPISID=abc"));
        assert_eq!(credentials.get("x-goog-authuser"), Some("1"));
    }

    #[test]
    fn test_from_raw_headers_missing_required() {
        let err = BrowserCredentials::from_raw_headers("accept: */*\n").unwrap_err();

        match err {
            SetupError::MissingHeaders(missing) => {
                assert_eq!(missing, vec!["cookie", "x-goog-authuser"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_to_json_sorts_keys() {
        let credentials = BrowserCredentials::from_raw_headers(RAW_HEADERS).unwrap();
        let json = credentials.to_json().unwrap();

        let accept = json.find("\"accept\"").unwrap();
        let cookie = json.find("\"cookie\"").unwrap();
        let user_agent = json.find("\"user-agent\"").unwrap();
        assert!(accept < cookie && cookie < user_agent);
    }

    #[test]
    fn test_sapisid_prefers_secure_cookie() {
        let credentials = BrowserCredentials::from_raw_headers(RAW_HEADERS).unwrap();
        assert_eq!(credentials.sapisid().as_deref(), Some("abcDEF123/xyz"));

        let raw = "cookie: SAPISID=plain; other=1\nx-goog-authuser: 0\n";
        let credentials = BrowserCredentials::from_raw_headers(raw).unwrap();
        assert_eq!(credentials.sapisid().as_deref(), Some("plain"));
    }

    #[test]
    fn test_sapisid_authorization() {
        let header = sapisid_authorization("abcDEF123/xyz", YTM_DOMAIN, 1_700_000_000);
        assert_eq!(
            header,
            "SAPISIDHASH 1700000000_7a820926189d9e131105ba87b11f5e06d66ba358"
        );
    }

    #[test]
    fn test_header_map_skips_transport_headers() {
        let credentials = BrowserCredentials::from_raw_headers(RAW_HEADERS).unwrap();
        let map = credentials.header_map().unwrap();

        assert!(map.get("cookie").is_some());
        assert!(map.get("content-encoding").is_none());
        assert!(map.get("accept-encoding").is_none());
    }

    #[test]
    fn test_from_file_rejects_cookie_without_sapisid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oauth.json");
        std::fs::write(&path, r#"{"cookie": "PREF=1", "x-goog-authuser": "0"}"#).unwrap();

        let err = BrowserCredentials::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("__Secure-3PAPISID"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oauth.json");
        let credentials = BrowserCredentials::from_raw_headers(RAW_HEADERS).unwrap();

        credentials.save(&path).unwrap();
        let loaded = BrowserCredentials::from_file(&path).unwrap();

        assert_eq!(loaded, credentials);
    }
}
