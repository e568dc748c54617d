use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

// Only the head of the body is scanned for a <meta> charset declaration.
const META_PRESCAN_BYTES: usize = 1024;

static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?\s*([A-Za-z0-9_:.\-]+)"#).unwrap()
});

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(u16),
}

/// Anything that can hand back the HTML of a page.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain HTTP GET, one request per call, transport default timeouts.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let header_charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_from_content_type)
            .map(str::to_string);

        let bytes = response.bytes().await?;
        let (text, encoding) = decode_body(&bytes, header_charset.as_deref());
        debug!("Fetched {} ({} bytes, {})", url, bytes.len(), encoding.name());
        Ok(text.into_owned())
    }
}

/// Decode a response body. Precedence: BOM, `Content-Type` charset,
/// `<meta>` declaration near the top of the body, then UTF-8.
pub fn decode_body<'a>(bytes: &'a [u8], header_charset: Option<&str>) -> (Cow<'a, str>, &'static Encoding) {
    let encoding = Encoding::for_bom(bytes)
        .map(|(enc, _)| enc)
        .or_else(|| header_charset.and_then(|c| Encoding::for_label(c.as_bytes())))
        .or_else(|| sniff_meta_charset(bytes))
        .unwrap_or(UTF_8);

    // decode() strips a BOM and substitutes U+FFFD for malformed sequences.
    let (text, used, _malformed) = encoding.decode(bytes);
    (text, used)
}

fn charset_from_content_type(value: &str) -> Option<&str> {
    value.split(';').skip(1).find_map(|param| {
        let (key, val) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(val.trim().trim_matches(|c| c == '"' || c == '\''))
        } else {
            None
        }
    })
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let caps = META_CHARSET_RE.captures(head)?;
    Encoding::for_label(&caps[1])
}
