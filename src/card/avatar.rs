use std::io::Cursor;
use std::net::IpAddr;
use std::time::Duration;

use futures_util::future::join_all;
use image::{DynamicImage, ImageReader, Limits};
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use tokio::net::lookup_host;
use url::{Host, Url};

use crate::card::CardError;
use crate::config::card::CardSettings;

const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/jpg", "image/webp"];
const MAX_AVATAR_DIMENSION: u32 = 4096;
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("unsupported url: {0}")]
    Url(String),
    #[error("could not resolve {0}")]
    Resolve(String),
    #[error("host {0} is not publicly routable")]
    BlockedHost(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("content type {0:?} is not an allowed image type")]
    ContentType(Option<String>),
    #[error("body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("unreadable image: {0}")]
    Read(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Downloads participant photos with a size ceiling, a timeout and a
/// content-type allow-list. Every failure degrades to `None`.
#[derive(Clone)]
pub struct AvatarFetcher {
    client: Client,
    timeout: Duration,
    max_bytes: usize,
    allow_private_hosts: bool,
}

impl AvatarFetcher {
    pub fn new(
        timeout: Duration,
        max_bytes: usize,
        allow_private_hosts: bool,
    ) -> Result<Self, CardError> {
        let redirects = if allow_private_hosts {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::custom(|attempt| {
                if attempt.previous().len() >= MAX_REDIRECTS {
                    attempt.error("too many redirects")
                } else if literal_host_is_private(attempt.url()) {
                    attempt.error("redirect to a private host")
                } else {
                    attempt.follow()
                }
            })
        };

        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirects)
            .build()
            .map_err(|e| CardError::Render(format!("Failed to build avatar client: {}", e)))?;
        Ok(Self {
            client,
            timeout,
            max_bytes,
            allow_private_hosts,
        })
    }

    pub fn from_settings(settings: &CardSettings) -> Result<Self, CardError> {
        Self::new(
            settings.avatar_timeout(),
            settings.avatar_max_bytes,
            settings.avatar_allow_private_hosts,
        )
    }

    /// Downloads on the async runtime, decodes on the blocking pool.
    pub async fn fetch(&self, url: Option<&str>) -> Option<DynamicImage> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;
        let bytes = match self.try_fetch(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Avatar {} unavailable, using default: {}", url, e);
                return None;
            }
        };

        match tokio::task::spawn_blocking(move || decode_avatar(&bytes)).await {
            Ok(Ok(image)) => Some(image),
            Ok(Err(e)) => {
                tracing::warn!("Avatar {} rejected, using default: {}", url, e);
                None
            }
            Err(e) => {
                tracing::warn!("Avatar {} decode task failed: {}", url, e);
                None
            }
        }
    }

    /// Fetches all slots concurrently; results keep slot order.
    pub async fn fetch_all(&self, urls: [Option<&str>; 4]) -> Vec<Option<DynamicImage>> {
        join_all(urls.into_iter().map(|url| self.fetch(url))).await
    }

    async fn try_fetch(&self, raw: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(raw).map_err(|e| FetchError::Url(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::Url(format!("scheme {}", url.scheme())));
        }
        self.ensure_public_host(&url).await?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        if !is_allowed_content_type(content_type.as_deref()) {
            return Err(FetchError::ContentType(content_type));
        }

        self.read_limited(response).await
    }

    /// Every address the host resolves to must be publicly routable.
    async fn ensure_public_host(&self, url: &Url) -> Result<(), FetchError> {
        if self.allow_private_hosts {
            return Ok(());
        }

        let addresses: Vec<IpAddr> = match url.host() {
            Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
            Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
            Some(Host::Domain(domain)) => {
                let port = url.port_or_known_default().unwrap_or(80);
                tokio::time::timeout(self.timeout, lookup_host((domain, port)))
                    .await
                    .map_err(|_| FetchError::Resolve(domain.to_string()))?
                    .map_err(|_| FetchError::Resolve(domain.to_string()))?
                    .map(|addr| addr.ip())
                    .collect()
            }
            None => return Err(FetchError::Url("missing host".to_string())),
        };

        if addresses.is_empty() || !addresses.iter().copied().all(is_public_ip) {
            return Err(FetchError::BlockedHost(
                url.host_str().unwrap_or_default().to_string(),
            ));
        }
        Ok(())
    }

    async fn read_limited(&self, mut response: Response) -> Result<Vec<u8>, FetchError> {
        if let Some(declared) = response.content_length() {
            if declared as usize > self.max_bytes {
                return Err(FetchError::TooLarge(self.max_bytes));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(FetchError::TooLarge(self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

/// Dimensions are checked from the header, before any pixel buffer is allocated.
fn decode_avatar(bytes: &[u8]) -> Result<DynamicImage, FetchError> {
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_AVATAR_DIMENSION);
    limits.max_image_height = Some(MAX_AVATAR_DIMENSION);
    reader.limits(limits);

    Ok(reader.decode()?)
}

fn is_allowed_content_type(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    ALLOWED_CONTENT_TYPES.contains(&essence.as_str())
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [first, second, ..] = v4.octets();
            // 100.64.0.0/10 carrier-grade NAT
            let shared = first == 100 && (second & 0xc0) == 64;
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || shared)
        }
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_ip(IpAddr::V4(v4)),
            None => {
                let first = v6.segments()[0];
                let unique_local = (first & 0xfe00) == 0xfc00;
                let link_local = (first & 0xffc0) == 0xfe80;
                !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
            }
        },
    }
}

/// Redirect targets can't be resolved synchronously; only literal hosts are judged.
fn literal_host_is_private(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(ip)) => !is_public_ip(IpAddr::V4(ip)),
        Some(Host::Ipv6(ip)) => !is_public_ip(IpAddr::V6(ip)),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        None => true,
    }
}
