use super::bearer_token::{BearerToken, TokenChain};
use crate::inventory_export::domain::InventoryRecord;
use crate::ports::outbound::{InventoryPage, InventoryRepository, PageCursor, PageLocation};
use crate::shared::error::ExportError;
use crate::shared::Result;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LINK};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

/// Maximum number of response-body characters quoted in a fetch error
const ERROR_BODY_PREVIEW_CHARS: usize = 300;

/// Tunables for [`ContainerApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Full endpoint URL, see [`ContainerApiClient::endpoint_for_gateway`]
    pub endpoint: Url,
    pub page_limit: u32,
    pub timeout: Duration,
    /// Pause after every request
    pub request_delay: Duration,
    pub accept_invalid_certs: bool,
}

/// ContainerApiClient adapter for the container inventory API
///
/// Implements the InventoryRepository port with blocking, sequential
/// requests. Pagination follows the `Link: <...>; rel=next` response header.
///
/// # Authentication
/// A 401/403 answer (or a malformed primary token) switches to the fallback
/// token once and retries the same page; from then on the fallback is used.
pub struct ContainerApiClient {
    client: Client,
    settings: ClientSettings,
    tokens: TokenChain,
}

impl ContainerApiClient {
    pub const ENDPOINT_PATH: &'static str = "/csapi/v1.3/containers/list";
    pub const DEFAULT_PAGE_LIMIT: u32 = 250;
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
    pub const DEFAULT_REQUEST_DELAY_MS: u64 = 200;

    pub fn new(settings: ClientSettings, tokens: TokenChain) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("container-inventory-export/{}", version);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        if settings.accept_invalid_certs {
            log::warn!("[!] TLS certificate verification is disabled");
        }

        Ok(Self {
            client,
            settings,
            tokens,
        })
    }

    /// Builds the endpoint URL from a gateway base URL, appending
    /// `/csapi/v1.3/containers/list` unless it is already there.
    ///
    /// # Errors
    /// Returns `ExportError::Configuration` when the result is not an http(s) URL.
    pub fn endpoint_for_gateway(gateway: &str) -> Result<Url> {
        let gateway = gateway.trim();
        let full = if gateway.ends_with(Self::ENDPOINT_PATH) {
            gateway.to_string()
        } else {
            format!("{}{}", gateway.trim_end_matches('/'), Self::ENDPOINT_PATH)
        };

        let url = Url::parse(&full).map_err(|e| {
            ExportError::configuration(
                format!("invalid gateway URL '{}': {}", gateway, e),
                "Pass the gateway as e.g. https://gateway.qg2.apps.qualys.com",
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExportError::configuration(
                format!("gateway URL '{}' must use http or https", gateway),
                "Pass the gateway as e.g. https://gateway.qg2.apps.qualys.com",
            )
            .into());
        }

        Ok(url)
    }

    pub fn is_using_fallback_token(&self) -> bool {
        self.tokens.is_using_fallback()
    }

    fn page_url(&self, cursor: &PageCursor) -> Result<Url> {
        let url = match &cursor.location {
            PageLocation::Filter(filter) => {
                let limit = self.settings.page_limit.to_string();
                Url::parse_with_params(
                    self.settings.endpoint.as_str(),
                    &[("filter", filter.as_str()), ("limit", limit.as_str())],
                )
            }
            // Relative links resolve against the endpoint; absolute ones replace it
            PageLocation::NextLink(link) => self.settings.endpoint.join(link),
        };
        url.map_err(|e| fetch_error(cursor, None, format!("invalid page URL: {}", e)))
    }

    fn send(&self, url: &Url, token: &BearerToken) -> reqwest::Result<Response> {
        let result = self
            .client
            .get(url.clone())
            .bearer_auth(token.as_str())
            .send();

        // Pacing between API calls
        if !self.settings.request_delay.is_zero() {
            std::thread::sleep(self.settings.request_delay);
        }

        result
    }

    fn send_authenticated(&self, cursor: &PageCursor, url: &Url) -> Result<Response> {
        let token = self.tokens.current()?;
        let response = self
            .send(url, token)
            .map_err(|e| fetch_error(cursor, None, e.to_string()))?;

        if !is_auth_failure(response.status()) {
            return Ok(response);
        }

        let status = response.status().as_u16();
        log::warn!(
            "[ERROR] Unauthorized (HTTP {}) while fetching page {} of {}",
            status,
            cursor.page,
            cursor.window
        );
        let fallback = self
            .tokens
            .switch_to_fallback(Some(status), &format!("server answered HTTP {}", status))?;

        let retried = self
            .send(url, fallback)
            .map_err(|e| fetch_error(cursor, None, e.to_string()))?;

        if is_auth_failure(retried.status()) {
            return Err(ExportError::Authentication {
                status: Some(retried.status().as_u16()),
                details: "the fallback token was rejected too".to_string(),
            }
            .into());
        }

        Ok(retried)
    }
}

impl InventoryRepository for ContainerApiClient {
    fn fetch_page(&self, cursor: &PageCursor) -> Result<InventoryPage> {
        let url = self.page_url(cursor)?;
        log::info!("[+] Fetching PAGE {} for window {}", cursor.page, cursor.window);
        log::debug!("GET {}", url);

        let response = self.send_authenticated(cursor, &url)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(fetch_error(
                cursor,
                Some(status.as_u16()),
                preview(&body),
            ));
        }

        let next = next_link(response.headers());
        let body = response
            .text()
            .map_err(|e| fetch_error(cursor, Some(status.as_u16()), e.to_string()))?;
        let parsed: ContainerListResponse = serde_json::from_str(&body).map_err(|e| {
            fetch_error(
                cursor,
                Some(status.as_u16()),
                format!("invalid response body: {}", e),
            )
        })?;

        let records = parsed.data.unwrap_or_default();
        log::info!("Page {}: {} records", cursor.page, records.len());

        Ok(InventoryPage { records, next })
    }
}

#[derive(Debug, Deserialize)]
struct ContainerListResponse {
    #[serde(default)]
    data: Option<Vec<InventoryRecord>>,
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn fetch_error(cursor: &PageCursor, status: Option<u16>, details: String) -> anyhow::Error {
    ExportError::Fetch {
        window: cursor.window.to_string(),
        status,
        details: format!("page {}: {}", cursor.page, details),
    }
    .into()
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_BODY_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
    format!("{}...", cut)
}

/// Continuation URL from any `Link` header entry with `rel=next`
fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
}

/// Parses an RFC 8288 `Link` header value, e.g.
/// `<https://gw/csapi/v1.3/containers/list?page=2>; rel="next"`.
fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let (target, params) = entry.trim().strip_prefix('<')?.split_once('>')?;
        let is_next = params.split(';').any(|param| {
            match param.trim().split_once('=') {
                Some((key, value)) if key.trim().eq_ignore_ascii_case("rel") => value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next")),
                _ => false,
            }
        });
        (is_next && !target.trim().is_empty()).then(|| target.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_for_gateway_appends_path() {
        let url = ContainerApiClient::endpoint_for_gateway("https://gateway.qg2.apps.qualys.com/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://gateway.qg2.apps.qualys.com/csapi/v1.3/containers/list"
        );
    }

    #[test]
    fn test_endpoint_for_gateway_keeps_full_endpoint() {
        let url = ContainerApiClient::endpoint_for_gateway(
            "https://gateway.qg1.apps.qualys.eu/csapi/v1.3/containers/list",
        )
        .unwrap();
        assert_eq!(url.path(), "/csapi/v1.3/containers/list");
    }

    #[test]
    fn test_endpoint_for_gateway_rejects_garbage() {
        let err = ContainerApiClient::endpoint_for_gateway("not a url").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExportError>(),
            Some(ExportError::Configuration { .. })
        ));
        assert!(ContainerApiClient::endpoint_for_gateway("ftp://gateway").is_err());
    }

    #[test]
    fn test_parse_next_link_variants() {
        assert_eq!(
            parse_next_link("<https://gw/list?page=2>; rel=next"),
            Some("https://gw/list?page=2".to_string())
        );
        assert_eq!(
            parse_next_link(r#"<https://gw/list?page=1>; rel="prev", <https://gw/list?page=3>; rel="next""#),
            Some("https://gw/list?page=3".to_string())
        );
        assert_eq!(
            parse_next_link(r#"</csapi/v1.3/containers/list?after=abc>; REL="next last""#),
            Some("/csapi/v1.3/containers/list?after=abc".to_string())
        );
        assert_eq!(parse_next_link(r#"<https://gw/list?page=1>; rel="prev""#), None);
        assert_eq!(parse_next_link("garbage"), None);
        assert_eq!(parse_next_link("<>; rel=next"), None);
    }

    #[test]
    fn test_next_link_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(next_link(&headers), None);
        headers.append(LINK, HeaderValue::from_static("<https://gw/a>; rel=prev"));
        headers.append(LINK, HeaderValue::from_static("<https://gw/b>; rel=next"));
        assert_eq!(next_link(&headers), Some("https://gw/b".to_string()));
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "x".repeat(ERROR_BODY_PREVIEW_CHARS + 50);
        let shown = preview(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), ERROR_BODY_PREVIEW_CHARS + 3);
        assert_eq!(preview("  short  "), "short");
    }

    #[test]
    fn test_response_without_data_is_empty() {
        let parsed: ContainerListResponse = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(parsed.data.is_none());
        let parsed: ContainerListResponse = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(parsed.data.is_none());
    }

    #[test]
    fn test_client_creation() {
        let settings = ClientSettings {
            endpoint: ContainerApiClient::endpoint_for_gateway("https://gw.example").unwrap(),
            page_limit: ContainerApiClient::DEFAULT_PAGE_LIMIT,
            timeout: Duration::from_secs(ContainerApiClient::DEFAULT_TIMEOUT_SECONDS),
            request_delay: Duration::ZERO,
            accept_invalid_certs: false,
        };
        let client = ContainerApiClient::new(settings, TokenChain::new("a.b.c", None));
        assert!(client.is_ok());
        assert!(!client.unwrap().is_using_fallback_token());
    }
}
