//! Daemon endpoint resolution
//!
//! Turns the API address handed over by daemon discovery into the base URL
//! of the control API. Multiaddresses (`/ip4/127.0.0.1/tcp/5001`) and plain
//! `http(s)://` URLs are both accepted.

use reqwest::Url;

use crate::error::{RpcError, RpcResult};

/// Path prefix of every control API command.
pub const API_PATH: &str = "/api/v0/";

fn invalid(endpoint: &str, reason: impl Into<String>) -> RpcError {
    RpcError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: reason.into(),
    }
}

/// Resolve an endpoint string into the `/api/v0/` base URL.
pub fn api_base_url(endpoint: &str) -> RpcResult<Url> {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return url_base(endpoint, trimmed);
    }
    if trimmed.starts_with('/') {
        return multiaddr_base(endpoint, trimmed);
    }
    Err(invalid(endpoint, "expected a multiaddress or an http(s) URL"))
}

fn url_base(endpoint: &str, trimmed: &str) -> RpcResult<Url> {
    let mut url = Url::parse(trimmed).map_err(|e| invalid(endpoint, e.to_string()))?;
    if url.host_str().is_none() {
        return Err(invalid(endpoint, "missing host"));
    }

    let path = url.path().trim_matches('/').to_string();
    if path.is_empty() {
        url.set_path(API_PATH);
    } else {
        url.set_path(&format!("/{}/", path));
    }
    url.set_query(None);
    Ok(url)
}

fn multiaddr_base(endpoint: &str, trimmed: &str) -> RpcResult<Url> {
    let mut parts = trimmed.split('/').filter(|s| !s.is_empty());
    let mut host: Option<String> = None;
    let mut port: Option<u16> = None;
    let mut scheme = "http";

    while let Some(protocol) = parts.next() {
        match protocol {
            "ip4" | "dns" | "dns4" | "dns6" => {
                let value = parts
                    .next()
                    .ok_or_else(|| invalid(endpoint, format!("/{} needs a value", protocol)))?;
                host = Some(value.to_string());
            }
            "ip6" => {
                let value = parts
                    .next()
                    .ok_or_else(|| invalid(endpoint, "/ip6 needs a value"))?;
                host = Some(format!("[{}]", value));
            }
            "tcp" => {
                let value = parts
                    .next()
                    .ok_or_else(|| invalid(endpoint, "/tcp needs a port"))?;
                let parsed = value
                    .parse::<u16>()
                    .map_err(|_| invalid(endpoint, format!("bad tcp port {:?}", value)))?;
                port = Some(parsed);
            }
            "http" => scheme = "http",
            "https" | "tls" => scheme = "https",
            other => return Err(invalid(endpoint, format!("unsupported protocol /{}", other))),
        }
    }

    let host = host.ok_or_else(|| invalid(endpoint, "missing host component"))?;
    let port = port.ok_or_else(|| invalid(endpoint, "missing /tcp component"))?;

    Url::parse(&format!("{}://{}:{}{}", scheme, host, port, API_PATH))
        .map_err(|e| invalid(endpoint, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::api_base_url;

    #[test]
    fn ip4_multiaddr_resolves_to_http_api_base() {
        let url = api_base_url("/ip4/127.0.0.1/tcp/5001").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5001/api/v0/");
    }

    #[test]
    fn ip6_and_dns_multiaddrs_resolve() {
        let url = api_base_url("/ip6/::1/tcp/5001").unwrap();
        assert_eq!(url.as_str(), "http://[::1]:5001/api/v0/");

        let url = api_base_url("/dns4/node.local/tcp/5443/https").unwrap();
        assert_eq!(url.as_str(), "https://node.local:5443/api/v0/");
    }

    #[test]
    fn plain_urls_get_the_api_prefix() {
        let url = api_base_url("http://localhost:5001").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5001/api/v0/");

        let url = api_base_url("http://localhost:5001/api/v0").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5001/api/v0/");
    }

    #[test]
    fn malformed_endpoints_are_rejected() {
        assert!(api_base_url("").is_err());
        assert!(api_base_url("localhost:5001").is_err());
        assert!(api_base_url("/ip4/127.0.0.1").is_err());
        assert!(api_base_url("/ip4/127.0.0.1/tcp/notaport").is_err());
        assert!(api_base_url("/unix/tmp/api.sock").is_err());
    }
}
