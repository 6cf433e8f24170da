//! HTTP client for the daemon control API

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use log::debug;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio_util::io::StreamReader;

use crate::add::build_add_form;
use crate::endpoint::api_base_url;
use crate::error::{RpcError, RpcResult};
use crate::types::{
    collect_gc_keys, collect_providers, parse_ndjson, select_add_root, AddOutcome, AddedEntry,
    ErrorBody, GcEvent, NodeIdentity, PinChangeResponse, PinLsResponse, PinOptions, Provider,
    QueryEvent, RawObjectStat, RawPin, RawRepoStat, SwarmPeer, SwarmPeersResponse,
};

/// Async reader over the body of a `get` response (a tar stream).
pub type ContentReader = StreamReader<BoxStream<'static, io::Result<Bytes>>, Bytes>;

#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Applied to connecting and to each read of a response. Streamed
    /// bodies may take any total time as long as bytes keep arriving.
    pub idle_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct IpfsClient {
    http: Client,
    base_url: Url,
}

fn bool_arg(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl IpfsClient {
    pub fn new(endpoint: &str) -> RpcResult<Self> {
        Self::with_options(endpoint, ClientOptions::default())
    }

    pub fn with_options(endpoint: &str, options: ClientOptions) -> RpcResult<Self> {
        let base_url = api_base_url(endpoint)?;
        let mut builder = Client::builder();
        if let Some(timeout) = options.idle_timeout {
            builder = builder.connect_timeout(timeout).read_timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, base_url })
    }

    fn command_url(&self, command: &str, args: &[(&str, &str)]) -> RpcResult<Url> {
        let mut url = self
            .base_url
            .join(command)
            .map_err(|e| RpcError::InvalidEndpoint {
                endpoint: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !args.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in args {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn check_status(command: &str, response: Response) -> RpcResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        Err(RpcError::Daemon {
            command: command.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn post(&self, command: &str, args: &[(&str, &str)]) -> RpcResult<Response> {
        let url = self.command_url(command, args)?;
        debug!("ipfs rpc: POST {}", url);
        let response = self.http.post(url).send().await?;
        Self::check_status(command, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        command: &str,
        args: &[(&str, &str)],
    ) -> RpcResult<T> {
        let body = self.post(command, args).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| RpcError::Decode {
            command: command.to_string(),
            source,
        })
    }

    async fn post_ndjson<T: DeserializeOwned>(
        &self,
        command: &str,
        args: &[(&str, &str)],
    ) -> RpcResult<Vec<T>> {
        let body = self.post(command, args).await?.text().await?;
        parse_ndjson(command, &body)
    }

    // ============ Pins ============

    pub async fn pin_ls(&self) -> RpcResult<Vec<RawPin>> {
        let response: PinLsResponse = self.post_json("pin/ls", &[]).await?;
        Ok(response.into_pins())
    }

    pub async fn pin_add(&self, hash: &str, options: PinOptions) -> RpcResult<Vec<String>> {
        let response: PinChangeResponse = self
            .post_json(
                "pin/add",
                &[("arg", hash), ("recursive", bool_arg(options.recursive))],
            )
            .await?;
        Ok(response.pins.unwrap_or_default())
    }

    pub async fn pin_rm(&self, hash: &str, options: PinOptions) -> RpcResult<Vec<String>> {
        let response: PinChangeResponse = self
            .post_json(
                "pin/rm",
                &[("arg", hash), ("recursive", bool_arg(options.recursive))],
            )
            .await?;
        Ok(response.pins.unwrap_or_default())
    }

    // ============ Objects and repository ============

    pub async fn object_stat(&self, hash: &str) -> RpcResult<RawObjectStat> {
        self.post_json("object/stat", &[("arg", hash)]).await
    }

    pub async fn repo_stat(&self) -> RpcResult<RawRepoStat> {
        self.post_json("repo/stat", &[("human", "false")]).await
    }

    /// Run the daemon's garbage collector, returning the removed keys.
    pub async fn repo_gc(&self) -> RpcResult<Vec<String>> {
        let events: Vec<GcEvent> = self.post_ndjson("repo/gc", &[]).await?;
        collect_gc_keys(events)
    }

    // ============ Network ============

    pub async fn swarm_peers(&self) -> RpcResult<Vec<SwarmPeer>> {
        let response: SwarmPeersResponse = self.post_json("swarm/peers", &[]).await?;
        Ok(response.peers.unwrap_or_default())
    }

    pub async fn id(&self) -> RpcResult<NodeIdentity> {
        self.post_json("id", &[]).await
    }

    pub async fn dht_findprovs(&self, hash: &str) -> RpcResult<Vec<Provider>> {
        let events: Vec<QueryEvent> = self.post_ndjson("dht/findprovs", &[("arg", hash)]).await?;
        Ok(collect_providers(events))
    }

    // ============ Content transfer ============

    /// Open the tar stream of `hash`. The body is not buffered: bytes are
    /// pulled from the connection as the reader is consumed.
    pub async fn get(&self, hash: &str) -> RpcResult<ContentReader> {
        let response = self.post("get", &[("arg", hash)]).await?;
        let stream = response
            .bytes_stream()
            .map_err(io::Error::other)
            .boxed();
        Ok(StreamReader::new(stream))
    }

    /// Add a file or directory tree from the local filesystem.
    pub async fn add_path(&self, path: &Path) -> RpcResult<AddOutcome> {
        let (form, root_name) = build_add_form(path).await?;
        let url = self.command_url(
            "add",
            &[("recursive", "true"), ("progress", "false")],
        )?;
        debug!("ipfs rpc: POST {} ({})", url, path.display());

        let response = self.http.post(url).multipart(form).send().await?;
        let body = Self::check_status("add", response).await?.text().await?;
        let entries: Vec<AddedEntry> = parse_ndjson("add", &body)?;

        let root_hash = select_add_root(&entries, &root_name).ok_or_else(|| RpcError::Stream {
            command: "add".to_string(),
            message: format!("no content address returned for {}", path.display()),
        })?;
        Ok(AddOutcome { root_hash, entries })
    }
}
