//! VaaS REST Client
//!
//! Translates domain operations into authenticated HTTP calls against the
//! director/backend/datacenter resource API and parses responses into domain
//! objects or domain errors. Every request carries JSON content headers and
//! `username`/`api_key` query-string credentials.

use crate::api::error::VaasError;
use crate::api::models::{Backend, Dc, Director, PaginatedList};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

const BACKEND_PATH: &str = "/api/v0.1/backend/";
const DC_PATH: &str = "/api/v0.1/dc/";
const DIRECTOR_PATH: &str = "/api/v0.1/director/";

const PREFER_HEADER: &str = "Prefer";
const APPLICATION_JSON: &str = "application/json";

/// Operations exposed by the VaaS API.
///
/// Implemented by [`Client`]; callers take the trait so tests can substitute
/// doubles.
#[async_trait]
pub trait VaasApi: Send + Sync {
    /// Find a director by exact name.
    async fn find_director(&self, name: &str) -> Result<Director, VaasError>;

    /// Resolve a director name to its numeric identifier.
    async fn find_director_id(&self, name: &str) -> Result<i64, VaasError>;

    /// Add a backend under a director; returns the created resource locator.
    async fn add_backend(&self, backend: &Backend, director: &Director)
        -> Result<String, VaasError>;

    /// Delete a backend by identifier. Deleting an absent backend succeeds.
    async fn delete_backend(&self, id: i64) -> Result<(), VaasError>;

    /// Find a datacenter by symbolic code.
    async fn get_dc(&self, name: &str) -> Result<Dc, VaasError>;

    /// Find a backend by (director, address, port).
    async fn find_backend(
        &self,
        director: &Director,
        address: &str,
        port: u16,
    ) -> Result<Backend, VaasError>;

    /// Resolve a backend identifier from director name, address and port.
    async fn find_backend_id(
        &self,
        director: &str,
        address: &str,
        port: u16,
    ) -> Result<i64, VaasError>;
}

/// REST client for the VaaS API.
///
/// Holds only immutable configuration; safe for concurrent use. No retries,
/// no caching, no timeout beyond the transport default — callers needing
/// bounded latency pass a pre-configured `reqwest::Client` via
/// [`Client::with_http`].
pub struct Client {
    http: reqwest::Client,
    host: String,
    username: String,
    api_key: String,
}

impl Client {
    /// Create a client for the given host with query-string credentials.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self::with_http(reqwest::Client::new(), host, username, api_key)
    }

    /// Create a client using a pre-configured HTTP transport.
    pub fn with_http(
        http: reqwest::Client,
        host: impl Into<String>,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            host: host.into(),
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    /// Build a request with JSON content headers and credential query
    /// parameters — shared by every operation.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .query(&[
                ("username", self.username.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
    }

    /// Send a request, accepting only 2xx responses. Non-2xx responses are
    /// folded into an [`VaasError::Api`] carrying URL, status and body.
    async fn send(&self, request: RequestBuilder) -> Result<Response, VaasError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response)
    }

    /// Send a request and JSON-decode the response body.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, VaasError> {
        let response = self.send(request).await?;
        let url = response.url().to_string();
        let raw = response.text().await?;
        serde_json::from_str(&raw).map_err(|source| VaasError::Decode { url, source })
    }

    async fn api_error(response: Response) -> VaasError {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .unwrap_or_else(|err| format!("additional error reading raw response: {err}"));
        VaasError::Api { url, status, body }
    }
}

#[async_trait]
impl VaasApi for Client {
    /// Scans the first page of the name-filtered listing for an exact match;
    /// the server-side `name` filter is not an exact filter.
    async fn find_director(&self, name: &str) -> Result<Director, VaasError> {
        let request = self
            .request(Method::GET, &self.url(DIRECTOR_PATH))
            .query(&[("name", name)]);

        let directors: PaginatedList<Director> = self.fetch(request).await?;
        directors
            .objects
            .into_iter()
            .find(|director| director.name == name)
            .ok_or_else(|| VaasError::not_found("director", name))
    }

    async fn find_director_id(&self, name: &str) -> Result<i64, VaasError> {
        let director = self
            .find_director(name)
            .await
            .map_err(|err| VaasError::DirectorLookup(Box::new(err)))?;
        Ok(director.id)
    }

    /// On success the created resource locator is read from the `Location`
    /// response header. On any creation failure the backend is resolved via
    /// [`VaasApi::find_backend`] instead ("create failed" is treated as
    /// potentially "already exists"); if that lookup also fails, the original
    /// creation error is returned.
    async fn add_backend(
        &self,
        backend: &Backend,
        director: &Director,
    ) -> Result<String, VaasError> {
        let request = self
            .request(Method::POST, &self.url(BACKEND_PATH))
            .json(backend);

        match self.send(request).await {
            Ok(response) => Ok(response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string()),
            Err(err) => match self.find_backend(director, &backend.address, backend.port).await {
                Ok(existing) => Ok(existing.resource_uri),
                Err(_) => {
                    tracing::error!("failed finding backend: {}", err);
                    Err(err)
                }
            },
        }
    }

    /// Requests asynchronous processing via `Prefer: respond-async`. A 404
    /// means the backend is already gone and counts as success.
    async fn delete_backend(&self, id: i64) -> Result<(), VaasError> {
        let url = format!("{}{}/", self.url(BACKEND_PATH), id);
        let response = self
            .request(Method::DELETE, &url)
            .header(PREFER_HEADER, "respond-async")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!("tried to remove a non-existent backend id={}", id);
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }

    async fn get_dc(&self, name: &str) -> Result<Dc, VaasError> {
        let request = self.request(Method::GET, &self.url(DC_PATH));

        let dcs: PaginatedList<Dc> = self.fetch(request).await?;
        dcs.objects
            .into_iter()
            .find(|dc| dc.symbol == name)
            .ok_or_else(|| VaasError::not_found("DC", name))
    }

    /// Filters server-side by address, director id and port, then scans the
    /// page for an exact (address, port) match.
    async fn find_backend(
        &self,
        director: &Director,
        address: &str,
        port: u16,
    ) -> Result<Backend, VaasError> {
        let director_id = director.id.to_string();
        let port_param = port.to_string();
        let request = self
            .request(Method::GET, &self.url(BACKEND_PATH))
            .query(&[
                ("address", address),
                ("director", director_id.as_str()),
                ("port", port_param.as_str()),
            ]);

        let backends: PaginatedList<Backend> = self.fetch(request).await?;
        for backend in backends.objects {
            tracing::debug!("backend found: {:?}", backend);
            if backend.address == address && backend.port == port {
                return Ok(backend);
            }
        }
        Err(VaasError::not_found("backend", format!("{address}:{port}")))
    }

    /// Any failure while locating the backend surfaces as a not-found error.
    async fn find_backend_id(
        &self,
        director: &str,
        address: &str,
        port: u16,
    ) -> Result<i64, VaasError> {
        let director = self
            .find_director(director)
            .await
            .map_err(|err| VaasError::DirectorLookup(Box::new(err)))?;

        let backend = self
            .find_backend(&director, address, port)
            .await
            .map_err(|_| VaasError::not_found("backend", format!("{address}:{port}")))?;
        backend
            .id
            .ok_or_else(|| VaasError::not_found("backend", format!("{address}:{port}")))
    }
}
