//! Registration Lifecycle
//!
//! Orchestrates fleet membership on top of the API client: registering this
//! host's endpoint as a backend under a director, and deregistering it again
//! on shutdown.

use crate::api::models::Backend;
use crate::api::{VaasApi, VaasError};
use crate::config::Config;

/// Drives register/deregister flows for one configured endpoint.
pub struct Registrar<C: VaasApi> {
    client: C,
    config: Config,
}

impl<C: VaasApi> Registrar<C> {
    /// Create a registrar for the configured endpoint.
    pub fn new(client: C, config: Config) -> Self {
        Self { client, config }
    }

    /// Register the configured endpoint as a backend under the configured
    /// director. Returns the backend's resource locator.
    ///
    /// Registration is idempotent: if the backend already exists, the
    /// existing resource locator is returned (see
    /// [`VaasApi::add_backend`]).
    pub async fn register(&self) -> Result<String, VaasError> {
        let dc = self.client.get_dc(&self.config.dc).await?;
        let director = self.client.find_director(&self.config.director).await?;

        let backend = Backend {
            address: self.config.address.clone(),
            port: self.config.port,
            dc,
            director_url: director.resource_uri.clone(),
            inherit_time_profile: self.config.inherit_time_profile,
            weight: self.config.weight,
            tags: self.config.tags.clone(),
            ..Backend::default()
        };

        let location = self.client.add_backend(&backend, &director).await?;
        tracing::info!(
            "registered backend {}:{} under director {} at {}",
            self.config.address,
            self.config.port,
            self.config.director,
            location
        );
        Ok(location)
    }

    /// Remove the configured endpoint from its director.
    ///
    /// An endpoint that is not registered (or already removed) counts as
    /// successfully deregistered.
    pub async fn deregister(&self) -> Result<(), VaasError> {
        let id = match self
            .client
            .find_backend_id(&self.config.director, &self.config.address, self.config.port)
            .await
        {
            Ok(id) => id,
            Err(err) if err.is_not_found() => {
                tracing::warn!(
                    "backend {}:{} not registered under director {}, nothing to deregister",
                    self.config.address,
                    self.config.port,
                    self.config.director
                );
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        self.client.delete_backend(id).await?;
        tracing::info!(
            "deregistered backend id={} from director {}",
            id,
            self.config.director
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Dc, Director};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Test double recording the add_backend payload and serving canned
    /// lookup results.
    #[derive(Default)]
    struct StubApi {
        dc: Option<Dc>,
        director: Option<Director>,
        backend_id: Option<i64>,
        delete_should_fail: bool,
        added: Mutex<Option<Backend>>,
        deleted: Mutex<Option<i64>>,
    }

    #[async_trait]
    impl VaasApi for StubApi {
        async fn find_director(&self, name: &str) -> Result<Director, VaasError> {
            self.director
                .clone()
                .ok_or_else(|| VaasError::not_found("director", name))
        }

        async fn find_director_id(&self, name: &str) -> Result<i64, VaasError> {
            self.find_director(name)
                .await
                .map(|d| d.id)
                .map_err(|err| VaasError::DirectorLookup(Box::new(err)))
        }

        async fn add_backend(
            &self,
            backend: &Backend,
            _director: &Director,
        ) -> Result<String, VaasError> {
            *self.added.lock().unwrap() = Some(backend.clone());
            Ok("/api/v0.1/backend/42/".to_string())
        }

        async fn delete_backend(&self, id: i64) -> Result<(), VaasError> {
            if self.delete_should_fail {
                return Err(VaasError::Api {
                    url: "http://vaas.local/api/v0.1/backend/42/".to_string(),
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            *self.deleted.lock().unwrap() = Some(id);
            Ok(())
        }

        async fn get_dc(&self, name: &str) -> Result<Dc, VaasError> {
            self.dc
                .clone()
                .ok_or_else(|| VaasError::not_found("DC", name))
        }

        async fn find_backend(
            &self,
            _director: &Director,
            address: &str,
            port: u16,
        ) -> Result<Backend, VaasError> {
            Err(VaasError::not_found("backend", format!("{address}:{port}")))
        }

        async fn find_backend_id(
            &self,
            _director: &str,
            address: &str,
            port: u16,
        ) -> Result<i64, VaasError> {
            self.backend_id
                .ok_or_else(|| VaasError::not_found("backend", format!("{address}:{port}")))
        }
    }

    fn test_config() -> Config {
        Config {
            host: "http://vaas.local".to_string(),
            username: "agent".to_string(),
            api_key: "secret".to_string(),
            director: "service-a".to_string(),
            address: "192.168.199.34".to_string(),
            port: 8080,
            dc: "WAW".to_string(),
            weight: Some(10),
            tags: vec!["canary".to_string()],
            ..Config::default()
        }
    }

    fn waw() -> Dc {
        Dc {
            id: 3,
            name: "Warsaw".to_string(),
            symbol: "WAW".to_string(),
            resource_uri: "/api/v0.1/dc/3/".to_string(),
        }
    }

    fn service_a() -> Director {
        Director {
            id: 1,
            name: "service-a".to_string(),
            backend_urls: Vec::new(),
            resource_uri: "/api/v0.1/director/1/".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_builds_payload_from_resolved_resources() {
        let api = StubApi {
            dc: Some(waw()),
            director: Some(service_a()),
            ..StubApi::default()
        };
        let registrar = Registrar::new(api, test_config());

        let location = registrar.register().await.unwrap();
        assert_eq!(location, "/api/v0.1/backend/42/");

        let added = registrar.client.added.lock().unwrap().clone().unwrap();
        assert_eq!(added.address, "192.168.199.34");
        assert_eq!(added.port, 8080);
        assert_eq!(added.director_url, "/api/v0.1/director/1/");
        assert_eq!(added.dc.symbol, "WAW");
        assert_eq!(added.weight, Some(10));
        assert_eq!(added.tags, vec!["canary"]);
        assert!(added.id.is_none());
    }

    #[tokio::test]
    async fn test_register_fails_when_director_missing() {
        let api = StubApi {
            dc: Some(waw()),
            ..StubApi::default()
        };
        let registrar = Registrar::new(api, test_config());

        let err = registrar.register().await.unwrap_err();
        assert!(err.is_not_found());
        assert!(registrar.client.added.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_fails_when_dc_missing() {
        let api = StubApi {
            director: Some(service_a()),
            ..StubApi::default()
        };
        let registrar = Registrar::new(api, test_config());

        let err = registrar.register().await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_deregister_deletes_resolved_backend() {
        let api = StubApi {
            backend_id: Some(42),
            ..StubApi::default()
        };
        let registrar = Registrar::new(api, test_config());

        registrar.deregister().await.unwrap();
        assert_eq!(*registrar.client.deleted.lock().unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_deregister_tolerates_unregistered_backend() {
        let registrar = Registrar::new(StubApi::default(), test_config());

        registrar.deregister().await.unwrap();
        assert!(registrar.client.deleted.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deregister_propagates_delete_failure() {
        let api = StubApi {
            backend_id: Some(42),
            delete_should_fail: true,
            ..StubApi::default()
        };
        let registrar = Registrar::new(api, test_config());

        let err = registrar.deregister().await.unwrap_err();
        assert!(matches!(err, VaasError::Api { status: 500, .. }));
    }
}
