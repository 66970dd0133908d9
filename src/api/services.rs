//! Typed accessors for each API resource

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::api::client::{ApiClient, ApiError};
use crate::api::models::{Bucket, Certificate, Domain, ProtectedResource};

/// A list/get pair over one collection path
pub struct Resource<'a, T> {
    client: &'a ApiClient,
    path: &'static str,
    _marker: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Resource<'a, T> {
    fn new(client: &'a ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _marker: PhantomData,
        }
    }

    pub async fn list(&self) -> Result<Vec<T>, ApiError> {
        self.client.get_all(self.path).await
    }

    pub async fn get(&self, id: &str) -> Result<T, ApiError> {
        self.client.get(&format!("{}/{}", self.path, id)).await
    }
}

impl ApiClient {
    pub fn domains(&self) -> Resource<'_, Domain> {
        Resource::new(self, "/domains")
    }

    pub fn certificates(&self) -> Resource<'_, Certificate> {
        Resource::new(self, "/ssl/certificates")
    }

    pub fn protection(&self) -> Resource<'_, ProtectedResource> {
        Resource::new(self, "/protection/resources")
    }

    pub fn buckets(&self) -> Resource<'_, Bucket> {
        Resource::new(self, "/storage/buckets")
    }

    /// Raw whois text for a domain name
    pub async fn whois(&self, name: &str) -> Result<String, ApiError> {
        self.get_with_query("/domains/whois", &[("name", name.to_string())])
            .await
    }
}
