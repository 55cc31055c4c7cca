// REST client for a remote record collection

use crate::config::Config;
use crate::models::Book;
use crate::query::ListQuery;
use crate::record::Record;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::future::Future;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Failures of a single request/response exchange
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failure, timeout, or server-side (5xx) failure
    #[error("transport error")]
    Transport(#[from] reqwest::Error),

    /// Response body does not match the expected shape
    #[error("malformed response body")]
    Decode(#[from] serde_json::Error),

    /// Request payload could not be serialized
    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),

    /// The configured base URL cannot address individual records
    #[error("base URL {0} cannot address records")]
    InvalidBaseUrl(String),

    /// The referenced record does not exist remotely
    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: String },

    /// The remote store rejected the request payload (4xx)
    #[error("rejected by remote store ({status})")]
    Validation {
        status: StatusCode,
        body: Option<serde_json::Value>,
    },
}

impl ClientError {
    /// Network, server, or decoding failure
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Decode(_) | ClientError::InvalidBaseUrl(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation { .. })
    }
}

/// The four REST operations on a record collection, plus a filtered listing
///
/// Every call is a single exchange: no retries, no caching.
pub trait RemoteCollection<T: Record> {
    /// Fetch every record
    fn list_all(&self) -> impl Future<Output = Result<Vec<T>, ClientError>> + Send;

    /// Fetch the records matching server-side query parameters
    fn search(&self, query: &ListQuery) -> impl Future<Output = Result<Vec<T>, ClientError>> + Send;

    fn get_by_id(&self, id: T::Id) -> impl Future<Output = Result<T, ClientError>> + Send;

    /// Submit a draft, the server assigns the id
    fn create(&self, draft: &T::Draft) -> impl Future<Output = Result<T, ClientError>> + Send;

    /// Replace all mutable fields of an existing record
    fn update(&self, id: T::Id, patch: &T::Draft) -> impl Future<Output = Result<T, ClientError>> + Send;

    /// Deleting an id that no longer exists fails with `NotFound`
    fn delete_by_id(&self, id: T::Id) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Collection client over HTTP/JSON
#[derive(Debug, Clone)]
pub struct RestCollection<T> {
    client: Client,
    base_url: Url,
    _record: PhantomData<fn() -> T>,
}

/// Client for the `/api/books` endpoints
pub type RemoteBooks = RestCollection<Book>;

impl<T: Record> RestCollection<T> {
    /// Create a client for the collection endpoint named in `config`
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            _record: PhantomData,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self, query: &ListQuery) -> Url {
        let mut url = self.base_url.clone();
        let pairs = query.pairs();
        if !pairs.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (field, value) in pairs {
                serializer.append_pair(field.as_param(), value);
            }
        }
        url
    }

    fn record_url(&self, id: T::Id) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    fn json_request(builder: RequestBuilder) -> RequestBuilder {
        builder.header(ACCEPT, HeaderValue::from_static("application/json"))
    }

    fn json_body<B: serde::Serialize>(builder: RequestBuilder, body: &B) -> Result<RequestBuilder, ClientError> {
        let body = serde_json::to_vec(body).map_err(ClientError::Encode)?;
        Ok(Self::json_request(builder)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body))
    }

    async fn fetch_list(&self, url: Url) -> Result<Vec<T>, ClientError> {
        let response = Self::json_request(self.client.get(url)).send().await?;
        let response = receive_response(response, T::collection_name(), None).await?;
        let records: Vec<T> = serde_json::from_slice(&response.bytes().await?)?;
        debug!(collection = T::collection_name(), count = records.len(), "Fetched records");
        Ok(records)
    }

    async fn receive_record(response: Response, id: Option<String>) -> Result<T, ClientError> {
        let response = receive_response(response, T::collection_name(), id).await?;
        let record: T = serde_json::from_slice(&response.bytes().await?)?;
        Ok(record)
    }
}

impl<T: Record> RemoteCollection<T> for RestCollection<T> {
    async fn list_all(&self) -> Result<Vec<T>, ClientError> {
        self.fetch_list(self.base_url.clone()).await
    }

    async fn search(&self, query: &ListQuery) -> Result<Vec<T>, ClientError> {
        self.fetch_list(self.collection_url(query)).await
    }

    async fn get_by_id(&self, id: T::Id) -> Result<T, ClientError> {
        let url = self.record_url(id)?;
        let response = Self::json_request(self.client.get(url)).send().await?;
        let record = Self::receive_record(response, Some(id.to_string())).await?;
        debug!(collection = T::collection_name(), %id, "Fetched record");
        Ok(record)
    }

    async fn create(&self, draft: &T::Draft) -> Result<T, ClientError> {
        let request = Self::json_body(self.client.post(self.base_url.clone()), draft)?;
        let record = Self::receive_record(request.send().await?, None).await?;
        debug!(collection = T::collection_name(), id = %record.id(), "Created record");
        Ok(record)
    }

    async fn update(&self, id: T::Id, patch: &T::Draft) -> Result<T, ClientError> {
        let url = self.record_url(id)?;
        let request = Self::json_body(self.client.put(url), patch)?;
        let record = Self::receive_record(request.send().await?, Some(id.to_string())).await?;
        debug!(collection = T::collection_name(), %id, "Updated record");
        Ok(record)
    }

    async fn delete_by_id(&self, id: T::Id) -> Result<(), ClientError> {
        let url = self.record_url(id)?;
        let response = self.client.delete(url).send().await?;
        receive_response(response, T::collection_name(), Some(id.to_string())).await?;
        debug!(collection = T::collection_name(), %id, "Deleted record");
        Ok(())
    }
}

/// Map a non-success status onto the error taxonomy
///
/// `id` names the addressed record; a 404 on the collection path itself is a
/// transport failure, not a missing record.
async fn receive_response(
    response: Response,
    collection: &'static str,
    id: Option<String>,
) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(ClientError::NotFound { collection, id });
        }
    } else if status.is_client_error() {
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice::<serde_json::Value>(&bytes).ok();
        debug!(collection, %status, ?body, "Request rejected");
        return Err(ClientError::Validation { status, body });
    }

    response.error_for_status().map_err(ClientError::Transport)
}
