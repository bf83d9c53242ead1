//! Where collections are fetched from and uploaded to.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde_json::{Map, Value};

use crate::envelope::{upload_payload, Envelope};
use crate::error::SyncError;
use crate::io::{read_json, write_json};

pub const DEFAULT_API_BASE: &str = "https://api.getpostman.com";

const API_KEY_HEADER: &str = "X-Api-Key";

/// Source and sink for one collection.
///
/// `fetch` returns the stored value as-is, wrapped or not. `replace`
/// receives a bare tree and returns whatever the store answers with.
pub trait CollectionStore {
    fn fetch(&self) -> Result<Value, SyncError>;
    fn replace(&self, collection: &Value) -> Result<Value, SyncError>;
    fn describe(&self) -> String;
}

/// The Postman collections API.
#[derive(Debug)]
pub struct PostmanApi {
    client: Client,
    url: String,
    api_key: String,
}

impl PostmanApi {
    pub fn new(base_url: &str, api_key: String, collection_uid: String) -> Result<Self, SyncError> {
        let client = Client::builder()
            .user_agent(concat!("collection-sync/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(PostmanApi {
            client,
            url: collection_url(base_url, &collection_uid),
            api_key,
        })
    }
}

pub fn collection_url(base_url: &str, collection_uid: &str) -> String {
    format!("{}/collections/{}", base_url.trim_end_matches('/'), collection_uid)
}

/// 2xx with an unparseable body is an empty object; anything else is an
/// error carrying the raw body.
fn read_response(response: Response) -> Result<Value, SyncError> {
    let status = response.status();
    let body = response.text()?;
    interpret_response(status.as_u16(), status.is_success(), &body)
}

fn interpret_response(status: u16, success: bool, body: &str) -> Result<Value, SyncError> {
    if !success {
        return Err(SyncError::Http {
            status,
            body: body.to_string(),
        });
    }
    Ok(serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Map::new())))
}

impl CollectionStore for PostmanApi {
    fn fetch(&self) -> Result<Value, SyncError> {
        tracing::info!(url = %self.url, "fetching collection");
        let response = self
            .client
            .get(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()?;
        read_response(response)
    }

    fn replace(&self, collection: &Value) -> Result<Value, SyncError> {
        tracing::info!(url = %self.url, "uploading collection");
        let response = self
            .client
            .put(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&upload_payload(collection.clone()))
            .send()?;
        read_response(response)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A collection kept in a local JSON file, stored wrapped.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        FileStore { path }
    }
}

impl CollectionStore for FileStore {
    fn fetch(&self) -> Result<Value, SyncError> {
        tracing::info!(path = %self.path.display(), "reading collection");
        read_json(&self.path)
    }

    /// Returns the wrapped document that was written.
    fn replace(&self, collection: &Value) -> Result<Value, SyncError> {
        tracing::info!(path = %self.path.display(), "writing collection");
        let payload = upload_payload(collection.clone());
        write_json(&self.path, &payload)?;
        Ok(payload)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetch and unwrap.
pub fn fetch_document(store: &dyn CollectionStore) -> Result<Value, SyncError> {
    Ok(Envelope::detect(store.fetch()?).into_document())
}
