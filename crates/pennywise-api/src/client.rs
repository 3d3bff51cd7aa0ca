// Document service HTTP client
//
// Wraps `reqwest::Client` with collection-scoped URL construction,
// status mapping, and envelope decoding. Three operations cover the
// whole service surface: merge-upsert, equality query, and delete.

use reqwest::{Response, StatusCode};
use tracing::{debug, trace};
use url::Url;

use crate::collection::Collection;
use crate::error::Error;
use crate::models::{ErrorResponse, Fields, QueryResponse, RawDocument};
use crate::transport::TransportConfig;

/// Raw HTTP client for the remote document collection service.
///
/// Documents live under `{base}/v1/{collection}/{id}`. All methods are
/// stateless with respect to the signed-in user: owner scoping is done by
/// the caller through query filters and stamped fields.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DocumentClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/v1/{collection}`
    pub(crate) fn collection_url(&self, collection: Collection) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/v1/{}", collection.as_str()))?)
    }

    /// `{base}/v1/{collection}/{id}` with the id percent-encoded as one segment.
    pub(crate) fn document_url(&self, collection: Collection, id: &str) -> Result<Url, Error> {
        let mut url = self.collection_url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Write a document. With `merge`, fields absent from `fields` are kept.
    pub async fn set_document(
        &self,
        collection: Collection,
        id: &str,
        fields: &Fields,
        merge: bool,
    ) -> Result<(), Error> {
        let mut url = self.document_url(collection, id)?;
        if merge {
            url.query_pairs_mut().append_pair("merge", "true");
        }
        debug!("PUT {}", url);

        let resp = self.http.put(url).json(fields).send().await?;
        check_status(resp).await.map(|_| ())
    }

    /// Fetch every document of `collection` whose `field` equals `value`.
    pub async fn query_documents(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<RawDocument>, Error> {
        let mut url = self.collection_url(collection)?;
        url.query_pairs_mut()
            .append_pair("field", field)
            .append_pair("value", value);
        debug!("GET {}", url);

        let resp = check_status(self.http.get(url).send().await?).await?;
        let body = resp.text().await?;
        trace!(bytes = body.len(), "query response received");

        let parsed: QueryResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;
        Ok(parsed.documents)
    }

    /// Delete a document. Deleting a missing document succeeds.
    pub async fn delete_document(&self, collection: Collection, id: &str) -> Result<(), Error> {
        let url = self.document_url(collection, id)?;
        debug!("DELETE {}", url);

        let resp = self.http.delete(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            trace!(collection = %collection, id, "document already absent");
            return Ok(());
        }
        check_status(resp).await.map(|_| ())
    }
}

/// Map non-success responses to typed errors, passing successes through.
async fn check_status(resp: Response) -> Result<Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let path = resp.url().path().to_owned();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_owned()
            } else {
                body
            }
        });

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized {
            status: status.as_u16(),
            message,
        },
        StatusCode::NOT_FOUND => Error::NotFound { path },
        _ => Error::Service {
            status: status.as_u16(),
            message,
        },
    })
}
