//! Request and response envelopes of the crawl API

use crate::model::lenient;
use crate::model::{BrokenLink, Record, RecordId};
use serde::{Deserialize, Serialize};

/// `GET /urls` response body
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub urls: Vec<Record>,
}

/// `GET /urls/{id}/broken` response body
#[derive(Debug, Deserialize)]
pub struct BrokenLinksResponse {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub broken_links: Vec<BrokenLink>,
}

/// Error body the service sends alongside non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `POST /urls` request body
#[derive(Debug, Serialize)]
pub struct CreateRequest<'a> {
    pub url: &'a str,
}

/// Body shared by the bulk endpoints
#[derive(Debug, Serialize)]
pub struct IdsRequest<'a> {
    pub ids: &'a [RecordId],
}
