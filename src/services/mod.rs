//! Page controllers: load view data and submit mutations through the gateway.
//!
//! Every submission validates locally first, issues exactly one write and
//! reports the outcome. Callers re-fetch the affected resource on success
//! (see [`crate::resource::ResourceView::mutate_and_refresh`]).

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::gateway::{GatewayReader, GatewayWriter};
use crate::resource::{Resource, normalize_list, normalize_one};

pub mod dashboard;
pub mod errors;
pub mod housing;
pub mod reports;
pub mod riders;
pub mod shifts;
pub mod spare_parts;
pub mod vehicles;

pub use errors::{ServiceError, ServiceResult};

/// GETs a collection and normalizes it to a list.
pub(crate) async fn fetch_list<T, G>(gateway: &G, resource: &Resource) -> ServiceResult<Vec<T>>
where
    T: DeserializeOwned,
    G: GatewayReader + ?Sized,
{
    let payload = gateway
        .get(resource.path(), resource.query_pairs())
        .await
        .map_err(|err| {
            log::error!("Failed to load {resource}: {err}");
            err
        })?;
    normalize_list(payload).map_err(|err| {
        log::error!("Unexpected payload from {resource}: {err}");
        ServiceError::from(err)
    })
}

/// GETs a single entity; an empty payload is [`ServiceError::NotFound`].
pub(crate) async fn fetch_one<T, G>(gateway: &G, resource: &Resource) -> ServiceResult<T>
where
    T: DeserializeOwned,
    G: GatewayReader + ?Sized,
{
    let payload = gateway
        .get(resource.path(), resource.query_pairs())
        .await
        .map_err(|err| {
            log::error!("Failed to load {resource}: {err}");
            err
        })?;
    normalize_one(payload)?.ok_or(ServiceError::NotFound)
}

pub(crate) enum Write {
    Post,
    Put,
}

/// Serializes `body` and sends it as the single write of a submission.
pub(crate) async fn send<B, G>(gateway: &G, write: Write, path: &str, body: &B) -> ServiceResult<Value>
where
    B: Serialize + ?Sized,
    G: GatewayWriter + ?Sized,
{
    let body = serde_json::to_value(body)?;
    let result = match write {
        Write::Post => gateway.post(path, &body).await,
        Write::Put => gateway.put(path, &body).await,
    };
    result.map_err(|err| {
        log::error!("Failed to submit to {path}: {err}");
        ServiceError::from(err)
    })
}

pub(crate) async fn remove<G>(gateway: &G, path: &str) -> ServiceResult<Value>
where
    G: GatewayWriter + ?Sized,
{
    gateway.delete(path).await.map_err(|err| {
        log::error!("Failed to delete {path}: {err}");
        ServiceError::from(err)
    })
}

/// Trims the search box input; blank means no search.
pub(crate) fn search_term(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
