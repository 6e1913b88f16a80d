use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::gateway::GatewayReader;
use crate::resource::normalize::normalize_list;
use crate::resource::{FetchError, Resource, ViewState};
use crate::search::{Searchable, filter_items};

type Derive<T> = Arc<dyn Fn(&[T]) -> Vec<T> + Send + Sync>;

/// What happened to a fetch trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The request finished and the state is now `Ready` or `Failed`.
    Completed,
    /// Another fetch was already in flight; no request was issued.
    Dropped,
    /// The request was superseded or the view was closed; its result was discarded.
    Cancelled,
    /// `set_resource` was called with the resource already shown.
    Unchanged,
    /// The view was closed before the trigger; no request was issued.
    Closed,
}

struct Inner<T> {
    resource: Resource,
    state: ViewState<T>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

/// Page-local view state for one remote resource.
///
/// Every trigger ([`fetch`](Self::fetch), [`refresh`](Self::refresh),
/// [`set_resource`](Self::set_resource)) issues at most one GET. Closing or
/// dropping the view cancels its scope, after which no fetch writes state.
pub struct ResourceView<T, G: ?Sized> {
    gateway: Arc<G>,
    inner: Mutex<Inner<T>>,
    derive: Option<Derive<T>>,
    scope: CancellationToken,
}

impl<T, G> ResourceView<T, G>
where
    T: DeserializeOwned + Clone + Send,
    G: GatewayReader + ?Sized,
{
    pub fn new(gateway: Arc<G>, resource: Resource) -> Self {
        Self {
            gateway,
            inner: Mutex::new(Inner {
                resource,
                state: ViewState::Idle,
                generation: 0,
                in_flight: None,
            }),
            derive: None,
            scope: CancellationToken::new(),
        }
    }

    /// Maps each normalized payload to the display list. The raw list is only borrowed.
    pub fn with_derive<F>(mut self, derive: F) -> Self
    where
        F: Fn(&[T]) -> Vec<T> + Send + Sync + 'static,
    {
        self.derive = Some(Arc::new(derive));
        self
    }

    pub fn resource(&self) -> Resource {
        self.lock().resource.clone()
    }

    pub fn state(&self) -> ViewState<T> {
        self.lock().state.clone()
    }

    /// Display list of the last successful fetch; empty in any other state.
    pub fn items(&self) -> Vec<T> {
        self.lock()
            .state
            .items()
            .map(<[T]>::to_vec)
            .unwrap_or_default()
    }

    /// Items matching a free-text search, recomputed on every call.
    pub fn visible(&self, query: &str) -> Vec<T>
    where
        T: Searchable,
    {
        let inner = self.lock();
        match inner.state.items() {
            Some(items) => filter_items(items, query),
            None => Vec::new(),
        }
    }

    /// Ends the owning scope. In-flight results are discarded from now on.
    pub fn close(&self) {
        self.scope.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// Mount or explicit refresh trigger.
    pub async fn fetch(&self) -> FetchOutcome {
        match self.begin(false) {
            Ok(ticket) => self.run(ticket).await,
            Err(outcome) => outcome,
        }
    }

    pub async fn refresh(&self) -> FetchOutcome {
        self.fetch().await
    }

    /// Dependency-change trigger, e.g. a new route parameter.
    ///
    /// A different resource cancels whatever is in flight and fetches anew.
    pub async fn set_resource(&self, resource: Resource) -> FetchOutcome {
        if self.is_closed() {
            return FetchOutcome::Closed;
        }
        {
            let mut inner = self.lock();
            if inner.resource == resource && !matches!(inner.state, ViewState::Idle) {
                return FetchOutcome::Unchanged;
            }
            log::debug!("Switching view from {} to {resource}", inner.resource);
            inner.resource = resource;
            inner.state = ViewState::Idle;
        }
        self.reload().await
    }

    /// Runs one write and re-fetches the now-stale resource when it succeeds.
    ///
    /// A fetch still in flight was issued before the write, so it is superseded
    /// rather than allowed to land. On failure the view keeps its current state
    /// and the error is returned.
    pub async fn mutate_and_refresh<F, R, E>(&self, mutation: F) -> Result<R, E>
    where
        F: Future<Output = Result<R, E>>,
    {
        let outcome = mutation.await?;
        let refreshed = self.reload().await;
        if refreshed != FetchOutcome::Completed {
            log::debug!("Refresh after write ended as {refreshed:?}");
        }
        Ok(outcome)
    }

    /// Fetches now, cancelling any fetch already in flight.
    async fn reload(&self) -> FetchOutcome {
        match self.begin(true) {
            Ok(ticket) => self.run(ticket).await,
            Err(outcome) => outcome,
        }
    }

    fn begin(&self, supersede: bool) -> Result<Ticket<'_, T>, FetchOutcome> {
        if self.is_closed() {
            return Err(FetchOutcome::Closed);
        }
        let mut inner = self.lock();
        if let Some(stale) = inner.in_flight.take() {
            if !supersede {
                log::debug!("Fetch of {} already in flight, dropping trigger", inner.resource);
                inner.in_flight = Some(stale);
                return Err(FetchOutcome::Dropped);
            }
            log::debug!("Cancelling stale fetch of {}", inner.resource);
            stale.cancel();
        }
        let token = self.scope.child_token();
        inner.generation += 1;
        inner.in_flight = Some(token.clone());
        let previous = match std::mem::replace(&mut inner.state, ViewState::Loading) {
            ViewState::Loading => ViewState::Idle,
            other => other,
        };
        Ok(Ticket {
            inner: &self.inner,
            resource: inner.resource.clone(),
            generation: inner.generation,
            token,
            previous: Some(previous),
        })
    }

    async fn run(&self, mut ticket: Ticket<'_, T>) -> FetchOutcome {
        let resource = ticket.resource.clone();
        let result = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => return FetchOutcome::Cancelled,
            result = self.gateway.get(resource.path(), resource.query_pairs()) => result,
        };

        let next = match result {
            Ok(payload) => match normalize_list::<T>(payload) {
                Ok(items) => ViewState::Ready(match &self.derive {
                    Some(derive) => derive(&items),
                    None => items,
                }),
                Err(err) => {
                    log::error!("Unexpected payload from {resource}: {err}");
                    ViewState::Failed(FetchError::invalid_response(err.to_string()))
                }
            },
            Err(err) => {
                log::error!("Failed to fetch {resource}: {err}");
                ViewState::Failed(FetchError::from(&err))
            }
        };

        if ticket.settle(next) {
            FetchOutcome::Completed
        } else {
            FetchOutcome::Cancelled
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One issued fetch. Dropping it unsettled, e.g. when the caller abandons
/// the future, hands the view back its previous state.
struct Ticket<'a, T> {
    inner: &'a Mutex<Inner<T>>,
    resource: Resource,
    generation: u64,
    token: CancellationToken,
    previous: Option<ViewState<T>>,
}

impl<T> Ticket<'_, T> {
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes `next` unless the fetch was superseded or its scope closed.
    fn settle(&mut self, next: ViewState<T>) -> bool {
        self.previous = None;
        let mut inner = self.lock();
        if self.token.is_cancelled() || inner.generation != self.generation {
            return false;
        }
        inner.in_flight = None;
        inner.state = next;
        true
    }
}

impl<T> Drop for Ticket<'_, T> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        let mut inner = self.lock();
        if inner.generation == self.generation && !self.token.is_cancelled() {
            log::debug!("Fetch of {} abandoned", self.resource);
            inner.in_flight = None;
            inner.state = previous;
        }
    }
}

impl<T, G: ?Sized> Drop for ResourceView<T, G> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}
