//! Fallback coordinator
//!
//! Every entity operation tries the durable backend first. When the backend
//! fails, [`attempt_fallback`] decides whether the equivalent operation is
//! applied to the simulated store or the failure is surfaced as a 500.
//!
//! Identifiers are classified before any backend call: a simulated
//! identifier (by prefix or by membership in the simulated collection) is
//! served from memory only and never reaches the database.

use musifyx_common::{EntityKind, RecordId};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::simulated::{SimulatedCollection, SimulatedRecord, SimulatedStores};
use crate::store::{BackendError, BackendResult, DurableBackend};

mod catalog;
mod identity;
mod playlists;

/// Entity operation guarded by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    ReadAll,
    ReadOne,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::ReadAll => "read-all",
            Operation::ReadOne => "read-one",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Outcome of a failed durable operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackDecision {
    /// Apply the operation to the simulated store
    Simulate,
    /// Report the backend failure to the caller
    Surface,
}

/// Decide how a durable failure is handled
///
/// - Creates fall back on any error for every kind except users:
///   registration never invents a simulated identity.
/// - Read-all falls back to the full simulated collection.
/// - Single-record operations fall back only when a simulated record with
///   the same identifier exists.
///
/// Every kind of backend error is treated alike.
pub fn attempt_fallback(
    kind: EntityKind,
    op: Operation,
    _err: &BackendError,
    simulated_match: bool,
) -> FallbackDecision {
    match op {
        Operation::Create if kind == EntityKind::User => FallbackDecision::Surface,
        Operation::Create | Operation::ReadAll => FallbackDecision::Simulate,
        Operation::ReadOne | Operation::Update | Operation::Delete => {
            if simulated_match {
                FallbackDecision::Simulate
            } else {
                FallbackDecision::Surface
            }
        }
    }
}

fn log_fallback(kind: EntityKind, op: Operation, err: &BackendError) {
    warn!(
        "Durable {} {} failed, using simulated store: {}",
        kind.label().to_lowercase(),
        op,
        err
    );
}

/// Routes entity operations between the durable backend and the simulated stores
#[derive(Clone)]
pub struct FallbackCoordinator {
    backend: Arc<dyn DurableBackend>,
    sim: SimulatedStores,
}

impl FallbackCoordinator {
    pub fn new(backend: Arc<dyn DurableBackend>, sim: SimulatedStores) -> Self {
        Self { backend, sim }
    }

    pub fn backend(&self) -> &dyn DurableBackend {
        self.backend.as_ref()
    }

    pub fn simulated(&self) -> &SimulatedStores {
        &self.sim
    }

    /// Classify a raw identifier for the collection's entity kind
    ///
    /// Membership in the simulated collection wins over the identifier shape.
    async fn classify<T: SimulatedRecord>(
        &self,
        collection: &SimulatedCollection<T>,
        raw: &str,
    ) -> ApiResult<RecordId> {
        let kind = collection.kind();
        if collection.contains(raw).await {
            return Ok(RecordId::Simulated(kind, raw.to_string()));
        }
        Ok(RecordId::parse(kind, raw)?)
    }

    /// Run a read-one, update or delete against whichever store owns `raw`
    ///
    /// `durable` reports a missing record as `Ok(None)`; `simulated` as
    /// `None`. Both become a 404.
    async fn with_record<T, R, D, DFut, S, SFut>(
        &self,
        op: Operation,
        collection: &SimulatedCollection<T>,
        raw: &str,
        failure_msg: &str,
        durable: D,
        simulated: S,
    ) -> ApiResult<R>
    where
        T: SimulatedRecord,
        D: FnOnce(String) -> DFut,
        DFut: Future<Output = BackendResult<Option<R>>>,
        S: FnOnce(String) -> SFut,
        SFut: Future<Output = Option<R>>,
    {
        let kind = collection.kind();
        let id = match self.classify(collection, raw).await? {
            RecordId::Simulated(_, id) => {
                return simulated(id).await.ok_or_else(|| ApiError::not_found(kind));
            }
            RecordId::Durable(id) => id,
        };

        match durable(id.clone()).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ApiError::not_found(kind)),
            // Ids held in memory were routed above, so a durable failure
            // has no simulated record to fall back on and always surfaces
            Err(err) => {
                debug_assert_eq!(
                    attempt_fallback(kind, op, &err, false),
                    FallbackDecision::Surface
                );
                Err(ApiError::backend(failure_msg, err))
            }
        }
    }

    /// Run a create, inserting into the simulated store when the backend fails
    async fn create_record<T, D, DFut, S, SFut>(
        &self,
        collection: &SimulatedCollection<T>,
        failure_msg: &str,
        durable: D,
        simulated: S,
    ) -> ApiResult<T>
    where
        T: SimulatedRecord,
        D: FnOnce() -> DFut,
        DFut: Future<Output = BackendResult<T>>,
        S: FnOnce() -> SFut,
        SFut: Future<Output = T>,
    {
        let kind = collection.kind();
        match durable().await {
            Ok(record) => Ok(record),
            Err(err) => match attempt_fallback(kind, Operation::Create, &err, false) {
                FallbackDecision::Simulate => {
                    log_fallback(kind, Operation::Create, &err);
                    Ok(simulated().await)
                }
                FallbackDecision::Surface => Err(ApiError::backend(failure_msg, err)),
            },
        }
    }

    /// Run a read-all; `merge` appends the simulated records to durable ones
    async fn list_records<T, D, DFut>(
        &self,
        collection: &SimulatedCollection<T>,
        merge: bool,
        durable: D,
    ) -> ApiResult<Vec<T>>
    where
        T: SimulatedRecord,
        D: FnOnce() -> DFut,
        DFut: Future<Output = BackendResult<Vec<T>>>,
    {
        let kind = collection.kind();
        match durable().await {
            Ok(mut records) => {
                if merge {
                    records.extend(collection.all().await);
                }
                Ok(records)
            }
            Err(err) => match attempt_fallback(kind, Operation::ReadAll, &err, false) {
                FallbackDecision::Simulate => {
                    log_fallback(kind, Operation::ReadAll, &err);
                    Ok(collection.all().await)
                }
                FallbackDecision::Surface => Err(ApiError::backend(
                    format!("Failed to fetch {}s", kind.label().to_lowercase()),
                    err,
                )),
            },
        }
    }
}
