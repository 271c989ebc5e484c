//! Process-wide promo state: per-fetch lifecycle tracking and result slots.
//!
//! The store is the only mutator of promo state and the UI's only read
//! surface. Each dispatch method drives one fetch through
//! `pending → succeeded | failed`; failures are carried as data in
//! [`FetchStatus::last_error`] and never propagate to the caller.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::PromoClient;
use crate::error::PromoError;
use crate::normalize::normalize_promos;
use crate::types::PromoMap;

/// Error message stored when the backend rejects a customer promo fetch.
const CUSTOMER_PROMO_ERROR: &str = "customer promo on scan not extracted from db";
/// Error message stored when the backend rejects a catalog fetch.
const ALL_PROMO_ERROR: &str = "promo not extracted from db";
/// Error message stored when the backend rejects an on-scan fetch.
const PROMO_ON_SCAN_ERROR: &str = "customer promo on scan not extracted from db";

/// Lifecycle tracking for one fetch operation.
///
/// At most one of `pending` / `succeeded` / `failed` is set at a time; all
/// three are clear only before the first dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStatus {
    pub pending: bool,
    pub succeeded: bool,
    pub failed: bool,
    /// Empty unless `failed` is set.
    pub last_error: String,
}

impl FetchStatus {
    fn begin(&mut self) {
        self.pending = true;
        self.succeeded = false;
        self.failed = false;
        self.last_error.clear();
    }

    fn succeed(&mut self) {
        self.pending = false;
        self.succeeded = true;
        self.failed = false;
        self.last_error.clear();
    }

    fn fail(&mut self, message: String) {
        self.pending = false;
        self.succeeded = false;
        self.failed = true;
        self.last_error = message;
    }
}

/// Uniform result of one dispatch: either the fetched promo mapping or a
/// human-readable error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(PromoMap),
    Error(String),
}

/// Full promo state snapshot: three lifecycle statuses plus three result
/// slots, one per dispatcher.
#[derive(Debug, Clone, Default)]
pub struct PromoState {
    pub single_promo_status: FetchStatus,
    pub all_promo_status: FetchStatus,
    pub promo_on_scan_status: FetchStatus,
    /// Promos for the current customer card, normalized for display.
    pub single_promo: PromoMap,
    /// The promo catalog, stored exactly as the backend returned it.
    pub all_promo: PromoMap,
    /// Promos shown on a card scan, normalized for display.
    pub promo_on_scan: PromoMap,
}

/// Shared handle to the promo state.
///
/// Cheap to clone; all clones observe the same state. Created once at process
/// start and lives for the process lifetime. The lock is never held across a
/// network await, so the three dispatchers can be in flight concurrently.
/// Dispatching an operation that is already pending simply starts a second
/// request — there is no coalescing or de-duplication.
#[derive(Debug, Clone, Default)]
pub struct PromoStore {
    state: Arc<RwLock<PromoState>>,
}

impl PromoStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the full state for UI consumption.
    pub async fn snapshot(&self) -> PromoState {
        self.state.read().await.clone()
    }

    /// Fetches and normalizes the promos for one customer card.
    ///
    /// Never fails: every error is recorded in `single_promo_status` instead
    /// of being returned.
    pub async fn fetch_promo_for_card(&self, client: &PromoClient, card_id: &str, jwt_token: &str) {
        tracing::debug!(card_id, "dispatching customer promo fetch");
        self.state.write().await.single_promo_status.begin();

        let result = client.get_customer_promo(card_id, jwt_token).await;
        let outcome = outcome_from(result.map(normalize_promos), CUSTOMER_PROMO_ERROR);

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        apply(
            &mut state.single_promo_status,
            &mut state.single_promo,
            outcome,
            false,
        );
    }

    /// Fetches the promo catalog, up to `limit` records per category.
    ///
    /// The catalog is stored raw; display normalization is only applied to
    /// the customer-facing fetches. Never fails: every error is recorded in
    /// `all_promo_status`.
    pub async fn fetch_all_promo(&self, client: &PromoClient, limit: u32, jwt_token: &str) {
        tracing::debug!(limit, "dispatching promo catalog fetch");
        self.state.write().await.all_promo_status.begin();

        let result = client.get_all_promo(limit, jwt_token).await;
        let outcome = outcome_from(result, ALL_PROMO_ERROR);

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        apply(
            &mut state.all_promo_status,
            &mut state.all_promo,
            outcome,
            false,
        );
    }

    /// Fetches and normalizes the promos shown when a card is scanned at a
    /// business.
    ///
    /// On error the `promo_on_scan` slot is reset to empty so a stale scan
    /// result is never displayed. Never fails: every error is recorded in
    /// `promo_on_scan_status`.
    pub async fn fetch_promo_on_scan(
        &self,
        client: &PromoClient,
        card_id: &str,
        card_cvc: &str,
        bus_id: &str,
    ) {
        tracing::debug!(card_id, bus_id, "dispatching promo-on-scan fetch");
        self.state.write().await.promo_on_scan_status.begin();

        let result = client
            .get_customer_promo_on_scan(card_id, card_cvc, bus_id)
            .await;
        let outcome = outcome_from(result.map(normalize_promos), PROMO_ON_SCAN_ERROR);

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        apply(
            &mut state.promo_on_scan_status,
            &mut state.promo_on_scan,
            outcome,
            true,
        );
    }
}

/// Collapses a client result into a [`FetchOutcome`].
///
/// Backend-reported errors and malformed responses both surface as the fixed
/// per-dispatcher message; transport failures keep their own message.
fn outcome_from(result: Result<PromoMap, PromoError>, backend_error: &str) -> FetchOutcome {
    match result {
        Ok(promos) => FetchOutcome::Success(promos),
        Err(err @ (PromoError::Api(_) | PromoError::Deserialize { .. })) => {
            tracing::warn!(error = %err, "backend rejected promo fetch");
            FetchOutcome::Error(backend_error.to_string())
        }
        Err(err) => {
            tracing::warn!(error = %err, "promo fetch transport failure");
            FetchOutcome::Error(err.to_string())
        }
    }
}

/// Applies a fetch outcome to one status/slot pair.
fn apply(
    status: &mut FetchStatus,
    slot: &mut PromoMap,
    outcome: FetchOutcome,
    reset_slot_on_error: bool,
) {
    match outcome {
        FetchOutcome::Success(promos) => {
            tracing::debug!("promo fetch fulfilled");
            *slot = promos;
            status.succeed();
        }
        FetchOutcome::Error(message) => {
            tracing::debug!(%message, "promo fetch failed");
            if reset_slot_on_error {
                slot.clear();
            }
            status.fail(message);
        }
    }
}
