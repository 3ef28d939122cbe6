//! Model lifecycle store.
//!
//! One explicitly constructed, shareable service instance owns the trained
//! artifact, encoders/scaler bundle, and status flag for every domain. No
//! globals: callers construct the store once and pass it by `Arc`.
//!
//! Locking: one `RwLock` per domain. `ensure_trained` and `retrain` hold the
//! write lock for the duration of training, which gives at-most-one in-flight
//! training run per domain and guarantees readers only ever observe fully
//! published artifacts. Domains are independent, so there is no cross-domain
//! locking and no ordering requirement between them.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::{error, warn};

use crate::domain::{Domain, DomainStatus};
use crate::error::Result;
use crate::train::{DomainArtifact, train_domain};

struct DomainSlot {
    status: DomainStatus,
    artifact: Option<Arc<DomainArtifact>>,
}

impl DomainSlot {
    fn empty() -> Self {
        DomainSlot {
            status: DomainStatus::NotTrained,
            artifact: None,
        }
    }
}

pub struct ModelStore {
    slots: [RwLock<DomainSlot>; 4],
}

impl ModelStore {
    /// A store with no trained domains; training happens lazily on first
    /// prediction (or explicitly via `retrain`).
    pub fn new() -> Self {
        ModelStore {
            slots: std::array::from_fn(|_| RwLock::new(DomainSlot::empty())),
        }
    }

    /// A store that trains every domain up front. Individual training
    /// failures are recorded per domain, never propagated.
    pub fn with_eager_training() -> Self {
        let store = ModelStore::new();
        for domain in Domain::ALL {
            store.ensure_trained(domain);
        }
        store
    }

    fn slot(&self, domain: Domain) -> &RwLock<DomainSlot> {
        &self.slots[domain.index()]
    }

    /// Train the domain if it is not currently `Trained`. Idempotent; a
    /// trainer failure marks the domain `Error` and leaves any previously
    /// published artifact untouched, so prediction can still fall back to a
    /// stale-but-valid model.
    pub fn ensure_trained(&self, domain: Domain) {
        {
            let slot = self.slot(domain).read().expect("store lock poisoned");
            if slot.status == DomainStatus::Trained {
                return;
            }
        }

        let mut slot = self.slot(domain).write().expect("store lock poisoned");
        // Re-check: another caller may have trained while we waited.
        if slot.status == DomainStatus::Trained {
            return;
        }

        match train_domain(domain) {
            Ok(artifact) => {
                slot.artifact = Some(Arc::new(artifact));
                slot.status = DomainStatus::Trained;
            }
            Err(err) => {
                error!(domain = %domain, error = %err, "training failed");
                slot.status = DomainStatus::Error;
            }
        }
    }

    /// Unconditionally re-execute the trainer, replacing the stored artifact
    /// on success. Returns the training error (after recording `Error`
    /// status) so explicit train requests get a success/failure signal.
    pub fn retrain(&self, domain: Domain) -> Result<()> {
        let mut slot = self.slot(domain).write().expect("store lock poisoned");
        match train_domain(domain) {
            Ok(artifact) => {
                slot.artifact = Some(Arc::new(artifact));
                slot.status = DomainStatus::Trained;
                Ok(())
            }
            Err(err) => {
                error!(domain = %domain, error = %err, "retrain failed");
                slot.status = DomainStatus::Error;
                Err(err)
            }
        }
    }

    /// Retrain every domain; reports the first failure but attempts all.
    pub fn retrain_all(&self) -> Result<()> {
        let mut first_err = None;
        for domain in Domain::ALL {
            if let Err(err) = self.retrain(domain) {
                warn!(domain = %domain, "continuing after retrain failure");
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    /// The last successfully published artifact, if any. May be stale when
    /// the status is `Error`; that is deliberate (see `ensure_trained`).
    pub fn artifact(&self, domain: Domain) -> Option<Arc<DomainArtifact>> {
        self.slot(domain)
            .read()
            .expect("store lock poisoned")
            .artifact
            .clone()
    }

    pub fn status(&self, domain: Domain) -> DomainStatus {
        self.slot(domain).read().expect("store lock poisoned").status
    }

    pub fn status_all(&self) -> BTreeMap<String, DomainStatus> {
        Domain::ALL
            .iter()
            .map(|d| (d.as_str().to_string(), self.status(*d)))
            .collect()
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        ModelStore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_untrained_everywhere() {
        let store = ModelStore::new();
        for domain in Domain::ALL {
            assert_eq!(store.status(domain), DomainStatus::NotTrained);
            assert!(store.artifact(domain).is_none());
        }
    }

    #[test]
    fn ensure_trained_is_idempotent() {
        let store = ModelStore::new();
        store.ensure_trained(Domain::Packaging);
        assert_eq!(store.status(Domain::Packaging), DomainStatus::Trained);

        let first = store.artifact(Domain::Packaging).unwrap();
        store.ensure_trained(Domain::Packaging);
        let second = store.artifact(Domain::Packaging).unwrap();
        assert!(Arc::ptr_eq(&first, &second), "no retrain on ensure");
    }

    #[test]
    fn retrain_replaces_the_artifact() {
        let store = ModelStore::new();
        store.ensure_trained(Domain::EsgScore);
        let first = store.artifact(Domain::EsgScore).unwrap();

        store.retrain(Domain::EsgScore).unwrap();
        let second = store.artifact(Domain::EsgScore).unwrap();
        assert!(!Arc::ptr_eq(&first, &second), "retrain must republish");
        assert_eq!(store.status(Domain::EsgScore), DomainStatus::Trained);
    }

    #[test]
    fn status_all_covers_every_domain() {
        let store = ModelStore::with_eager_training();
        let all = store.status_all();
        assert_eq!(all.len(), 4);
        assert!(all.values().all(|s| *s == DomainStatus::Trained));
    }

    #[test]
    fn concurrent_ensure_trains_once() {
        let store = Arc::new(ModelStore::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.ensure_trained(Domain::Packaging))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.status(Domain::Packaging), DomainStatus::Trained);
        assert!(store.artifact(Domain::Packaging).is_some());
    }
}
