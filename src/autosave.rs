use crate::snapshot::Snapshot;
use crate::storage::Storage;
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Rien en attente.
    Idle,
    /// Une écriture attend la fin de la fenêtre.
    Waiting,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone)]
struct PendingWrite {
    snapshot: Snapshot,
    due: Instant,
}

/// Écriture différée : seul le dernier snapshot programmé dans la fenêtre est envoyé.
///
/// L'horloge est fournie par l'appelant. Un échec n'annule rien côté mémoire
/// et n'est pas rejoué : la prochaine programmation repartira du nouvel état.
#[derive(Debug, Clone)]
pub struct Autosave {
    window: Duration,
    pending: Option<PendingWrite>,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Autosave {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Remplace l'écriture en attente et relance la fenêtre.
    pub fn schedule(&mut self, snapshot: Snapshot, now: Instant) {
        if self.pending.is_some() {
            debug!("autosave: superseding pending snapshot");
        }
        self.pending = Some(PendingWrite {
            snapshot,
            due: now + self.window,
        });
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Envoie le snapshot en attente si sa fenêtre est écoulée.
    pub fn poll<S: Storage + ?Sized>(
        &mut self,
        now: Instant,
        storage: &S,
        workspace: &str,
    ) -> SaveStatus {
        let Some(due) = self.due_at() else {
            return SaveStatus::Idle;
        };
        if now < due {
            return SaveStatus::Waiting;
        }
        self.flush(storage, workspace)
    }

    /// Envoie immédiatement le snapshot en attente, sans attendre la fenêtre.
    pub fn flush<S: Storage + ?Sized>(&mut self, storage: &S, workspace: &str) -> SaveStatus {
        let Some(PendingWrite { mut snapshot, .. }) = self.pending.take() else {
            return SaveStatus::Idle;
        };
        snapshot.saved_at = Some(Utc::now());
        let result = snapshot
            .to_value()
            .and_then(|blob| storage.save(workspace, &blob));
        match result {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                warn!(workspace, error = %err, "autosave failed");
                SaveStatus::Failed(err.to_string())
            }
        }
    }
}
