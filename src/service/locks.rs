//! Per-player critical sections for match settlement

use crate::error::{EngineError, Result};
use crate::types::PlayerId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Lock table keyed by player id
///
/// Settlements sharing a player run one after the other; disjoint matches
/// proceed in parallel. Locks are always taken in sorted id order.
#[derive(Debug, Clone, Default)]
pub struct PlayerLocks {
    locks: Arc<Mutex<HashMap<PlayerId, Arc<AsyncMutex<()>>>>>,
}

/// Guards held for the duration of one settlement
#[derive(Debug)]
pub struct PlayerGuards {
    guards: Vec<OwnedMutexGuard<()>>,
}

impl PlayerGuards {
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the locks of every listed player
    pub async fn acquire(&self, player_ids: &[PlayerId]) -> Result<PlayerGuards> {
        let mut ids: Vec<&PlayerId> = player_ids.iter().collect();
        ids.sort();
        ids.dedup();

        let handles: Vec<Arc<AsyncMutex<()>>> = {
            let mut locks = self.locks.lock().map_err(|_| EngineError::InternalError {
                message: "Failed to acquire player lock table".to_string(),
            })?;

            ids.iter()
                .map(|id| locks.entry((*id).clone()).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }

        Ok(PlayerGuards { guards })
    }

    /// Drop the lock entry of a player who left the roster
    pub fn forget(&self, player_id: &str) -> Result<()> {
        let mut locks = self.locks.lock().map_err(|_| EngineError::InternalError {
            message: "Failed to acquire player lock table".to_string(),
        })?;

        locks.remove(player_id);
        Ok(())
    }

    /// Number of players with a lock entry
    pub fn tracked(&self) -> Result<usize> {
        let locks = self.locks.lock().map_err(|_| EngineError::InternalError {
            message: "Failed to acquire player lock table".to_string(),
        })?;

        Ok(locks.len())
    }
}
