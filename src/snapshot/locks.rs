//! Operation locks
//!
//! Two lock domains shared by every target: one for delete-class operations
//! and one for restores. A delete and a restore never block each other;
//! two deletes (or two restores) always do, even on different targets.

use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

/// The two process-wide lock domains
#[derive(Debug, Default)]
pub struct OperationLocks {
    delete: Mutex<()>,
    restore: Mutex<()>,
}

/// Proof that the delete lock is held
#[derive(Debug)]
pub struct DeleteGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

/// Proof that the restore lock is held
#[derive(Debug)]
pub struct RestoreGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl OperationLocks {
    /// Create a fresh pair of locks
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the delete lock is acquired
    pub fn delete(&self) -> DeleteGuard<'_> {
        // Poisoning is ignored: the mutexes guard no data.
        DeleteGuard {
            _guard: self.delete.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Block until the restore lock is acquired
    pub fn restore(&self) -> RestoreGuard<'_> {
        RestoreGuard {
            _guard: self.restore.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Try to take the delete lock without blocking
    pub fn try_delete(&self) -> Option<DeleteGuard<'_>> {
        match self.delete.try_lock() {
            Ok(guard) => Some(DeleteGuard { _guard: guard }),
            Err(TryLockError::Poisoned(poisoned)) => {
                Some(DeleteGuard {
                    _guard: poisoned.into_inner(),
                })
            }
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Try to take the restore lock without blocking
    pub fn try_restore(&self) -> Option<RestoreGuard<'_>> {
        match self.restore.try_lock() {
            Ok(guard) => Some(RestoreGuard { _guard: guard }),
            Err(TryLockError::Poisoned(poisoned)) => {
                Some(RestoreGuard {
                    _guard: poisoned.into_inner(),
                })
            }
            Err(TryLockError::WouldBlock) => None,
        }
    }
}
