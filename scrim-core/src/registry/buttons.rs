//! Button registry
//!
//! In-memory copy of both learned signatures plus the store they are
//! written through to.

use super::signature::{ButtonSignature, Role};
use crate::traits::{SignatureStore, StoreError};

/// Result of loading one role at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadStatus {
    /// A stored signature was loaded
    Stored,
    /// Nothing stored; the slot holds the unlearned placeholder
    Missing,
    /// Reading failed; the slot holds the unlearned placeholder
    Failed(StoreError),
}

/// Load outcome for both roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadReport {
    /// Outcome for the raise button
    pub raise: LoadStatus,
    /// Outcome for the lower button
    pub lower: LoadStatus,
}

impl LoadReport {
    /// Check if both buttons have been learned
    pub fn fully_learned(&self) -> bool {
        self.raise == LoadStatus::Stored && self.lower == LoadStatus::Stored
    }
}

/// Registry of the learned raise and lower buttons
pub struct ButtonRegistry<S: SignatureStore> {
    store: S,
    signatures: [ButtonSignature; 2],
}

impl<S: SignatureStore> ButtonRegistry<S> {
    /// Create a registry with both slots unlearned
    ///
    /// Call [`load`](Self::load) once at startup to read the stored buttons.
    pub fn new(store: S) -> Self {
        Self {
            store,
            signatures: [ButtonSignature::UNLEARNED; 2],
        }
    }

    /// Read both stored signatures into memory
    pub fn load(&mut self) -> LoadReport {
        LoadReport {
            raise: self.load_role(Role::Raise),
            lower: self.load_role(Role::Lower),
        }
    }

    fn load_role(&mut self, role: Role) -> LoadStatus {
        let (signature, status) = match self.store.read(role) {
            Ok(Some(sig)) => (sig, LoadStatus::Stored),
            Ok(None) => (ButtonSignature::UNLEARNED, LoadStatus::Missing),
            Err(e) => (ButtonSignature::UNLEARNED, LoadStatus::Failed(e)),
        };
        self.signatures[role.index()] = signature;
        status
    }

    /// Check if a signal is the learned raise button
    pub fn is_raise(&self, signal: &ButtonSignature) -> bool {
        self.signatures[Role::Raise.index()] == *signal
    }

    /// Check if a signal is the learned lower button
    pub fn is_lower(&self, signal: &ButtonSignature) -> bool {
        self.signatures[Role::Lower.index()] == *signal
    }

    /// Store a signal as the button for a role
    ///
    /// The in-memory copy is updated before the write, so the button works
    /// for the rest of this power cycle even if persisting it fails. Both
    /// roles may be given the same button; raise handling then wins.
    pub fn learn(&mut self, role: Role, signal: ButtonSignature) -> Result<(), StoreError> {
        self.signatures[role.index()] = signal;
        self.store.write(role, &signal)
    }

    /// Currently learned signature for a role
    pub fn signature(&self, role: Role) -> ButtonSignature {
        self.signatures[role.index()]
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory store counting writes
    #[derive(Default)]
    struct MemoryStore {
        slots: [Option<ButtonSignature>; 2],
        writes: usize,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl SignatureStore for MemoryStore {
        fn read(&mut self, role: Role) -> Result<Option<ButtonSignature>, StoreError> {
            if self.fail_reads {
                return Err(StoreError::Read);
            }
            Ok(self.slots[role.index()])
        }

        fn write(&mut self, role: Role, signature: &ButtonSignature) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Write);
            }
            self.slots[role.index()] = Some(*signature);
            self.writes += 1;
            Ok(())
        }
    }

    const UP: ButtonSignature = ButtonSignature::new(2, 0x00FF, 0x18);
    const DOWN: ButtonSignature = ButtonSignature::new(2, 0x00FF, 0x52);

    #[test]
    fn test_load_empty_store() {
        let mut registry = ButtonRegistry::new(MemoryStore::default());
        let report = registry.load();

        assert_eq!(report.raise, LoadStatus::Missing);
        assert_eq!(report.lower, LoadStatus::Missing);
        assert!(!report.fully_learned());
        assert!(registry.signature(Role::Raise).is_unlearned());
        assert!(registry.signature(Role::Lower).is_unlearned());
    }

    #[test]
    fn test_load_stored_signatures() {
        let store = MemoryStore {
            slots: [Some(UP), Some(DOWN)],
            ..Default::default()
        };
        let mut registry = ButtonRegistry::new(store);
        let report = registry.load();

        assert!(report.fully_learned());
        assert!(registry.is_raise(&UP));
        assert!(registry.is_lower(&DOWN));
        assert!(!registry.is_raise(&DOWN));
        assert!(!registry.is_lower(&UP));
    }

    #[test]
    fn test_load_read_failure_keeps_placeholder() {
        let store = MemoryStore {
            slots: [Some(UP), Some(DOWN)],
            fail_reads: true,
            ..Default::default()
        };
        let mut registry = ButtonRegistry::new(store);
        let report = registry.load();

        assert_eq!(report.raise, LoadStatus::Failed(StoreError::Read));
        assert!(!registry.is_raise(&UP));
    }

    #[test]
    fn test_learn_writes_through() {
        let mut registry = ButtonRegistry::new(MemoryStore::default());
        registry.learn(Role::Lower, DOWN).unwrap();

        assert!(registry.is_lower(&DOWN));
        assert_eq!(registry.store().slots[Role::Lower.index()], Some(DOWN));
        assert_eq!(registry.store().writes, 1);
    }

    #[test]
    fn test_learn_twice_is_idempotent() {
        let mut registry = ButtonRegistry::new(MemoryStore::default());
        registry.learn(Role::Raise, UP).unwrap();
        registry.learn(Role::Raise, UP).unwrap();

        assert!(registry.is_raise(&UP));
        assert!(registry.signature(Role::Lower).is_unlearned());
        assert_eq!(registry.store().writes, 2);
    }

    #[test]
    fn test_learn_failure_still_updates_memory() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut registry = ButtonRegistry::new(store);

        assert_eq!(registry.learn(Role::Raise, UP), Err(StoreError::Write));
        assert!(registry.is_raise(&UP));
    }

    #[test]
    fn test_same_button_for_both_roles() {
        let mut registry = ButtonRegistry::new(MemoryStore::default());
        registry.learn(Role::Raise, UP).unwrap();
        registry.learn(Role::Lower, UP).unwrap();

        assert!(registry.is_raise(&UP));
        assert!(registry.is_lower(&UP));
    }

    #[test]
    fn test_learn_survives_reload() {
        let mut registry = ButtonRegistry::new(MemoryStore::default());
        registry.learn(Role::Raise, UP).unwrap();
        registry.learn(Role::Lower, DOWN).unwrap();

        let mut restarted = ButtonRegistry::new(registry.into_store());
        assert!(!restarted.is_raise(&UP));
        restarted.load();

        assert!(restarted.is_raise(&UP));
        assert!(restarted.is_lower(&DOWN));
    }
}
