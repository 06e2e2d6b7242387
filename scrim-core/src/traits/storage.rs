//! Signature persistence trait

use crate::registry::{ButtonSignature, Role};

/// Errors from signature persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Storage could not accept the write right now
    Busy,
    /// Writing the record failed
    Write,
    /// Reading the record failed
    Read,
}

/// Non-volatile storage for the learned button signatures
///
/// One fixed-size record per role. Writes are expected to be durable
/// before the next write begins.
pub trait SignatureStore {
    /// Read the stored signature for a role
    ///
    /// Returns `Ok(None)` if nothing has been stored for the role yet.
    fn read(&mut self, role: Role) -> Result<Option<ButtonSignature>, StoreError>;

    /// Persist the signature for a role
    fn write(&mut self, role: Role, signature: &ButtonSignature) -> Result<(), StoreError>;
}
