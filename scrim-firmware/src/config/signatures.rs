//! Learned button persistence
//!
//! Loads and saves the raise and lower button signatures in flash. Each
//! role has its own storage key holding one fixed-size record.

use defmt::*;

use scrim_core::registry::{ButtonSignature, RecordError, Role, RECORD_LEN};
use scrim_core::traits::StoreError;
use scrim_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey};
use scrim_hal_rp2040::FlashStorageTrait;

/// Signature persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignatureError {
    /// Flash operation failed
    Flash(FlashError),
    /// Record could not be encoded or decoded
    Record(RecordError),
}

impl From<FlashError> for SignatureError {
    fn from(e: FlashError) -> Self {
        SignatureError::Flash(e)
    }
}

impl From<RecordError> for SignatureError {
    fn from(e: RecordError) -> Self {
        SignatureError::Record(e)
    }
}

/// Storage key for a role
pub fn key_for(role: Role) -> StorageKey {
    match role {
        Role::Raise => StorageKey::RaiseButton,
        Role::Lower => StorageKey::LowerButton,
    }
}

/// Load both learned buttons
///
/// Returns what the registry should see for each role: a missing record
/// is `Ok(None)`, anything unreadable an error.
pub async fn load_signatures(
    storage: &mut FlashStorage<'_>,
) -> [Result<Option<ButtonSignature>, StoreError>; 2] {
    let mut loaded = [Ok(None); 2];

    for role in Role::ALL {
        loaded[role.index()] = match load_signature(storage, role).await {
            Ok(signature) => {
                info!(
                    "Loaded {:?} button: protocol={} address={=u16:#x} command={=u16:#x}",
                    role, signature.protocol, signature.address, signature.command
                );
                Ok(Some(signature))
            }
            Err(SignatureError::Flash(FlashError::NotFound)) => {
                info!("No {:?} button learned yet", role);
                Ok(None)
            }
            Err(e) => {
                warn!("Failed to load {:?} button: {:?}", role, e);
                Err(StoreError::Read)
            }
        };
    }

    loaded
}

async fn load_signature(
    storage: &mut FlashStorage<'_>,
    role: Role,
) -> Result<ButtonSignature, SignatureError> {
    let mut buffer = [0u8; RECORD_LEN];
    let len = storage.read(key_for(role), &mut buffer).await?;

    debug!("Read {} bytes for {:?} button", len, role);

    Ok(ButtonSignature::decode_record(&buffer[..len])?)
}

/// Save a learned button
pub async fn save_signature(
    storage: &mut FlashStorage<'_>,
    role: Role,
    signature: &ButtonSignature,
) -> Result<(), SignatureError> {
    let record = signature.encode_record()?;

    storage.write(key_for(role), &record).await?;

    info!("Saved {:?} button to flash", role);
    Ok(())
}
