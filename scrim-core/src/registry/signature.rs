//! Button signature and its persisted record
//!
//! A record is exactly [`RECORD_LEN`] bytes: protocol (1 byte), address
//! (2 bytes LE), command (2 bytes LE). There is no checksum; a record that
//! does not decode is treated as never learned.

use serde::{Deserialize, Serialize};

/// Size of a persisted signature record in bytes
pub const RECORD_LEN: usize = 5;

/// Role a learned button plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Raises (hides) the screen
    Raise,
    /// Lowers the screen
    Lower,
}

impl Role {
    /// Both roles in load order
    pub const ALL: [Role; 2] = [Role::Raise, Role::Lower];

    /// Slot index for per-role arrays
    pub const fn index(self) -> usize {
        match self {
            Role::Raise => 0,
            Role::Lower => 1,
        }
    }
}

/// Record encoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Signature did not serialize to a full record
    Encode,
    /// Bytes are not a valid record
    Decode,
}

/// Decoded remote-control signal
///
/// Compared by value; all three fields must match. The core gives no
/// meaning to the individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSignature {
    /// Decoder protocol code (0 = nothing learned)
    pub protocol: u8,
    /// Device address
    #[serde(with = "postcard::fixint::le")]
    pub address: u16,
    /// Button command
    #[serde(with = "postcard::fixint::le")]
    pub command: u16,
}

impl ButtonSignature {
    /// Placeholder held by a slot that has never been learned
    pub const UNLEARNED: Self = Self {
        protocol: 0,
        address: 0,
        command: 0,
    };

    /// Create a signature
    pub const fn new(protocol: u8, address: u16, command: u16) -> Self {
        Self {
            protocol,
            address,
            command,
        }
    }

    /// Check whether this is the unlearned placeholder
    pub fn is_unlearned(&self) -> bool {
        *self == Self::UNLEARNED
    }

    /// Serialize into a fixed-size record
    pub fn encode_record(&self) -> Result<[u8; RECORD_LEN], RecordError> {
        let mut record = [0u8; RECORD_LEN];
        let used = postcard::to_slice(self, &mut record)
            .map_err(|_| RecordError::Encode)?
            .len();

        if used != RECORD_LEN {
            return Err(RecordError::Encode);
        }

        Ok(record)
    }

    /// Deserialize a fixed-size record
    pub fn decode_record(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() != RECORD_LEN {
            return Err(RecordError::Decode);
        }

        postcard::from_bytes(bytes).map_err(|_| RecordError::Decode)
    }
}
