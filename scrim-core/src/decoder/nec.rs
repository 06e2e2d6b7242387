//! NEC protocol decoder
//!
//! Fed one call per edge of an active-low receiver output with the level
//! after the edge and the time since the previous edge. Frame layout:
//!
//! ```text
//! 9 ms mark, 4.5 ms space, 32 bits LSB first, stop mark
//!   bit: 562 us mark, then 562 us space (0) or 1687 us space (1)
//!   bits 0-7 address, 8-15 inverted address (or address high byte),
//!   bits 16-23 command, 24-31 inverted command
//! repeat: 9 ms mark, 2.25 ms space, stop mark
//! ```
//!
//! Timing windows are deliberately wide; cheap receivers stretch marks by
//! 100 us or more.

use crate::registry::ButtonSignature;

/// Protocol number reported for NEC frames
pub const NEC_PROTOCOL: u8 = 2;

/// Edges closer together than this are treated as noise
const GLITCH_US: u32 = 120;

const LEADER_MARK_US: (u32, u32) = (7_500, 10_500);
const LEADER_SPACE_US: (u32, u32) = (3_700, 5_300);
const REPEAT_SPACE_US: (u32, u32) = (1_750, 2_750);
const BIT_MARK_US: (u32, u32) = (360, 760);
const ZERO_SPACE_US: (u32, u32) = (310, 810);
const ONE_SPACE_US: (u32, u32) = (1_190, 2_190);

const FRAME_BITS: u8 = 32;

/// A decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NecFrame {
    /// Decoded button
    pub signature: ButtonSignature,
    /// True for a repeat code sent while the button is held
    pub repeat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    LeaderMark,
    LeaderSpace,
    RepeatStop,
    BitMark { bits: u8, value: u32 },
    BitSpace { bits: u8, value: u32 },
}

/// Edge-driven NEC decoder
#[derive(Debug, Clone)]
pub struct NecDecoder {
    state: State,
    last: Option<ButtonSignature>,
}

impl NecDecoder {
    /// Create an idle decoder
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            last: None,
        }
    }

    /// Feed one edge
    ///
    /// `low` is the receiver level after the edge (low means carrier
    /// present), `elapsed_us` the duration of the level that just ended.
    pub fn feed(&mut self, low: bool, elapsed_us: u32) -> Option<NecFrame> {
        if elapsed_us < GLITCH_US {
            return None;
        }

        let (next, frame) = self.step(low, elapsed_us);
        self.state = next;
        frame
    }

    fn step(&mut self, low: bool, elapsed_us: u32) -> (State, Option<NecFrame>) {
        match self.state {
            State::Idle if low => (State::LeaderMark, None),
            State::Idle => (State::Idle, None),
            State::LeaderMark if !low && within(elapsed_us, LEADER_MARK_US) => {
                (State::LeaderSpace, None)
            }
            State::LeaderSpace if low && within(elapsed_us, LEADER_SPACE_US) => {
                (State::BitMark { bits: 0, value: 0 }, None)
            }
            State::LeaderSpace if low && within(elapsed_us, REPEAT_SPACE_US) => {
                (State::RepeatStop, None)
            }
            State::RepeatStop if !low && within(elapsed_us, BIT_MARK_US) => {
                let frame = self.last.map(|signature| NecFrame {
                    signature,
                    repeat: true,
                });
                (State::Idle, frame)
            }
            State::BitMark { bits, value } if !low && within(elapsed_us, BIT_MARK_US) => {
                (State::BitSpace { bits, value }, None)
            }
            State::BitSpace { bits, value } if low => {
                let value = if within(elapsed_us, ONE_SPACE_US) {
                    value | (1 << bits)
                } else if within(elapsed_us, ZERO_SPACE_US) {
                    value
                } else {
                    return self.restart(low);
                };

                let bits = bits + 1;
                if bits < FRAME_BITS {
                    return (State::BitMark { bits, value }, None);
                }

                match validate(value) {
                    Some(signature) => {
                        self.last = Some(signature);
                        (
                            State::Idle,
                            Some(NecFrame {
                                signature,
                                repeat: false,
                            }),
                        )
                    }
                    None => (State::Idle, None),
                }
            }
            _ => self.restart(low),
        }
    }

    /// Abandon the current frame
    ///
    /// A falling edge may already be the start of the next leader.
    fn restart(&self, low: bool) -> (State, Option<NecFrame>) {
        if low {
            (State::LeaderMark, None)
        } else {
            (State::Idle, None)
        }
    }

    /// Drop the remembered code so repeats are ignored until a full frame
    pub fn forget(&mut self) {
        self.last = None;
    }
}

impl Default for NecDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn within(value: u32, (min, max): (u32, u32)) -> bool {
    (min..=max).contains(&value)
}

/// Check the command inverse and build the signature
///
/// An address whose second byte is not its inverse is an extended 16-bit
/// address.
fn validate(raw: u32) -> Option<ButtonSignature> {
    let address = (raw & 0xFF) as u8;
    let address_high = ((raw >> 8) & 0xFF) as u8;
    let command = ((raw >> 16) & 0xFF) as u8;
    let command_inv = ((raw >> 24) & 0xFF) as u8;

    if command ^ command_inv != 0xFF {
        return None;
    }

    let address = if address ^ address_high == 0xFF {
        u16::from(address)
    } else {
        u16::from_le_bytes([address, address_high])
    };

    Some(ButtonSignature::new(NEC_PROTOCOL, address, u16::from(command)))
}
