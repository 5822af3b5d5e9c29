#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod checksum;
mod config;
#[cfg(feature = "std")]
mod encoder;
mod error;
mod ihex;
mod serializer;
pub mod types;

pub use checksum::{checksum, verify};
pub use config::{EncoderConfig, LineEnding, DEFAULT_CHUNK_SIZE};
#[cfg(feature = "std")]
pub use encoder::{
    encode, encode_to_string, open_input, EncodeSummary, Encoder, EncoderState,
};
#[cfg(feature = "std")]
pub use error::EncodeError;
pub use error::SerializeError;
pub use ihex::{IHex, EOF_RECORD};
pub use serializer::MAX_RECORD_LENGTH;
