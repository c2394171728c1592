pub mod codec;
pub mod config;
pub mod link;
pub mod logging;
pub mod payload;
pub mod report;
pub mod store;

pub use codec::{CodecError, CompressionLevel, Payload, TokenFormat};
