//! Byte source access.
//!
//! All stream I/O goes through [`ByteCursor`]; decoders above it only ever
//! seek to absolute offsets and read fixed-width big-endian fields.

pub mod cursor;
pub mod error;

pub use cursor::ByteCursor;
pub use error::ReadError;
