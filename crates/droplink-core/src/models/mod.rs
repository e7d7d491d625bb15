pub mod file;
pub mod pairing;

pub use file::{FileKind, FileRecord};
pub use pairing::{CodeIssued, DeviceInfo, DeviceJoin, PairingCode};
