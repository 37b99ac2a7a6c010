pub mod audio;
pub mod config;
pub mod conversation;
pub mod document;
pub mod idempotency;
pub mod status;
pub mod types;

pub use audio::*;
pub use config::*;
pub use conversation::*;
pub use document::*;
pub use idempotency::*;
pub use status::*;
pub use types::*;
