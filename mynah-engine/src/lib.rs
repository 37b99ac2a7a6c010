pub mod chat;
pub mod ingest;
pub mod state;
pub mod traits;
pub mod turn;
pub mod voice;

pub use chat::*;
pub use ingest::*;
pub use state::*;
pub use traits::*;
pub use turn::*;
pub use voice::*;
