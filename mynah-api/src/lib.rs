pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod request;

pub use client::*;
pub use endpoints::*;
pub use envelope::*;
pub use request::*;
