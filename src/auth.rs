//! Session token models shared by the client and its stores.

pub mod pair;
pub mod secret;

pub use pair::*;
pub use secret::*;
