//! Partner identity: private key material and self-signed bearer tokens.

pub mod secret;
pub mod signer;

pub use secret::*;
pub use signer::*;
