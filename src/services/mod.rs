pub mod client;
pub mod signer;
