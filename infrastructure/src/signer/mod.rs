//! Vote signer adapters

pub mod hmac;

pub use self::hmac::HmacSigner;
