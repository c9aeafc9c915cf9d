//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC-SHA256, hex/Base64, constant-time compare)
//! - Signed service tokens (issue/verify for the trusted backend client)

pub mod crypto;
pub mod token;
