//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Salted adaptive hashing of secrets (Argon2id, PHC strings)
//! - Zeroization of clear-text secrets

pub mod password;
