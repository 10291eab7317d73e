//! Verified-claims mapping for OpenID Connect tokens.
//!
//! This crate surrounds the [`assura_claims`] extraction engine with the
//! plumbing a token issuer needs: endpoint selection, strict intake of the
//! relying party's claims parameter, retrieval of the user's stored record
//! from a local or remote source, and shaping of the result for embedding
//! under `verified_claims`.

#![warn(missing_docs)]

/// Mapper configuration.
pub mod config;
/// Token-endpoint selection.
pub mod endpoint;
/// Error types for the mapper and its claim sources.
pub mod error;
/// Orchestration of one verified-claims mapping.
pub mod mapper;
/// Sources for a user's stored verified claims.
pub mod source;

pub use config::{ConfiguredSource, MapperConfig};
pub use endpoint::Endpoint;
pub use error::{MapperError, MapperResult, SourceError};
pub use mapper::VerifiedClaimsMapper;
pub use source::{ClaimsSource, HttpStoreConfig, HttpStoreSource, LocalAttributeSource};
