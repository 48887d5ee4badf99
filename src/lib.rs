//! # DomainInfo API
//!
//! Looks up a domain over WHOIS and reports its registration details.
//!
//! The lookup is split into two swappable collaborators, a [`WhoisFetcher`]
//! that returns raw WHOIS text and a [`WhoisParser`] that turns it into
//! fields. [`DomainInfoResolver`] sequences them and maps every failure onto a
//! [`DomainError`] carrying an HTTP-style kind and code. With the `server`
//! feature the resolver is exposed as an axum application.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domaininfo_api::{Config, DomainInfoResolver};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = DomainInfoResolver::from_config(Arc::new(Config::default()));
//!     let info = resolver.resolve("rust-lang.org").await?;
//!
//!     println!("Registrar: {}", info.registrar);
//!     println!("Expires: {}", info.expiration_date);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod parser;
pub mod resolver;
pub mod response;
pub mod telemetry;
pub mod tld_mappings;
pub mod whois;

#[cfg(feature = "server")]
pub mod metrics;
#[cfg(feature = "server")]
pub mod server;

// Re-export main types for easy access
pub use config::Config;
pub use errors::{DomainError, ErrorKind, FetchError, ParseError};
pub use parser::{GenericWhoisParser, ParsedWhois, WhoisParser};
pub use resolver::{DomainInfo, DomainInfoResolver};
pub use response::{DomainInfoResponse, JsonSerializer, ResponseSerializer};
pub use whois::{WhoisFetcher, WhoisService};
