use crate::{
    config::Config,
    errors::DomainError,
    parser::{GenericWhoisParser, ParsedWhois, WhoisParser},
    whois::{WhoisFetcher, WhoisService},
};
use serde::Serialize;
use std::sync::Arc;

/// Registration details for a domain, as returned to API callers.
///
/// Dates are passed through exactly as the WHOIS server printed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainInfo {
    pub status: Vec<String>,
    #[serde(rename = "created")]
    pub created_date: String,
    #[serde(rename = "expiry")]
    pub expiration_date: String,
    pub registrar: String,
    pub registrant: String,
    #[serde(rename = "contactEmail")]
    pub contact_email: String,
}

impl From<ParsedWhois> for DomainInfo {
    fn from(parsed: ParsedWhois) -> Self {
        Self {
            registrar: parsed.registrar.display_name().to_string(),
            registrant: parsed.registrant.display_name().to_string(),
            contact_email: parsed.registrant.email,
            status: parsed.domain.status,
            created_date: parsed.domain.created_date,
            expiration_date: parsed.domain.expiration_date,
        }
    }
}

/// Runs a lookup through the fetcher and parser and folds every failure into
/// a [`DomainError`].
#[derive(Clone)]
pub struct DomainInfoResolver {
    fetcher: Arc<dyn WhoisFetcher>,
    parser: Arc<dyn WhoisParser>,
}

impl DomainInfoResolver {
    pub fn new(fetcher: Arc<dyn WhoisFetcher>, parser: Arc<dyn WhoisParser>) -> Self {
        Self { fetcher, parser }
    }

    /// Resolver backed by the network WHOIS client and the generic parser.
    pub fn from_config(config: Arc<Config>) -> Self {
        Self::new(
            Arc::new(WhoisService::new(config)),
            Arc::new(GenericWhoisParser::new()),
        )
    }

    pub async fn resolve(&self, domain: &str) -> Result<DomainInfo, DomainError> {
        let raw = self
            .fetcher
            .fetch(domain)
            .await
            .map_err(|e| DomainError::from_fetch(domain, &e))?;

        let parsed = self
            .parser
            .parse(&raw)
            .map_err(|e| DomainError::from_parse(domain, &e))?;

        Ok(DomainInfo::from(parsed))
    }
}
