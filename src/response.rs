use crate::{errors::DomainError, resolver::DomainInfo};
use serde::Serialize;

/// Success envelope: `{"domaininfo": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainInfoResponse {
    pub domaininfo: DomainInfo,
}

impl From<DomainInfo> for DomainInfoResponse {
    fn from(domaininfo: DomainInfo) -> Self {
        Self { domaininfo }
    }
}

/// Encodes response bodies. Swappable so a failing encoder can be injected.
pub trait ResponseSerializer: Send + Sync {
    fn domain_info(&self, response: &DomainInfoResponse) -> Result<Vec<u8>, serde_json::Error>;

    fn domain_error(&self, error: &DomainError) -> Result<Vec<u8>, serde_json::Error>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl ResponseSerializer for JsonSerializer {
    fn domain_info(&self, response: &DomainInfoResponse) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(response)
    }

    fn domain_error(&self, error: &DomainError) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(error)
    }
}
