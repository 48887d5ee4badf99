use serde::Serialize;
use thiserror::Error;

/// Failures reported by a [`WhoisFetcher`](crate::whois::WhoisFetcher).
///
/// `DomainEmpty` is the only caller-side failure; everything else is treated as
/// a server-side problem by the resolver.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("whois: domain is empty")]
    DomainEmpty,

    #[error("whois: no whois server found for domain")]
    ServerNotFound,

    #[error("whois: network timeout")]
    Timeout,

    #[error("whois: IO error: {0}")]
    Io(#[from] tokio::io::Error),

    #[error("whois: response too large")]
    ResponseTooLarge,
}

impl From<tokio::time::error::Elapsed> for FetchError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        FetchError::Timeout
    }
}

/// Failures reported by a [`WhoisParser`](crate::parser::WhoisParser).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("whoisparser: domain whois data is invalid")]
    InvalidData,

    #[error("whoisparser: domain is not found")]
    NotFound,

    #[error("whoisparser: domain is reserved to register")]
    Reserved,

    #[error("whoisparser: domain query limit exceeded")]
    LimitExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    InternalServerError,
}

impl ErrorKind {
    pub fn code(self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::InternalServerError => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::InternalServerError => "internal_server_error",
        }
    }
}

/// Client-facing failure of a domain lookup, serialized as
/// `{"kind", "code", "message"}`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct DomainError {
    pub kind: ErrorKind,
    pub code: u16,
    pub message: String,
}

impl DomainError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code(),
            message: message.into(),
        }
    }

    /// Maps a fetch failure: an empty domain is the caller's fault, anything
    /// else is ours.
    pub fn from_fetch(domain: &str, err: &FetchError) -> Self {
        match err {
            FetchError::DomainEmpty => {
                Self::bad_request(format!("Domain cannot be empty: {}", err))
            }
            _ => Self::internal_server_error(format!(
                "Failed to fetch WHOIS data for {}: {}",
                domain, err
            )),
        }
    }

    pub fn from_parse(domain: &str, err: &ParseError) -> Self {
        Self::bad_request(format!(
            "Failed to parse WHOIS response for domain {}: {}",
            domain, err
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_domain_is_bad_request() {
        let err = DomainError::from_fetch("", &FetchError::DomainEmpty);
        assert_eq!(err.kind, ErrorKind::BadRequest);
        assert_eq!(err.code, 400);
        assert!(err.message.contains("whois: domain is empty"));
    }

    #[test]
    fn test_other_fetch_failures_are_internal() {
        let err = DomainError::from_fetch("goopy.us", &FetchError::ServerNotFound);
        assert_eq!(err.kind, ErrorKind::InternalServerError);
        assert_eq!(err.code, 500);
        assert!(err.message.contains("goopy.us"));
        assert!(err.message.contains("whois: no whois server found for domain"));

        let err = DomainError::from_fetch("goopy.us", &FetchError::Timeout);
        assert_eq!(err.code, 500);
    }

    #[test]
    fn test_parse_failure_mentions_domain() {
        let err = DomainError::from_parse("bad_domain", &ParseError::InvalidData);
        assert_eq!(err.kind, ErrorKind::BadRequest);
        assert_eq!(
            err.message,
            "Failed to parse WHOIS response for domain bad_domain: \
             whoisparser: domain whois data is invalid"
        );
    }

    #[test]
    fn test_error_serializes_with_snake_case_kind() {
        let err = DomainError::internal_server_error("boom");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "internal_server_error");
        assert_eq!(json["code"], 500);
        assert_eq!(json["message"], "boom");
        assert_eq!(ErrorKind::BadRequest.as_str(), "bad_request");
    }
}
