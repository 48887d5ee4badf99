use crate::{config::Config, errors::FetchError, tld_mappings};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use publicsuffix::{List, Psl};
use std::{sync::Arc, time::Duration};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};
use tracing::{debug, warn};

// Global PSL instance - shared across all service instances
static PSL: Lazy<List> = Lazy::new(List::new);

/// Source of raw WHOIS text for a domain.
#[async_trait]
pub trait WhoisFetcher: Send + Sync {
    async fn fetch(&self, domain: &str) -> Result<String, FetchError>;
}

/// WHOIS client speaking the port-43 text protocol.
///
/// The registry server is taken from a built-in table or discovered through
/// IANA; registrar referrals are followed up to `max_referrals` hops.
pub struct WhoisService {
    config: Arc<Config>,
}

impl WhoisService {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    fn normalize_domain(domain: &str) -> String {
        domain.trim().trim_end_matches('.').to_lowercase()
    }

    /// Extract TLD from domain using global PSL for accurate parsing
    fn extract_tld(&self, domain: &str) -> String {
        match PSL.suffix(domain.as_bytes()) {
            Some(suffix) => match std::str::from_utf8(suffix.as_bytes()) {
                Ok(tld) => tld.to_string(),
                Err(_) => Self::last_label(domain).to_string(),
            },
            None => {
                debug!("Public suffix parsing failed for {}, using last label", domain);
                Self::last_label(domain).to_string()
            }
        }
    }

    fn last_label(domain: &str) -> &str {
        domain.rsplit('.').next().unwrap_or(domain)
    }

    async fn find_whois_server(&self, domain: &str) -> Result<String, FetchError> {
        let tld = self.extract_tld(domain);
        let last_label = Self::last_label(domain);

        if let Some(server) = tld_mappings::known_whois_server(&tld)
            .or_else(|| tld_mappings::known_whois_server(last_label))
        {
            return Ok(server.to_string());
        }

        debug!("Asking {} for the whois server of {}", self.config.iana_server, last_label);
        let response = self.query(&self.config.iana_server, last_label).await?;

        for line in response.lines() {
            if let Some((key, value)) = line.trim().split_once(':') {
                let key = key.trim().to_lowercase();
                let value = value.trim();
                if (key == "refer" || key == "whois") && !value.is_empty() {
                    debug!("IANA referred {} to {}", last_label, value);
                    return Ok(value.to_string());
                }
            }
        }

        Err(FetchError::ServerNotFound)
    }

    async fn query(&self, server: &str, query: &str) -> Result<String, FetchError> {
        let timeout_duration = Duration::from_secs(self.config.whois_timeout_seconds);

        let mut stream = timeout(
            timeout_duration,
            TcpStream::connect((server, self.config.whois_port)),
        )
        .await??;

        if let Err(e) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY: {}", e);
        }

        let query_line = format!("{}\r\n", query);
        timeout(timeout_duration, stream.write_all(query_line.as_bytes())).await??;

        // One byte past the limit tells us the server had more to say.
        let limit = self.config.max_response_size as u64 + 1;
        let mut response = Vec::new();
        timeout(
            timeout_duration,
            (&mut stream).take(limit).read_to_end(&mut response),
        )
        .await??;

        if response.len() > self.config.max_response_size {
            return Err(FetchError::ResponseTooLarge);
        }

        Ok(String::from_utf8_lossy(&response).into_owned())
    }

    async fn follow_referrals(
        &self,
        initial_server: &str,
        initial_data: String,
        domain: &str,
    ) -> String {
        let mut current_server = initial_server.to_string();
        let mut current_data = initial_data;

        for _ in 0..self.config.max_referrals {
            let Some(referral_server) = extract_referral(&current_data) else {
                break;
            };
            if referral_server.eq_ignore_ascii_case(&current_server) {
                break;
            }

            debug!("Following referral from {} to {}", current_server, referral_server);
            match self.query(&referral_server, domain).await {
                Ok(data) if !data.trim().is_empty() => {
                    current_server = referral_server;
                    current_data = data;
                }
                Ok(_) => {
                    warn!("Referral server {} returned an empty response", referral_server);
                    break;
                }
                Err(e) => {
                    warn!("Failed to query referral server {}: {}", referral_server, e);
                    break;
                }
            }
        }

        current_data
    }
}

#[async_trait]
impl WhoisFetcher for WhoisService {
    async fn fetch(&self, domain: &str) -> Result<String, FetchError> {
        let domain = Self::normalize_domain(domain);
        if domain.is_empty() {
            return Err(FetchError::DomainEmpty);
        }

        // Dotless queries go straight to IANA, which answers for TLDs and
        // reports nothing for anything else.
        if !domain.contains('.') {
            return self.query(&self.config.iana_server, &domain).await;
        }

        let server = self.find_whois_server(&domain).await?;
        let data = self.query(&server, &domain).await?;

        Ok(self.follow_referrals(&server, data, &domain).await)
    }
}

/// Finds a referral to another WHOIS server in a response.
fn extract_referral(data: &str) -> Option<String> {
    for line in data.lines() {
        if let Some((key, value)) = line.trim().split_once(':') {
            let key = key.trim().to_lowercase();
            if !((key.contains("whois") && key.contains("server")) || key == "refer") {
                continue;
            }

            let value = value.trim();
            let value = value
                .strip_prefix("rwhois://")
                .or_else(|| value.strip_prefix("whois://"))
                .unwrap_or(value)
                .trim_end_matches('/');
            // Web links are not port-43 servers.
            if value.is_empty() || value.contains("://") {
                continue;
            }
            return Some(value.to_string());
        }
    }
    None
}
