use crate::errors::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static LIMIT_EXCEEDED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(query|queries|request) (rate )?limit (exceeded|reached)",
        r"|exceeded (the )?(maximum|allowed|query)",
        r"|too many (queries|requests)",
    ))
    .expect("valid limit regex")
});

static NOT_FOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?im)no match|not found|no data found|no entries found|no object found",
        r"|^\s*status:\s*(free|available)\s*$",
    ))
    .expect("valid not-found regex")
});

static RESERVED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?im)^\s*(domain\s+)?status:\s*reserved",
        r"|^\s*(the )?domain (name )?(is|has been) reserved",
    ))
    .expect("valid reserved regex")
});

/// Turns raw WHOIS text into structured fields.
pub trait WhoisParser: Send + Sync {
    fn parse(&self, raw: &str) -> Result<ParsedWhois, ParseError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedWhois {
    pub domain: DomainRecord,
    pub registrar: Contact,
    pub registrant: Contact,
    pub administrative: Contact,
    pub technical: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainRecord {
    pub name: String,
    pub status: Vec<String>,
    pub name_servers: Vec<String>,
    pub created_date: String,
    pub updated_date: String,
    pub expiration_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub organization: String,
    pub email: String,
}

impl Contact {
    /// The person's name, or the organization when no name was published.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.organization
        } else {
            &self.name
        }
    }
}

#[derive(Clone, Copy)]
enum ContactField {
    Name,
    Organization,
    Email,
}

fn set_once(slot: &mut String, value: &str) {
    if slot.is_empty() {
        *slot = value.to_string();
    }
}

fn contact_field(key: &str) -> Option<ContactField> {
    if key.contains("email") || key.contains("e-mail") {
        Some(ContactField::Email)
    } else if key.contains("organization")
        || key.contains("organisation")
        || key.ends_with(" org")
    {
        Some(ContactField::Organization)
    } else if key.ends_with("name") {
        Some(ContactField::Name)
    } else {
        None
    }
}

/// Key/value parser that understands the common gTLD layout and the obvious
/// variants of it. Registry-specific grammars are not handled.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericWhoisParser;

impl GenericWhoisParser {
    pub fn new() -> Self {
        Self
    }

    fn apply(&self, parsed: &mut ParsedWhois, key: &str, value: &str) {
        // Order matters: date keys such as "Registrar Registration Expiration Date"
        // must win over the registrar section.
        match key {
            k if k.contains("expir") || k.contains("paid-till") => {
                set_once(&mut parsed.domain.expiration_date, value);
            }
            k if k.contains("creation")
                || k.contains("created")
                || k == "registered"
                || k == "registration time" =>
            {
                set_once(&mut parsed.domain.created_date, value);
            }
            k if k.contains("updated") || k.contains("modified") || k == "changed" => {
                set_once(&mut parsed.domain.updated_date, value);
            }
            "domain name" | "domain" => {
                set_once(&mut parsed.domain.name, &value.to_lowercase());
            }
            k if k.contains("name server") || k == "nserver" || k == "ns" => {
                // Extract just the hostname, ignore IP addresses
                let server = value.split_whitespace().next().unwrap_or(value).to_lowercase();
                if !parsed.domain.name_servers.contains(&server) {
                    parsed.domain.name_servers.push(server);
                }
            }
            k if k.contains("status") || k == "state" => {
                // EPP codes come with an ICANN URL appended
                let status = value.split_whitespace().next().unwrap_or(value).to_string();
                if !parsed.domain.status.contains(&status) {
                    parsed.domain.status.push(status);
                }
            }
            "registrar" | "sponsoring registrar" | "registrar name" => {
                set_once(&mut parsed.registrar.name, value);
            }
            k if k.starts_with("registrar") && !k.contains("abuse") => {
                if let Some(ContactField::Organization) = contact_field(k) {
                    set_once(&mut parsed.registrar.organization, value);
                }
            }
            k if k.starts_with("registrant") => {
                let field = if k == "registrant" {
                    Some(ContactField::Name)
                } else {
                    contact_field(k)
                };
                Self::apply_contact(&mut parsed.registrant, field, value);
            }
            k if k.starts_with("admin") => {
                Self::apply_contact(&mut parsed.administrative, contact_field(k), value);
            }
            k if k.starts_with("tech") => {
                Self::apply_contact(&mut parsed.technical, contact_field(k), value);
            }
            _ => {} // Ignore unrecognized fields
        }
    }

    fn apply_contact(contact: &mut Contact, field: Option<ContactField>, value: &str) {
        match field {
            Some(ContactField::Name) => set_once(&mut contact.name, value),
            Some(ContactField::Organization) => set_once(&mut contact.organization, value),
            Some(ContactField::Email) => set_once(&mut contact.email, value),
            None => {}
        }
    }

    fn has_registration_data(parsed: &ParsedWhois) -> bool {
        !parsed.registrar.name.is_empty()
            || !parsed.domain.created_date.is_empty()
            || !parsed.domain.expiration_date.is_empty()
    }

    /// Registries that echo the queried name still flag unregistered names
    /// through their status line (`Status: free`, `Status: AVAILABLE`).
    fn unregistered_status(parsed: &ParsedWhois) -> Option<ParseError> {
        parsed.domain.status.iter().find_map(|status| {
            match status.to_lowercase().as_str() {
                "free" | "available" => Some(ParseError::NotFound),
                "reserved" => Some(ParseError::Reserved),
                _ => None,
            }
        })
    }

    fn detect_failure(&self, raw: &str) -> Option<ParseError> {
        if LIMIT_EXCEEDED.is_match(raw) {
            Some(ParseError::LimitExceeded)
        } else if NOT_FOUND.is_match(raw) {
            Some(ParseError::NotFound)
        } else if RESERVED.is_match(raw) {
            Some(ParseError::Reserved)
        } else {
            None
        }
    }
}

impl WhoisParser for GenericWhoisParser {
    fn parse(&self, raw: &str) -> Result<ParsedWhois, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::InvalidData);
        }

        let mut parsed = ParsedWhois::default();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty()
                || line.starts_with('%')
                || line.starts_with('#')
                || line.starts_with(">>>")
            {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if value.is_empty() || value.to_lowercase().contains("select request") {
                continue;
            }

            self.apply(&mut parsed, &key, value);
        }

        if let Some(err) = Self::unregistered_status(&parsed) {
            debug!("WHOIS response reports an unregistered domain: {}", err);
            return Err(err);
        }

        // Notices in legal footers must not reject a record that carries
        // registration data, so the text scan only runs without it.
        if !Self::has_registration_data(&parsed) {
            if let Some(err) = self.detect_failure(raw) {
                debug!("WHOIS response carries no registration: {}", err);
                return Err(err);
            }
            if parsed.domain.name.is_empty() {
                debug!("No domain data recognized in WHOIS response");
                return Err(ParseError::InvalidData);
            }
        }

        Ok(parsed)
    }
}
