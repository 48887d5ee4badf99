use once_cell::sync::Lazy;
use std::collections::HashMap;

// Well-known registry WHOIS servers, consulted before asking IANA.
static KNOWN_TLD_SERVERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Generic TLDs
    map.insert("com", "whois.verisign-grs.com");
    map.insert("net", "whois.verisign-grs.com");
    map.insert("org", "whois.pir.org");
    map.insert("info", "whois.nic.info");
    map.insert("biz", "whois.nic.biz");
    map.insert("xyz", "whois.nic.xyz");
    map.insert("app", "whois.nic.google");
    map.insert("dev", "whois.nic.google");

    // Country code TLDs
    map.insert("us", "whois.nic.us");
    map.insert("uk", "whois.nic.uk");
    map.insert("co.uk", "whois.nic.uk");
    map.insert("de", "whois.denic.de");
    map.insert("fr", "whois.nic.fr");
    map.insert("nl", "whois.domain-registry.nl");
    map.insert("io", "whois.nic.io");
    map.insert("ca", "whois.cira.ca");
    map.insert("au", "whois.auda.org.au");
    map.insert("jp", "whois.jprs.jp");

    map
});

/// Returns the registry WHOIS server for a suffix, if it is one we know.
pub fn known_whois_server(suffix: &str) -> Option<&'static str> {
    KNOWN_TLD_SERVERS.get(suffix).copied()
}
