#![allow(dead_code)]

use async_trait::async_trait;
use domaininfo_api::{
    errors::{DomainError, FetchError},
    response::{DomainInfoResponse, ResponseSerializer},
    whois::WhoisFetcher,
};
use serde::ser::Error as _;
use std::{
    collections::{HashMap, VecDeque},
    io,
    sync::{Arc, Mutex},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
};
use tracing_subscriber::fmt::MakeWriter;

pub const GOOPY_US: &str = "Domain Name: goopy.us\n\
Registrar WHOIS Server: whois.namecheap.com\n\
Creation Date: 2019-03-01T18:02:31Z\n\
Registry Expiry Date: 2025-02-28T23:59:59Z\n\
Registrar: NameCheap, Inc.\n\
Domain Status: clientTransferProhibited https://icann.org/epp#clientTransferProhibited\n\
Domain Status: serverDeleteProhibited https://icann.org/epp#serverDeleteProhibited\n\
Registrant Name: Jane Doe\n\
Registrant Email: jane@goopy.us\n";

pub const IANA_NO_OBJECTS: &str = "% IANA WHOIS server\n\
% for more information on IANA, visit http://www.iana.org\n\
% This query returned 0 objects.\n";

/// Fetcher that always returns the same canned outcome.
pub struct StubFetcher(pub fn() -> Result<String, FetchError>);

#[async_trait]
impl WhoisFetcher for StubFetcher {
    async fn fetch(&self, _domain: &str) -> Result<String, FetchError> {
        (self.0)()
    }
}

/// Serializer that fails every call.
pub struct FailingSerializer;

impl ResponseSerializer for FailingSerializer {
    fn domain_info(&self, _response: &DomainInfoResponse) -> Result<Vec<u8>, serde_json::Error> {
        Err(serde_json::Error::custom("marshal err"))
    }

    fn domain_error(&self, _error: &DomainError) -> Result<Vec<u8>, serde_json::Error> {
        Err(serde_json::Error::custom("marshal err"))
    }
}

/// In-memory log sink for a scoped subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes `info` and above on the current thread into a buffer until the
/// guard is dropped.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

/// Starts a WHOIS server on an ephemeral loopback port.
///
/// Each query is answered from its queue; the last answer repeats once the
/// queue is down to one. Unknown queries get an empty response.
pub async fn spawn_fake_whois(responses: Vec<(&str, Vec<&str>)>) -> u16 {
    let table: HashMap<String, VecDeque<String>> = responses
        .into_iter()
        .map(|(query, answers)| {
            (
                query.to_string(),
                answers.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();
    let table = Arc::new(Mutex::new(table));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let table = table.clone();
            tokio::spawn(async move {
                let mut line = String::new();
                {
                    let mut reader = BufReader::new(&mut socket);
                    if reader.read_line(&mut line).await.is_err() {
                        return;
                    }
                }

                let answer = {
                    let mut table = table.lock().unwrap();
                    match table.get_mut(line.trim()) {
                        Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
                        Some(queue) => queue.front().cloned().unwrap_or_default(),
                        None => String::new(),
                    }
                };

                let _ = socket.write_all(answer.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    port
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Starts a server that accepts connections and never answers.
pub async fn spawn_silent_whois() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _held = socket;
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            });
        }
    });

    port
}
