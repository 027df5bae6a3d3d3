use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::errors::{CheckerError, ProbeError};
use crate::model::ReachabilityPolicy;

/// Request flavour used by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Head,
    Get,
}

/// HTTP access used by reachability checks and shape fallbacks.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Status code of `method url`, following redirects.
    async fn status(
        &self,
        method: ProbeMethod,
        url: &str,
        verify_tls: bool,
    ) -> Result<u16, ProbeError>;

    /// Body of a successful GET.
    async fn fetch_text(&self, url: &str) -> Result<String, ProbeError>;
}

/// Prefix `http://` when the value carries no scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// HEAD first, then GET. Only transport errors of the GET are returned.
async fn attempt(probe: &dyn HttpProbe, url: &str, verify_tls: bool) -> Result<bool, ProbeError> {
    match probe.status(ProbeMethod::Head, url, verify_tls).await {
        Ok(status) if is_success(status) => return Ok(true),
        Ok(status) => debug!(url, status, "head probe rejected"),
        Err(err) => debug!(url, error = %err, "head probe failed"),
    }
    probe
        .status(ProbeMethod::Get, url, verify_tls)
        .await
        .map(is_success)
}

/// Whether `raw` answers with a 2xx status. Never fails: any error makes the
/// URL unreachable.
pub async fn is_reachable(probe: &dyn HttpProbe, raw: &str, policy: &ReachabilityPolicy) -> bool {
    let url = normalize_url(raw);
    let reachable = match attempt(probe, &url, policy.verify_tls).await {
        Ok(reachable) => reachable,
        Err(ProbeError::Tls(reason)) if policy.verify_tls && policy.allow_insecure => {
            warn!(
                target: "security",
                url = %url,
                reason = %reason,
                "certificate verification failed, retrying without verification"
            );
            attempt(probe, &url, false).await.unwrap_or(false)
        }
        Err(err) => {
            debug!(url = %url, error = %err, "url unreachable");
            false
        }
    };
    debug!(url = %url, reachable, "url probed");
    reachable
}

/// Probe every URL through a bounded pool and count the reachable ones.
///
/// At most `max_concurrency` requests run at once. URLs still pending at
/// `deadline` are aborted and count as unreachable; finished ones are kept.
pub async fn count_reachable(
    probe: Arc<dyn HttpProbe>,
    urls: Vec<String>,
    policy: &ReachabilityPolicy,
    deadline: Instant,
) -> Result<u64, CheckerError> {
    if Instant::now() >= deadline {
        warn!(
            urls = urls.len(),
            "reachability deadline already passed, urls not checked"
        );
        return Ok(0);
    }

    let permits = Arc::new(Semaphore::new(policy.max_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for url in urls {
        let permits = Arc::clone(&permits);
        let probe = Arc::clone(&probe);
        let policy = policy.clone();
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok()?;
            Some(is_reachable(probe.as_ref(), &url, &policy).await)
        });
    }

    let mut reachable: u64 = 0;
    loop {
        match timeout_at(deadline, tasks.join_next()).await {
            Ok(Some(Ok(Some(true)))) => reachable += 1,
            Ok(Some(Ok(_))) => {}
            Ok(Some(Err(err))) => return Err(CheckerError::Task(err.to_string())),
            Ok(None) => break,
            Err(_) => {
                warn!(
                    pending = tasks.len(),
                    reachable,
                    "reachability deadline reached, pending urls count as unreachable"
                );
                tasks.abort_all();
                break;
            }
        }
    }
    Ok(reachable)
}

/// `reqwest` backed probe with a verifying and a non-verifying client.
#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    verified: reqwest::Client,
    unverified: reqwest::Client,
}

impl ReqwestProbe {
    pub fn new(policy: &ReachabilityPolicy) -> Result<Self, ProbeError> {
        Ok(Self {
            verified: build_client(policy, true)?,
            unverified: build_client(policy, false)?,
        })
    }

    fn client(&self, verify_tls: bool) -> &reqwest::Client {
        if verify_tls {
            &self.verified
        } else {
            &self.unverified
        }
    }
}

fn build_client(
    policy: &ReachabilityPolicy,
    verify_tls: bool,
) -> Result<reqwest::Client, ProbeError> {
    reqwest::Client::builder()
        .timeout(policy.timeout())
        .redirect(Policy::limited(policy.max_redirects))
        .danger_accept_invalid_certs(!verify_tls)
        .build()
        .map_err(|err| ProbeError::Other(err.to_string()))
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn status(
        &self,
        method: ProbeMethod,
        url: &str,
        verify_tls: bool,
    ) -> Result<u16, ProbeError> {
        let client = self.client(verify_tls);
        let request = match method {
            ProbeMethod::Head => client.head(url),
            ProbeMethod::Get => client.get(url),
        };
        let response = request.send().await.map_err(classify)?;
        Ok(response.status().as_u16())
    }

    async fn fetch_text(&self, url: &str) -> Result<String, ProbeError> {
        let response = self.verified.get(url).send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Other(format!("{url} answered with HTTP {status}")));
        }
        response.text().await.map_err(classify)
    }
}

fn classify(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        return ProbeError::Timeout;
    }
    if let Some(reason) = tls_failure(&err) {
        return ProbeError::Tls(reason);
    }
    if err.is_connect() {
        return ProbeError::Connect(err.to_string());
    }
    ProbeError::Other(err.to_string())
}

fn tls_failure(err: &reqwest::Error) -> Option<String> {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(current) = source {
        let message = current.to_string();
        let lower = message.to_lowercase();
        if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
            return Some(message);
        }
        source = current.source();
    }
    None
}
