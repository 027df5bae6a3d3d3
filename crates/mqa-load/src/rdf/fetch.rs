use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;

use crate::errors::{LoadError, Result};
use crate::options::LoadOptions;

pub(crate) struct Fetched {
    pub body: String,
    pub content_type: Option<String>,
}

pub(crate) async fn fetch(url: &str, opts: &LoadOptions) -> Result<Fetched> {
    let client = reqwest::Client::builder()
        .timeout(opts.timeout)
        .redirect(Policy::limited(opts.max_redirects))
        .danger_accept_invalid_certs(!opts.verify_tls)
        .build()
        .map_err(|err| fetch_error(url, err))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| fetch_error(url, err))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.map_err(|err| fetch_error(url, err))?;

    Ok(Fetched { body, content_type })
}

fn fetch_error(url: &str, err: reqwest::Error) -> LoadError {
    LoadError::Fetch {
        url: url.to_string(),
        reason: err.to_string(),
    }
}
