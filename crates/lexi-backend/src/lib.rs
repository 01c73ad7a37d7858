// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use lexi_app::{Profile, SessionBackend};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const SINGLE_OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

/// Blocking client for a PostgREST/GoTrue style backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    anon_key: String,
    access_token: Option<String>,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("backend.url must not be empty");
        }
        let base_url = Url::parse(&format!("{trimmed}/"))
            .with_context(|| format!("backend.url {trimmed:?} is not a valid URL"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "backend.url {trimmed:?} must use http or https, got {}://",
                base_url.scheme()
            );
        }
        if anon_key.trim().is_empty() {
            bail!("backend.anon_key must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            anon_key: anon_key.trim().to_owned(),
            access_token: None,
            timeout,
            http,
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.access_token = if token.trim().is_empty() {
            None
        } else {
            Some(token.trim().to_owned())
        };
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_session(&self) -> bool {
        self.access_token.is_some()
    }

    /// Reads the profile row visible to the current session. The server's
    /// row-level policies scope `profiles` to the caller, and the
    /// single-object media type makes zero or several rows an error.
    pub fn fetch_current_profile(&self) -> Result<Profile> {
        let mut url = self.endpoint("rest/v1/profiles")?;
        url.query_pairs_mut().append_pair("select", "*");

        let response = self
            .authorized(self.http.get(url))
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT_MEDIA_TYPE)
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json::<Profile>().context("decode profile row")
    }

    /// Revokes the session's tokens. Without an access token there is no
    /// session to end, so no request is made.
    pub fn sign_out(&self) -> Result<()> {
        if self.access_token.is_none() {
            tracing::debug!("sign out skipped; no access token configured");
            return Ok(());
        }

        let response = self
            .authorized(self.http.post(self.endpoint("auth/v1/logout")?))
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("build URL for {path}"))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }
}

impl SessionBackend for Client {
    fn fetch_current_profile(&self) -> Result<Profile> {
        Client::fetch_current_profile(self)
    }

    fn sign_out(&self) -> Result<()> {
        Client::sign_out(self)
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check [backend].url and your network ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(ErrorEnvelope::into_message)
        .or_else(|| (body.len() < 100 && !body.contains('{')).then(|| body.trim().to_owned()))
        .filter(|message| !message.is_empty());

    let Some(message) = detail else {
        return anyhow!("server returned {}", status.as_u16());
    };

    if status == StatusCode::UNAUTHORIZED {
        return anyhow!(
            "server error ({}): {} -- refresh the access token ([backend].access_token or LEXI_ACCESS_TOKEN)",
            status.as_u16(),
            message
        );
    }
    anyhow!("server error ({}): {}", status.as_u16(), message)
}

/// PostgREST reports `message`; the auth server uses `msg` or
/// `error_description` depending on the endpoint.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
}

impl ErrorEnvelope {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .filter(|message| !message.is_empty())
    }
}
