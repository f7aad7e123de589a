//! HTTP transport for the Bakeline ordering API.
//!
//! The client is a thin shim: it attaches auth and idempotency headers,
//! applies the fixed overall timeout, and funnels every response through
//! [`envelope`] normalization. All decision logic lives in pure code so it
//! can be tested without a network.
//!
//! # Write idempotency
//!
//! Every state-changing request (POST/PUT/PATCH/DELETE) carries a freshly
//! generated `Idempotency-Key`, one per attempt, never reused. Keys live in a
//! process-scoped pending set and are retired when the attempt completes,
//! successfully or not; nothing survives a restart. Exactly-once across
//! restarts is explicitly not provided.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::envelope::{self, Meta};
use crate::error::{ApiError, Result};
use crate::events::{SessionEndReason, Signal, SignalBus};
use crate::session::SessionStore;

/// Path fragment identifying the login endpoint, which opts out of the
/// global 401/notification signal paths.
const LOGIN_PATH: &str = "auth/login";

/// Client for the Bakeline ordering API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    signals: SignalBus,
    pending_keys: Mutex<HashSet<Uuid>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionStore, signals: SignalBus) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                session,
                signals,
                pending_keys: Mutex::new(HashSet::new()),
            }),
        })
    }

    /// The signal bus this client publishes to.
    #[must_use]
    pub fn signals(&self) -> &SignalBus {
        &self.inner.signals
    }

    /// The session store this client reads tokens from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Number of writes currently in flight (for "submitting..." UI state).
    #[must_use]
    pub fn pending_write_count(&self) -> usize {
        self.inner
            .pending_keys
            .lock()
            .map(|keys| keys.len())
            .unwrap_or(0)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    // =========================================================================
    // Request Methods
    // =========================================================================

    /// GET a resource.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.inner.http.get(self.url(path));
        self.execute(request, path, false).await.map(|(value, _)| value)
    }

    /// GET a resource along with envelope meta (pagination, request id).
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get_with_meta<T: DeserializeOwned>(&self, path: &str) -> Result<(T, Meta)> {
        let request = self.inner.http.get(self.url(path));
        self.execute(request, path, false).await
    }

    /// POST a JSON body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.inner.http.post(self.url(path)).json(body);
        self.execute(request, path, true).await.map(|(value, _)| value)
    }

    /// PUT a JSON body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.inner.http.put(self.url(path)).json(body);
        self.execute(request, path, true).await.map(|(value, _)| value)
    }

    /// PATCH a JSON body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn patch<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.inner.http.patch(self.url(path)).json(body);
        self.execute(request, path, true).await.map(|(value, _)| value)
    }

    /// DELETE a resource, optionally with an identifying JSON body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn delete<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let mut request = self.inner.http.request(Method::DELETE, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request, path, true).await.map(|(value, _)| value)
    }

    /// POST a multipart form (file uploads).
    #[instrument(skip(self, form), fields(path = %path))]
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let request = self.inner.http.post(self.url(path)).multipart(form);
        self.execute(request, path, true).await.map(|(value, _)| value)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
        write: bool,
    ) -> Result<(T, Meta)> {
        let mut request = request;

        if let Some(token) = self.inner.session.token() {
            request = request.bearer_auth(token.expose_secret());
        }

        let key = write.then(Uuid::new_v4);
        if let Some(key) = key {
            request = request.header("Idempotency-Key", key.to_string());
            if let Ok(mut pending) = self.inner.pending_keys.lock() {
                pending.insert(key);
            }
        }

        let result = self.dispatch::<T>(request).await;

        // Keys retire on completion regardless of outcome; a retry is a new
        // attempt with a new key.
        if let Some(key) = key
            && let Ok(mut pending) = self.inner.pending_keys.lock()
        {
            pending.remove(&key);
        }

        if let Err(error) = &result {
            self.react(error, path);
        }

        result
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(T, Meta)> {
        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::from)?;
        envelope::normalize_with_meta(status, &body)
    }

    fn react(&self, error: &ApiError, path: &str) {
        let on_login_endpoint = path.contains(LOGIN_PATH);

        if error.is_unauthorized() && !on_login_endpoint {
            tracing::info!(path, "session rejected by backend, clearing auth state");
            self.inner.session.clear();
        }

        if let Some(signal) = error.signal(on_login_endpoint) {
            self.inner.signals.emit(signal);
        } else {
            tracing::debug!(path, error = %error, "error handled inline");
        }
    }
}

/// Emit the logged-out signal. Used by the auth service so the UI returns to
/// the login screen with the right reason code.
pub(crate) fn emit_logged_out(signals: &SignalBus) {
    signals.emit(Signal::SessionExpired {
        reason: SessionEndReason::LoggedOut,
    });
}
