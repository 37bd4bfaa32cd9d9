// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::endpoints;
use super::transport::{ApiRequest, RawResponse, Transport};
use crate::error::{ApiError, GENERIC_FAILURE};
use crate::models::{ApiEnvelope, ApiErrorBody};
use crate::session::{Session, Unauthorized};

/// Typed access to the remote API. Attaches the session's bearer token and
/// routes 401s to the session's unauthorized observers.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        ApiClient { transport, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Sends `req` and unwraps the `{data, message}` envelope. `Ok(None)`
    /// means a successful response without data (e.g. 204).
    pub(crate) fn execute<T: DeserializeOwned>(
        &self,
        mut req: ApiRequest,
    ) -> Result<Option<T>, ApiError> {
        req.bearer = self.session.token();
        debug!(method = %req.method, path = %req.path, params = ?req.query, "api request");

        let resp = self.transport.send(&req)?;
        if resp.status == 401 {
            return Err(self.unauthorized(&req, &resp));
        }
        if !resp.is_success() {
            let err = status_error(&resp);
            error!(status = resp.status, method = %req.method, path = %req.path, "api error: {}", err);
            return Err(err);
        }
        if resp.body.trim().is_empty() {
            return Ok(None);
        }
        let envelope: ApiEnvelope<T> = serde_json::from_str(&resp.body).map_err(|e| {
            ApiError::Decode(format!("{} {}: {}", req.method, req.path, e))
        })?;
        if let Some(msg) = &envelope.message {
            debug!(path = %req.path, "server message: {}", msg);
        }
        Ok(envelope.data)
    }

    pub(crate) fn execute_required<T: DeserializeOwned>(
        &self,
        req: ApiRequest,
        missing: &'static str,
    ) -> Result<T, ApiError> {
        self.execute(req)?.ok_or(ApiError::MissingData(missing))
    }

    fn unauthorized(&self, req: &ApiRequest, resp: &RawResponse) -> ApiError {
        let message = serde_json::from_str::<ApiErrorBody>(&resp.body)
            .ok()
            .and_then(|b| b.message);
        if req.path == endpoints::AUTH_ME {
            // The session check only drops the stale credential. Observers
            // typically re-check the session, so notifying here would loop.
            debug!("session check rejected; clearing stored token");
            self.session.clear();
        } else {
            self.session.signal_unauthorized(Unauthorized {
                path: req.path.clone(),
                message,
            });
        }
        ApiError::Unauthorized
    }
}

fn status_error(resp: &RawResponse) -> ApiError {
    let body: ApiErrorBody = serde_json::from_str(&resp.body).unwrap_or_default();
    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());
    ApiError::Status {
        status: resp.status,
        message,
        fields: body.errors.unwrap_or_default(),
    }
}
