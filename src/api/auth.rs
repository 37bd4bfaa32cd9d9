// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::Value;
use tracing::info;

use super::endpoints;
use super::transport::{ApiRequest, Method};
use super::ApiClient;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginCredentials, RegisterCredentials, User};

impl ApiClient {
    pub fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        let req = ApiRequest::new(Method::Post, endpoints::AUTH_LOGIN).json(to_body(credentials)?);
        let auth: AuthResponse = self.execute_required(req, "Invalid login response")?;
        self.store_token(&auth)?;
        info!(user = %auth.user.email, "logged in");
        Ok(auth)
    }

    pub fn register(&self, credentials: &RegisterCredentials) -> Result<AuthResponse, ApiError> {
        let req =
            ApiRequest::new(Method::Post, endpoints::AUTH_REGISTER).json(to_body(credentials)?);
        let auth: AuthResponse = self.execute_required(req, "Invalid register response")?;
        self.store_token(&auth)?;
        info!(user = %auth.user.email, "registered");
        Ok(auth)
    }

    /// Ends the server session. The local credential is dropped even when the
    /// server call fails, so a dead server cannot keep a user signed in.
    pub fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .execute::<Value>(ApiRequest::new(Method::Post, endpoints::AUTH_LOGOUT))
            .map(|_| ());
        self.session().clear();
        result
    }

    pub fn me(&self) -> Result<User, ApiError> {
        self.execute_required(
            ApiRequest::new(Method::Get, endpoints::AUTH_ME),
            "Invalid user response",
        )
    }

    pub fn health(&self) -> Result<(), ApiError> {
        self.execute::<Value>(ApiRequest::new(Method::Get, endpoints::HEALTH))
            .map(|_| ())
    }

    fn store_token(&self, auth: &AuthResponse) -> Result<(), ApiError> {
        if auth.token.is_empty() {
            return Err(ApiError::MissingData("Missing token in auth response"));
        }
        self.session()
            .set_token(&auth.token)
            .map_err(|e| ApiError::Storage(e.to_string()))
    }
}

pub(crate) fn to_body<T: serde::Serialize>(v: &T) -> Result<Value, ApiError> {
    serde_json::to_value(v).map_err(|e| ApiError::Decode(e.to_string()))
}
