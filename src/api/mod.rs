// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod budget;
pub mod client;
pub mod expenses;
pub mod transport;

pub use client::ApiClient;
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};

pub mod endpoints {
    pub const AUTH_LOGIN: &str = "/api/auth/login";
    pub const AUTH_REGISTER: &str = "/api/auth/register";
    pub const AUTH_LOGOUT: &str = "/api/auth/logout";
    pub const AUTH_ME: &str = "/api/auth/me";
    pub const EXPENSES: &str = "/api/expenses";
    pub const EXPENSE_STATS: &str = "/api/expenses/chart";
    pub const BUDGET: &str = "/api/budget";
    pub const HEALTH: &str = "/api/health";

    pub fn expense(id: &str) -> String {
        format!("{}/{}", EXPENSES, id.trim())
    }
}
