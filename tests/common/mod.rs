// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use spendtrack::api::{ApiClient, ApiRequest, Method, RawResponse, Transport};
use spendtrack::error::ApiError;
use spendtrack::session::{MemoryTokenStore, Session};
use spendtrack::tracker::Tracker;

type Responder = Arc<dyn Fn(&ApiRequest) -> RawResponse + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    respond: Responder,
}

/// Scripted in-memory API. Later routes win over earlier ones.
#[derive(Default)]
pub struct MockApi {
    routes: Mutex<Vec<Route>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on<F>(&self, method: Method, path: &str, respond: F)
    where
        F: Fn(&ApiRequest) -> RawResponse + Send + Sync + 'static,
    {
        self.routes.lock().unwrap().push(Route {
            method,
            path: path.to_string(),
            respond: Arc::new(respond),
        });
    }

    pub fn ok(&self, method: Method, path: &str, data: Value) {
        self.on(method, path, move |_| ok(data.clone()));
    }

    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> ApiRequest {
        self.seen.lock().unwrap().last().cloned().expect("no requests sent")
    }
}

impl Transport for MockApi {
    fn send(&self, req: &ApiRequest) -> Result<RawResponse, ApiError> {
        self.seen.lock().unwrap().push(req.clone());
        // responders may block, so they run outside the lock
        let respond = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.method == req.method && r.path == req.path)
            .map(|r| r.respond.clone());
        Ok(match respond {
            Some(respond) => respond(req),
            None => status(404, json!({ "message": "Not found" })),
        })
    }
}

pub fn ok(data: Value) -> RawResponse {
    RawResponse {
        status: 200,
        body: json!({ "data": data }).to_string(),
    }
}

pub fn status(code: u16, body: Value) -> RawResponse {
    RawResponse {
        status: code,
        body: body.to_string(),
    }
}

pub fn no_content() -> RawResponse {
    RawResponse {
        status: 204,
        body: String::new(),
    }
}

pub fn client(api: &Arc<MockApi>, token: Option<&str>) -> ApiClient {
    let store = match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    };
    ApiClient::new(api.clone(), Arc::new(Session::new(store)))
}

pub fn tracker(api: &Arc<MockApi>) -> Tracker {
    Tracker::new(client(api, Some("tok")))
}

pub fn user_json() -> Value {
    json!({
        "id": "u1",
        "email": "ada@example.com",
        "name": "Ada",
        "createdAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn expense_json(id: &str, title: &str, category: &str, amount: f64, date: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "category": category,
        "amount": amount,
        "date": date,
        "createdBy": "u1",
        "createdAt": "2024-03-01T09:00:00.000Z",
        "updatedAt": "2024-03-01T09:00:00.000Z"
    })
}

pub fn summary_json(amount: Option<f64>, spent: f64, month: u32, year: i32) -> Value {
    let budget = amount.map(|a| {
        json!({
            "id": "b1",
            "amount": a,
            "month": month,
            "year": year,
            "createdBy": "u1",
            "createdAt": "2024-03-01T00:00:00.000Z",
            "updatedAt": "2024-03-01T00:00:00.000Z"
        })
    });
    let has_budget = amount.is_some();
    let a = amount.unwrap_or(0.0);
    json!({
        "budget": budget,
        "totalExpenses": spent,
        "remaining": if has_budget { a - spent } else { 0.0 },
        "percentage": if has_budget && a > 0.0 { spent / a * 100.0 } else { 0.0 },
        "month": month,
        "year": year,
        "status": if has_budget { "safe" } else { "not_set" },
        "hasBudget": has_budget
    })
}
