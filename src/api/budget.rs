// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::auth::to_body;
use super::endpoints;
use super::transport::{ApiRequest, Method};
use super::ApiClient;
use crate::error::ApiError;
use crate::filters::BudgetPeriod;
use crate::models::{BudgetSummary, UpsertBudget};

impl ApiClient {
    /// Summary for `period`, re-derived through the status engine.
    pub fn budget_summary(&self, period: &BudgetPeriod) -> Result<BudgetSummary, ApiError> {
        let req = ApiRequest::new(Method::Get, endpoints::BUDGET).query(period.params());
        let summary: BudgetSummary = self.execute_required(req, "Invalid budget response")?;
        Ok(summary.normalized())
    }

    pub fn upsert_budget(&self, data: &UpsertBudget) -> Result<BudgetSummary, ApiError> {
        let req = ApiRequest::new(Method::Put, endpoints::BUDGET).json(to_body(data)?);
        let summary: BudgetSummary = self.execute_required(req, "Failed to save budget")?;
        Ok(summary.normalized())
    }
}
