// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::Value;

use super::auth::to_body;
use super::endpoints;
use super::transport::{ApiRequest, Method};
use super::ApiClient;
use crate::error::ApiError;
use crate::filters::ExpenseQuery;
use crate::models::{CreateExpense, Expense, ExpenseCategorySummary, UpdateExpense};

impl ApiClient {
    pub fn list_expenses(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, ApiError> {
        let req = ApiRequest::new(Method::Get, endpoints::EXPENSES).query(query.params());
        Ok(self.execute(req)?.unwrap_or_default())
    }

    pub fn get_expense(&self, id: &str) -> Result<Expense, ApiError> {
        self.execute_required(
            ApiRequest::new(Method::Get, endpoints::expense(id)),
            "Expense not found",
        )
    }

    pub fn create_expense(&self, data: &CreateExpense) -> Result<Expense, ApiError> {
        let req = ApiRequest::new(Method::Post, endpoints::EXPENSES).json(to_body(data)?);
        self.execute_required(req, "Failed to create expense")
    }

    pub fn update_expense(&self, id: &str, data: &UpdateExpense) -> Result<Expense, ApiError> {
        let req = ApiRequest::new(Method::Patch, endpoints::expense(id)).json(to_body(data)?);
        self.execute_required(req, "Failed to update expense")
    }

    pub fn delete_expense(&self, id: &str) -> Result<(), ApiError> {
        self.execute::<Value>(ApiRequest::new(Method::Delete, endpoints::expense(id)))
            .map(|_| ())
    }

    pub fn expense_stats(&self) -> Result<Vec<ExpenseCategorySummary>, ApiError> {
        let req = ApiRequest::new(Method::Get, endpoints::EXPENSE_STATS);
        Ok(self.execute(req)?.unwrap_or_default())
    }
}
