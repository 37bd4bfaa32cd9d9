// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read queries and mutation commands over the API, kept consistent by the
//! cache invalidation table in [`Mutation::invalidates`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::cache::{QueryCache, QueryKey};
use crate::error::{ApiError, Result, TrackerError};
use crate::filters::{
    self, BudgetPeriod, ExpenseFilterInput, ExpenseQuery, expense_key, expense_stats_key, me_key,
};
use crate::models::{AuthResponse, BudgetSummary, Expense, ExpenseCategorySummary, User};
use crate::validation::{self, ExpenseForm, ExpensePatchForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateExpense,
    UpdateExpense,
    DeleteExpense,
    UpsertBudget,
}

impl Mutation {
    /// Key prefixes whose cached values a successful mutation makes stale.
    pub fn invalidates(&self) -> &'static [&'static str] {
        match self {
            Mutation::CreateExpense | Mutation::UpdateExpense | Mutation::DeleteExpense => {
                &[filters::EXPENSES, filters::EXPENSE_STATS, filters::BUDGET_SUMMARY]
            }
            Mutation::UpsertBudget => &[filters::BUDGET_SUMMARY],
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Mutation::CreateExpense => "create expense",
            Mutation::UpdateExpense => "update expense",
            Mutation::DeleteExpense => "delete expense",
            Mutation::UpsertBudget => "save budget",
        }
    }
}

pub struct Tracker {
    api: ApiClient,
    cache: Arc<QueryCache>,
    pending: Mutex<HashSet<String>>,
}

/// Marks one submission as pending until dropped.
struct Pending<'a> {
    set: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&self.key);
    }
}

impl Tracker {
    pub fn new(api: ApiClient) -> Self {
        Self::with_cache(api, Arc::new(QueryCache::new()))
    }

    pub fn with_cache(api: ApiClient, cache: Arc<QueryCache>) -> Self {
        Tracker {
            api,
            cache,
            pending: Mutex::new(HashSet::new()),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    fn begin(&self, what: &str) -> Result<Pending<'_>> {
        let mut set = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        if !set.insert(what.to_string()) {
            return Err(TrackerError::Busy(what.to_string()));
        }
        Ok(Pending {
            set: &self.pending,
            key: what.to_string(),
        })
    }

    fn settle(&self, m: Mutation) {
        for prefix in m.invalidates() {
            self.cache.invalidate(&QueryKey::new(prefix));
        }
        debug!(mutation = m.label(), "invalidated dependent queries");
    }

    fn cached<T, F>(&self, key: &QueryKey, fetch: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> std::result::Result<T, ApiError>,
    {
        Ok(self.cache.get_or_fetch(key, fetch)?)
    }

    // ---- session ----

    pub fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let credentials = validation::login(email, password)?;
        let _p = self.begin("login")?;
        let auth = self.api.login(&credentials)?;
        self.cache.clear();
        Ok(auth)
    }

    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let credentials = validation::register(name, email, password)?;
        let _p = self.begin("register")?;
        let auth = self.api.register(&credentials)?;
        self.cache.clear();
        Ok(auth)
    }

    pub fn logout(&self) -> Result<()> {
        let _p = self.begin("logout")?;
        let result = self.api.logout();
        self.cache.clear();
        Ok(result?)
    }

    pub fn me(&self) -> Result<Arc<User>> {
        self.cached(&me_key(), || self.api.me())
    }

    // ---- reads ----

    pub fn expenses(&self, filters: &ExpenseFilterInput) -> Result<Arc<Vec<Expense>>> {
        self.expenses_for(&filters.normalize())
    }

    pub fn expenses_for(&self, query: &ExpenseQuery) -> Result<Arc<Vec<Expense>>> {
        self.cached(&query.key(), || self.api.list_expenses(query))
    }

    pub fn expense(&self, id: &str) -> Result<Arc<Expense>> {
        let id = id.trim();
        self.cached(&expense_key(id), || self.api.get_expense(id))
    }

    pub fn expense_stats(&self) -> Result<Arc<Vec<ExpenseCategorySummary>>> {
        self.cached(&expense_stats_key(), || self.api.expense_stats())
    }

    pub fn budget_summary(&self, period: BudgetPeriod) -> Result<Arc<BudgetSummary>> {
        self.cached(&period.key(), || self.api.budget_summary(&period))
    }

    // ---- mutations ----

    pub fn create_expense(&self, form: &ExpenseForm, today: NaiveDate) -> Result<Expense> {
        let data = validation::expense(form, today)?;
        let m = Mutation::CreateExpense;
        let _p = self.begin(m.label())?;
        let created = self.api.create_expense(&data)?;
        self.settle(m);
        info!(id = %created.id, amount = %created.amount, "expense created");
        Ok(created)
    }

    pub fn update_expense(&self, id: &str, form: &ExpensePatchForm) -> Result<Expense> {
        let id = id.trim();
        let patch = validation::expense_patch(form)?;
        let m = Mutation::UpdateExpense;
        let _p = self.begin(&format!("{} {}", m.label(), id))?;
        let updated = self.api.update_expense(id, &patch)?;
        self.settle(m);
        info!(id = %updated.id, "expense updated");
        Ok(updated)
    }

    pub fn delete_expense(&self, id: &str) -> Result<()> {
        let id = id.trim();
        let m = Mutation::DeleteExpense;
        let _p = self.begin(&format!("{} {}", m.label(), id))?;
        self.api.delete_expense(id)?;
        self.settle(m);
        info!(id, "expense deleted");
        Ok(())
    }

    /// Saves the budget amount for `period` (create or overwrite).
    pub fn upsert_budget(&self, amount: &str, period: BudgetPeriod) -> Result<BudgetSummary> {
        let data = validation::budget(amount, period.month, period.year)?;
        let m = Mutation::UpsertBudget;
        let _p = self.begin(m.label())?;
        let summary = self.api.upsert_budget(&data)?;
        self.settle(m);
        info!(month = summary.month, year = summary.year, "budget saved");
        Ok(summary)
    }
}
