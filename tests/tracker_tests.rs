// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use chrono::NaiveDate;
use common::{MockApi, expense_json, ok, summary_json, tracker};
use rust_decimal::Decimal;
use serde_json::json;
use spendtrack::api::Method;
use spendtrack::budget_status::BudgetStatus;
use spendtrack::cache::QueryKey;
use spendtrack::commands::budget::report;
use spendtrack::error::TrackerError;
use spendtrack::filters::{BudgetPeriod, ExpenseFilterInput, expense_key};
use spendtrack::validation::{ExpenseForm, ExpensePatchForm};

fn march() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn lunch() -> ExpenseForm {
    ExpenseForm {
        title: "Lunch".into(),
        amount: "12.50".into(),
        category: "food".into(),
        date: Some("2024-03-15".into()),
    }
}

fn seed_reads(api: &MockApi) {
    api.ok(
        Method::Get,
        "/api/expenses",
        json!([expense_json("e1", "Rent", "Utilities", 400.0, "2024-03-01")]),
    );
    api.ok(
        Method::Get,
        "/api/expenses/chart",
        json!([{ "category": "Utilities", "total": 400.0, "count": 1 }]),
    );
    api.ok(
        Method::Get,
        "/api/budget",
        summary_json(Some(500.0), 400.0, 3, 2024),
    );
    api.ok(
        Method::Post,
        "/api/expenses",
        expense_json("e2", "Lunch", "Food", 12.5, "2024-03-15"),
    );
    api.ok(
        Method::Patch,
        "/api/expenses/e1",
        expense_json("e1", "Rent", "Utilities", 450.0, "2024-03-01"),
    );
}

#[test]
fn repeated_reads_hit_the_cache() {
    let api = MockApi::new();
    seed_reads(&api);
    let t = tracker(&api);
    let filters = ExpenseFilterInput::default();

    t.expenses(&filters).unwrap();
    t.expenses(&filters).unwrap();
    t.expense_stats().unwrap();
    t.expense_stats().unwrap();
    assert_eq!(api.calls(Method::Get, "/api/expenses"), 1);
    assert_eq!(api.calls(Method::Get, "/api/expenses/chart"), 1);

    // a different filter set is a different key
    t.expenses(&ExpenseFilterInput {
        month: Some("3".into()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(api.calls(Method::Get, "/api/expenses"), 2);
}

#[test]
fn creating_an_expense_refreshes_all_derived_views() {
    let api = MockApi::new();
    seed_reads(&api);
    let t = tracker(&api);
    let period = BudgetPeriod::new(3, 2024);

    t.expenses(&ExpenseFilterInput::default()).unwrap();
    t.expense_stats().unwrap();
    t.budget_summary(period).unwrap();

    let created = t.create_expense(&lunch(), march()).unwrap();
    assert_eq!(created.id, "e2");
    let body = api.last().body.unwrap();
    assert_eq!(body["category"], "Food");
    assert_eq!(body["date"], "2024-03-15");

    t.expenses(&ExpenseFilterInput::default()).unwrap();
    t.expense_stats().unwrap();
    t.budget_summary(period).unwrap();
    assert_eq!(api.calls(Method::Get, "/api/expenses"), 2);
    assert_eq!(api.calls(Method::Get, "/api/expenses/chart"), 2);
    assert_eq!(api.calls(Method::Get, "/api/budget"), 2);
}

#[test]
fn updating_an_expense_refreshes_the_single_view() {
    let api = MockApi::new();
    seed_reads(&api);
    api.ok(
        Method::Get,
        "/api/expenses/e1",
        expense_json("e1", "Rent", "Utilities", 400.0, "2024-03-01"),
    );
    let t = tracker(&api);

    t.expense("e1").unwrap();
    t.expense("e1").unwrap();
    assert_eq!(api.calls(Method::Get, "/api/expenses/e1"), 1);

    let patch = ExpensePatchForm {
        amount: Some("450".into()),
        ..Default::default()
    };
    t.update_expense("e1", &patch).unwrap();
    let body = api.last().body.unwrap();
    assert_eq!(body, json!({ "amount": 450.0 }));

    t.expense("e1").unwrap();
    assert_eq!(api.calls(Method::Get, "/api/expenses/e1"), 2);
}

#[test]
fn padded_ids_share_the_trimmed_cache_entry() {
    let api = MockApi::new();
    api.ok(
        Method::Get,
        "/api/expenses/e1",
        expense_json("e1", "Rent", "Utilities", 400.0, "2024-03-01"),
    );
    let t = tracker(&api);

    t.expense(" e1 ").unwrap();
    t.expense("e1").unwrap();
    assert_eq!(api.calls(Method::Get, "/api/expenses/e1"), 1);
    assert!(t.cache().contains(&expense_key("e1")));
    assert!(!t.cache().contains(&expense_key(" e1 ")));
}

#[test]
fn negative_budget_amount_is_a_field_error() {
    let api = MockApi::new();
    let t = tracker(&api);
    match t.upsert_budget("-5", BudgetPeriod::new(3, 2024)).unwrap_err() {
        TrackerError::Invalid(e) => assert_eq!(
            e.fields().get("amount"),
            Some("Enter a valid non-negative amount.")
        ),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(api.requests().is_empty());
}

#[test]
fn budget_upsert_leaves_expense_views_cached() {
    let api = MockApi::new();
    seed_reads(&api);
    api.ok(Method::Put, "/api/budget", summary_json(Some(600.0), 400.0, 3, 2024));
    let t = tracker(&api);
    let period = BudgetPeriod::new(3, 2024);

    t.expenses(&ExpenseFilterInput::default()).unwrap();
    t.budget_summary(period).unwrap();
    t.budget_summary(BudgetPeriod::default()).unwrap();

    t.upsert_budget("600", period).unwrap();

    t.expenses(&ExpenseFilterInput::default()).unwrap();
    t.budget_summary(period).unwrap();
    t.budget_summary(BudgetPeriod::default()).unwrap();
    assert_eq!(api.calls(Method::Get, "/api/expenses"), 1);
    // every period under the umbrella prefix is refetched
    assert_eq!(api.calls(Method::Get, "/api/budget"), 4);
}

#[test]
fn invalidating_an_absent_key_is_a_no_op() {
    let api = MockApi::new();
    let t = tracker(&api);
    assert_eq!(t.cache().invalidate(&QueryKey::new("budgetSummary")), 0);
    assert_eq!(t.cache().invalidate(&QueryKey::new("budgetSummary")), 0);
    assert!(t.cache().is_empty());
    assert!(api.requests().is_empty());
}

#[test]
fn invalid_forms_never_reach_the_server() {
    let api = MockApi::new();
    let t = tracker(&api);

    let form = ExpenseForm {
        title: " ".into(),
        amount: "-3".into(),
        category: "Snacks".into(),
        date: None,
    };
    match t.create_expense(&form, march()).unwrap_err() {
        TrackerError::Invalid(e) => {
            assert_eq!(e.fields().get("title"), Some("Title is required"));
            assert!(e.fields().get("amount").is_some());
            assert!(e.fields().get("category").is_some());
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(matches!(
        t.upsert_budget("abc", BudgetPeriod::new(3, 2024)),
        Err(TrackerError::Invalid(_))
    ));
    assert!(matches!(
        t.login("not-an-email", "123"),
        Err(TrackerError::Invalid(_))
    ));
    assert!(api.requests().is_empty());
}

#[test]
fn double_submission_is_rejected_while_pending() {
    let api = MockApi::new();
    let (started_tx, started_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let started_tx = Mutex::new(started_tx);
    let release_rx = Mutex::new(release_rx);
    api.on(Method::Post, "/api/expenses", move |_| {
        started_tx.lock().unwrap().send(()).unwrap();
        release_rx.lock().unwrap().recv().unwrap();
        ok(expense_json("e2", "Lunch", "Food", 12.5, "2024-03-15"))
    });
    let t = tracker(&api);

    thread::scope(|s| {
        let first = s.spawn(|| t.create_expense(&lunch(), march()));
        started_rx.recv().unwrap();

        let second = t.create_expense(&lunch(), march());
        assert!(matches!(second, Err(TrackerError::Busy(_))));

        release_tx.send(()).unwrap();
        assert!(first.join().unwrap().is_ok());
    });

    // released once the first one resolves
    release_tx.send(()).unwrap();
    t.create_expense(&lunch(), march()).unwrap();
    assert_eq!(api.calls(Method::Post, "/api/expenses"), 2);
}

#[test]
fn logging_in_drops_cached_views() {
    let api = MockApi::new();
    seed_reads(&api);
    api.ok(
        Method::Post,
        "/api/auth/login",
        json!({ "user": common::user_json(), "token": "other" }),
    );
    let t = tracker(&api);

    t.expense_stats().unwrap();
    assert!(!t.cache().is_empty());
    t.login("ada@example.com", "secret1").unwrap();
    assert!(t.cache().is_empty());
    t.expense_stats().unwrap();
    assert_eq!(api.calls(Method::Get, "/api/expenses/chart"), 2);
}

#[test]
fn first_budget_for_a_month_end_to_end() {
    let api = MockApi::new();
    let saved = Arc::new(AtomicBool::new(false));

    let flag = saved.clone();
    api.on(Method::Get, "/api/budget", move |req| {
        assert_eq!(
            req.query,
            vec![("month", "3".to_string()), ("year", "2024".to_string())]
        );
        if flag.load(Ordering::SeqCst) {
            ok(summary_json(Some(500.0), 0.0, 3, 2024))
        } else {
            ok(summary_json(None, 0.0, 3, 2024))
        }
    });
    let flag = saved.clone();
    api.on(Method::Put, "/api/budget", move |_| {
        flag.store(true, Ordering::SeqCst);
        ok(summary_json(Some(500.0), 0.0, 3, 2024))
    });

    let t = tracker(&api);
    let period = BudgetPeriod::new(3, 2024);

    let before = t.budget_summary(period).unwrap();
    assert!(!before.has_budget);
    assert_eq!(before.status, BudgetStatus::NotSet);
    assert!(
        report(&before)
            .iter()
            .any(|l| l == "Set a budget to start tracking.")
    );

    t.upsert_budget("500", period).unwrap();
    assert_eq!(api.calls(Method::Put, "/api/budget"), 1);
    let body = api.last().body.unwrap();
    assert_eq!(body["amount"].as_f64(), Some(500.0));
    assert_eq!(body["month"], 3);
    assert_eq!(body["year"], 2024);

    let after = t.budget_summary(period).unwrap();
    assert_eq!(api.calls(Method::Get, "/api/budget"), 2);
    assert!(after.has_budget);
    assert_eq!(after.status, BudgetStatus::Safe);
    assert_eq!(after.amount(), Some(Decimal::from(500)));
    assert_eq!(after.remaining, Decimal::from(500));
}
