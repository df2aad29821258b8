use std::cell::RefCell;
use std::path::PathBuf;

use surplus_core::CountyConfig;

use super::*;

fn counties(names: &[&str]) -> Vec<CountyConfig> {
    names
        .iter()
        .map(|name| CountyConfig {
            name: (*name).to_string(),
            host: format!("{}.realforeclose.com", name.to_lowercase()),
            notes: None,
        })
        .collect()
}

fn summary(county: &str, delivery: Delivery) -> CountySummary {
    CountySummary {
        county: county.to_string(),
        auctions: 4,
        cleaned: 1,
        warnings: 0,
        artifacts: PathBuf::from("results"),
        delivery,
    }
}

#[tokio::test]
async fn all_counties_succeed_in_order() {
    let list = counties(&["Manatee", "Broward", "Sarasota"]);
    let calls = RefCell::new(Vec::new());

    let report = run_batch(&list, |county| {
        calls.borrow_mut().push(county.name.clone());
        async move { Ok(summary(&county.name, Delivery::Sent)) }
    })
    .await;

    assert_eq!(*calls.borrow(), vec!["Manatee", "Broward", "Sarasota"]);
    assert_eq!(report.succeeded.len(), 3);
    assert!(report.failed.is_empty());
    assert!(report.recovered.is_empty());
}

#[tokio::test]
async fn failed_county_is_retried_once_after_main_pass() {
    let list = counties(&["Manatee", "Broward", "Sarasota"]);
    let calls = RefCell::new(Vec::new());

    let report = run_batch(&list, |county| {
        calls.borrow_mut().push(county.name.clone());
        let attempts = calls.borrow().iter().filter(|n| **n == county.name).count();
        let fail = county.name == "Broward" && attempts == 1;
        async move {
            if fail {
                Err(anyhow::anyhow!("session refused"))
            } else {
                Ok(summary(&county.name, Delivery::Sent))
            }
        }
    })
    .await;

    assert_eq!(
        *calls.borrow(),
        vec!["Manatee", "Broward", "Sarasota", "Broward"]
    );
    assert_eq!(report.succeeded.len(), 3);
    assert_eq!(report.recovered, vec!["Broward"]);
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn county_failing_twice_is_reported_with_error() {
    let list = counties(&["Manatee", "Putnam"]);
    let calls = RefCell::new(0_u32);

    let report = run_batch(&list, |county| {
        *calls.borrow_mut() += 1;
        async move {
            if county.name == "Putnam" {
                Err(anyhow::anyhow!("pages exhausted").context("fetch failed"))
            } else {
                Ok(summary(&county.name, Delivery::Skipped))
            }
        }
    })
    .await;

    assert_eq!(*calls.borrow(), 3);
    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(
        report.failed,
        vec![CountyFailure {
            county: "Putnam".to_string(),
            error: "fetch failed: pages exhausted".to_string(),
        }]
    );
}

#[tokio::test]
async fn delivery_failure_is_recorded_but_not_retried() {
    let list = counties(&["Manatee"]);
    let calls = RefCell::new(0_u32);

    let report = run_batch(&list, |county| {
        *calls.borrow_mut() += 1;
        async move {
            Ok(summary(
                &county.name,
                Delivery::Failed("spreadsheet returned 500".to_string()),
            ))
        }
    })
    .await;

    assert_eq!(*calls.borrow(), 1);
    assert!(report.failed.is_empty());
    let failures: Vec<_> = report.delivery_failures().map(|s| s.county.as_str()).collect();
    assert_eq!(failures, vec!["Manatee"]);
}

#[tokio::test]
async fn empty_county_list_yields_empty_report() {
    let list: Vec<CountyConfig> = Vec::new();
    let report = run_batch(&list, |county| async move {
        Ok(summary(&county.name, Delivery::Sent))
    })
    .await;

    assert!(report.succeeded.is_empty());
    assert!(report.failed.is_empty());
}
