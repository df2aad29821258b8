use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use serde_json::json;

use super::*;

/// Transport that replays scripted bodies in request order.
///
/// `Err(status)` entries fail with `UnexpectedStatus`.
#[derive(Default)]
struct ScriptedTransport {
    navigate_failures: AtomicU32,
    navigate_calls: AtomicU32,
    responses: Mutex<VecDeque<Result<String, u16>>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedTransport {
    fn with_responses(responses: Vec<Result<String, u16>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn navigate(&self, url: &str) -> impl Future<Output = Result<Session, ScraperError>> + Send {
        self.navigate_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .navigate_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let result = if failing {
            Err(ScraperError::Session {
                url: url.to_owned(),
                reason: "proxy tunnel closed".to_owned(),
            })
        } else {
            Ok(Session {
                landing_url: url.to_owned(),
                cookies: Vec::new(),
            })
        };
        async move { result }
    }

    fn fetch(
        &self,
        _session: &Session,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<String, ScraperError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        let result = match next {
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(ScraperError::UnexpectedStatus {
                status,
                url: request.url.clone(),
            }),
            None => Err(ScraperError::UnexpectedStatus {
                status: 599,
                url: request.url.clone(),
            }),
        };
        async move { result }
    }
}

fn client(transport: ScriptedTransport) -> AuctionClient<ScriptedTransport> {
    AuctionClient::new(
        transport,
        "manatee.realforeclose.com",
        RetryPolicy::new(3, 0),
        0,
    )
    .unwrap()
}

fn session() -> Session {
    Session {
        landing_url: "https://manatee.realforeclose.com/index.cfm?zaction=AUCTION&zmethod=PREVIEW&AuctionDate=09/16/2024".to_owned(),
        cookies: Vec::new(),
    }
}

fn detail_body(ids: &[&str]) -> String {
    let html: String = ids
        .iter()
        .map(|id| {
            format!(
                "@A@E_ITEM\"><@I><tr><th>Case #:</th><td>CASE-{id}</td></tr><tr><th>Auction Type:</th><td>FORECLOSURE</td></tr></@I>@B"
            )
        })
        .collect();
    json!({ "retHTML": html, "rlist": ids.join(",") }).to_string()
}

fn status_body(current: u32, total: u32, ids: &[&str]) -> String {
    let items: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "AID": id, "A": "B", "B": "09/16/2024 11:02 AM ET",
                "C": "Amount", "D": "$1,000.00", "SL": "Sold To", "ST": "3rd Party Bidder",
                "E": "-", "F": "", "G": "", "H": "", "I": "-",
                "PB": "-", "SP": 0, "SBH": 0, "PS": "A", "S": "B", "P": "A"
            })
        })
        .collect();
    json!({
        "CC": current, "CM": total, "WC": 0, "WM": 0, "NC": 10,
        "RA": 0, "RR": 0, "RC": 0, "RW": 0,
        "ADATA": { "AITEM": items },
        "RTIME": { "RITEM": [] }
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// URL builders
// ---------------------------------------------------------------------------

#[test]
fn preview_url_formats_date_month_first() {
    let c = client(ScriptedTransport::default());
    let date = NaiveDate::from_ymd_opt(2024, 9, 6).unwrap();
    assert_eq!(
        c.preview_url(date),
        "https://manatee.realforeclose.com/index.cfm?zaction=AUCTION&zmethod=PREVIEW&AuctionDate=09/06/2024"
    );
}

#[test]
fn detail_url_carries_page_number() {
    let c = client(ScriptedTransport::default());
    assert_eq!(
        c.detail_url(3),
        "https://manatee.realforeclose.com/index.cfm?zaction=AUCTION&Zmethod=UPDATE&FNC=LOAD&AREA=C&PageDir=1&doR=0&bypassPage=3"
    );
}

#[test]
fn status_url_joins_ids_and_offsets_cache_buster() {
    let c = client(ScriptedTransport::default());
    let ids = vec!["101".to_owned(), "102".to_owned()];
    assert_eq!(
        c.status_url(&ids, 1_726_500_000_000),
        "https://manatee.realforeclose.com/index.cfm?zaction=AUCTION&ZMETHOD=UPDATE&FNC=UPDATE&ref=101,102&tx=1726500000000&_=1726499999679"
    );
}

#[test]
fn new_accepts_full_url_and_keeps_origin() {
    let c = AuctionClient::new(
        ScriptedTransport::default(),
        "http://127.0.0.1:8080/some/path",
        RetryPolicy::default(),
        0,
    )
    .unwrap();
    assert_eq!(c.host(), "127.0.0.1");
    assert!(c.detail_url(1).starts_with("http://127.0.0.1:8080/index.cfm?"));
}

#[test]
fn new_rejects_site_without_host() {
    let result = AuctionClient::new(
        ScriptedTransport::default(),
        "   ",
        RetryPolicy::default(),
        0,
    );
    assert!(
        matches!(result, Err(ScraperError::InvalidUrl { .. })),
        "expected InvalidUrl"
    );
}

// ---------------------------------------------------------------------------
// open_session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn open_session_retries_failed_navigation() {
    let transport = ScriptedTransport::default();
    transport.navigate_failures.store(2, Ordering::SeqCst);
    let c = client(transport);
    let date = NaiveDate::from_ymd_opt(2024, 9, 16).unwrap();

    let session = c.open_session(date).await.unwrap();
    assert_eq!(session.landing_url, c.preview_url(date));
    assert_eq!(c.transport().navigate_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn open_session_gives_up_after_three_attempts() {
    let transport = ScriptedTransport::default();
    transport.navigate_failures.store(10, Ordering::SeqCst);
    let c = client(transport);

    let result = c
        .open_session(NaiveDate::from_ymd_opt(2024, 9, 16).unwrap())
        .await;
    assert!(matches!(
        result,
        Err(ScraperError::RetriesExhausted { attempts: 3, .. })
    ));
    assert_eq!(c.transport().navigate_calls.load(Ordering::SeqCst), 3);
}

// ---------------------------------------------------------------------------
// fetch_all_pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_page_run_merges_detail_and_status() {
    let c = client(ScriptedTransport::with_responses(vec![
        Ok(detail_body(&["101", "102"])),
        Ok(status_body(1, 1, &["102", "101"])),
    ]));

    let run = c.fetch_all_pages(&session()).await.unwrap();
    assert_eq!(run.auctions.len(), 2);
    assert_eq!(run.auctions[0].status.id, "102");
    assert_eq!(run.auctions[0].details.case_number, "CASE-102");
    assert_eq!(run.pages.len(), 1);
    assert_eq!(run.page_info.total, 1);

    let requests = c.transport().requests();
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].xhr);
    assert!(requests[1].xhr);
    assert!(requests[1].url.contains("ref=101,102"));
    assert_eq!(requests[1].referer.as_deref(), Some(session().landing_url.as_str()));
}

#[tokio::test]
async fn walks_every_page_reported_by_first_status() {
    let c = client(ScriptedTransport::with_responses(vec![
        Ok(detail_body(&["1", "2"])),
        Ok(status_body(1, 3, &["1", "2"])),
        Ok(detail_body(&["3"])),
        Ok(status_body(2, 3, &["3"])),
        Ok(detail_body(&["4"])),
        Ok(status_body(3, 3, &["4"])),
    ]));

    let run = c.fetch_all_pages(&session()).await.unwrap();
    assert_eq!(run.pages.len(), 3);
    assert_eq!(run.auctions.len(), 4);
    assert_eq!(run.page_info.current, 3);

    let requests = c.transport().requests();
    assert_eq!(requests.len(), 6);
    assert!(requests[4].url.ends_with("bypassPage=3"));
}

#[tokio::test]
async fn empty_first_status_finishes_with_zero_pages() {
    let c = client(ScriptedTransport::with_responses(vec![
        Ok(detail_body(&[])),
        Ok("{}".to_owned()),
    ]));

    let run = c.fetch_all_pages(&session()).await.unwrap();
    assert!(run.auctions.is_empty());
    assert!(run.pages.is_empty());
    assert_eq!(run.page_info.total, 0);
    assert_eq!(c.transport().requests().len(), 2);
}

#[tokio::test]
async fn transient_failures_are_retried_within_a_page() {
    let c = client(ScriptedTransport::with_responses(vec![
        Err(502),
        Ok("<html>Service Unavailable</html>".to_owned()),
        Ok(detail_body(&["1"])),
        Err(503),
        Ok(status_body(1, 1, &["1"])),
    ]));

    let run = c.fetch_all_pages(&session()).await.unwrap();
    assert_eq!(run.auctions.len(), 1);
    assert_eq!(c.transport().requests().len(), 5);
}

#[tokio::test]
async fn three_transport_errors_abort_after_exactly_three_attempts() {
    let c = client(ScriptedTransport::with_responses(vec![
        Err(502),
        Err(502),
        Err(502),
        Ok(detail_body(&["1"])),
    ]));

    let result = c.fetch_all_pages(&session()).await;
    match result {
        Err(ScraperError::RetriesExhausted {
            operation,
            attempts,
            source,
        }) => {
            assert_eq!(operation, "detail page 1");
            assert_eq!(attempts, 3);
            assert!(matches!(*source, ScraperError::UnexpectedStatus { status: 502, .. }));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(c.transport().requests().len(), 3);
}

#[tokio::test]
async fn failure_on_later_page_discards_earlier_pages() {
    let c = client(ScriptedTransport::with_responses(vec![
        Ok(detail_body(&["1"])),
        Ok(status_body(1, 2, &["1"])),
        Ok(detail_body(&["2"])),
        Err(500),
        Err(500),
        Err(500),
    ]));

    let result = c.fetch_all_pages(&session()).await;
    assert!(
        matches!(result, Err(ScraperError::RetriesExhausted { ref operation, .. }) if operation == "status page 2"),
        "expected status page 2 exhaustion, got {result:?}"
    );
}

#[tokio::test]
async fn reference_mismatch_is_retried_as_format_error() {
    let bad = json!({ "retHTML": "", "rlist": "1,2" }).to_string();
    let c = client(ScriptedTransport::with_responses(vec![
        Ok(bad.clone()),
        Ok(bad.clone()),
        Ok(bad),
    ]));

    let result = c.fetch_all_pages(&session()).await;
    match result {
        Err(ScraperError::RetriesExhausted { source, .. }) => {
            assert!(matches!(*source, ScraperError::ReferenceMismatch { .. }));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}
