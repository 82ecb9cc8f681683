use crate::helpers::{
    PROBE_PATH, PROBE_PATH_PATTERN, closed_port_url, fast_settings, output_lines, session_for,
};

use probe_core::DEFAULT_USER_AGENT;
use probe_core::client::ProbeClient;
use probe_core::report::ProbeOutcome;
use probe_core::session::{CONNECTION_ERROR_MESSAGE, SessionSettings};

use common::HttpStatusCode;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers 200, stalling every other request past the client timeout.
struct AlternatingStall {
    calls: AtomicUsize,
    stall: Duration,
}

impl Respond for AlternatingStall {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call % 2 == 0 {
            ResponseTemplate::new(200).set_delay(self.stall)
        } else {
            ResponseTemplate::new(200)
        }
    }
}

async fn received_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

/// **VALUE**: The happy path prints one `<url>: <status>` line per request and stops at
/// `request_count`.
///
/// **BUG THIS CATCHES**: Would catch the counter never advancing (an endless loop) or
/// advancing twice per request.
#[tokio::test]
async fn given_permissive_server_when_running_then_sends_exactly_request_count() {
    // GIVEN: A server that answers 404 for every random slug
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(PROBE_PATH_PATTERN))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let base_url = format!("{}{PROBE_PATH}", server.uri());
    let mut session = session_for(&base_url, ProbeClient::with_defaults().unwrap(), fast_settings(5));

    // WHEN: Running five requests
    let mut out = Vec::new();
    let report = session.run(&mut out).await.unwrap();

    // THEN: Five lines, five requests, completed
    let lines = output_lines(out);
    assert_eq!(lines.len(), 5);
    for line in &lines {
        let (url, status) = line.rsplit_once(": ").unwrap();
        assert!(url.starts_with(&base_url), "Unexpected URL in {line}");
        assert_eq!(url.len(), base_url.len() + 12);
        assert_eq!(status, "404");
    }
    assert_eq!(report.outcome, ProbeOutcome::Completed);
    assert_eq!(report.requests_sent, 5);
    assert_eq!(report.count_for(404), 5);
    assert_eq!(received_count(&server).await, 5);
}

/// **VALUE**: The first 403 ends the run and prints the time-to-block message.
///
/// **BUG THIS CATCHES**: Would catch the loop continuing after a block, which keeps
/// hammering a target that has already rate-limited us.
#[tokio::test]
async fn given_server_blocks_after_three_requests_when_running_then_stops_at_first_403() {
    // GIVEN: Three 200s, then 403 forever
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(PROBE_PATH_PATTERN))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(3)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(PROBE_PATH_PATTERN))
        .respond_with(ResponseTemplate::new(403))
        .with_priority(2)
        .mount(&server)
        .await;
    let base_url = format!("{}{PROBE_PATH}", server.uri());
    let mut session =
        session_for(&base_url, ProbeClient::with_defaults().unwrap(), fast_settings(10));

    // WHEN: Running with a budget well above the block point
    let mut out = Vec::new();
    let report = session.run(&mut out).await.unwrap();

    // THEN: Four responses, the last one blocked, nothing sent after it
    let lines = output_lines(out);
    assert_eq!(lines.len(), 5);
    assert!(lines[0].ends_with(": 200"));
    assert!(lines[3].ends_with(": 403"));
    assert_eq!(lines[4], "We were blocked in 0 seconds!");
    assert_eq!(
        report.outcome,
        ProbeOutcome::Blocked {
            status: HttpStatusCode(403),
            after_secs: 0,
        }
    );
    assert_eq!(report.requests_sent, 4);
    assert_eq!(report.count_for(200), 3);
    assert_eq!(received_count(&server).await, 4);
}

#[tokio::test]
async fn given_custom_block_status_when_server_returns_it_then_run_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    let settings = SessionSettings {
        block_statuses: vec![403, 429],
        ..fast_settings(10)
    };
    let mut session = session_for(
        &format!("{}{PROBE_PATH}", server.uri()),
        ProbeClient::with_defaults().unwrap(),
        settings,
    );

    let mut out = Vec::new();
    let report = session.run(&mut out).await.unwrap();

    assert!(report.is_blocked());
    assert_eq!(report.requests_sent, 1);
    assert_eq!(received_count(&server).await, 1);
}

/// **VALUE**: A 403 is only a block when it is configured as one.
#[tokio::test]
async fn given_403_not_in_block_list_when_running_then_run_completes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let settings = SessionSettings {
        block_statuses: vec![429],
        ..fast_settings(3)
    };
    let mut session = session_for(
        &format!("{}{PROBE_PATH}", server.uri()),
        ProbeClient::with_defaults().unwrap(),
        settings,
    );

    let mut out = Vec::new();
    let report = session.run(&mut out).await.unwrap();

    assert_eq!(report.outcome, ProbeOutcome::Completed);
    assert_eq!(report.count_for(403), 3);
}

/// **VALUE**: Connection failures are bounded. The unbounded retry loop is gone.
///
/// **BUG THIS CATCHES**: Would catch a regression to infinite retries against an
/// unreachable host, which would hang this test.
#[tokio::test]
async fn given_unreachable_target_when_running_then_gives_up_after_max_failures() {
    // GIVEN: Nothing listening and a limit of three consecutive failures
    let settings = SessionSettings {
        max_connection_failures: 3,
        ..fast_settings(5)
    };
    let mut session = session_for(&closed_port_url(), ProbeClient::with_defaults().unwrap(), settings);

    // WHEN: Running
    let mut out = Vec::new();
    let report = session.run(&mut out).await.unwrap();

    // THEN: Three connection errors, no requests counted
    let lines = output_lines(out);
    assert_eq!(
        lines,
        vec![
            CONNECTION_ERROR_MESSAGE.to_string(),
            CONNECTION_ERROR_MESSAGE.to_string(),
            CONNECTION_ERROR_MESSAGE.to_string(),
        ]
    );
    assert_eq!(report.requests_sent, 0);
    assert_eq!(report.connection_errors, 3);
    assert_eq!(
        report.outcome,
        ProbeOutcome::GaveUp {
            consecutive_failures: 3,
        }
    );
}

/// **VALUE**: A failed request does not use up a request slot.
///
/// **BUG THIS CATCHES**: Would catch counting timeouts toward `request_count`, which
/// would under-report how many real responses were needed to trigger a block.
#[tokio::test]
async fn given_transient_timeouts_when_running_then_failures_do_not_consume_request_count() {
    // GIVEN: The first two requests time out, the rest answer 200
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(2)
        .mount(&server)
        .await;
    let client = ProbeClient::new(Duration::from_millis(100), DEFAULT_USER_AGENT).unwrap();
    let mut session = session_for(&format!("{}{PROBE_PATH}", server.uri()), client, fast_settings(2));

    // WHEN: Running two requests
    let mut out = Vec::new();
    let report = session.run(&mut out).await.unwrap();

    // THEN: Two errors, then two successful responses
    let lines = output_lines(out);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], CONNECTION_ERROR_MESSAGE);
    assert_eq!(lines[1], CONNECTION_ERROR_MESSAGE);
    assert!(lines[2].ends_with(": 200"));
    assert!(lines[3].ends_with(": 200"));
    assert_eq!(report.connection_errors, 2);
    assert_eq!(report.requests_sent, 2);
    assert_eq!(report.outcome, ProbeOutcome::Completed);
}

/// **VALUE**: A response resets the consecutive-failure counter.
///
/// **BUG THIS CATCHES**: Would catch the counter only ever growing, which makes a flaky
/// but reachable target look unreachable once the total (not consecutive) failures
/// reach the limit.
#[tokio::test]
async fn given_alternating_timeouts_when_running_then_response_resets_failure_streak() {
    // GIVEN: Every other request times out, and two failures in a row end the run
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(AlternatingStall {
            calls: AtomicUsize::new(0),
            stall: Duration::from_millis(400),
        })
        .mount(&server)
        .await;
    let client = ProbeClient::new(Duration::from_millis(100), DEFAULT_USER_AGENT).unwrap();
    let settings = SessionSettings {
        max_connection_failures: 2,
        ..fast_settings(4)
    };
    let mut session = session_for(&format!("{}{PROBE_PATH}", server.uri()), client, settings);

    // WHEN: Running four requests
    let mut out = Vec::new();
    let report = session.run(&mut out).await.unwrap();

    // THEN: Errors and responses alternate and the run completes
    let lines = output_lines(out);
    assert_eq!(lines.len(), 8);
    for pair in lines.chunks(2) {
        assert_eq!(pair[0], CONNECTION_ERROR_MESSAGE);
        assert!(pair[1].ends_with(": 200"), "Unexpected line {}", pair[1]);
    }
    assert_eq!(report.outcome, ProbeOutcome::Completed);
    assert_eq!(report.connection_errors, 4);
    assert_eq!(report.requests_sent, 4);
}

/// **VALUE**: The request delay is applied between requests only.
///
/// **BUG THIS CATCHES**: Would catch a sleep after the final request, or the delay being
/// skipped entirely, both of which skew the measured time-to-block.
#[tokio::test]
async fn given_request_delay_when_running_then_sleeps_only_between_requests() {
    // GIVEN: A 100ms delay and three requests
    let delay = Duration::from_millis(100);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let settings = SessionSettings {
        request_delay: delay,
        ..fast_settings(3)
    };
    let mut session = session_for(
        &format!("{}{PROBE_PATH}", server.uri()),
        ProbeClient::with_defaults().unwrap(),
        settings,
    );

    // WHEN: Running
    let mut out = Vec::new();
    let started = Instant::now();
    let report = session.run(&mut out).await.unwrap();
    let elapsed = started.elapsed();

    // THEN: Two gaps, not three
    assert_eq!(report.requests_sent, 3);
    assert!(elapsed >= delay * 2, "Expected two delays, took {elapsed:?}");
    assert!(elapsed < delay * 3, "Slept after the last request, took {elapsed:?}");
}

#[tokio::test]
async fn given_request_delay_when_blocked_then_returns_without_sleeping() {
    // GIVEN: One 200 then 403, with a 200ms delay
    let delay = Duration::from_millis(200);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .with_priority(2)
        .mount(&server)
        .await;
    let settings = SessionSettings {
        request_delay: delay,
        ..fast_settings(10)
    };
    let mut session = session_for(
        &format!("{}{PROBE_PATH}", server.uri()),
        ProbeClient::with_defaults().unwrap(),
        settings,
    );

    // WHEN: Running until blocked
    let mut out = Vec::new();
    let started = Instant::now();
    let report = session.run(&mut out).await.unwrap();
    let elapsed = started.elapsed();

    // THEN: Exactly one delay, between the 200 and the 403
    assert!(report.is_blocked());
    assert_eq!(report.requests_sent, 2);
    assert!(elapsed >= delay, "Expected one delay, took {elapsed:?}");
    assert!(elapsed < delay * 2, "Slept after the block, took {elapsed:?}");
}
