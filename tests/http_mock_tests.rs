use httpmock::{
    Method::{GET, POST, PUT},
    MockServer,
};
use serde_json::{Value, json};

use bbrelay::{
    BitbucketClient, Config, RelayError,
    jenkins::JenkinsClient,
    report::{BuildState, BuildStatus, DataPoint, Report, ReportResult, ReportType},
};

const REPO_PATH: &str = "/2.0/repositories/varlab/game";

fn client(server: &MockServer) -> BitbucketClient {
    BitbucketClient::new(Config {
        access_token: "test-token".into(),
        repo_url: server.url(REPO_PATH),
    })
    .unwrap()
}

#[tokio::test]
async fn commit_hash_resolves_short_hash() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("{REPO_PATH}/commit/1a2b3c/"))
                .query_param("fields", "hash")
                .header("Authorization", "Bearer test-token")
                .header("Accept", "application/json");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"hash": "1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b"}));
        })
        .await;

    let hash = client(&server).commit_hash("1a2b3c").await.unwrap();
    m.assert_async().await;
    assert_eq!(hash, "1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b");
}

#[tokio::test]
async fn commit_hash_without_hash_field_is_unexpected_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{REPO_PATH}/commit/ffff/"));
            then.status(200).json_body(json!({"type": "commit"}));
        })
        .await;

    let err = client(&server).commit_hash("ffff").await.unwrap_err();
    assert!(matches!(err, RelayError::UnexpectedResponse { .. }));
}

#[tokio::test]
async fn put_report_sends_exact_payload() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(format!("{REPO_PATH}/commit/abc123/reports/EditMode-test-report"))
                .header("Authorization", "Bearer test-token")
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "title": "9: EditMode Tests",
                    "details": "0/4 tests failed.",
                    "report_type": "TEST",
                    "reporter": "Jenkins",
                    "result": "PASSED",
                    "data": [
                        {"type": "BOOLEAN", "title": "All tests passed?", "value": true}
                    ]
                }));
            then.status(200).json_body(json!({"uuid": "{r1}"}));
        })
        .await;

    let report = Report::new("9: EditMode Tests", "0/4 tests failed.", ReportType::Test)
        .with_result(ReportResult::Passed)
        .with_data(DataPoint::boolean("All tests passed?", true));
    let res = client(&server)
        .put_report("abc123", "EditMode-test-report", &report)
        .await
        .unwrap();
    m.assert_async().await;
    assert_eq!(res["uuid"], "{r1}");
}

#[tokio::test]
async fn post_build_status_accepts_empty_response() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("{REPO_PATH}/commit/abc123/statuses/build"))
                .json_body(json!({
                    "key": "55",
                    "state": "STOPPED",
                    "description": "STOPPED",
                    "url": "http://ci/job/game/55/"
                }));
            then.status(201);
        })
        .await;

    let status = BuildStatus::new("55", BuildState::Stopped, "http://ci/job/game/55/");
    let res = client(&server)
        .post_build_status("abc123", &status)
        .await
        .unwrap();
    m.assert_async().await;
    assert_eq!(res, Value::Null);
}

#[tokio::test]
async fn http_error_keeps_request_and_response_bodies() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT);
            then.status(400)
                .json_body(json!({"type": "error", "error": {"message": "Invalid report_type"}}));
        })
        .await;

    let report = Report::new("t", "d", ReportType::Coverage);
    let err = client(&server)
        .put_report("abc123", "coverage-report", &report)
        .await
        .unwrap_err();
    match err {
        RelayError::Http {
            method,
            status,
            request_body,
            response_body,
            ..
        } => {
            assert_eq!(method, "PUT");
            assert_eq!(status, 400);
            assert!(request_body.unwrap().contains(r#""report_type":"COVERAGE""#));
            assert!(response_body.contains("Invalid report_type"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn jenkins_console_text_uses_basic_auth() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/job/game/12/consoleText")
                .header("Authorization", "Basic Ym90OnRvaw==");
            then.status(200)
                .body("Started by timer\nBuilding in workspace\nFinished: SUCCESS\n");
        })
        .await;

    let jenkins = JenkinsClient::new("bot", "tok").unwrap();
    let lines = jenkins
        .console_text(&server.url("/job/game/12"))
        .await
        .unwrap();
    m.assert_async().await;
    assert_eq!(
        lines,
        [
            "Started by timer\n",
            "Building in workspace\n",
            "Finished: SUCCESS\n"
        ]
    );
}

#[tokio::test]
async fn jenkins_console_text_surfaces_auth_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/job/game/12/consoleText");
            then.status(401).body("Unauthorized");
        })
        .await;

    let jenkins = JenkinsClient::new("bot", "wrong").unwrap();
    let err = jenkins
        .console_text(&server.url("/job/game/12/"))
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::Http { status: 401, .. }));
}
