use rhourtracker::config::Endpoints;
use rhourtracker::errors::ErrorKind;
use rhourtracker::remote::{HttpBackend, RecordBackend, RemoteClient};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::canned_server;

const ADA: &str = r#"{"username":"Ada","password":"ada-pw","signedIn":true,"lastTime":1741629600,"totalTime":0,"sessions":[]}"#;

fn backend(base: &str) -> HttpBackend {
    HttpBackend::new(base, Endpoints::default(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_user_sends_password_query() {
    let (base, seen) = canned_server(vec![(200, ADA.to_string())]).await;

    let ada = backend(&base).fetch_user("ada-pw").await.unwrap();

    assert_eq!(ada.name, "Ada");
    assert!(ada.signed_in);
    let requests = seen.lock().unwrap();
    assert_eq!(
        requests[0],
        "GET /api/src/endpoints/getuserdata.php?password=ada-pw HTTP/1.1"
    );
}

#[tokio::test]
async fn test_fetch_user_not_found_forms() {
    let (base, _) = canned_server(vec![
        (404, String::new()),
        (200, "[]".to_string()),
        (200, String::new()),
    ])
    .await;
    let http = backend(&base);

    for _ in 0..3 {
        let err = http.fetch_user("nobody").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Unable to find any matching accounts.");
    }
}

#[tokio::test]
async fn test_server_error_carries_body_text() {
    let (base, _) = canned_server(vec![(500, "database is locked".to_string())]).await;

    let err = backend(&base).fetch_roster().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("database is locked"));
}

#[tokio::test]
async fn test_roster_hydrates_every_record() {
    let body = format!(r#"[{ADA}, ["Grace", "grace-pw", 0, 1741629000, 60]]"#);
    let (base, seen) = canned_server(vec![(200, body)]).await;

    let roster = backend(&base).fetch_roster().await.unwrap();

    assert_eq!(roster.len(), 2);
    assert_eq!(roster[1].total_time_seconds, 60);
    assert!(seen.lock().unwrap()[0].starts_with("GET /api/src/endpoints/getdata.php "));
}

#[tokio::test]
async fn test_sign_out_encodes_note_and_correction() {
    let (base, seen) = canned_server(vec![(200, "ok".to_string())]).await;

    backend(&base)
        .sign_out("ada-pw", "built robot", Some(1800))
        .await
        .unwrap();

    let line = seen.lock().unwrap()[0].clone();
    assert!(line.starts_with("GET /api/src/endpoints/signout.php?"));
    assert!(line.contains("password=ada-pw"));
    assert!(line.contains("did=built+robot"));
    assert!(line.contains("sessionTime=1800"));
}

#[tokio::test]
async fn test_sign_out_without_correction_omits_session_time() {
    let (base, seen) = canned_server(vec![(200, String::new())]).await;

    backend(&base)
        .sign_out("ada-pw", "notes", None)
        .await
        .unwrap();

    assert!(!seen.lock().unwrap()[0].contains("sessionTime"));
}

#[tokio::test]
async fn test_ack_status_mapping() {
    let (base, _) = canned_server(vec![
        (409, "already signed in".to_string()),
        (400, "bad request".to_string()),
        (404, "no such user".to_string()),
        (503, String::new()),
    ])
    .await;
    let http = backend(&base);

    let err = http.sign_in("ada-pw").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.to_string(), "already signed in");

    assert_eq!(
        http.sign_in("ada-pw").await.unwrap_err().kind(),
        ErrorKind::Invalid
    );
    assert_eq!(
        http.sign_in("ada-pw").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        http.sign_in("ada-pw").await.unwrap_err().kind(),
        ErrorKind::Transport
    );
}

#[tokio::test]
async fn test_change_password_404_is_conflict() {
    let (base, seen) = canned_server(vec![(404, "Invalid password".to_string())]).await;

    let err = backend(&base)
        .change_password("wrong", "fresh")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    let line = seen.lock().unwrap()[0].clone();
    assert!(line.contains("newpassword=fresh"));
}

#[tokio::test]
async fn test_session_edits_pick_endpoint_and_map_400() {
    let (base, seen) = canned_server(vec![
        (200, String::new()),
        (200, String::new()),
        (400, "Session not found".to_string()),
        (400, "Session not found".to_string()),
    ])
    .await;
    let http = backend(&base);

    http.set_session_flag("ada-pw", 1741626000, true)
        .await
        .unwrap();
    http.set_session_flag("ada-pw", 1741626000, false)
        .await
        .unwrap();
    let err = http
        .set_session_flag("ada-pw", 1, true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = http.set_session_time("ada-pw", 1, 900).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let lines = seen.lock().unwrap();
    assert!(lines[0].starts_with("GET /api/flagSession?"));
    assert!(lines[0].contains("sessionEnd=1741626000"));
    assert!(lines[1].starts_with("GET /api/unflagSession?"));
    assert!(lines[3].starts_with("GET /api/changeSessionTime?"));
    assert!(lines[3].contains("sessionTime=900"));
}

#[tokio::test]
async fn test_client_refetches_after_mutation() {
    let (base, seen) = canned_server(vec![(200, String::new()), (200, ADA.to_string())]).await;
    let client = RemoteClient::new(Arc::new(backend(&base)));

    let ada = client.sign_in("ada-pw").await.unwrap();

    assert!(ada.signed_in);
    let lines = seen.lock().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("signin.php"));
    assert!(lines[1].contains("getuserdata.php"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend(&format!("http://{addr}"))
        .fetch_roster()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
