mod common;

use std::sync::Arc;

use reqwest::StatusCode;
use switchback::middleware::{QUIET, VERBOSE};
use switchback::{Error, Request, Response, Router, Server, app};

use common::{Capture, client, spawn, spawn_app};

#[tokio::test]
async fn status_is_ok_under_either_variant() {
    let (server, stateful) = spawn_app().await;
    let client = client();

    for variant in [QUIET, VERBOSE] {
        stateful.update(variant).unwrap();
        let res = client.get(server.url("/")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], "application/json");
        assert_eq!(res.text().await.unwrap(), r#"{"ok":true}"#);
    }

    drop(client);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn switching_to_verbose_times_the_following_requests() {
    let (capture, _guard) = Capture::install();
    let (server, stateful) = spawn_app().await;
    let client = client();

    let res = client
        .post(server.url("/config"))
        .body(r#"{"option":"verbose"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), r#"{"changed":true}"#);
    assert_eq!(&*stateful.current(), VERBOSE);

    // The switch itself ran under quiet: one record, no timing.
    let records = capture.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path.as_deref(), Some("/config"));
    assert!(records[0].elapsed.is_none());

    client.get(server.url("/?n=1")).send().await.unwrap();

    let records = capture.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].message, "request started");
    assert_eq!(records[1].path.as_deref(), Some("/?n=1"));
    assert!(records[1].elapsed.is_none());
    assert_eq!(records[2].message, "request finished");
    assert_eq!(records[2].path.as_deref(), Some("/?n=1"));
    assert!(records[2].elapsed.is_some());

    drop(client);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn rejected_configs_are_400_and_change_nothing() {
    let (server, stateful) = spawn_app().await;
    let client = client();

    let cases = [
        (r#"{"option":"bogus"}"#, Some("invalid middleware name")),
        (r#"{"mode":"verbose"}"#, Some(r#"missing "option" field"#)),
        ("not-json", None),
    ];
    for (body, expected) in cases {
        let res = client.post(server.url("/config")).body(body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body}");
        assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/plain"));
        let text = res.text().await.unwrap();
        match expected {
            Some(expected) => assert_eq!(text, expected),
            None => assert!(!text.is_empty(), "parse errors carry a message"),
        }
        assert_eq!(&*stateful.current(), QUIET);
    }

    drop(client);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn unknown_paths_are_404_without_access_logs() {
    let (capture, _guard) = Capture::install();
    let (server, _stateful) = spawn_app().await;
    let client = client();

    let res = client.get(server.url("/missing")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(capture.records().is_empty());

    drop(client);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn a_panicking_handler_is_a_500_and_the_server_keeps_going() {
    async fn boom(_req: Request) -> Response {
        panic!("handler exploded");
    }

    let server = spawn(Router::new().route("/boom", boom).route("/", switchback::status)).await;
    let client = client();

    let res = client.get(server.url("/boom")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    drop(client);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn bind_failure_is_reported_before_serving() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap();
    let stateful = Arc::new(
        switchback::middleware::StatefulMiddleware::new(
            QUIET,
            switchback::middleware::Registry::builtin(),
        )
        .unwrap(),
    );

    let err = Server::bind(addr).serve(app(stateful)).await.unwrap_err();

    match err {
        Error::Bind { addr: failed, source } => {
            assert_eq!(failed, addr);
            assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse);
        }
        other => panic!("expected a bind error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn live_switching_under_concurrent_traffic() {
    let (server, _stateful) = spawn_app().await;
    let base = Arc::new(server.base.clone());

    let mut tasks = Vec::new();
    for i in 0..8 {
        let base = Arc::clone(&base);
        tasks.push(tokio::spawn(async move {
            let client = client();
            for j in 0..25 {
                if (i + j) % 5 == 0 {
                    let option = if j % 2 == 0 { "verbose" } else { "quiet" };
                    let res = client
                        .post(format!("{base}/config"))
                        .body(format!(r#"{{"option":"{option}"}}"#))
                        .send()
                        .await
                        .unwrap();
                    assert_eq!(res.status(), StatusCode::OK);
                } else {
                    let res = client.get(format!("{base}/")).send().await.unwrap();
                    assert_eq!(res.status(), StatusCode::OK);
                    assert_eq!(res.text().await.unwrap(), r#"{"ok":true}"#);
                }
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    server.stop().await.unwrap();
}
