use scaffolder_azure::{
    ActionError,
    adapter::azure_devops::AzureDevOpsClientFactory,
    domain::{credential::OrgAuth, repository::PullRequestSpec},
    port::pull_request::PullRequestClientFactory
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle
};

/// Serve a single HTTP response and hand back the raw request
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_string()))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        String::from_utf8_lossy(&request).to_string()
    });

    (addr, handle)
}

fn local_factory() -> AzureDevOpsClientFactory {
    AzureDevOpsClientFactory::with_client(reqwest::Client::builder().no_proxy().build().unwrap(), "http")
}

fn auth() -> OrgAuth {
    OrgAuth { org: "contoso".to_string(), token: "pat".to_string() }
}

#[tokio::test]
async fn test_create_pull_request_posts_spec() {
    let (addr, server) =
        serve_once("201 Created", r#"{"pullRequestId": 42, "url": "https://dev.azure.com/pr/42", "status": "active"}"#)
            .await;

    let client = local_factory().connect(&addr, &auth()).unwrap();
    let created = client
        .create_pull_request(&PullRequestSpec::new("scaffolder", "main", "Add feature"), "repo-1", Some("Platform"), Some(true))
        .await
        .unwrap();

    assert_eq!(created.pull_request_id, 42);
    assert_eq!(created.url.as_deref(), Some("https://dev.azure.com/pr/42"));

    let request = server.await.unwrap();
    let (head, body) = request.split_once("\r\n\r\n").unwrap();
    assert!(head.starts_with(
        "POST /contoso/Platform/_apis/git/repositories/repo-1/pullrequests?api-version=7.1&supportsIterations=true "
    ));
    // base64 of ":pat"
    assert!(head.lines().any(|l| l.eq_ignore_ascii_case("authorization: Basic OnBhdA==")));

    let body: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(body["sourceRefName"], "refs/heads/scaffolder");
    assert_eq!(body["targetRefName"], "refs/heads/main");
    assert_eq!(body["title"], "Add feature");
}

#[tokio::test]
async fn test_rejected_pull_request_reports_status_and_body() {
    let (addr, server) = serve_once("409 Conflict", r#"{"message": "An active pull request already exists"}"#).await;

    let client = local_factory().connect(&addr, &auth()).unwrap();
    let err = client
        .create_pull_request(&PullRequestSpec::new("scaffolder", "main", "Add feature"), "repo-1", None, None)
        .await
        .unwrap_err();

    let ActionError::Operation(message) = err else {
        panic!("expected an operation error");
    };
    assert!(message.contains("409"));
    assert!(message.contains("already exists"));

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /contoso/_apis/git/repositories/repo-1/pullrequests?api-version=7.1 "));
}

#[tokio::test]
async fn test_unparsable_response_is_an_operation_error() {
    let (addr, _server) = serve_once("200 OK", "not json").await;

    let client = local_factory().connect(&addr, &auth()).unwrap();
    let err = client
        .create_pull_request(&PullRequestSpec::new("scaffolder", "main", "Add feature"), "repo-1", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::Operation(_)));
}
