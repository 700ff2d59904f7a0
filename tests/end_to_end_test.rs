use jhttp::JhttpError;
use jhttp::http::Client;
use jhttp::parser;
use jhttp::runner::{ExecutionSummary, RequestExecutor};
use jhttp::variable::{ConfigLoader, VariableContext};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor() -> RequestExecutor {
    RequestExecutor::new(Client::new().unwrap()).with_delay(Duration::ZERO)
}

/// 测试完整 HTTP 文件解析和执行流程
#[tokio::test]
async fn test_http_file_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": [
                {"id": 1, "name": "Alice"},
                {"id": 2, "name": "Bob"}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({"name": "Carol"})))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let http_file = temp_dir.path().join("users.http");
    let content = format!(
        r#"
@base = {}

### Get Users
GET {{{{base}}}}/api/users
Accept: application/json

### Create User
POST {{{{base}}}}/api/users
Content-Type: application/json

{{"name": "Carol"}}
"#,
        mock_server.uri()
    );
    fs::write(&http_file, content).unwrap();

    let parsed = parser::parse_file(&http_file).unwrap();
    assert_eq!(parsed.requests.len(), 2);

    let results = executor().execute_file(&parsed, None, "").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].request_number, 1);
    assert_eq!(results[0].name.as_deref(), Some("Get Users"));
    assert_eq!(results[0].status, Some(200));
    assert!(results[0].success);
    assert!(
        results[0]
            .response
            .as_ref()
            .unwrap()
            .text()
            .contains("Alice")
    );
    assert_eq!(results[1].status, Some(201));
    assert!(results[1].success);

    let summary = ExecutionSummary::from_results(&results);
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.errors, 0);
}

/// 只执行指定名称的请求
#[tokio::test]
async fn test_execute_named_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/items/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let content = format!(
        "### List\nGET {uri}/items\n\n### Remove\nDELETE {uri}/items/7\n",
        uri = mock_server.uri()
    );
    let parsed = parser::parse_content(&content).unwrap();

    let results = executor()
        .execute_file(&parsed, Some("Remove"), "")
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].request_number, 2);
    assert_eq!(results[0].method, "DELETE");
    assert_eq!(results[0].status, Some(204));
}

#[tokio::test]
async fn test_unknown_request_name() {
    let parsed = parser::parse_content("### Only\nGET http://localhost/\n").unwrap();

    let err = executor()
        .execute_file(&parsed, Some("Missing"), "")
        .await
        .unwrap_err();

    assert!(matches!(err, JhttpError::RequestNotFound(ref name) if name == "Missing"));
}

/// 环境变量优先于全局变量
#[tokio::test]
async fn test_environment_variables_used_for_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer env-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let env_path = temp_dir.path().join("http-client.env.json");
    fs::write(
        &env_path,
        format!(
            r#"{{"dev": {{"host": "{}", "token": "env-token"}}}}"#,
            mock_server.uri()
        ),
    )
    .unwrap();

    let mut parsed = parser::parse_content(
        "@host = http://unused.invalid\n@token = global-token\n\nGET {{host}}/me\nAuthorization: Bearer {{token}}\n",
    )
    .unwrap();
    parsed.merge_environment("dev", ConfigLoader::load_environment(&env_path, "dev").unwrap());

    let results = executor().execute_file(&parsed, None, "dev").await.unwrap();

    assert_eq!(results[0].status, Some(200));
    assert!(results[0].unresolved.is_empty());
}

/// 单个请求失败不影响后续请求
#[tokio::test]
async fn test_failure_is_scoped_to_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut parsed = parser::parse_content(&format!(
        "### Broken\nGET {{{{host}}}}/ok\n\n### Fine\nGET {}/ok\n",
        mock_server.uri()
    ))
    .unwrap();
    // 替换后得到的 URL 结构不合法
    let mut env = VariableContext::new();
    env.insert("host", "http://[::1");
    parsed.merge_environment("dev", env);

    let results = executor().execute_file(&parsed, None, "dev").await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_error());
    assert!(results[0].status.is_none());
    assert!(results[1].success);

    let summary = ExecutionSummary::from_results(&results);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.passed, 1);
}

#[tokio::test]
async fn test_unresolved_variable_is_reported() {
    let parsed = parser::parse_content("GET {{host}}/users\n").unwrap();

    let results = executor().execute_file(&parsed, None, "").await.unwrap();

    assert!(results[0].is_error());
    assert_eq!(results[0].unresolved, vec!["host".to_string()]);
    assert_eq!(results[0].url, "{{host}}/users");
}

#[tokio::test]
async fn test_server_error_is_not_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let parsed = parser::parse_content(&format!("GET {}/fail\n", mock_server.uri())).unwrap();
    let results = executor().execute_file(&parsed, None, "").await.unwrap();

    assert_eq!(results[0].status, Some(500));
    assert!(!results[0].success);
    assert!(!results[0].is_error());
}

#[tokio::test]
async fn test_connection_refused() {
    // 先占用一个端口再释放，保证没有监听
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let parsed = parser::parse_content(&format!("GET http://127.0.0.1:{}/\n", port)).unwrap();
    let results = executor().execute_file(&parsed, None, "").await.unwrap();

    assert!(results[0].is_error());
    assert!(results[0].error.as_ref().unwrap().contains("127.0.0.1"));
}

/// 二进制响应体按原始字节保存
#[tokio::test]
async fn test_binary_response_body_is_preserved() {
    let mock_server = MockServer::start().await;
    let payload: Vec<u8> = vec![137, 80, 78, 71, 255, 0, 254];

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&mock_server)
        .await;

    let parsed =
        parser::parse_content(&format!("GET {}/logo.png\n", mock_server.uri())).unwrap();
    let results = executor().execute_file(&parsed, None, "").await.unwrap();

    assert_eq!(results[0].response.as_ref().unwrap().body, payload);
}
