use super::*;
use crate::error::ValidationError;
use crate::protocol::PersonTypeFilter;
use crate::request::MockHttpClient;
use crate::session::{MemoryStorage, SessionStore, USER_KEY};
use crate::{User, UserRole};
use serde_json::json;

const BASE: &str = "http://api.test";

// =========================================================
// 辅助函数
// =========================================================

fn client<'a>(
    http: &'a MockHttpClient,
    storage: &'a MemoryStorage,
) -> ApiClient<&'a MockHttpClient, &'a MemoryStorage> {
    ApiClient::new(format!("{}/", BASE), http, storage)
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn summary_json(present: u32, absent: u32, justified: u32, status: &str) -> serde_json::Value {
    let reason = if status == "justified" {
        json!("Consulta médica")
    } else {
        json!(null)
    };
    json!({
        "items": [{
            "id": "a1",
            "participantId": "p1",
            "status": status,
            "justificationReason": reason,
            "participant": {"id": "p1", "fullName": "João"}
        }],
        "total": present + absent + justified,
        "present": present,
        "absent": absent,
        "justified": justified
    })
}

// =========================================================
// 通用行为
// =========================================================

#[tokio::test]
async fn test_bearer_token_attached_from_storage() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::with(&[(TOKEN_KEY, "tok-123")]);
    http.mock_response(HttpMethod::Get, &url("/classes"), 200, json!([]));

    let api = client(&http, &storage);
    api.list_classes().await.unwrap();

    let req = http.last_request().unwrap();
    assert_eq!(req.url, "http://api.test/classes");
    assert_eq!(
        req.headers.get(HEADER_AUTHORIZATION).map(String::as_str),
        Some("Bearer tok-123")
    );
    assert!(req.body.is_none());
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(HttpMethod::Get, &url("/classes"), 200, json!([]));

    client(&http, &storage).list_classes().await.unwrap();

    let req = http.last_request().unwrap();
    assert!(!req.headers.contains_key(HEADER_AUTHORIZATION));
}

#[tokio::test]
async fn test_token_is_read_per_request() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(HttpMethod::Get, &url("/classes"), 200, json!([]));
    let api = client(&http, &storage);

    api.list_classes().await.unwrap();
    storage.set(TOKEN_KEY, "late");
    api.list_classes().await.unwrap();

    let requests = http.requests.borrow();
    assert!(!requests[0].headers.contains_key(HEADER_AUTHORIZATION));
    assert_eq!(
        requests[1].headers.get(HEADER_AUTHORIZATION).map(String::as_str),
        Some("Bearer late")
    );
}

#[tokio::test]
async fn test_server_error_payload_surfaces_verbatim() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        401,
        json!({"error": "Usuário ou senha inválidos"}),
    );

    let err = client(&http, &storage).login("ana", "x").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 401,
            message: "Usuário ou senha inválidos".to_string()
        }
    );
}

#[tokio::test]
async fn test_transport_failure_is_generic() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_transport_failure(HttpMethod::Get, &url("/classes"));

    let err = client(&http, &storage).list_classes().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.message_or("Erro ao carregar"), "Erro ao carregar");
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_raw(HttpMethod::Get, &url("/classes"), 200, "{oops");

    let err = client(&http, &storage).list_classes().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// =========================================================
// 认证流程
// =========================================================

#[tokio::test]
async fn test_login_trims_username_and_session_roundtrip() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({
            "token": "jwt-1",
            "user": {"personId": "p1", "username": "ana", "role": "admin", "fullName": "Ana"}
        }),
    );

    let res = client(&http, &storage).login("  ana ", "abc12345").await.unwrap();
    let body: serde_json::Value =
        serde_json::from_str(http.last_request().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"username": "ana", "password": "abc12345"}));
    assert_eq!(res.user.role, UserRole::Admin);

    // 登录结果写入会话存储，之后的请求自动携带令牌
    let store = SessionStore::new(&storage);
    store.save(&res.token, &res.user).unwrap();
    assert!(storage.contains(USER_KEY));

    http.mock_response(HttpMethod::Get, &url("/classes"), 200, json!([]));
    client(&http, &storage).list_classes().await.unwrap();
    assert_eq!(
        http.last_request()
            .unwrap()
            .headers
            .get(HEADER_AUTHORIZATION)
            .map(String::as_str),
        Some("Bearer jwt-1")
    );

    // 登出后令牌不再发送
    store.clear();
    assert_eq!(SessionStore::new(&storage).restore().unwrap(), None::<User>);
    client(&http, &storage).list_classes().await.unwrap();
    assert!(
        !http
            .last_request()
            .unwrap()
            .headers
            .contains_key(HEADER_AUTHORIZATION)
    );
}

#[tokio::test]
async fn test_forgot_password_accepts_empty_ack() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_raw(HttpMethod::Post, &url("/auth/forgot-password"), 204, "");

    client(&http, &storage)
        .forgot_password(" ana@example.com ")
        .await
        .unwrap();

    let body: serde_json::Value =
        serde_json::from_str(http.last_request().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"usernameOrEmail": "ana@example.com"}));
}

#[tokio::test]
async fn test_reset_password_body() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(HttpMethod::Post, &url("/auth/reset-password"), 200, json!({"ok": true}));

    client(&http, &storage)
        .reset_password("t0k", "abc12345")
        .await
        .unwrap();

    let body: serde_json::Value =
        serde_json::from_str(http.last_request().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"token": "t0k", "newPassword": "abc12345"}));
}

// =========================================================
// 班级与点名
// =========================================================

#[tokio::test]
async fn test_list_classes_scenario() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(
        HttpMethod::Get,
        &url("/classes"),
        200,
        json!([{
            "id": "c1", "name": "Turma A", "dayOfWeek": 1, "startTime": "08:00",
            "endTime": null, "status": "active", "owner": {"fullName": "Ana"}
        }]),
    );

    let classes = client(&http, &storage).list_classes().await.unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name, "Turma A");
    assert_eq!(classes[0].schedule_label("–"), "Seg 08:00");
    assert_eq!(classes[0].owner.full_name, "Ana");
}

#[tokio::test]
async fn test_find_class_filters_by_id() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(
        HttpMethod::Get,
        &url("/classes"),
        200,
        json!([
            {"id": "c1", "name": "A", "dayOfWeek": 1, "startTime": "08:00", "status": "active", "owner": {"fullName": "Ana"}},
            {"id": "c2", "name": "B", "dayOfWeek": 3, "startTime": "19:00", "endTime": "21:00", "status": "active", "owner": {"fullName": "Bia"}}
        ]),
    );
    let api = client(&http, &storage);

    let found = api.find_class("c2").await.unwrap().unwrap();
    assert_eq!(found.name, "B");
    assert!(api.find_class("c9").await.unwrap().is_none());
}

#[tokio::test]
async fn test_open_chamada_opens_then_reads_attendance() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    let session = json!({
        "id": "s1",
        "sessionDate": "2024-03-05",
        "members": [{"id": "p1", "fullName": "João", "email": null, "phone": null}]
    });
    http.mock_response(HttpMethod::Post, &url("/classes/c1/sessions/open"), 200, session);
    http.mock_response(
        HttpMethod::Get,
        &url("/sessions/s1/attendance"),
        200,
        summary_json(1, 0, 0, "present"),
    );
    let api = client(&http, &storage);
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

    let (first, summary) = api.open_chamada("c1", date).await.unwrap();
    assert_eq!(first.members.len(), 1);
    assert_eq!(summary.present, 1);

    // 同一天重复打开：服务端保证幂等，客户端得到相同的成员列表
    let (second, _) = api.open_chamada("c1", date).await.unwrap();
    assert_eq!(first, second);

    let requests = http.requests.borrow();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].body.as_deref(), Some(r#"{"date":"2024-03-05"}"#));
    assert_eq!(requests[1].url, url("/sessions/s1/attendance"));
}

#[tokio::test]
async fn test_open_chamada_error_message() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(
        HttpMethod::Post,
        &url("/classes/c1/sessions/open"),
        409,
        json!({"error": "Turma inativa"}),
    );

    let err = client(&http, &storage)
        .open_chamada("c1", NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.message_or("Erro ao abrir chamada"), "Turma inativa");
    // 打开失败时不读取出勤
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn test_record_attendance_writes_then_refetches_once() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(HttpMethod::Put, &url("/sessions/s1/attendance"), 200, json!({}));
    http.mock_response(
        HttpMethod::Get,
        &url("/sessions/s1/attendance"),
        200,
        summary_json(0, 1, 0, "absent"),
    );

    let summary = client(&http, &storage)
        .record_attendance("s1", "p1", AttendanceStatus::Absent, Some("ignored"))
        .await
        .unwrap();
    assert_eq!(summary.absent, 1);

    let requests = http.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, HttpMethod::Put);
    assert_eq!(
        requests[0].body.as_deref(),
        Some(r#"{"participantId":"p1","status":"absent"}"#)
    );
    assert_eq!(requests[1].method, HttpMethod::Get);
}

#[tokio::test]
async fn test_justified_with_short_reason_never_hits_network() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    let api = client(&http, &storage);

    let err = api
        .record_attendance("s1", "p1", AttendanceStatus::Justified, Some(" ab "))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Invalid(ValidationError::ReasonTooShort));

    let err = api
        .record_attendance("s1", "p1", AttendanceStatus::Justified, None)
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Invalid(ValidationError::ReasonTooShort));
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn test_justified_with_reason_refetch_reflects_status() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(HttpMethod::Put, &url("/sessions/s1/attendance"), 200, json!({}));
    http.mock_response(
        HttpMethod::Get,
        &url("/sessions/s1/attendance"),
        200,
        summary_json(0, 0, 1, "justified"),
    );

    let summary = client(&http, &storage)
        .record_attendance("s1", "p1", AttendanceStatus::Justified, Some("Consulta médica"))
        .await
        .unwrap();
    assert_eq!(summary.items[0].status, AttendanceStatus::Justified);
    assert_eq!(summary.justified, 1);

    let body: serde_json::Value =
        serde_json::from_str(http.requests.borrow()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["justificationReason"], json!("Consulta médica"));
}

#[tokio::test]
async fn test_failed_update_skips_refetch() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(
        HttpMethod::Put,
        &url("/sessions/s1/attendance"),
        400,
        json!({"error": "Sessão encerrada"}),
    );

    let err = client(&http, &storage)
        .record_attendance("s1", "p1", AttendanceStatus::Present, None)
        .await
        .unwrap_err();
    assert_eq!(err.server_message(), Some("Sessão encerrada"));
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn test_attendance_counts_scenario() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(
        HttpMethod::Get,
        &url("/sessions/s9/attendance"),
        200,
        json!({"items": [], "total": 4, "present": 3, "absent": 1, "justified": 0}),
    );

    let summary = client(&http, &storage).attendance("s9").await.unwrap();
    assert_eq!(
        (summary.present, summary.absent, summary.justified, summary.total),
        (3, 1, 0, 4)
    );
}

// =========================================================
// 人员
// =========================================================

#[tokio::test]
async fn test_people_search_query() {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    http.mock_response(HttpMethod::Get, &url("/people?q=joao"), 200, json!([]));

    let filter = PeopleFilter {
        person_type: PersonTypeFilter::All,
        query: "joao".to_string(),
    };
    let people = client(&http, &storage).list_people(&filter).await.unwrap();
    assert!(people.is_empty());
    assert_eq!(http.last_request().unwrap().url, url("/people?q=joao"));
}
