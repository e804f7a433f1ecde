use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use veille::{
    config::AppConfig,
    server::{router, AppState, REPORT_ID_HEADER},
};

const BOUNDARY: &str = "veille-test-boundary";
const UPLOAD: &str = include_str!("data/upload.csv");

fn app() -> Router {
    router(AppState::new(AppConfig::default()))
}

fn multipart_body(field: &str, content: &str) -> Body {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"mentions.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Body::from(body)
}

fn upload_request(uri: &str, field: &str, content: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_body(field, content))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn json_body(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn generate_report_returns_html_document() {
    let response = app()
        .oneshot(upload_request("/generate-report", "file", UPLOAD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REPORT_ID_HEADER));
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("<strong>6</strong>Total mentions"));
    assert!(html.contains("2022-12"));
    assert!(html.contains("2023-02"));
    assert!(html.contains("Les Echos"));
}

#[tokio::test]
async fn api_report_applies_query_filters() {
    let response = app()
        .oneshot(upload_request(
            "/api/report?granularity=year&from_year=2023&to_year=2023&authors=Les%20Echos",
            "file",
            UPLOAD,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report_id = response.headers()[REPORT_ID_HEADER].to_str().unwrap().to_string();
    assert_eq!(report_id.len(), 36);

    let report = json_body(response).await;
    assert_eq!(report["kpis"]["totalMentions"], 2);
    assert_eq!(report["kpis"]["negative"], 1);
    assert_eq!(report["kpis"]["positive"], 0);
    assert_eq!(report["granularity"], "year");

    let timeline = report["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0]["periodLabel"], "2023");
    assert_eq!(timeline[0]["count"], 2);

    let authors = report["authorMentions"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["author"], "Les Echos");
}

#[tokio::test]
async fn api_report_keeps_undated_rows_on_request() {
    let response = app()
        .oneshot(upload_request(
            "/api/report?from_year=2023&to_year=2023&keep_undated=true",
            "file",
            UPLOAD,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    // four 2023 rows plus the undated one
    assert_eq!(report["kpis"]["totalMentions"], 5);
}

#[tokio::test]
async fn unknown_granularity_is_a_bad_request() {
    let response = app()
        .oneshot(upload_request("/api/report?granularity=hourly", "file", UPLOAD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn missing_required_columns_are_unprocessable() {
    let response = app()
        .oneshot(upload_request(
            "/generate-report",
            "file",
            "articleCreatedDate,authorName,articleBody\n2023-01-01,A,text\n",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = json_body(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("sentimentHumanReadable"));
    assert!(error.contains("articleTitle"));
}

#[tokio::test]
async fn missing_file_field_is_a_bad_request() {
    let response = app()
        .oneshot(upload_request("/api/report", "attachment", UPLOAD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("'file'"));
}

const COMMA_AUTHORS: &str = "articleCreatedDate,authorName,sentimentHumanReadable,articleTitle\n\
2023-03-01,\"Dupont, Jean\",positive,Conseil municipal\n\
2023-03-02,Martin,negative,Budget voté\n\
2023-03-03,\"Dupont, Jean\",neutral,Travaux annoncés\n";

#[tokio::test]
async fn repeated_author_params_select_names_containing_commas() {
    let response = app()
        .oneshot(upload_request(
            "/api/report?author=Dupont%2C%20Jean",
            "file",
            COMMA_AUTHORS,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert_eq!(report["kpis"]["totalMentions"], 2);
    let authors = report["authorMentions"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["author"], "Dupont, Jean");

    let response = app()
        .oneshot(upload_request(
            "/api/report?author=Dupont%2C%20Jean&author=Martin",
            "file",
            COMMA_AUTHORS,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["kpis"]["totalMentions"], 3);
}

#[tokio::test]
async fn far_future_dates_do_not_break_weekly_reports() {
    let upload = "articleCreatedDate,authorName,sentimentHumanReadable,articleTitle\n\
+262142-12-31,Le Monde,positive,Titre lointain\n\
2023-01-05,Le Monde,negative,Titre proche\n";

    let response = app()
        .oneshot(upload_request(
            "/api/report?granularity=week&zero_fill=true",
            "file",
            upload,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert_eq!(report["kpis"]["totalMentions"], 2);
    let timeline = report["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0]["periodLabel"], "2023-01-02/2023-01-08");
}

#[tokio::test]
async fn zero_fill_over_wide_span_keeps_observed_periods() {
    let upload = "articleCreatedDate,authorName,sentimentHumanReadable,articleTitle\n\
1700-01-01,Le Monde,positive,Ancien titre\n\
2250-12-31,Le Monde,negative,Futur titre\n";

    let response = app()
        .oneshot(upload_request(
            "/api/report?granularity=day&zero_fill=true",
            "file",
            upload,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert_eq!(report["timeline"].as_array().unwrap().len(), 2);
}
