//! HTTP-level tests driving the full router with `oneshot`.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{new_job_post, TestApp, STRONG_PASSWORD};
use skillbridge::domain::{ProfileVisibility, Role};
use skillbridge::services::{ServiceContainer, Submission};

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(router: Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.unwrap()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: Method, uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_root_and_health() {
    let app = TestApp::new();

    let response = send(app.router(), get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&text[..], b"SkillBridge API");

    let response = send(app.router(), get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_reports_degraded_dependency() {
    let app = TestApp::new();

    let response = send(app.router_with(true, false), get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["redis"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();

    let response = send(app.router(), get("/auth/me", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::new();

    let response = send(
        app.router(),
        get("/jobseeker/profile", Some("Bearer not-a-jwt")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_role_gates() {
    let app = TestApp::new();
    let seeker = app.seed_user(Role::JobSeeker, "amaya@uom.ac.lk").await;
    let employer = app.seed_user(Role::Employer, "hr@acme.lk").await;

    let response = send(
        app.router(),
        get("/jobseeker/profile", Some(&app.bearer(&employer))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        app.router(),
        get("/admin/overview", Some(&app.bearer(&seeker))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        app.router(),
        get("/jobseeker/profile", Some(&app.bearer(&seeker))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["university"], "University of Moratuwa");
}

#[tokio::test]
async fn test_signin_over_http() {
    let app = TestApp::new();
    let seeker = app.seed_user(Role::JobSeeker, "amaya@uom.ac.lk").await;

    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/auth/signin",
            None,
            json!({ "email": "amaya@uom.ac.lk", "password": STRONG_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["data"]["token"]["access_token"].as_str().unwrap();
    assert_eq!(app.tokens.verify(token).unwrap(), seeker.id);

    let response = send(
        app.router(),
        get("/auth/me", Some(&format!("Bearer {}", token))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email"], "amaya@uom.ac.lk");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.seed_user(Role::JobSeeker, "amaya@uom.ac.lk").await;

    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/auth/signin",
            None,
            json!({ "email": "amaya@uom.ac.lk", "password": "Wrong!Pass1" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_rate_limited_requests_get_429() {
    let app = TestApp::new();

    let response = send(
        app.router_with(false, true),
        send_json(
            Method::POST,
            "/auth/signin",
            None,
            json!({ "email": "amaya@uom.ac.lk", "password": STRONG_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    assert_eq!(body_json(response).await["code"], "RATE_LIMITED");

    // Health stays outside the limiter
    let response = send(app.router_with(false, true), get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_post_lifecycle_over_http() {
    let app = TestApp::new();
    let employer = app.seed_user(Role::Employer, "hr@acme.lk").await;
    let admin = app.seed_user(Role::Admin, "admin@skillbridge.lk").await;

    let draft = new_job_post("Platform Intern");
    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/jobposts",
            Some(&app.bearer(&employer)),
            json!({
                "title": draft.title,
                "description": draft.description,
                "experienceLevel": "Entry Level",
                "workArrangement": "Remote",
                "deadline": draft.deadline.to_rfc3339(),
                "tags": ["platform"],
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["status"], "Draft");
    assert_eq!(created["data"]["isApproved"], false);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = send(app.router(), get("/jobposts", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["meta"]["total"], 0);

    let detail = format!("/jobposts/{}", id);
    let response = send(app.router(), get(&detail, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(app.router(), get(&detail, Some(&app.bearer(&employer)))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["viewCount"], 0);

    let response = send(
        app.router(),
        send_json(
            Method::PATCH,
            &format!("/admin/job-posts/{}/approve", id),
            Some(&app.bearer(&admin)),
            json!({}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(app.router(), get("/jobposts", None)).await;
    let board = body_json(response).await;
    assert_eq!(board["data"]["meta"]["total"], 1);
    assert_eq!(board["data"]["data"][0]["id"], id.as_str());

    let response = send(app.router(), get(&format!("/jobposts/{}", id), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["viewCount"], 1);
}

#[tokio::test]
async fn test_job_seekers_cannot_create_posts() {
    let app = TestApp::new();
    let seeker = app.seed_user(Role::JobSeeker, "amaya@uom.ac.lk").await;

    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/jobposts",
            Some(&app.bearer(&seeker)),
            json!({ "title": "Nope" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_multipart_application_submission() {
    let app = TestApp::new();
    let employer = app.seed_user(Role::Employer, "hr@acme.lk").await;
    let admin = app.seed_user(Role::Admin, "admin@skillbridge.lk").await;
    let seeker = app.seed_user(Role::JobSeeker, "amaya@uom.ac.lk").await;
    app.give_resume(&seeker).await;

    let post = app
        .services
        .job_posts()
        .create(&employer, new_job_post("Backend Intern"))
        .await
        .unwrap();
    app.services
        .admin()
        .approve_job_post(&admin, post.id)
        .await
        .unwrap();

    let boundary = "skillbridge-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"jobPostId\"\r\n\r\n{id}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"useProfileResume\"\r\n\r\ntrue\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"notes\"\r\n\r\nKeen to join\r\n\
         --{b}--\r\n",
        b = boundary,
        id = post.id
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/applications")
        .header(header::AUTHORIZATION, app.bearer(&seeker))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = send(app.router(), request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["status"], "Applied");
    assert_eq!(created["data"]["notes"], "Keen to join");

    let response = send(
        app.router(),
        get("/jobseeker/applications", Some(&app.bearer(&seeker))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let mine = body_json(response).await;
    assert_eq!(mine["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_catalog_reads_are_public_and_writes_are_admin_only() {
    let app = TestApp::new();
    let employer = app.seed_user(Role::Employer, "hr@acme.lk").await;
    let admin = app.seed_user(Role::Admin, "admin@skillbridge.lk").await;
    app.store().add_city("Colombo");

    let response = send(app.router(), get("/catalog/cities", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"][0]["name"], "Colombo");

    let category = json!({ "name": "Software Engineering" });
    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/catalog/categories",
            Some(&app.bearer(&employer)),
            category.clone(),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/catalog/categories",
            Some(&app.bearer(&admin)),
            category,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(app.router(), get("/catalog/categories", None)).await;
    assert_eq!(
        body_json(response).await["data"][0]["name"],
        "Software Engineering"
    );
}

#[tokio::test]
async fn test_category_get_rename_and_delete() {
    let app = TestApp::new();
    let admin = app.seed_user(Role::Admin, "admin@skillbridge.lk").await;
    let token = app.bearer(&admin);

    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/catalog/categories",
            Some(&token),
            json!({ "name": "Design" }),
        ),
    )
    .await;
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/catalog/categories/{}", id);

    let response = send(app.router(), get(&uri, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Design");

    let response = send(
        app.router(),
        send_json(
            Method::PUT,
            &uri,
            Some(&token),
            json!({ "name": " UI/UX Design ", "description": "Product and interface" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let renamed = body_json(response).await;
    assert_eq!(renamed["data"]["name"], "UI/UX Design");
    assert_eq!(renamed["data"]["id"], id.as_str());

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(&uri)
        .header(header::AUTHORIZATION, &token)
        .body(Body::empty())
        .unwrap();
    let response = send(app.router(), request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(app.router(), get(&uri, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_changes_need_an_admin() {
    let app = TestApp::new();
    let employer = app.seed_user(Role::Employer, "hr@acme.lk").await;

    let uri = format!("/catalog/categories/{}", uuid::Uuid::new_v4());
    let response = send(
        app.router(),
        send_json(
            Method::PUT,
            &uri,
            Some(&app.bearer(&employer)),
            json!({ "name": "Hijacked" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_feedback_is_shared_between_author_and_candidate_only() {
    let app = TestApp::new();
    let employer = app.seed_user(Role::Employer, "hr@acme.lk").await;
    let seeker = app.seed_user(Role::JobSeeker, "amaya@uom.ac.lk").await;
    let bystander = app.seed_user(Role::JobSeeker, "nimal@uom.ac.lk").await;
    let seeker_id = app.store().seeker_id(seeker.id).unwrap();

    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/employer/candidate-feedback",
            Some(&app.bearer(&employer)),
            json!({
                "jobSeekerId": seeker_id,
                "jobTitle": "Backend Intern",
                "rating": 5,
                "feedback": "Shipped the payments API ahead of schedule",
                "skills": ["Rust", "rust", "SQL"],
                "wouldRecommend": true,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["message"], "Feedback added successfully");
    assert_eq!(created["data"]["skills"], json!(["Rust", "SQL"]));
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = send(
        app.router(),
        get("/jobseeker/feedbacks", Some(&app.bearer(&seeker))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let received = body_json(response).await;
    assert_eq!(received["data"][0]["id"], id.as_str());
    assert_eq!(received["data"][0]["employer"]["companyName"], "Acme Labs");

    let response = send(
        app.router(),
        get(
            &format!("/employer/feedbacks/{}", id),
            Some(&app.bearer(&employer)),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["jobSeeker"]["email"],
        "amaya@uom.ac.lk"
    );

    let response = send(
        app.router(),
        get(
            &format!("/jobseeker/feedbacks/{}", id),
            Some(&app.bearer(&bystander)),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feedback_rating_must_be_one_to_five() {
    let app = TestApp::new();
    let employer = app.seed_user(Role::Employer, "hr@acme.lk").await;
    let seeker = app.seed_user(Role::JobSeeker, "amaya@uom.ac.lk").await;
    let seeker_id = app.store().seeker_id(seeker.id).unwrap();

    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/employer/candidate-feedback",
            Some(&app.bearer(&employer)),
            json!({
                "jobSeekerId": seeker_id,
                "jobTitle": "Backend Intern",
                "rating": 6,
                "feedback": "Great",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_professionals_directory_hides_private_profiles_and_emails() {
    let app = TestApp::new();
    app.seed_user(Role::JobSeeker, "amaya@uom.ac.lk").await;
    let hidden = app.seed_user(Role::JobSeeker, "nimal@uom.ac.lk").await;
    app.store().set_visibility(hidden.id, ProfileVisibility::Private);

    let response = send(app.router(), get("/professionals", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["meta"]["total"], 1);
    let card = &body["data"]["data"][0];
    assert_eq!(card["university"], "University of Moratuwa");
    assert!(card.get("email").is_none());
}

#[tokio::test]
async fn test_admin_reports_over_http() {
    let app = TestApp::new();
    let employer = app.seed_user(Role::Employer, "hr@acme.lk").await;
    let admin = app.seed_user(Role::Admin, "admin@skillbridge.lk").await;
    let seeker = app.seed_user(Role::JobSeeker, "amaya@uom.ac.lk").await;
    app.give_resume(&seeker).await;

    let post = app
        .services
        .job_posts()
        .create(&employer, new_job_post("Backend Intern"))
        .await
        .unwrap();
    app.services
        .admin()
        .approve_job_post(&admin, post.id)
        .await
        .unwrap();
    app.services
        .applications()
        .submit(
            &seeker,
            Submission {
                job_post_id: post.id,
                use_profile_resume: true,
                resume: None,
                cover_letter: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let token = app.bearer(&admin);
    let response = send(
        app.router(),
        get("/admin/reports/jobs?dateRange=last30days&status=all", Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let jobs = body_json(response).await;
    assert_eq!(jobs["data"]["totals"]["totalJobs"], 1);
    assert_eq!(jobs["data"]["jobPostMetrics"][0]["appliedCount"], 1);
    assert_eq!(jobs["data"]["jobPostMetrics"][0]["employerName"], "Acme Labs");

    let response = send(
        app.router(),
        get("/admin/reports/applications?searchTerm=BACKEND", Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["data"]["stats"]["totalApplications"], 1);
    assert_eq!(report["data"]["applications"][0]["jobTitle"], "Backend Intern");

    let response = send(
        app.router(),
        get("/admin/reports/applications?searchTerm=frontend", Some(&token)),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["stats"]["totalApplications"], 0);

    let response = send(
        app.router(),
        get("/admin/reports/jobs?dateRange=yesterday", Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_updates_another_admins_credentials() {
    let app = TestApp::new();
    let admin = app.seed_user(Role::Admin, "admin@skillbridge.lk").await;
    let other = app.seed_user(Role::Admin, "ops@skillbridge.lk").await;
    let employer = app.seed_user(Role::Employer, "hr@acme.lk").await;
    let token = app.bearer(&admin);

    let response = send(
        app.router(),
        send_json(
            Method::PATCH,
            &format!("/admin/users/admins/{}/email", other.id),
            Some(&token),
            json!({ "email": "Support@SkillBridge.lk" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email"], "support@skillbridge.lk");

    let response = send(
        app.router(),
        send_json(
            Method::PATCH,
            &format!("/admin/users/admins/{}/email", other.id),
            Some(&token),
            json!({ "email": "hr@acme.lk" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        app.router(),
        send_json(
            Method::PATCH,
            &format!("/admin/users/admins/{}/password", other.id),
            Some(&token),
            json!({ "newPassword": "An0ther!Pass" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        app.router(),
        send_json(
            Method::POST,
            "/auth/signin",
            None,
            json!({ "email": "support@skillbridge.lk", "password": "An0ther!Pass" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        app.router(),
        send_json(
            Method::PATCH,
            &format!("/admin/users/admins/{}/password", employer.id),
            Some(&token),
            json!({ "newPassword": "An0ther!Pass" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new();

    let response = send(app.router(), get("/api-docs/openapi.json", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert_eq!(doc["info"]["title"], "SkillBridge API");
}
