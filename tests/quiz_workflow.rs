//! 端到端测验流程
//!
//! 使用真实路由、内存 SQLite 与 Moka 缓存驱动完整的出题、作答、评分与发布流程。

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use rust_quizhub::cache::ObjectCache;
use rust_quizhub::cache::object_cache::MokaCacheWrapper;
use rust_quizhub::models::users::entities::{User, UserRole};
use rust_quizhub::models::users::requests::CreateUserRequest;
use rust_quizhub::routes;
use rust_quizhub::storage::Storage;
use rust_quizhub::storage::sea_orm_storage::SeaOrmStorage;
use rust_quizhub::utils::password::hash_password;
use rust_quizhub::utils::{json_error_handler, path_error_handler, query_error_handler};

struct Fixture {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
}

impl Fixture {
    async fn new() -> Self {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(
            1_000,
            Duration::from_secs(60),
        ));
        Self { storage, cache }
    }

    async fn user(&self, username: &str, role: UserRole, password: &str) -> User {
        self.storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: hash_password(password).unwrap(),
                role,
                display_name: None,
            })
            .await
            .unwrap()
    }
}

macro_rules! init_app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::PathConfig::default().error_handler(path_error_handler))
                .app_data(web::Data::new($fixture.storage.clone()))
                .app_data(web::Data::new($fixture.cache.clone()))
                .configure(routes::configure_api_routes),
        )
        .await
    };
}

/// 发送请求，返回状态码与 JSON 响应体
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }};
}

fn bearer(user: &User) -> (&'static str, String) {
    (
        "Authorization",
        format!("Bearer {}", user.generate_access_token().unwrap()),
    )
}

fn get(user: &User, uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri).insert_header(bearer(user))
}

fn post(user: &User, uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(user))
        .set_json(body)
}

fn put(user: &User, uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::put()
        .uri(uri)
        .insert_header(bearer(user))
        .set_json(body)
}

struct Classroom {
    teacher: User,
    student: User,
    group_id: i64,
    quiz_id: i64,
    correct_option: i64,
    wrong_option: i64,
}

/// 建课、分组、出一道单选题（A 正确）并发布
async fn published_quiz<S>(app: &S, fixture: &Fixture, quiz_flags: Value) -> Classroom
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let teacher = fixture.user("teacher01", UserRole::Instructor, "Passw0rd!").await;
    let student = fixture.user("student01", UserRole::Student, "Passw0rd!").await;

    let (status, body) = send!(
        *app,
        post(
            &teacher,
            "/api/courses",
            json!({"code": "CS101", "title": "Intro to Rust", "academic_year": "2025-2026"}),
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();

    let (status, body) = send!(
        *app,
        post(
            &teacher,
            &format!("/api/courses/{course_id}/groups"),
            json!({"name": "Group A"}),
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let group_id = body["data"]["group"]["id"].as_i64().unwrap();

    let (status, _) = send!(
        *app,
        post(
            &teacher,
            &format!("/api/groups/{group_id}/members"),
            json!({"user_id": student.id}),
        )
    );
    assert_eq!(status, StatusCode::CREATED);

    let mut quiz = json!({"course_id": course_id, "title": "Week 1"});
    if let (Some(target), Some(flags)) = (quiz.as_object_mut(), quiz_flags.as_object()) {
        target.extend(flags.clone());
    }
    let (status, body) = send!(*app, post(&teacher, "/api/quizzes", quiz));
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let quiz_id = body["data"]["quiz"]["id"].as_i64().unwrap();

    let (status, body) = send!(
        *app,
        post(
            &teacher,
            &format!("/api/quizzes/{quiz_id}/questions"),
            json!({
                "text": "Which keyword declares an immutable binding?",
                "points": 2.0,
                "question_type": "multiple_choice",
                "options": [
                    {"text": "let", "is_correct": true},
                    {"text": "var", "is_correct": false}
                ]
            }),
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let options = body["data"]["question"]["options"].as_array().unwrap();
    let correct_option = options[0]["id"].as_i64().unwrap();
    let wrong_option = options[1]["id"].as_i64().unwrap();

    let (status, _) = send!(
        *app,
        put(
            &teacher,
            &format!("/api/quizzes/{quiz_id}/groups"),
            json!({"group_ids": [group_id]}),
        )
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        *app,
        post(&teacher, &format!("/api/quizzes/{quiz_id}/publish"), json!({}))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["quiz"]["status"], "published");

    Classroom {
        teacher,
        student,
        group_id,
        quiz_id,
        correct_option,
        wrong_option,
    }
}

/// 追加一道题目，返回题目 ID
async fn add_question<S>(app: &S, teacher: &User, quiz_id: i64, question: Value) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = send!(
        *app,
        post(teacher, &format!("/api/quizzes/{quiz_id}/questions"), question)
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["question"]["id"].as_i64().unwrap()
}

/// 当前作答中题目 ID 的展示顺序
async fn current_order<S>(app: &S, student: &User, quiz_id: i64) -> Vec<i64>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = send!(
        *app,
        get(student, &format!("/api/quizsubmissions/current/{quiz_id}"))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["question"]["id"].as_i64().unwrap())
        .collect()
}

async fn start_attempt<S>(app: &S, student: &User, quiz_id: i64) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = send!(
        *app,
        post(student, "/api/quizsubmissions/start", json!({"quiz_id": quiz_id}))
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["submission_id"].as_i64().unwrap()
}

#[actix_web::test]
async fn test_full_quiz_lifecycle() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let room = published_quiz(&app, &fixture, json!({})).await;

    let submission_id = start_attempt(&app, &room.student, room.quiz_id).await;

    // 同一测验只能有一份进行中的作答
    let (status, _) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/start",
            json!({"quiz_id": room.quiz_id}),
        )
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/answer/multiple-choice",
            json!({
                "submission_id": submission_id,
                "question_id": 0,
                "selected_option_ids": [room.correct_option]
            }),
        )
    );
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");

    // 读取当前作答以拿到题目 ID
    let (status, body) = send!(
        app,
        get(
            &room.student,
            &format!("/api/quizsubmissions/current/{}", room.quiz_id),
        )
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    let question = &body["data"]["questions"][0]["question"];
    let question_id = question["id"].as_i64().unwrap();
    // 学生视图不包含正确答案
    assert!(question["options"][0].get("is_correct").is_none());

    let (status, body) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/answer/multiple-choice",
            json!({
                "submission_id": submission_id,
                "question_id": question_id,
                "selected_option_ids": [room.correct_option, room.correct_option]
            }),
        )
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["regraded"], false);

    let (_, body) = send!(
        app,
        get(
            &room.student,
            &format!("/api/quizsubmissions/current/{}", room.quiz_id),
        )
    );
    assert_eq!(
        body["data"]["questions"][0]["answer"]["selected_option_ids"],
        json!([room.correct_option])
    );

    let (status, body) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/submit",
            json!({"submission_id": submission_id}),
        )
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["submission"]["status"], "graded");
    assert_eq!(body["data"]["submission"]["score"], 2.0);
    assert_eq!(body["data"]["submission"]["percentage"], 100.0);

    // 重复提交
    let (status, _) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/submit",
            json!({"submission_id": submission_id}),
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 成绩未发布时学生看不到，教师可以
    let results_uri = format!("/api/quizsubmissions/{submission_id}/results");
    let (status, _) = send!(app, get(&room.student, &results_uri));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send!(app, get(&room.teacher, &results_uri));
    assert_eq!(status, StatusCode::OK);

    // 测验未关闭时不能发布成绩
    let release_uri = format!(
        "/api/quizsubmissions/quiz/{}/release-results",
        room.quiz_id
    );
    let (status, _) = send!(app, post(&room.teacher, &release_uri, json!({})));
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send!(
        app,
        post(
            &room.teacher,
            &format!("/api/quizzes/{}/archive", room.quiz_id),
            json!({}),
        )
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(app, post(&room.teacher, &release_uri, json!({})));
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["notified_students"], 1);

    let (status, _) = send!(app, post(&room.teacher, &release_uri, json!({})));
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(app, get(&room.student, &results_uri));
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["percentage"], 100.0);
    assert_eq!(body["data"]["passed"], true);
    assert_eq!(body["data"]["questions"][0]["is_correct"], true);

    // 提交通知 + 成绩发布通知
    let (_, body) = send!(
        app,
        get(&room.student, "/api/notifications/unread-count")
    );
    assert_eq!(body["data"]["unread_count"], 2);

    let (status, body) = send!(
        app,
        get(&room.teacher, &format!("/api/quizzes/{}/analytics", room.quiz_id))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["graded_submissions"], 1);
    assert_eq!(body["data"]["pass_rate"], 1.0);
    assert_eq!(body["data"]["score_distribution"]["a"], 1);
}

#[actix_web::test]
async fn test_wrong_choice_scores_zero_and_immediate_results() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let room = published_quiz(&app, &fixture, json!({"show_results_immediately": true})).await;

    let submission_id = start_attempt(&app, &room.student, room.quiz_id).await;
    let (_, body) = send!(
        app,
        get(
            &room.student,
            &format!("/api/quizsubmissions/current/{}", room.quiz_id),
        )
    );
    let question_id = body["data"]["questions"][0]["question"]["id"]
        .as_i64()
        .unwrap();

    // 选项不属于该题
    let (status, _) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/answer/multiple-choice",
            json!({
                "submission_id": submission_id,
                "question_id": question_id,
                "selected_option_ids": [room.wrong_option + 1000]
            }),
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/answer/multiple-choice",
            json!({
                "submission_id": submission_id,
                "question_id": question_id,
                "selected_option_ids": [room.wrong_option]
            }),
        )
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/submit",
            json!({"submission_id": submission_id}),
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["submission"]["score"], 0.0);

    let (status, body) = send!(
        app,
        get(
            &room.student,
            &format!("/api/quizsubmissions/{submission_id}/results"),
        )
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["percentage"], 0.0);
    assert_eq!(body["data"]["passed"], false);

    // 已作答的测验不能再改结构
    let (status, _) = send!(
        app,
        put(
            &room.teacher,
            &format!("/api/quizzes/{}/groups", room.quiz_id),
            json!({"group_ids": [room.group_id]}),
        )
    );
    assert_eq!(status, StatusCode::CONFLICT);

    // 作答完成后可以再次开始
    start_attempt(&app, &room.student, room.quiz_id).await;

    let (_, body) = send!(app, get(&room.student, "/api/quizsubmissions/my"));
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_publish_requires_questions_and_groups() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let teacher = fixture.user("teacher01", UserRole::Instructor, "Passw0rd!").await;

    let (_, body) = send!(
        app,
        post(
            &teacher,
            "/api/courses",
            json!({"code": "CS102", "title": "Systems", "academic_year": "2025-2026"}),
        )
    );
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();

    let (_, body) = send!(
        app,
        post(
            &teacher,
            "/api/quizzes",
            json!({"course_id": course_id, "title": "Empty"}),
        )
    );
    let quiz_id = body["data"]["quiz"]["id"].as_i64().unwrap();
    let publish_uri = format!("/api/quizzes/{quiz_id}/publish");

    let (status, _) = send!(app, post(&teacher, &publish_uri, json!({})));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(
        app,
        post(
            &teacher,
            &format!("/api/quizzes/{quiz_id}/questions"),
            json!({
                "text": "Explain ownership",
                "points": 1.0,
                "question_type": "short_answer"
            }),
        )
    );
    assert_eq!(status, StatusCode::CREATED);

    // 还没有分组
    let (status, _) = send!(app, post(&teacher, &publish_uri, json!({})));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 选择题必须有选项
    let (status, _) = send!(
        app,
        post(
            &teacher,
            &format!("/api/quizzes/{quiz_id}/questions"),
            json!({"text": "Pick", "points": 1.0, "question_type": "multiple_choice"}),
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_access_rules() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let room = published_quiz(&app, &fixture, json!({})).await;
    let outsider = fixture.user("student02", UserRole::Student, "Passw0rd!").await;
    let other_teacher = fixture.user("teacher02", UserRole::Instructor, "Passw0rd!").await;

    // 未登录
    let (status, _) = send!(app, test::TestRequest::get().uri("/api/quizzes"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 学生不能出题
    let (status, _) = send!(
        app,
        post(
            &room.student,
            "/api/quizzes",
            json!({"course_id": 1, "title": "Nope"}),
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 未分配分组的学生
    let (status, _) = send!(
        app,
        post(
            &outsider,
            "/api/quizsubmissions/start",
            json!({"quiz_id": room.quiz_id}),
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/start",
            json!({"quiz_id": 9999}),
        )
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 非任课教师不能管理测验
    let (status, _) = send!(
        app,
        get(&other_teacher, &format!("/api/quizzes/{}/questions", room.quiz_id))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 学生列表只包含分配给自己分组的已发布测验
    let (_, body) = send!(app, get(&room.student, "/api/quizzes"));
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    let (_, body) = send!(app, get(&outsider, "/api/quizzes"));
    assert!(body["data"]["items"].as_array().unwrap().is_empty());

    // 他人的作答
    let submission_id = start_attempt(&app, &room.student, room.quiz_id).await;
    let (status, _) = send!(
        app,
        post(
            &outsider,
            "/api/quizsubmissions/submit",
            json!({"submission_id": submission_id}),
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 非法路径参数
    let (status, _) = send!(app, get(&room.teacher, "/api/quizzes/abc"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_login_and_user_management() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let admin = fixture.user("root_admin", UserRole::SuperAdmin, "Adm1nPass!").await;

    let login = |password: &str| {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr("10.1.2.3:5000".parse().unwrap())
            .set_json(json!({"username": "root_admin", "password": password}))
    };

    let (status, _) = send!(app, login("wrong"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send!(app, login("Adm1nPass!"));
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], admin.id);

    let new_user = json!({
        "username": "student09",
        "email": "student09@example.com",
        "password": "Stud3ntPass",
        "role": "student"
    });
    let (status, body) = send!(app, post(&admin, "/api/users", new_user.clone()));
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let (status, _) = send!(app, post(&admin, "/api/users", new_user));
    assert_eq!(status, StatusCode::CONFLICT);

    let student = fixture
        .storage
        .get_user_by_username("student09")
        .await
        .unwrap()
        .unwrap();
    let (status, _) = send!(
        app,
        post(
            &student,
            "/api/users",
            json!({
                "username": "student10",
                "email": "student10@example.com",
                "password": "Stud3ntPass",
                "role": "student"
            }),
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_short_answer_grading_and_review() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let room = published_quiz(&app, &fixture, json!({})).await;

    let keyed = add_question(
        &app,
        &room.teacher,
        room.quiz_id,
        json!({
            "text": "What does the borrow checker enforce?",
            "points": 3.0,
            "question_type": "short_answer",
            "expected_answer": "Ownership"
        }),
    )
    .await;
    let open = add_question(
        &app,
        &room.teacher,
        room.quiz_id,
        json!({
            "text": "Describe a move",
            "points": 1.0,
            "question_type": "short_answer"
        }),
    )
    .await;

    let submission_id = start_attempt(&app, &room.student, room.quiz_id).await;
    let order = current_order(&app, &room.student, room.quiz_id).await;
    let choice = order[0];

    // 题型不匹配
    let (status, _) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/answer/short-answer",
            json!({"submission_id": submission_id, "question_id": choice, "text_answer": "let"}),
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/answer/multiple-choice",
            json!({
                "submission_id": submission_id,
                "question_id": choice,
                "selected_option_ids": [room.correct_option]
            }),
        )
    );
    assert_eq!(status, StatusCode::OK);

    for (question_id, text) in [(keyed, "  ownership "), (open, "Values transfer owners")] {
        let (status, body) = send!(
            app,
            post(
                &room.student,
                "/api/quizsubmissions/answer/short-answer",
                json!({
                    "submission_id": submission_id,
                    "question_id": question_id,
                    "text_answer": text
                }),
            )
        );
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["answer"]["text_answer"], text);
    }

    let (status, body) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/submit",
            json!({"submission_id": submission_id}),
        )
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    // 参考答案忽略大小写与首尾空白；没有参考答案的题待人工批改
    assert_eq!(body["data"]["submission"]["score"], 5.0);
    assert_eq!(body["data"]["submission"]["max_score"], 6.0);
    assert_eq!(body["data"]["submission"]["needs_review"], true);

    // 未开启提交后修改
    let (status, _) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/answer/short-answer",
            json!({"submission_id": submission_id, "question_id": keyed, "text_answer": "Borrowing"}),
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        get(
            &room.teacher,
            &format!("/api/quizsubmissions/{submission_id}/results"),
        )
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["needs_review"], true);
    let results = body["data"]["questions"].as_array().unwrap();
    let keyed_result = results.iter().find(|q| q["question_id"] == keyed).unwrap();
    assert_eq!(keyed_result["is_correct"], true);
    assert_eq!(keyed_result["points_awarded"], 3.0);
    let open_result = results.iter().find(|q| q["question_id"] == open).unwrap();
    assert!(open_result["is_correct"].is_null());
    assert_eq!(open_result["points_awarded"], 0.0);
}

#[actix_web::test]
async fn test_edit_after_submission_regrades() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let room = published_quiz(&app, &fixture, json!({"allow_edit_after_submission": true})).await;

    let submission_id = start_attempt(&app, &room.student, room.quiz_id).await;
    let question_id = current_order(&app, &room.student, room.quiz_id).await[0];
    let answer = |option: i64| {
        post(
            &room.student,
            "/api/quizsubmissions/answer/multiple-choice",
            json!({
                "submission_id": submission_id,
                "question_id": question_id,
                "selected_option_ids": [option]
            }),
        )
    };

    let (status, body) = send!(app, answer(room.wrong_option));
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["regraded"], false);

    let (_, body) = send!(
        app,
        post(
            &room.student,
            "/api/quizsubmissions/submit",
            json!({"submission_id": submission_id}),
        )
    );
    assert_eq!(body["data"]["submission"]["score"], 0.0);

    let (status, body) = send!(app, answer(room.correct_option));
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["regraded"], true);
    assert_eq!(body["data"]["answer"]["is_correct"], true);

    let (_, body) = send!(app, get(&room.student, "/api/quizsubmissions/my"));
    let stored = &body["data"]["items"][0];
    assert_eq!(stored["id"], submission_id);
    assert_eq!(stored["status"], "graded");
    assert_eq!(stored["score"], 2.0);
    assert_eq!(stored["percentage"], 100.0);

    // 测验关闭后不可再改
    let (status, _) = send!(
        app,
        post(
            &room.teacher,
            &format!("/api/quizzes/{}/archive", room.quiz_id),
            json!({}),
        )
    );
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send!(app, answer(room.wrong_option));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send!(app, get(&room.student, "/api/quizsubmissions/my"));
    assert_eq!(body["data"]["items"][0]["score"], 2.0);
}

#[actix_web::test]
async fn test_shuffled_order_is_stable_across_resume() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let room = published_quiz(&app, &fixture, json!({"shuffle_questions": true})).await;

    for n in 1..=7 {
        add_question(
            &app,
            &room.teacher,
            room.quiz_id,
            json!({
                "text": format!("Question {n}"),
                "points": 1.0,
                "question_type": "short_answer"
            }),
        )
        .await;
    }

    start_attempt(&app, &room.student, room.quiz_id).await;
    let first = current_order(&app, &room.student, room.quiz_id).await;
    let second = current_order(&app, &room.student, room.quiz_id).await;
    assert_eq!(first.len(), 8);
    assert_eq!(first, second);

    let mut sorted = first.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 8);
}

#[actix_web::test]
async fn test_published_quiz_keeps_questions_and_groups() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let room = published_quiz(&app, &fixture, json!({})).await;

    let (_, body) = send!(
        app,
        get(&room.teacher, &format!("/api/quizzes/{}/questions", room.quiz_id))
    );
    let only = body["data"]["items"][0]["id"].as_i64().unwrap();
    let only_uri = format!("/api/quizzes/{}/questions/{only}", room.quiz_id);

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&only_uri)
            .insert_header(bearer(&room.teacher))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(
        app,
        put(
            &room.teacher,
            &format!("/api/quizzes/{}/groups", room.quiz_id),
            json!({"group_ids": []}),
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 还有其他题目时可以删除
    add_question(
        &app,
        &room.teacher,
        room.quiz_id,
        json!({"text": "Spare", "points": 1.0, "question_type": "short_answer"}),
    )
    .await;
    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&only_uri)
            .insert_header(bearer(&room.teacher))
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_update_clears_availability_window() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);
    let room = published_quiz(
        &app,
        &fixture,
        json!({"available_to": "2099-01-01T00:00:00Z"}),
    )
    .await;
    let quiz_uri = format!("/api/quizzes/{}", room.quiz_id);

    let (status, body) = send!(app, put(&room.teacher, &quiz_uri, json!({"title": "Week 1b"})));
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["quiz"]["available_to"].is_string());

    let (status, body) = send!(app, put(&room.teacher, &quiz_uri, json!({"available_to": null})));
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["quiz"]["available_to"].is_null());
    assert_eq!(body["data"]["quiz"]["title"], "Week 1b");
}
