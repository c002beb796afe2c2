mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use serde_json::json;

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn promover_e_despromover_admin() {
    let app = TestApp::new().await;
    let (_, target_email) = app.register_user("Usuaria Comum").await;
    let (admin_token, admin_email) = app.register_user("Admin Principal").await;
    app.make_admin(&admin_email).await;

    let target_id = app.user_id(&target_email).await;

    // Usuário comum não enxerga o painel
    let (plain_token, _) = app.register_user("Sem Permissão").await;
    let response = app
        .request(Method::GET, "/api/admin/users", Some(&plain_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Promove
    let response = app
        .request(
            Method::PUT,
            &format!("/api/admin/users/{target_id}/admin"),
            Some(&admin_token),
            Some(json!({ "isAdmin": true })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let users = read_json(
        app.request(Method::GET, "/api/admin/users", Some(&admin_token), None)
            .await,
    )
    .await;
    let target = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == target_email.as_str())
        .unwrap()
        .clone();
    assert_eq!(target["isAdmin"], true);

    // Despromove: volta para o papel base
    let response = app
        .request(
            Method::PUT,
            &format!("/api/admin/users/{target_id}/admin"),
            Some(&admin_token),
            Some(json!({ "isAdmin": false })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let users = read_json(
        app.request(Method::GET, "/api/admin/users", Some(&admin_token), None)
            .await,
    )
    .await;
    let target = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == target_email.as_str())
        .unwrap()
        .clone();
    assert_eq!(target["isAdmin"], false);
    assert_eq!(target["roleName"], "Usuario");
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn usuario_bloqueado_nao_entra() {
    let app = TestApp::new().await;
    let (blocked_token, blocked_email) = app.register_user("Bloqueada").await;
    let (admin_token, admin_email) = app.register_user("Admin Bloqueio").await;
    app.make_admin(&admin_email).await;

    let blocked_id = app.user_id(&blocked_email).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/admin/users/{blocked_id}/blocked"),
            Some(&admin_token),
            Some(json!({ "isBlocked": true })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Login recusado
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": blocked_email, "password": "secreta123" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Token emitido antes do bloqueio também deixa de valer
    let response = app
        .request(Method::GET, "/api/users/me", Some(&blocked_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Desbloqueio reabilita o login
    let response = app
        .request(
            Method::PUT,
            &format!("/api/admin/users/{blocked_id}/blocked"),
            Some(&admin_token),
            Some(json!({ "isBlocked": false })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": blocked_email, "password": "secreta123" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}
