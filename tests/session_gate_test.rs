mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use serde_json::json;

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn rotas_protegidas_exigem_token() {
    let app = TestApp::new().await;

    for uri in [
        "/api/users/me",
        "/api/purchases",
        "/api/travel",
        "/api/masterdata/laboratories",
        "/api/admin/users",
        "/api/quotes",
    ] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    // Token inválido também não passa
    let response = app
        .request(Method::GET, "/api/users/me", Some("lixo"), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Health fica aberto
    let response = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn me_devolve_perfil_e_papel() {
    let app = TestApp::new().await;
    let (token, email) = app.register_user("Perfil Completo").await;

    let me = read_json(
        app.request(Method::GET, "/api/users/me", Some(&token), None)
            .await,
    )
    .await;
    assert_eq!(me["email"], email.as_str());
    assert_eq!(me["profile"]["isAdmin"], false);
    assert_eq!(me["role"]["slug"], "usuario");

    // Seleção de área persiste no perfil
    let response = app
        .request(
            Method::PUT,
            "/api/users/me/area",
            Some(&token),
            Some(json!({ "area": "compras" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let me = read_json(
        app.request(Method::GET, "/api/users/me", Some(&token), None)
            .await,
    )
    .await;
    assert_eq!(me["profile"]["selectedArea"], "compras");
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn senha_redefinida_por_token_de_uso_unico() {
    let app = TestApp::new().await;
    let (_, email) = app.register_user("Esquecida").await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/reset-password",
            None,
            Some(json!({ "email": email })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // O token sai só pelo log; no teste, lemos direto da tabela
    let row: (String,) = sqlx::query_as(
        "SELECT t.token FROM password_reset_tokens t \
         JOIN users u ON u.id = t.user_id WHERE u.email = $1 AND NOT t.used",
    )
    .bind(&email)
    .fetch_one(&app.state.db_pool)
    .await
    .unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/auth/reset-password/confirm",
            None,
            Some(json!({ "token": row.0, "newPassword": "novaSecreta456" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Senha antiga morreu, a nova entra
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "secreta123" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "novaSecreta456" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Token não serve duas vezes
    let response = app
        .request(
            Method::POST,
            "/api/auth/reset-password/confirm",
            None,
            Some(json!({ "token": row.0, "newPassword": "outraMais789" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
