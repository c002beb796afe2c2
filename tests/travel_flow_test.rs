mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use serde_json::json;

fn travel_payload() -> serde_json::Value {
    json!({
        "fullName": "Viajante de Prueba",
        "documentNumber": "12.345.678",
        "destination": "Mendoza",
        "purpose": "Congreso anual de química",
        "startDate": "2026-10-05",
        "endDate": "2026-10-09",
        "budgetAmount": 180000.0,
        "currency": "ARS",
        "dailyAllowance": 25000.0,
        "accommodation": "Hotel del congreso"
    })
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn fluxo_de_aprovacao_em_duas_etapas() {
    let app = TestApp::new().await;
    let (user_token, _) = app.register_user("Solicitante Viaje").await;
    let (admin_token, admin_email) = app.register_user("Aprobador").await;
    app.make_admin(&admin_email).await;

    let created = read_json(
        app.request(
            Method::POST,
            "/api/travel",
            Some(&user_token),
            Some(travel_payload()),
        )
        .await,
    )
    .await;
    let request_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "pendiente");

    // Rechazo sem motivo não passa
    let response = app
        .request(
            Method::PUT,
            &format!("/api/travel/{request_id}/reject"),
            Some(&admin_token),
            Some(json!({ "notes": "   " })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Usuário comum não aprova
    let response = app
        .request(
            Method::PUT,
            &format!("/api/travel/{request_id}/approve"),
            Some(&user_token),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Primeira aprovação: gerente
    let approved = read_json(
        app.request(
            Method::PUT,
            &format!("/api/travel/{request_id}/approve"),
            Some(&admin_token),
            Some(json!({ "notes": "Presupuesto razonable" })),
        )
        .await,
    )
    .await;
    assert_eq!(approved["status"], "aprobado_por_gerente");

    // Segunda aprovação: finanzas
    let approved = read_json(
        app.request(
            Method::PUT,
            &format!("/api/travel/{request_id}/approve"),
            Some(&admin_token),
            Some(json!({})),
        )
        .await,
    )
    .await;
    assert_eq!(approved["status"], "aprobado_por_finanzas");

    // Não há terceira etapa
    let response = app
        .request(
            Method::PUT,
            &format!("/api/travel/{request_id}/approve"),
            Some(&admin_token),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Gasto real registrado depois da aprovação
    let expense = read_json(
        app.request(
            Method::POST,
            &format!("/api/travel/{request_id}/expenses"),
            Some(&user_token),
            Some(json!({
                "description": "Taxi aeropuerto",
                "amount": 12000.0,
                "currency": "ARS",
                "expenseDate": "2026-10-05"
            })),
        )
        .await,
    )
    .await;
    assert_eq!(expense["description"], "Taxi aeropuerto");

    let completed = read_json(
        app.request(
            Method::PUT,
            &format!("/api/travel/{request_id}/complete"),
            Some(&admin_token),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(completed["status"], "completado");

    // O solicitante foi notificado das mudanças de estado
    let notifications = read_json(
        app.request(
            Method::GET,
            "/api/users/me/notifications",
            Some(&user_token),
            None,
        )
        .await,
    )
    .await;
    assert!(notifications
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["body"].as_str().unwrap().contains("aprobado_por_finanzas")));
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn rechazo_encerra_o_fluxo() {
    let app = TestApp::new().await;
    let (user_token, _) = app.register_user("Solicitante Rechazado").await;
    let (admin_token, admin_email) = app.register_user("Gerente").await;
    app.make_admin(&admin_email).await;

    let created = read_json(
        app.request(
            Method::POST,
            "/api/travel",
            Some(&user_token),
            Some(travel_payload()),
        )
        .await,
    )
    .await;
    let request_id = created["id"].as_str().unwrap().to_string();

    let rejected = read_json(
        app.request(
            Method::PUT,
            &format!("/api/travel/{request_id}/reject"),
            Some(&admin_token),
            Some(json!({ "notes": "Fuera de presupuesto" })),
        )
        .await,
    )
    .await;
    assert_eq!(rejected["status"], "rechazado");

    // Estado terminal: nem aprovar nem rechazar de novo
    let response = app
        .request(
            Method::PUT,
            &format!("/api/travel/{request_id}/approve"),
            Some(&admin_token),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn datas_invertidas_reprovam_na_criacao() {
    let app = TestApp::new().await;
    let (user_token, _) = app.register_user("Fechas Malas").await;

    let mut payload = travel_payload();
    payload["startDate"] = json!("2026-10-09");
    payload["endDate"] = json!("2026-10-05");

    let response = app
        .request(Method::POST, "/api/travel", Some(&user_token), Some(payload))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
