// Fluxo completo de solicitações de compra: dados mestres, criação em
// transação, invariante laboratório/código, status e notificações.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{read_json, TestApp};

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn fluxo_completo_de_compra() {
    let app = TestApp::new().await;
    let (user_token, _) = app.register_user("Solicitante Compras").await;
    let (staff_token, staff_email) = app.register_user("Equipe Compras").await;
    app.make_admin(&staff_email).await;

    // --- Dados mestres ---
    let lab = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/laboratories",
            Some(&staff_token),
            Some(json!({ "name": format!("Lab {}", uuid::Uuid::new_v4()) })),
        )
        .await,
    )
    .await;
    let lab_id = lab["id"].as_str().unwrap().to_string();

    let supplier = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/suppliers",
            Some(&staff_token),
            Some(json!({ "name": format!("Proveedor {}", uuid::Uuid::new_v4()) })),
        )
        .await,
    )
    .await;

    let product = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/products",
            Some(&staff_token),
            Some(json!({
                "supplierId": supplier["id"],
                "code": format!("P-{}", uuid::Uuid::new_v4()),
                "name": "Reactivo X",
            })),
        )
        .await,
    )
    .await;

    let budget_code = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/budget-codes",
            Some(&staff_token),
            Some(json!({ "code": format!("BC-{}", uuid::Uuid::new_v4()) })),
        )
        .await,
    )
    .await;
    let code_id = budget_code["id"].as_str().unwrap().to_string();

    // Sem associação ainda: a invariante bloqueia a criação
    let response = app
        .request(
            Method::POST,
            "/api/purchases",
            Some(&user_token),
            Some(json!({
                "laboratoryId": lab_id,
                "budgetCodeId": code_id,
                "productId": product["id"],
                "quantity": 2,
                "unitPrice": 150.50,
                "currency": "ARS",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Associa o código ao laboratório e tenta de novo
    let response = app
        .request(
            Method::PUT,
            &format!("/api/masterdata/laboratories/{lab_id}/budget-codes"),
            Some(&staff_token),
            Some(json!({ "budgetCodeIds": [code_id] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(
            Method::POST,
            "/api/purchases",
            Some(&user_token),
            Some(json!({
                "laboratoryId": lab_id,
                "budgetCodeId": code_id,
                "productId": product["id"],
                "quantity": 2,
                "unitPrice": 150.50,
                "currency": "ARS",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let request_id = created["request"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["request"]["status"], "pending");

    // Detalhe traz item resolvido
    let detail = read_json(
        app.request(
            Method::GET,
            &format!("/api/purchases/{request_id}"),
            Some(&user_token),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(detail["items"][0]["productName"], "Reactivo X");

    // Status: usuário comum não pode; admin (passa pelo guardião) pode
    let response = app
        .request(
            Method::PUT,
            &format!("/api/purchases/{request_id}/status"),
            Some(&user_token),
            Some(json!({ "status": "in_process" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::PUT,
            &format!("/api/purchases/{request_id}/status"),
            Some(&staff_token),
            Some(json!({ "status": "in_process" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // O solicitante recebeu a notificação da mudança de status
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
        .any(|n| n["body"].as_str().unwrap().contains("in_process")));

    // Soft delete tira da listagem
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/purchases/{request_id}"),
            Some(&staff_token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(
            Method::GET,
            &format!("/api/purchases/{request_id}"),
            Some(&user_token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn edicao_por_terceiro_notifica_o_solicitante() {
    let app = TestApp::new().await;
    let (user_token, _) = app.register_user("Dona da Solicitação").await;
    let (staff_token, staff_email) = app.register_user("Editor Admin").await;
    app.make_admin(&staff_email).await;

    // Seed mínimo
    let lab = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/laboratories",
            Some(&staff_token),
            Some(json!({ "name": format!("Lab {}", uuid::Uuid::new_v4()) })),
        )
        .await,
    )
    .await;
    let product = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/products",
            Some(&staff_token),
            Some(json!({ "code": format!("P-{}", uuid::Uuid::new_v4()), "name": "Guantes" })),
        )
        .await,
    )
    .await;
    let code = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/budget-codes",
            Some(&staff_token),
            Some(json!({ "code": format!("BC-{}", uuid::Uuid::new_v4()) })),
        )
        .await,
    )
    .await;
    let lab_id = lab["id"].as_str().unwrap();
    app.request(
        Method::PUT,
        &format!("/api/masterdata/laboratories/{lab_id}/budget-codes"),
        Some(&staff_token),
        Some(json!({ "budgetCodeIds": [code["id"]] })),
    )
    .await;

    let payload = json!({
        "laboratoryId": lab["id"],
        "budgetCodeId": code["id"],
        "productId": product["id"],
        "quantity": 1,
        "unitPrice": 10,
        "currency": "ARS",
    });
    let created = read_json(
        app.request(Method::POST, "/api/purchases", Some(&user_token), Some(payload.clone()))
            .await,
    )
    .await;
    let request_id = created["request"]["id"].as_str().unwrap().to_string();

    // O admin altera a quantidade
    let mut edited = payload.clone();
    edited["quantity"] = json!(5);
    let response = app
        .request(
            Method::PUT,
            &format!("/api/purchases/{request_id}"),
            Some(&staff_token),
            Some(edited),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

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
        .any(|n| n["body"].as_str().unwrap().contains("cantidad")));
}

// Seed de dados mestres já associados, para os testes de atomicidade.
async fn seed_masterdata(app: &TestApp, staff_token: &str) -> (String, String, String) {
    let lab = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/laboratories",
            Some(staff_token),
            Some(json!({ "name": format!("Lab {}", uuid::Uuid::new_v4()) })),
        )
        .await,
    )
    .await;
    let product = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/products",
            Some(staff_token),
            Some(json!({ "code": format!("P-{}", uuid::Uuid::new_v4()), "name": "Pipetas" })),
        )
        .await,
    )
    .await;
    let code = read_json(
        app.request(
            Method::POST,
            "/api/masterdata/budget-codes",
            Some(staff_token),
            Some(json!({ "code": format!("BC-{}", uuid::Uuid::new_v4()) })),
        )
        .await,
    )
    .await;
    let lab_id = lab["id"].as_str().unwrap().to_string();
    app.request(
        Method::PUT,
        &format!("/api/masterdata/laboratories/{lab_id}/budget-codes"),
        Some(staff_token),
        Some(json!({ "budgetCodeIds": [code["id"]] })),
    )
    .await;
    (
        lab_id,
        code["id"].as_str().unwrap().to_string(),
        product["id"].as_str().unwrap().to_string(),
    )
}

async fn count_requests(app: &TestApp) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM purchase_requests")
        .fetch_one(&app.state.db_pool)
        .await
        .expect("contar solicitações");
    count
}

// Se o item não pode ser gravado, a solicitação também não pode ficar:
// os dois inserts vivem na mesma transação.
#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn produto_inexistente_nao_deixa_solicitacao_orfa() {
    let app = TestApp::new().await;
    let (user_token, _) = app.register_user("Solicitante Atômico").await;
    let (staff_token, staff_email) = app.register_user("Admin Atômico").await;
    app.make_admin(&staff_email).await;

    let (lab_id, code_id, _) = seed_masterdata(&app, &staff_token).await;
    let before = count_requests(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/purchases",
            Some(&user_token),
            Some(json!({
                "laboratoryId": lab_id,
                "budgetCodeId": code_id,
                "productId": uuid::Uuid::new_v4(),
                "quantity": 1,
                "unitPrice": 10,
                "currency": "ARS",
            })),
        )
        .await;
    assert!(!response.status().is_success());
    assert_eq!(count_requests(&app).await, before);
}

// Se o registro do anexo falha depois do objeto já estar em disco, a
// compensação remove o objeto e o upload termina sem aquele arquivo.
#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn registro_de_anexo_que_falha_remove_o_objeto_do_disco() {
    use lab_backoffice::{
        common::{
            error::AppError,
            storage::{StorageService, BUCKET_PURCHASE_ATTACHMENTS},
        },
        services::purchase_service::UploadedFile,
    };

    let app = TestApp::new().await;
    let (user_token, _) = app.register_user("Solicitante Anexos").await;
    let (staff_token, staff_email) = app.register_user("Admin Anexos").await;
    app.make_admin(&staff_email).await;

    let (lab_id, code_id, product_id) = seed_masterdata(&app, &staff_token).await;
    let created = read_json(
        app.request(
            Method::POST,
            "/api/purchases",
            Some(&user_token),
            Some(json!({
                "laboratoryId": lab_id,
                "budgetCodeId": code_id,
                "productId": product_id,
                "quantity": 1,
                "unitPrice": 10,
                "currency": "ARS",
            })),
        )
        .await,
    )
    .await;
    let request_id: uuid::Uuid = created["request"]["id"].as_str().unwrap().parse().unwrap();

    // Uploader inexistente: o objeto grava, mas o registro viola a FK.
    let saved = app
        .state
        .purchase_service
        .upload_attachments(
            request_id,
            uuid::Uuid::new_v4(),
            vec![UploadedFile {
                file_name: "presupuesto.pdf".to_string(),
                content_type: Some("application/pdf".to_string()),
                bytes: b"%PDF-1.4".to_vec(),
            }],
        )
        .await
        .expect("upload termina mesmo com arquivo descartado");
    assert!(saved.is_empty());

    let storage = StorageService::new(std::env::temp_dir().join("lab-backoffice-tests"));
    let path = format!("{BUCKET_PURCHASE_ATTACHMENTS}/{request_id}/presupuesto.pdf");
    assert!(matches!(storage.read(&path).await, Err(AppError::NotFound)));
}
