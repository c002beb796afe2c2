// Harness dos testes de integração: sobe a aplicação inteira em memória,
// apontando para o Postgres de teste (TEST_DATABASE_URL).

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use lab_backoffice::{config::AppState, routes};

pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL deve apontar para o Postgres de teste");
        // AppState::new lê do ambiente. `set_var` é unsafe na edição 2024;
        // aqui estamos num processo de teste single-setup.
        unsafe {
            std::env::set_var("DATABASE_URL", &database_url);
            std::env::set_var("JWT_SECRET", "segredo-apenas-para-testes");
            std::env::set_var(
                "STORAGE_ROOT",
                std::env::temp_dir().join("lab-backoffice-tests"),
            );
        }

        let state = AppState::new().await.expect("AppState");
        sqlx::migrate!()
            .run(&state.db_pool)
            .await
            .expect("migrações");

        Self {
            router: routes::build_router(state.clone()),
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    // Registra um usuário novo (e-mail aleatório) e retorna (token, e-mail)
    pub async fn register_user(&self, full_name: &str) -> (String, String) {
        let email = format!("{}@test.local", Uuid::new_v4());
        let response = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "secreta123",
                    "fullName": full_name,
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        (body["token"].as_str().unwrap().to_string(), email)
    }

    // Promove direto no banco; o painel exige um admin já existente.
    pub async fn make_admin(&self, email: &str) {
        sqlx::query(
            r#"
            UPDATE profiles SET is_admin = TRUE
            WHERE user_id = (SELECT id FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .execute(&self.state.db_pool)
        .await
        .expect("promover usuário de teste");
    }

    pub async fn user_id(&self, email: &str) -> Uuid {
        let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.state.db_pool)
            .await
            .expect("id do usuário de teste");
        id
    }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
