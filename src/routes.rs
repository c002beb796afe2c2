// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs, handlers, middleware::auth::auth_middleware};

// Monta o router completo. Separado do main para os testes de integração
// poderem subir a aplicação inteira em memória.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/reset-password", post(handlers::auth::request_password_reset))
        .route(
            "/reset-password/confirm",
            post(handlers::auth::confirm_password_reset),
        );

    // Rotas do próprio usuário (protegidas)
    let user_routes = Router::new()
        .route("/me", get(handlers::users::get_me))
        .route("/me/area", put(handlers::users::select_area))
        .route("/me/notifications", get(handlers::users::list_notifications))
        .route(
            "/me/notifications/{id}/read",
            put(handlers::users::mark_notification_read),
        );

    // Painel de administração (o guardião RequireAdmin fica nos handlers)
    let admin_routes = Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route("/roles", get(handlers::admin::list_roles))
        .route("/users/{id}/blocked", put(handlers::admin::set_blocked))
        .route("/users/{id}/admin", put(handlers::admin::set_admin))
        .route("/users/{id}/role", put(handlers::admin::set_role))
        .route("/users/{id}/laboratory", put(handlers::admin::set_laboratory));

    let masterdata_routes = Router::new()
        .route(
            "/laboratories",
            get(handlers::masterdata::list_laboratories)
                .post(handlers::masterdata::create_laboratory),
        )
        .route(
            "/laboratories/{id}",
            put(handlers::masterdata::update_laboratory)
                .delete(handlers::masterdata::delete_laboratory),
        )
        .route(
            "/laboratories/{id}/budget-codes",
            get(handlers::masterdata::list_laboratory_budget_codes)
                .put(handlers::masterdata::replace_laboratory_budget_codes),
        )
        .route(
            "/suppliers",
            get(handlers::masterdata::list_suppliers).post(handlers::masterdata::create_supplier),
        )
        .route(
            "/suppliers/{id}",
            put(handlers::masterdata::update_supplier)
                .delete(handlers::masterdata::delete_supplier),
        )
        .route(
            "/products",
            get(handlers::masterdata::list_products).post(handlers::masterdata::create_product),
        )
        .route(
            "/products/{id}",
            put(handlers::masterdata::update_product)
                .delete(handlers::masterdata::delete_product),
        )
        .route(
            "/budget-codes",
            get(handlers::masterdata::list_budget_codes)
                .post(handlers::masterdata::create_budget_code),
        )
        .route(
            "/budget-codes/{id}",
            put(handlers::masterdata::update_budget_code)
                .delete(handlers::masterdata::delete_budget_code),
        )
        .route(
            "/budget-codes/{id}/products",
            get(handlers::masterdata::list_budget_code_products)
                .put(handlers::masterdata::replace_budget_code_products),
        );

    let purchase_routes = Router::new()
        .route(
            "/",
            get(handlers::purchases::list_requests).post(handlers::purchases::create_request),
        )
        .route(
            "/{id}",
            get(handlers::purchases::get_request)
                .put(handlers::purchases::update_request)
                .delete(handlers::purchases::delete_request),
        )
        .route("/{id}/status", put(handlers::purchases::update_status))
        .route(
            "/{id}/attachments",
            post(handlers::purchases::upload_attachments),
        )
        .route(
            "/attachments/{id}",
            get(handlers::purchases::download_attachment)
                .delete(handlers::purchases::delete_attachment),
        )
        .route(
            "/{id}/comments",
            get(handlers::purchases::list_comments).post(handlers::purchases::add_comment),
        );

    let travel_routes = Router::new()
        .route(
            "/",
            get(handlers::travel::list_requests).post(handlers::travel::create_request),
        )
        .route(
            "/{id}",
            get(handlers::travel::get_request)
                .put(handlers::travel::update_request)
                .delete(handlers::travel::delete_request),
        )
        .route("/{id}/approve", put(handlers::travel::approve_request))
        .route("/{id}/reject", put(handlers::travel::reject_request))
        .route("/{id}/complete", put(handlers::travel::complete_request))
        .route(
            "/{id}/expenses",
            get(handlers::travel::list_expenses).post(handlers::travel::add_expense),
        )
        .route("/{id}/attachments", post(handlers::travel::upload_attachments))
        .route(
            "/attachments/{id}",
            get(handlers::travel::download_attachment)
                .delete(handlers::travel::delete_attachment),
        );

    // Tudo que não é /api/auth exige sessão válida
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/masterdata", masterdata_routes)
        .nest("/api/purchases", purchase_routes)
        .nest("/api/travel", travel_routes)
        .route("/api/quotes", get(handlers::quotes::get_quotes))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state)
}
