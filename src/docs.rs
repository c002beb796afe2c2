// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::request_password_reset,
        handlers::auth::confirm_password_reset,

        // --- Users ---
        handlers::users::get_me,
        handlers::users::select_area,
        handlers::users::list_notifications,
        handlers::users::mark_notification_read,

        // --- Admin ---
        handlers::admin::list_users,
        handlers::admin::list_roles,
        handlers::admin::set_blocked,
        handlers::admin::set_admin,
        handlers::admin::set_role,
        handlers::admin::set_laboratory,

        // --- MasterData ---
        handlers::masterdata::list_laboratories,
        handlers::masterdata::create_laboratory,
        handlers::masterdata::update_laboratory,
        handlers::masterdata::delete_laboratory,
        handlers::masterdata::list_suppliers,
        handlers::masterdata::create_supplier,
        handlers::masterdata::update_supplier,
        handlers::masterdata::delete_supplier,
        handlers::masterdata::list_products,
        handlers::masterdata::create_product,
        handlers::masterdata::update_product,
        handlers::masterdata::delete_product,
        handlers::masterdata::list_budget_codes,
        handlers::masterdata::create_budget_code,
        handlers::masterdata::update_budget_code,
        handlers::masterdata::delete_budget_code,
        handlers::masterdata::list_budget_code_products,
        handlers::masterdata::replace_budget_code_products,
        handlers::masterdata::list_laboratory_budget_codes,
        handlers::masterdata::replace_laboratory_budget_codes,

        // --- Purchases ---
        handlers::purchases::create_request,
        handlers::purchases::list_requests,
        handlers::purchases::get_request,
        handlers::purchases::update_request,
        handlers::purchases::update_status,
        handlers::purchases::delete_request,
        handlers::purchases::upload_attachments,
        handlers::purchases::download_attachment,
        handlers::purchases::delete_attachment,
        handlers::purchases::add_comment,
        handlers::purchases::list_comments,

        // --- Travel ---
        handlers::travel::create_request,
        handlers::travel::list_requests,
        handlers::travel::get_request,
        handlers::travel::update_request,
        handlers::travel::delete_request,
        handlers::travel::approve_request,
        handlers::travel::reject_request,
        handlers::travel::complete_request,
        handlers::travel::add_expense,
        handlers::travel::list_expenses,
        handlers::travel::upload_attachments,
        handlers::travel::download_attachment,
        handlers::travel::delete_attachment,

        // --- Quotes ---
        handlers::quotes::get_quotes,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::ResetPasswordPayload,
            models::auth::ResetPasswordConfirmPayload,

            // --- Profiles ---
            models::profile::Role,
            models::profile::Profile,
            models::profile::AdminUserRow,
            models::profile::MeResponse,
            models::profile::Area,
            models::profile::SetBlockedPayload,
            models::profile::SetAdminPayload,
            models::profile::SetRolePayload,
            models::profile::SetLaboratoryPayload,
            models::profile::SelectAreaPayload,

            // --- MasterData ---
            models::masterdata::Laboratory,
            models::masterdata::Supplier,
            models::masterdata::Product,
            models::masterdata::BudgetCode,
            models::masterdata::ProductWithSupplier,
            models::masterdata::LaboratoryPayload,
            models::masterdata::SupplierPayload,
            models::masterdata::ProductPayload,
            models::masterdata::BudgetCodePayload,
            models::masterdata::ReplaceProductsPayload,
            models::masterdata::ReplaceBudgetCodesPayload,

            // --- Purchases ---
            models::purchases::PurchaseRequestStatus,
            models::purchases::CurrencyCode,
            models::purchases::PurchaseRequest,
            models::purchases::PurchaseRequestItem,
            models::purchases::PurchaseRequestAttachment,
            models::purchases::PurchaseRequestComment,
            models::purchases::PurchaseRequestSummary,
            models::purchases::PurchaseItemWithProduct,
            models::purchases::PurchaseRequestDetail,
            models::purchases::PurchaseRequestPayload,
            models::purchases::UpdatePurchaseStatusPayload,
            models::purchases::CreateCommentPayload,

            // --- Travel ---
            models::travel::TravelRequestStatus,
            models::travel::TravelAttachmentKind,
            models::travel::TravelRequest,
            models::travel::TravelRequestExpense,
            models::travel::TravelRequestAttachment,
            models::travel::TravelRequestDetail,
            models::travel::TravelRequestPayload,
            models::travel::ApproveTravelPayload,
            models::travel::RejectTravelPayload,
            models::travel::CreateExpensePayload,

            // --- Notifications & Quotes ---
            models::notifications::Notification,
            models::quotes::CurrencyQuote,
            models::quotes::ExternalQuotation,
            models::quotes::QuoteBoard,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, registro e redefinição de senha"),
        (name = "Users", description = "Dados do próprio usuário e notificações"),
        (name = "Admin", description = "Gestão de usuários (apenas administradores)"),
        (name = "MasterData", description = "Laboratórios, fornecedores, produtos e códigos orçamentários"),
        (name = "Purchases", description = "Solicitações de compra, anexos e comentários"),
        (name = "Travel", description = "Solicitações de viagem, despesas e anexos"),
        (name = "Quotes", description = "Cotações externas (câmbio e cotizaciones)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
