// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::{i18n::I18nStore, storage::StorageService},
    db::{
        MasterDataRepository, NotificationRepository, ProfileRepository, PurchaseRepository,
        TravelRepository, UserRepository,
    },
    services::{
        admin_service::AdminService, auth::AuthService, masterdata_service::MasterDataService,
        purchase_service::PurchaseService, quote_service::QuoteService,
        travel_service::TravelService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub port: u16,
    pub i18n_store: I18nStore,
    pub notification_repo: NotificationRepository,
    pub profile_repo: ProfileRepository,
    pub auth_service: AuthService,
    pub admin_service: AdminService,
    pub masterdata_service: MasterDataService,
    pub purchase_service: PurchaseService,
    pub travel_service: TravelService,
    pub quote_service: QuoteService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .expect("PORT deve ser um número");
        let storage_root =
            env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string());
        let currency_api_url = env::var("CURRENCY_API_URL")
            .unwrap_or_else(|_| "https://dolarapi.com/v1/dolares".to_string());
        let quotations_api_url = env::var("QUOTATIONS_API_URL")
            .unwrap_or_else(|_| "https://api.example.com/cotizaciones".to_string());

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let profile_repo = ProfileRepository::new(db_pool.clone());
        let masterdata_repo = MasterDataRepository::new(db_pool.clone());
        let purchase_repo = PurchaseRepository::new(db_pool.clone());
        let travel_repo = TravelRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());

        let storage = StorageService::new(storage_root);

        let auth_service = AuthService::new(
            user_repo.clone(),
            profile_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let admin_service = AdminService::new(profile_repo.clone(), db_pool.clone());
        let masterdata_service =
            MasterDataService::new(masterdata_repo.clone(), db_pool.clone());
        let purchase_service = PurchaseService::new(
            purchase_repo,
            masterdata_repo,
            notification_repo.clone(),
            storage.clone(),
            db_pool.clone(),
        );
        let travel_service = TravelService::new(
            travel_repo,
            notification_repo.clone(),
            storage,
        );
        let quote_service = QuoteService::new(currency_api_url, quotations_api_url);

        Ok(Self {
            db_pool,
            port,
            i18n_store: I18nStore::new(),
            notification_repo,
            profile_repo,
            auth_service,
            admin_service,
            masterdata_service,
            purchase_service,
            travel_service,
            quote_service,
        })
    }
}
