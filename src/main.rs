// src/main.rs

use tokio::net::TcpListener;

use lab_backoffice::{config::AppState, routes};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Task de fundo das cotações: primeiro fetch imediato, depois a cada 5 min
    let quote_service = app_state.quote_service.clone();
    tokio::spawn(async move {
        quote_service.run_poller().await;
    });

    let addr = format!("0.0.0.0:{}", app_state.port);
    let app = routes::build_router(app_state);

    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
