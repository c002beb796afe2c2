// src/services/quote_service.rs
//
// Cotações externas. O sistema anterior consultava os dois provedores a
// cada 5 minutos; aqui quem faz isso é uma task de fundo, e os handlers
// servem o snapshot em memória sem tocar a rede.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::quotes::{CurrencyQuote, ExternalQuotation, QuoteBoard};

const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct QuoteService {
    client: reqwest::Client,
    currency_api_url: String,
    quotations_api_url: String,
    board: Arc<RwLock<QuoteBoard>>,
}

impl QuoteService {
    pub fn new(currency_api_url: String, quotations_api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            currency_api_url,
            quotations_api_url,
            board: Arc::new(RwLock::new(QuoteBoard::default())),
        }
    }

    pub async fn snapshot(&self) -> QuoteBoard {
        self.board.read().await.clone()
    }

    // Loop de atualização. Roda para sempre; falhas de rede só geram log e
    // o snapshot anterior continua valendo.
    pub async fn run_poller(self) {
        let mut interval = tokio::time::interval(REFRESH_INTERVAL);
        loop {
            interval.tick().await;
            self.refresh_once().await;
        }
    }

    pub async fn refresh_once(&self) {
        let currency_quotes = match self.fetch_currency_quotes().await {
            Ok(quotes) => Some(quotes),
            Err(e) => {
                tracing::warn!("⚠️ Falha ao buscar câmbio: {}", e);
                None
            }
        };

        let quotations = match self.fetch_quotations().await {
            Ok(quotations) => Some(quotations),
            Err(e) => {
                tracing::warn!("⚠️ Falha ao buscar cotizaciones: {}", e);
                None
            }
        };

        if currency_quotes.is_none() && quotations.is_none() {
            // Nada novo; o snapshot anterior segue valendo com a data antiga.
            return;
        }

        let mut board = self.board.write().await;
        if let Some(quotes) = currency_quotes {
            board.currency_quotes = quotes;
        }
        if let Some(quotations) = quotations {
            board.quotations = quotations;
        }
        board.fetched_at = Some(Utc::now());
    }

    async fn fetch_currency_quotes(&self) -> Result<Vec<CurrencyQuote>, reqwest::Error> {
        self.client
            .get(&self.currency_api_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn fetch_quotations(&self) -> Result<Vec<ExternalQuotation>, reqwest::Error> {
        self.client
            .get(&self.quotations_api_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn falha_nos_dois_provedores_nao_marca_atualizacao() {
        // Porta 1 recusa conexão; as duas buscas falham.
        let service = QuoteService::new(
            "http://127.0.0.1:1/cambio".to_string(),
            "http://127.0.0.1:1/cotizaciones".to_string(),
        );

        service.refresh_once().await;

        let board = service.snapshot().await;
        assert!(board.fetched_at.is_none());
        assert!(board.currency_quotes.is_empty());
        assert!(board.quotations.is_empty());
    }
}
