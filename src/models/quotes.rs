// src/models/quotes.rs
//
// Cotações externas. Dois provedores são consultados a cada 5 minutos:
// o de câmbio e o webhook de cotizaciones; o snapshot mais recente fica
// em memória (AppState) e é servido como está.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Formato do provedor de câmbio (um objeto por moeda).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrencyQuote {
    #[serde(alias = "nombre")]
    pub name: String,

    #[serde(alias = "compra")]
    pub buy: Option<f64>,

    #[serde(alias = "venta")]
    pub sell: Option<f64>,
}

// Formato do webhook de cotizaciones de fornecedores.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExternalQuotation {
    pub reference: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub amount: Option<f64>,

    #[serde(default)]
    pub currency: Option<String>,
}

// O snapshot servido em GET /api/quotes.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBoard {
    pub currency_quotes: Vec<CurrencyQuote>,
    pub quotations: Vec<ExternalQuotation>,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aceita_o_formato_do_provedor_em_espanhol() {
        let json = r#"{ "nombre": "Dólar oficial", "compra": 980.5, "venta": 1020.0 }"#;
        let quote: CurrencyQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.name, "Dólar oficial");
        assert_eq!(quote.buy, Some(980.5));
    }
}
