// src/models/profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

// O perfil é o único sinal de autorização exposto aos clientes: papel,
// flag de admin, flag de bloqueio e laboratório atribuído.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub role_id: Uuid,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub laboratory_id: Option<Uuid>,
    pub selected_area: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha do painel de administração: users × profiles × roles × laboratories
// resolvido num único JOIN (o sistema anterior juntava duas fontes no cliente).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRow {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role_id: Uuid,
    pub role_name: String,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub laboratory_id: Option<Uuid>,
    pub laboratory_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Resposta de /users/me: usuário + perfil + papel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub profile: Profile,
    pub role: Role,
}

// As áreas navegáveis do sistema. Persistido em profiles.selected_area
// (substitui a chave de localStorage do sistema anterior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Area {
    Compras,
    DatosMaestros,
    Secretaria,
    Mantenimiento,
}

impl Area {
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Compras => "compras",
            Area::DatosMaestros => "datos-maestros",
            Area::Secretaria => "secretaria",
            Area::Mantenimiento => "mantenimiento",
        }
    }
}

// ---
// Payloads da administração de usuários
// ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetBlockedPayload {
    pub is_blocked: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminPayload {
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRolePayload {
    pub role_id: Uuid,
}

// `null` desvincula o laboratório
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetLaboratoryPayload {
    pub laboratory_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectAreaPayload {
    pub area: Area,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_serializa_em_kebab_case() {
        let json = serde_json::to_string(&Area::DatosMaestros).unwrap();
        assert_eq!(json, "\"datos-maestros\"");
        assert_eq!(Area::DatosMaestros.as_str(), "datos-maestros");
    }

    #[test]
    fn area_invalida_nao_desserializa() {
        assert!(serde_json::from_str::<Area>("\"ventas\"").is_err());
    }
}
