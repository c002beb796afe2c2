use std::collections::HashMap;

// Catálogo de mensagens de erro voltadas ao usuário final.
// O idioma base do sistema é espanhol; inglês como alternativa.
#[derive(Clone)]
pub struct I18nStore {
    messages: HashMap<(&'static str, &'static str), &'static str>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut m = HashMap::new();

        // --- Espanhol (padrão) ---
        m.insert(("es", "validation"), "Uno o más campos son inválidos.");
        m.insert(("es", "email_exists"), "Este correo ya está en uso.");
        m.insert(("es", "already_exists"), "El registro ya existe.");
        m.insert(("es", "invalid_credentials"), "Correo o contraseña inválidos.");
        m.insert(("es", "invalid_token"), "Token de autenticación inválido o ausente.");
        m.insert(("es", "user_not_found"), "Usuario no encontrado.");
        m.insert(("es", "user_blocked"), "El usuario está bloqueado.");
        m.insert(("es", "not_found"), "Registro no encontrado.");
        m.insert(("es", "permission_denied"), "No tienes permiso para realizar esta acción.");
        m.insert(("es", "budget_code_not_in_lab"), "El código presupuestario no pertenece al laboratorio.");
        m.insert(("es", "invalid_transition"), "La solicitud no admite esta transición de estado.");
        m.insert(("es", "notes_required"), "Las notas de rechazo son obligatorias.");
        m.insert(("es", "internal"), "Ocurrió un error inesperado.");

        // --- Inglês ---
        m.insert(("en", "validation"), "One or more fields are invalid.");
        m.insert(("en", "email_exists"), "This e-mail is already in use.");
        m.insert(("en", "already_exists"), "The record already exists.");
        m.insert(("en", "invalid_credentials"), "Invalid e-mail or password.");
        m.insert(("en", "invalid_token"), "Missing or invalid authentication token.");
        m.insert(("en", "user_not_found"), "User not found.");
        m.insert(("en", "user_blocked"), "This user is blocked.");
        m.insert(("en", "not_found"), "Record not found.");
        m.insert(("en", "permission_denied"), "You do not have permission to perform this action.");
        m.insert(("en", "budget_code_not_in_lab"), "The budget code does not belong to the laboratory.");
        m.insert(("en", "invalid_transition"), "The request does not allow this status transition.");
        m.insert(("en", "notes_required"), "Rejection notes are required.");
        m.insert(("en", "internal"), "An unexpected error occurred.");

        Self { messages: m }
    }

    // Busca com fallback: idioma desconhecido vira "es", chave desconhecida
    // vira a mensagem genérica de erro interno.
    pub fn message(&self, lang: &str, key: &str) -> &'static str {
        let lang = match lang {
            "en" => "en",
            _ => "es",
        };
        let key = normalize_key(key);
        self.messages
            .get(&(lang, key))
            .copied()
            .unwrap_or("Ocurrió un error inesperado.")
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

// O HashMap usa chaves 'static; normalizamos a chave recebida para a versão
// conhecida correspondente (ou "internal").
fn normalize_key(key: &str) -> &'static str {
    match key {
        "validation" => "validation",
        "email_exists" => "email_exists",
        "already_exists" => "already_exists",
        "invalid_credentials" => "invalid_credentials",
        "invalid_token" => "invalid_token",
        "user_not_found" => "user_not_found",
        "user_blocked" => "user_blocked",
        "not_found" => "not_found",
        "permission_denied" => "permission_denied",
        "budget_code_not_in_lab" => "budget_code_not_in_lab",
        "invalid_transition" => "invalid_transition",
        "notes_required" => "notes_required",
        _ => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idioma_desconhecido_cai_no_espanhol() {
        let store = I18nStore::new();
        assert_eq!(store.message("fr", "not_found"), "Registro no encontrado.");
    }

    #[test]
    fn chave_desconhecida_cai_na_mensagem_generica() {
        let store = I18nStore::new();
        assert_eq!(store.message("es", "nope"), "Ocurrió un error inesperado.");
    }

    #[test]
    fn ingles_quando_pedido() {
        let store = I18nStore::new();
        assert_eq!(
            store.message("en", "permission_denied"),
            "You do not have permission to perform this action."
        );
    }
}
