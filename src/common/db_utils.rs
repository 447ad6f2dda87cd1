use crate::common::error::AppError;

// ---
// Helper: Tradução de violações de constraint
// ---
/// Converte violações de unicidade / chave estrangeira em `AppError::Conflict`
/// com a mensagem fornecida. Qualquer outro erro segue como `DatabaseError`.
pub(crate) fn map_constraint_violation(e: sqlx::Error, conflict_message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            tracing::debug!(
                constraint = db_err.constraint().unwrap_or_default(),
                "Violação de constraint"
            );
            return AppError::Conflict(conflict_message.to_string());
        }
    }
    e.into()
}

/// Igual a `map_constraint_violation`, mas só trata unicidade. Usado nas
/// inserções de associações, onde a chave estrangeira ausente já foi checada.
pub(crate) fn map_unique_violation(e: sqlx::Error, conflict_message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(conflict_message.to_string());
        }
    }
    e.into()
}
