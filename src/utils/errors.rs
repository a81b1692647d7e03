//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del núcleo de tracking.
//! Las operaciones de reserva/liberación de partes usan retornos booleanos
//! en lugar de errores, para que el caller pueda ramificar sin excepciones.

use thiserror::Error;

/// Errores principales del núcleo
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Resultado tipado para operaciones que pueden fallar
pub type CoreResult<T> = Result<T, CoreError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &str, message: &str) -> CoreError {
    CoreError::Validation(format!("{}: {}", field, message))
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> CoreError {
    CoreError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> CoreError {
    CoreError::Conflict(format!(
        "{} with {} '{}' already exists",
        resource, field, value
    ))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> CoreError {
    CoreError::BadRequest(message.to_string())
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> CoreError {
    CoreError::Internal(message.to_string())
}
