use thiserror::Error;

use crate::contract::model::OrderStatus;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Dish '{name}' is currently unavailable")]
    DishUnavailable { name: String },

    #[error("Order status cannot change from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("Admin access required")]
    AdminLocked,

    #[error("Admin access blocked after {attempts} failed attempts")]
    AdminBlocked { attempts: u32 },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Wrap an infra failure; the full context chain ends up in the message.
    pub(crate) fn from_infra(err: anyhow::Error) -> Self {
        Self::backend(format!("{err:#}"))
    }
}
