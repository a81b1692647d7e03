//! Modelo de InventoryItem
//!
//! Contadores de inventario tocados por el ledger de reservas. Invariante:
//! `on_hand` y `reserved` nunca quedan negativos.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Item de inventario con contadores on-hand/reservado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub part_number: Option<String>,
    pub on_hand: i64,
    pub reserved: i64,
    pub reorder_level: Option<i64>,
    pub unit_cost: Option<Decimal>,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, on_hand: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            part_number: None,
            on_hand,
            reserved: 0,
            reorder_level: None,
            unit_cost: None,
        }
    }

    /// Cantidad disponible para reservar
    pub fn available(&self) -> i64 {
        (self.on_hand - self.reserved).max(0)
    }

    /// Verifica si el stock cayó al nivel de reorden o por debajo
    pub fn is_low_stock(&self) -> bool {
        match self.reorder_level {
            Some(level) => self.on_hand <= level,
            None => false,
        }
    }
}
