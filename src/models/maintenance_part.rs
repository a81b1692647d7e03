//! Modelo de MaintenancePart
//!
//! Línea de parte requerida por una tarea de mantenimiento. Las operaciones
//! de reserva/consumo mutan los contadores del InventoryItem referenciado a
//! través del ledger; el estado de la línea es derivado, nunca almacenado.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Estado derivado de la línea de parte
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PartStatus {
    Used,
    PartiallyUsed,
    Reserved,
    Pending,
}

impl fmt::Display for PartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PartStatus::Used => "Used",
            PartStatus::PartiallyUsed => "Partially Used",
            PartStatus::Reserved => "Reserved",
            PartStatus::Pending => "Pending",
        };
        write!(f, "{}", label)
    }
}

/// Parte requerida/consumida por una tarea de mantenimiento
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenancePart {
    pub id: Uuid,
    pub task_id: Uuid,
    /// Referencia al inventario; puede faltar (modo degradado)
    pub inventory_item_id: Option<Uuid>,
    pub part_number: Option<String>,
    pub quantity_required: i64,
    pub quantity_used: Option<i64>,
    pub cost_per_unit: Option<Decimal>,
    pub is_reserved: bool,
    pub reserved_by: Option<Uuid>,
    pub reservation_date: Option<DateTime<Utc>>,
    pub reservation_expiry: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

impl MaintenancePart {
    pub fn new(task_id: Uuid, inventory_item_id: Option<Uuid>, quantity_required: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            inventory_item_id,
            part_number: None,
            quantity_required,
            quantity_used: None,
            cost_per_unit: None,
            is_reserved: false,
            reserved_by: None,
            reservation_date: None,
            reservation_expiry: None,
            notes: None,
            created_by: None,
        }
    }

    /// Deriva el estado de la línea a partir de reserva y consumo
    pub fn status(&self) -> PartStatus {
        match self.quantity_used {
            Some(used) if used >= self.quantity_required => PartStatus::Used,
            Some(used) if used > 0 => PartStatus::PartiallyUsed,
            _ if self.is_reserved => PartStatus::Reserved,
            _ => PartStatus::Pending,
        }
    }

    /// Costo total de la línea si se conoce el costo unitario
    pub fn total_cost(&self) -> Option<Decimal> {
        self.cost_per_unit
            .map(|unit| unit * Decimal::from(self.quantity_required))
    }

    /// Limpia los campos de reserva (al liberar o consumir)
    pub(crate) fn clear_reservation(&mut self) {
        self.is_reserved = false;
        self.reserved_by = None;
        self.reservation_date = None;
        self.reservation_expiry = None;
    }
}
