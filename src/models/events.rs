//! Hechos de dominio emitidos por los motores
//!
//! El núcleo sólo produce el hecho; el envío (notificaciones, webhooks) es
//! responsabilidad de un colaborador externo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Evento de dominio para entrega externa
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    TaskAssigned {
        task_id: Uuid,
        equipment_id: Uuid,
        technician_id: Uuid,
        scheduled_date: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: Uuid,
        equipment_id: Uuid,
        completed_by: Uuid,
        completed_date: DateTime<Utc>,
    },
    LowStock {
        inventory_item_id: Uuid,
        part_number: Option<String>,
        on_hand: i64,
        reorder_level: i64,
    },
}
