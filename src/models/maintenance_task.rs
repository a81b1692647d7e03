//! Modelo de MaintenanceTask
//!
//! Máquina de estados: pending → assigned → in_progress → {completed |
//! cancelled}. Cualquier estado no terminal puede pasar a overdue vía el
//! sweep periódico. Los estados terminales son absorbentes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Estado de la tarea de mantenimiento
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
}

impl TaskStatus {
    /// Los estados terminales no admiten más transiciones
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

/// Tarea de mantenimiento sobre un equipo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub scheduled_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub estimated_duration_minutes: Option<i64>,
    pub actual_duration_minutes: Option<i64>,
    pub completion_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub completed_by: Option<Uuid>,
    pub parts_cost: Option<Decimal>,
    pub labor_cost: Option<Decimal>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceTask {
    /// Verifica si la tarea sigue activa (ni completada ni cancelada)
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == TaskStatus::Cancelled
    }

    /// Verifica si la tarea está vencida respecto de "ahora"
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_date < now && !self.status.is_terminal()
    }

    /// Costo total de la tarea; los componentes no seteados cuentan como 0
    pub fn total_cost(&self) -> Decimal {
        self.parts_cost.unwrap_or(Decimal::ZERO) + self.labor_cost.unwrap_or(Decimal::ZERO)
    }
}

/// Request para crear una tarea de mantenimiento
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMaintenanceTask {
    pub equipment_id: Uuid,
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    pub estimated_duration_minutes: Option<i64>,
    pub parts_cost: Option<Decimal>,
    pub labor_cost: Option<Decimal>,
    pub created_by: Option<Uuid>,
}
