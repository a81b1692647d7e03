//! Modelo de CostRecord
//!
//! Hechos inmutables de costos por equipo. Append-only: una vez creados
//! nunca se mutan; los agregados sobre ellos viven en el snapshot de
//! Equipment y se recalculan completos en cada inserción.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Tipo de costo: mapea al enum cost_type del sistema
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    Operating,
    Maintenance,
    Repair,
    Fuel,
    Part,
    Labor,
    Insurance,
    Tax,
    Certification,
    Other,
}

impl CostType {
    /// Tipos que alimentan el costo de mantenimiento de por vida
    pub fn is_maintenance_related(&self) -> bool {
        matches!(self, CostType::Maintenance | CostType::Repair | CostType::Part)
    }

    /// Tipos que alimentan los promedios de costo operativo
    pub fn is_operating_related(&self) -> bool {
        matches!(self, CostType::Operating | CostType::Fuel)
    }
}

/// Registro de costo inmutable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRecord {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub cost_type: CostType,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    /// Horas de operación al momento del costo, si se conocían
    pub operating_hours: Option<Decimal>,
    /// Kilometraje al momento del costo, si se conocía
    pub mileage: Option<Decimal>,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Request para registrar un costo nuevo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCostRecord {
    pub cost_type: CostType,
    pub amount: Decimal,
    /// Fecha del costo; si falta se usa "ahora"
    pub date: Option<DateTime<Utc>>,
    pub operating_hours: Option<Decimal>,
    pub mileage: Option<Decimal>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}
