//! Modelo de Metric
//!
//! Lecturas de telemetría con timestamp, append-only. Se usan para deltas
//! de uso, downtime acumulado y el factor de eficiencia.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lectura puntual de métricas de un equipo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub operating_hours: Option<Decimal>,
    pub mileage: Option<Decimal>,
    pub cycle_count: Option<i64>,
    pub fuel_consumption: Option<Decimal>,
    /// Eficiencia reportada por el equipo (0-100); puede faltar
    pub efficiency_rating: Option<Decimal>,
    pub downtime_hours: Option<Decimal>,
    pub recorded_by: Option<Uuid>,
}

/// Request para registrar una lectura nueva
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMetric {
    /// Timestamp de la lectura; si falta se usa "ahora"
    pub recorded_at: Option<DateTime<Utc>>,
    pub operating_hours: Option<Decimal>,
    pub mileage: Option<Decimal>,
    pub cycle_count: Option<i64>,
    pub fuel_consumption: Option<Decimal>,
    pub efficiency_rating: Option<Decimal>,
    pub downtime_hours: Option<Decimal>,
}
