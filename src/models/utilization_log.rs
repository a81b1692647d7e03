//! Modelo de UtilizationLog
//!
//! Intervalos de uso del equipo. Un log con `end_time = None` está abierto;
//! el motor garantiza que haya a lo sumo uno abierto por equipo cerrando el
//! anterior antes de abrir uno nuevo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::time::{hours_between, round2};

/// Estado del intervalo de utilización
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationStatus {
    Active,
    Idle,
    Standby,
    Maintenance,
}

/// Intervalo de utilización de un equipo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilizationLog {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: UtilizationStatus,
    /// Horas del intervalo, 2 decimales; se fija al cerrar
    pub hours_logged: Option<Decimal>,
    pub project_id: Option<Uuid>,
    pub rental_id: Option<Uuid>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

impl UtilizationLog {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Cierra el intervalo y calcula las horas registradas
    pub fn close(&mut self, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
        self.hours_logged = Some(round2(hours_between(self.start_time, end_time)));
    }

    /// Fin efectivo del intervalo para cálculos: los abiertos terminan "ahora"
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end_time.unwrap_or(now)
    }
}

/// Request para iniciar un intervalo de utilización
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartUtilization {
    /// Inicio del intervalo; si falta se usa "ahora"
    pub start_time: Option<DateTime<Utc>>,
    pub status: Option<UtilizationStatus>,
    pub project_id: Option<Uuid>,
    pub rental_id: Option<Uuid>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Intervalo idle identificado dentro de una ventana
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdlePeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_hours: Decimal,
}
