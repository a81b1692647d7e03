//! Modelo de Equipment
//!
//! Este módulo contiene el snapshot mutable del equipo junto con sus
//! helpers puros. Los campos derivados (costos promedio, tasas de
//! utilización, valor depreciado) son un cache que los motores recalculan;
//! la fuente de verdad son los registros históricos append-only.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::metric::Metric;

/// Estado operacional del equipo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    Available,
    InUse,
    Maintenance,
    Retired,
}

/// Tasa de utilización cacheada para una ventana de días
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowRate {
    pub window_days: i64,
    pub rate: Decimal,
}

/// Equipment principal: snapshot de identidad + valores derivados
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub equipment_type: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub status: EquipmentStatus,
    pub is_active: bool,

    pub purchase_date: Option<NaiveDate>,
    pub purchase_cost: Option<Decimal>,

    // Métricas actuales e iniciales
    pub current_operating_hours: Option<Decimal>,
    pub current_mileage: Option<Decimal>,
    pub current_cycle_count: Option<i64>,
    pub initial_operating_hours: Option<Decimal>,
    pub initial_mileage: Option<Decimal>,
    pub initial_cycle_count: Option<i64>,
    pub last_metric_update: Option<DateTime<Utc>>,

    // Agregados de costos. `None` significa "sin datos", nunca cero.
    pub lifetime_maintenance_cost: Decimal,
    pub avg_operating_cost_per_hour: Option<Decimal>,
    pub avg_operating_cost_per_mile: Option<Decimal>,
    pub avg_daily_usage_hours: Option<Decimal>,
    pub avg_daily_usage_miles: Option<Decimal>,
    pub efficiency_rating: Option<Decimal>,

    // Snapshot de depreciación
    pub depreciated_value: Option<Decimal>,
    pub is_fully_depreciated: bool,
    pub replacement_cost_estimate: Option<Decimal>,
    pub last_depreciation_update: Option<DateTime<Utc>>,

    // Snapshot de utilización por ventana
    pub utilization_rates: Vec<WindowRate>,
    pub idle_periods_count: usize,
    pub total_idle_days: Decimal,
    pub last_utilization_update: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Equipment {
    /// Crea un equipo nuevo con el snapshot derivado vacío
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        equipment_type: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            category: category.into(),
            equipment_type: equipment_type.into(),
            model: None,
            manufacturer: None,
            serial_number: None,
            status: EquipmentStatus::Available,
            is_active: true,
            purchase_date: None,
            purchase_cost: None,
            current_operating_hours: None,
            current_mileage: None,
            current_cycle_count: None,
            initial_operating_hours: None,
            initial_mileage: None,
            initial_cycle_count: None,
            last_metric_update: None,
            lifetime_maintenance_cost: Decimal::ZERO,
            avg_operating_cost_per_hour: None,
            avg_operating_cost_per_mile: None,
            avg_daily_usage_hours: None,
            avg_daily_usage_miles: None,
            efficiency_rating: None,
            depreciated_value: None,
            is_fully_depreciated: false,
            replacement_cost_estimate: None,
            last_depreciation_update: None,
            utilization_rates: Vec::new(),
            idle_periods_count: 0,
            total_idle_days: Decimal::ZERO,
            last_utilization_update: None,
            created_at,
        }
    }

    /// Verifica si el equipo está disponible para uso
    pub fn is_available(&self) -> bool {
        self.status == EquipmentStatus::Available
    }

    /// Soft-delete: el equipo nunca se borra mientras exista historial
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.status = EquipmentStatus::Retired;
    }

    /// Aplica una lectura de métricas al snapshot actual
    pub fn apply_metric(&mut self, metric: &Metric) {
        if let Some(hours) = metric.operating_hours {
            self.current_operating_hours = Some(hours);
        }
        if let Some(mileage) = metric.mileage {
            self.current_mileage = Some(mileage);
        }
        if let Some(cycles) = metric.cycle_count {
            self.current_cycle_count = Some(cycles);
        }
        self.last_metric_update = Some(metric.recorded_at);
    }

    /// Horas de operación acumuladas desde la puesta en servicio.
    /// Si no hay lectura inicial, las horas actuales se toman completas.
    pub fn lifetime_operating_hours(&self) -> Option<Decimal> {
        let current = self.current_operating_hours?;
        match self.initial_operating_hours {
            Some(initial) => Some(current - initial),
            None => Some(current),
        }
    }

    /// Uso acumulado del equipo (horas, millas, ciclos)
    pub fn lifetime_usage(&self) -> LifetimeUsage {
        LifetimeUsage {
            operating_hours: match (self.initial_operating_hours, self.current_operating_hours) {
                (Some(initial), Some(current)) => Some(current - initial),
                _ => None,
            },
            mileage: match (self.initial_mileage, self.current_mileage) {
                (Some(initial), Some(current)) => Some(current - initial),
                _ => None,
            },
            cycles: match (self.initial_cycle_count, self.current_cycle_count) {
                (Some(initial), Some(current)) => Some(current - initial),
                _ => None,
            },
        }
    }

    /// Tasa de utilización cacheada para una ventana, si fue calculada
    pub fn utilization_rate_for_window(&self, window_days: i64) -> Option<Decimal> {
        self.utilization_rates
            .iter()
            .find(|r| r.window_days == window_days)
            .map(|r| r.rate)
    }
}

/// Uso acumulado del equipo desde las lecturas iniciales
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifetimeUsage {
    pub operating_hours: Option<Decimal>,
    pub mileage: Option<Decimal>,
    pub cycles: Option<i64>,
}
