//! Motor de costos y eficiencia
//!
//! Registra costos y lecturas de métricas (ambos append-only) y recalcula
//! los agregados cacheados en Equipment: costo de mantenimiento de por
//! vida, promedios operativos, estadísticas de uso diario y el rating
//! compuesto de eficiencia. Recalcular desde el historial completo hace a
//! cada agregado idempotente.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::EngineConfig;
use crate::models::cost_record::{CostRecord, NewCostRecord};
use crate::models::equipment::Equipment;
use crate::models::metric::{Metric, NewMetric};
use crate::utils::clock::Clock;
use crate::utils::errors::{bad_request_error, validation_error, CoreResult};
use crate::utils::time::round2;

/// Servicio de costos, métricas y eficiencia
pub struct CostService {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl CostService {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Registra un costo y recalcula los agregados afectados según el tipo
    pub fn record_cost(
        &self,
        equipment: &mut Equipment,
        records: &mut Vec<CostRecord>,
        new_record: NewCostRecord,
    ) -> CoreResult<CostRecord> {
        new_record
            .validate()
            .map_err(|e| bad_request_error(&format!("invalid cost record: {}", e)))?;

        if new_record.amount <= Decimal::ZERO {
            return Err(validation_error("amount", "must be greater than zero"));
        }

        let record = CostRecord {
            id: Uuid::new_v4(),
            equipment_id: equipment.id,
            cost_type: new_record.cost_type,
            amount: new_record.amount,
            date: new_record.date.unwrap_or_else(|| self.clock.now()),
            // Sin lectura explícita, se estampa el odómetro actual del equipo
            operating_hours: new_record
                .operating_hours
                .or(equipment.current_operating_hours),
            mileage: new_record.mileage.or(equipment.current_mileage),
            description: new_record.description,
            created_by: None,
        };

        records.push(record.clone());

        if record.cost_type.is_maintenance_related() {
            self.update_lifetime_maintenance_cost(equipment, records);
        }
        if record.cost_type.is_operating_related() {
            self.update_operating_cost_averages(equipment, records);
        }

        info!(
            "💰 Costo registrado para equipo {}: {:?} por {}",
            equipment.id, record.cost_type, record.amount
        );
        Ok(record)
    }

    /// Recalcula el costo de mantenimiento de por vida desde el historial
    /// completo (mantenimiento + reparación + repuestos)
    pub fn update_lifetime_maintenance_cost(
        &self,
        equipment: &mut Equipment,
        records: &[CostRecord],
    ) -> Decimal {
        let total: Decimal = records
            .iter()
            .filter(|r| r.cost_type.is_maintenance_related())
            .map(|r| r.amount)
            .sum();

        equipment.lifetime_maintenance_cost = total;
        total
    }

    /// Recalcula los promedios de costo operativo por hora y por milla.
    /// Sin denominadores positivos el promedio queda en `None`, nunca cero.
    pub fn update_operating_cost_averages(
        &self,
        equipment: &mut Equipment,
        records: &[CostRecord],
    ) {
        let operating: Vec<&CostRecord> = records
            .iter()
            .filter(|r| r.cost_type.is_operating_related())
            .collect();

        let total: Decimal = operating.iter().map(|r| r.amount).sum();

        let total_hours: Decimal = operating
            .iter()
            .filter_map(|r| r.operating_hours)
            .filter(|h| *h > Decimal::ZERO)
            .sum();
        let total_miles: Decimal = operating
            .iter()
            .filter_map(|r| r.mileage)
            .filter(|m| *m > Decimal::ZERO)
            .sum();

        equipment.avg_operating_cost_per_hour = if total_hours > Decimal::ZERO {
            Some(round2(total / total_hours))
        } else {
            None
        };
        equipment.avg_operating_cost_per_mile = if total_miles > Decimal::ZERO {
            Some(round2(total / total_miles))
        } else {
            None
        };
    }

    /// Registra una lectura de métricas y actualiza el snapshot del equipo
    pub fn record_metric(
        &self,
        equipment: &mut Equipment,
        metrics: &mut Vec<Metric>,
        new_metric: NewMetric,
    ) -> Metric {
        let metric = Metric {
            id: Uuid::new_v4(),
            equipment_id: equipment.id,
            recorded_at: new_metric.recorded_at.unwrap_or_else(|| self.clock.now()),
            operating_hours: new_metric.operating_hours,
            mileage: new_metric.mileage,
            cycle_count: new_metric.cycle_count,
            fuel_consumption: new_metric.fuel_consumption,
            efficiency_rating: new_metric.efficiency_rating,
            downtime_hours: new_metric.downtime_hours,
            recorded_by: None,
        };

        equipment.apply_metric(&metric);
        metrics.push(metric.clone());

        debug!("📊 Métrica registrada para equipo {}", equipment.id);
        metric
    }

    /// Estadísticas de uso diario sobre una ventana: promedio de horas y
    /// millas por día entre la primera y la última lectura.
    ///
    /// Devuelve `false` sin tocar el equipo si hay menos de dos lecturas
    /// en la ventana.
    pub fn update_usage_statistics(
        &self,
        equipment: &mut Equipment,
        metrics: &[Metric],
        window_days: i64,
    ) -> bool {
        let now = self.clock.now();
        let window_start = now - chrono::Duration::days(window_days.max(0));

        let mut in_window: Vec<&Metric> = metrics
            .iter()
            .filter(|m| m.recorded_at >= window_start && m.recorded_at <= now)
            .collect();
        in_window.sort_by_key(|m| m.recorded_at);

        let (first, last) = match (in_window.first(), in_window.last()) {
            (Some(first), Some(last)) if first.id != last.id => (*first, *last),
            _ => return false,
        };

        let days = (last.recorded_at - first.recorded_at).num_days().max(1);
        let days = Decimal::from(days);

        equipment.avg_daily_usage_hours = match (first.operating_hours, last.operating_hours) {
            (Some(first_hours), Some(last_hours)) => {
                Some(round2((last_hours - first_hours) / days))
            }
            _ => None,
        };
        equipment.avg_daily_usage_miles = match (first.mileage, last.mileage) {
            (Some(first_miles), Some(last_miles)) => {
                Some(round2((last_miles - first_miles) / days))
            }
            _ => None,
        };

        true
    }

    /// Rating compuesto de eficiencia (0-100):
    /// 50% eficiencia de métrica + 25% factor de costo + 25% factor de
    /// disponibilidad.
    ///
    /// Sin ninguna lectura con eficiencia no-nula devuelve `None`; nunca
    /// se sustituye un default.
    pub fn efficiency_rating(
        &self,
        equipment: &mut Equipment,
        metrics: &[Metric],
    ) -> Option<Decimal> {
        let metric_efficiency = metrics
            .iter()
            .filter(|m| m.efficiency_rating.is_some())
            .max_by_key(|m| m.recorded_at)
            .and_then(|m| m.efficiency_rating)?;

        let hours = equipment
            .current_operating_hours
            .filter(|h| *h > Decimal::ZERO)
            .unwrap_or(Decimal::ONE);

        let maintenance_cost_per_hour = equipment.lifetime_maintenance_cost / hours;
        let cost_factor = if maintenance_cost_per_hour > Decimal::ZERO {
            (self.config.benchmark_cost_per_hour / maintenance_cost_per_hour).min(Decimal::ONE)
        } else {
            Decimal::ONE
        };

        let total_downtime: Decimal = metrics.iter().filter_map(|m| m.downtime_hours).sum();
        let total_possible_hours =
            Decimal::from((self.clock.now() - equipment.created_at).num_hours().max(1));
        let uptime_factor =
            (Decimal::ONE - total_downtime / total_possible_hours).min(Decimal::ONE);

        let rating = round2(
            metric_efficiency * Decimal::new(5, 1)
                + cost_factor * Decimal::from(25)
                + uptime_factor * Decimal::from(25),
        );

        equipment.efficiency_rating = Some(rating);
        Some(rating)
    }

    /// Costo total de propiedad: costo de compra más todos los costos
    /// registrados. `None` si no hay costo de compra.
    pub fn total_cost_of_ownership(
        &self,
        equipment: &Equipment,
        records: &[CostRecord],
    ) -> Option<Decimal> {
        let purchase_cost = equipment.purchase_cost?;
        let recorded: Decimal = records.iter().map(|r| r.amount).sum();
        Some(purchase_cost + recorded)
    }

    /// Costo de mantenimiento por hora de operación acumulada.
    /// `None` sin costos o sin horas positivas.
    pub fn maintenance_cost_per_hour(&self, equipment: &Equipment) -> Option<Decimal> {
        if equipment.lifetime_maintenance_cost <= Decimal::ZERO {
            return None;
        }

        let lifetime_hours = equipment
            .lifetime_operating_hours()
            .filter(|h| *h > Decimal::ZERO)?;

        Some(round2(equipment.lifetime_maintenance_cost / lifetime_hours))
    }

    /// Señal de reemplazo: totalmente depreciado, vida útil restante menor
    /// a un año, o mantenimiento acumulado por encima del 50% del costo de
    /// compra
    pub fn should_consider_replacement(
        &self,
        equipment: &Equipment,
        remaining_useful_life_years: Option<Decimal>,
    ) -> bool {
        if equipment.is_fully_depreciated {
            return true;
        }

        if let Some(remaining) = remaining_useful_life_years {
            if remaining < Decimal::ONE {
                return true;
            }
        }

        match equipment.purchase_cost {
            Some(purchase_cost)
                if purchase_cost > Decimal::ZERO
                    && equipment.lifetime_maintenance_cost > Decimal::ZERO =>
            {
                let ratio = equipment.lifetime_maintenance_cost / purchase_cost;
                if ratio > Decimal::new(5, 1) {
                    warn!(
                        "⚠️ Equipo {} supera el umbral de mantenimiento: ratio {}",
                        equipment.id,
                        round2(ratio)
                    );
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}
