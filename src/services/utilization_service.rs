//! Motor de analítica de utilización
//!
//! Calcula tasas de utilización por ventana rodante, identifica períodos
//! idle y mantiene el ciclo de vida de los logs (a lo sumo uno abierto por
//! equipo). Las estadísticas por ventana usan fallback encadenado: cada
//! ventana sin datos hereda el resultado de la ventana anterior más corta.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::equipment::{Equipment, EquipmentStatus, WindowRate};
use crate::models::utilization_log::{IdlePeriod, StartUtilization, UtilizationLog, UtilizationStatus};
use crate::models::utilization_pattern::{PatternType, UtilizationPattern};
use crate::utils::clock::Clock;
use crate::utils::errors::{validation_error, CoreResult};
use crate::utils::time::{hours_between, round2};

/// Servicio de analítica de utilización
pub struct UtilizationService {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl UtilizationService {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Inicia un intervalo de utilización. Si había uno abierto se cierra
    /// primero; invariante: un solo log abierto por equipo.
    pub fn start_utilization(
        &self,
        equipment: &mut Equipment,
        logs: &mut Vec<UtilizationLog>,
        request: StartUtilization,
    ) -> UtilizationLog {
        let now = self.clock.now();

        if let Some(open) = logs.iter_mut().find(|log| log.is_open()) {
            debug!(
                "⏹️ Cerrando log abierto {} antes de iniciar uno nuevo",
                open.id
            );
            open.close(now);
        }

        let log = UtilizationLog {
            id: Uuid::new_v4(),
            equipment_id: equipment.id,
            start_time: request.start_time.unwrap_or(now),
            end_time: None,
            status: request.status.unwrap_or(UtilizationStatus::Active),
            hours_logged: None,
            project_id: request.project_id,
            rental_id: request.rental_id,
            location: request.location,
            notes: request.notes,
            created_by: None,
        };

        equipment.status = EquipmentStatus::InUse;
        logs.push(log.clone());

        info!("▶️ Utilización iniciada para equipo {}", equipment.id);
        log
    }

    /// Cierra el intervalo abierto, si existe, y recalcula las
    /// estadísticas de utilización del equipo
    pub fn end_utilization(
        &self,
        equipment: &mut Equipment,
        logs: &mut Vec<UtilizationLog>,
        end_time: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Option<UtilizationLog> {
        let now = self.clock.now();

        let closed = {
            let open = logs.iter_mut().find(|log| log.is_open())?;
            if notes.is_some() {
                open.notes = notes;
            }
            open.close(end_time.unwrap_or(now));
            open.clone()
        };

        equipment.status = EquipmentStatus::Available;
        self.update_statistics(equipment, logs);

        info!(
            "⏹️ Utilización cerrada para equipo {}: {} horas",
            equipment.id,
            closed.hours_logged.unwrap_or(Decimal::ZERO)
        );
        Some(closed)
    }

    /// Tasa de utilización porcentual sobre una ventana de días.
    ///
    /// Sólo cuentan los logs con status `active`; los abiertos terminan
    /// "ahora". Sin logs en la ventana devuelve 0, no es un error.
    pub fn utilization_rate(&self, logs: &[UtilizationLog], window_days: i64) -> Decimal {
        if window_days <= 0 {
            return Decimal::ZERO;
        }

        let now = self.clock.now();
        let window_start = now - Duration::days(window_days);
        let total_available_hours = Decimal::from(window_days * 24);

        let mut total_utilized_hours = Decimal::ZERO;
        let mut found = false;

        for log in logs {
            if log.status != UtilizationStatus::Active {
                continue;
            }

            let log_end = log.effective_end(now).min(now);
            let log_start = log.start_time.max(window_start);
            if log_end <= log_start {
                continue; // fuera de la ventana
            }

            found = true;
            total_utilized_hours += hours_between(log_start, log_end);
        }

        if !found {
            return Decimal::ZERO;
        }

        round2((total_utilized_hours / total_available_hours) * Decimal::from(100))
    }

    /// Identifica los intervalos idle dentro de la ventana: huecos entre
    /// logs consecutivos más los huecos inicial y final. Sin logs, la
    /// ventana completa es un único intervalo idle.
    pub fn identify_idle_periods(&self, logs: &[UtilizationLog], window_days: i64) -> Vec<IdlePeriod> {
        let now = self.clock.now();
        let window_start = now - Duration::days(window_days.max(0));
        let window_end = now;

        let mut in_window: Vec<&UtilizationLog> = logs
            .iter()
            .filter(|log| log.effective_end(now) > window_start && log.start_time < window_end)
            .collect();
        in_window.sort_by_key(|log| log.start_time);

        if in_window.is_empty() {
            return vec![IdlePeriod {
                start: window_start,
                end: window_end,
                duration_hours: round2(hours_between(window_start, window_end)),
            }];
        }

        let mut idle_periods = Vec::new();
        let mut cursor = window_start;

        for log in in_window {
            if cursor < log.start_time {
                idle_periods.push(IdlePeriod {
                    start: cursor,
                    end: log.start_time,
                    duration_hours: round2(hours_between(cursor, log.start_time)),
                });
            }
            // El cursor nunca retrocede aunque los logs se solapen
            cursor = cursor.max(log.effective_end(now));
        }

        if cursor < window_end {
            idle_periods.push(IdlePeriod {
                start: cursor,
                end: window_end,
                duration_hours: round2(hours_between(cursor, window_end)),
            });
        }

        idle_periods
    }

    /// Recalcula el snapshot de utilización del equipo sobre las ventanas
    /// configuradas (default 30/90/180/365 días).
    ///
    /// Fallback encadenado: una ventana que computa 0 hereda el valor
    /// efectivo de la ventana anterior. Esta política cambia los números
    /// reportados y se preserva deliberadamente.
    pub fn update_statistics(&self, equipment: &mut Equipment, logs: &[UtilizationLog]) {
        let now = self.clock.now();

        let mut rates = Vec::with_capacity(self.config.utilization_windows.len());
        let mut previous = Decimal::ZERO;

        for &window_days in &self.config.utilization_windows {
            let computed = self.utilization_rate(logs, window_days);
            let effective = if computed.is_zero() { previous } else { computed };
            rates.push(WindowRate {
                window_days,
                rate: effective,
            });
            previous = effective;
        }

        let idle_periods = self.identify_idle_periods(logs, self.config.idle_stats_window_days);
        let total_idle_hours: Decimal = idle_periods.iter().map(|p| p.duration_hours).sum();

        equipment.utilization_rates = rates;
        equipment.idle_periods_count = idle_periods.len();
        equipment.total_idle_days = (total_idle_hours / Decimal::from(24)).round_dp(1);
        equipment.last_utilization_update = Some(now);
    }

    /// Equipos activos cuya tasa cacheada de la ventana más corta quedó
    /// por debajo del umbral configurado. Sin snapshot calculado, el
    /// equipo no aparece.
    pub fn low_utilization_equipment<'a>(&self, fleet: &'a [Equipment]) -> Vec<&'a Equipment> {
        let window = match self.config.utilization_windows.first() {
            Some(window) => *window,
            None => return Vec::new(),
        };

        fleet
            .iter()
            .filter(|equipment| equipment.is_active)
            .filter(|equipment| {
                equipment
                    .utilization_rate_for_window(window)
                    .map(|rate| rate < self.config.low_utilization_threshold)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Job de recomputación: construye el patrón de utilización de un
    /// período a partir de sus logs. Un patrón nuevo del mismo tipo
    /// reemplaza al anterior.
    pub fn generate_pattern(
        &self,
        equipment_id: Uuid,
        logs: &[UtilizationLog],
        pattern_type: PatternType,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> CoreResult<UtilizationPattern> {
        if period_end <= period_start {
            return Err(validation_error("period_end", "must be after period_start"));
        }

        let now = self.clock.now();
        let active: Vec<&UtilizationLog> = logs
            .iter()
            .filter(|log| log.status == UtilizationStatus::Active)
            .collect();

        // Capacidad y minutos ocupados por bucket, recorriendo el período
        // en pasos de una hora
        let mut hourly_busy: BTreeMap<u32, i64> = BTreeMap::new();
        let mut hourly_capacity: BTreeMap<u32, i64> = BTreeMap::new();
        let mut daily_busy: BTreeMap<u32, i64> = BTreeMap::new();
        let mut daily_capacity: BTreeMap<u32, i64> = BTreeMap::new();
        let mut monthly_busy: BTreeMap<u32, i64> = BTreeMap::new();
        let mut monthly_capacity: BTreeMap<u32, i64> = BTreeMap::new();

        let mut total_busy_minutes: i64 = 0;
        let mut total_minutes: i64 = 0;

        let mut cursor = period_start;
        while cursor < period_end {
            let slot_end = (cursor + Duration::hours(1)).min(period_end);
            let slot_minutes = (slot_end - cursor).num_minutes();

            let hour = cursor.hour();
            let weekday = cursor.weekday().num_days_from_monday();
            let month = cursor.month();

            let mut busy = 0i64;
            for log in &active {
                let start = log.start_time.max(cursor);
                let end = log.effective_end(now).min(slot_end);
                if end > start {
                    busy += (end - start).num_minutes();
                }
            }
            let busy = busy.min(slot_minutes); // logs solapados no suman de más

            *hourly_busy.entry(hour).or_insert(0) += busy;
            *hourly_capacity.entry(hour).or_insert(0) += slot_minutes;
            *daily_busy.entry(weekday).or_insert(0) += busy;
            *daily_capacity.entry(weekday).or_insert(0) += slot_minutes;
            *monthly_busy.entry(month).or_insert(0) += busy;
            *monthly_capacity.entry(month).or_insert(0) += slot_minutes;

            total_busy_minutes += busy;
            total_minutes += slot_minutes;

            cursor = slot_end;
        }

        let hourly_distribution = distribution(&hourly_busy, &hourly_capacity);
        let daily_distribution = distribution(&daily_busy, &daily_capacity);
        let monthly_distribution = distribution(&monthly_busy, &monthly_capacity);

        let average_utilization = if total_minutes > 0 {
            round2(Decimal::from(total_busy_minutes * 100) / Decimal::from(total_minutes))
        } else {
            Decimal::ZERO
        };

        let primary = match pattern_type {
            PatternType::Daily => &hourly_distribution,
            PatternType::Weekly => &daily_distribution,
            PatternType::Monthly | PatternType::Seasonal => &monthly_distribution,
        };
        let peak_utilization = primary.values().copied().max().unwrap_or(Decimal::ZERO);

        Ok(UtilizationPattern {
            id: Uuid::new_v4(),
            equipment_id,
            pattern_type,
            period_start,
            period_end,
            average_utilization,
            peak_utilization,
            hourly_distribution,
            daily_distribution,
            monthly_distribution,
        })
    }
}

/// Porcentaje de ocupación por bucket a partir de minutos ocupados/capacidad
fn distribution(
    busy: &BTreeMap<u32, i64>,
    capacity: &BTreeMap<u32, i64>,
) -> BTreeMap<u32, Decimal> {
    busy.iter()
        .map(|(bucket, busy_minutes)| {
            let total = capacity.get(bucket).copied().unwrap_or(0);
            let rate = if total > 0 {
                round2(Decimal::from(busy_minutes * 100) / Decimal::from(total))
            } else {
                Decimal::ZERO
            };
            (*bucket, rate)
        })
        .collect()
}
