//! Modelo de UtilizationPattern
//!
//! Snapshot periódico derivado de los logs de utilización. Un pattern nuevo
//! del mismo tipo reemplaza al anterior, nunca se mergea. Las distribuciones
//! van por bucket (hora 0-23, día de semana 0-6, mes 1-12) y mantienen el
//! orden natural de claves; los empates en los rankings se resuelven por
//! ese orden.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::utils::errors::{CoreResult, validation_error};

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Tipo de patrón de utilización
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Daily,
    Weekly,
    Monthly,
    Seasonal,
}

/// Patrón de utilización derivado para un período
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilizationPattern {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub pattern_type: PatternType,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub average_utilization: Decimal,
    pub peak_utilization: Decimal,
    /// Utilización promedio por hora del día (0-23)
    pub hourly_distribution: BTreeMap<u32, Decimal>,
    /// Utilización promedio por día de la semana (0 = lunes)
    pub daily_distribution: BTreeMap<u32, Decimal>,
    /// Utilización promedio por mes (1-12)
    pub monthly_distribution: BTreeMap<u32, Decimal>,
}

/// Bucket con utilización por debajo del umbral
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LowUtilizationPeriod {
    pub period: String,
    pub utilization: Decimal,
}

/// Delta por bucket entre dos patrones
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketChange {
    pub current: Decimal,
    pub previous: Decimal,
    pub change: Decimal,
    pub change_percentage: Decimal,
}

/// Resultado de comparar un patrón con el período anterior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternComparison {
    pub average_change: Decimal,
    pub average_change_percentage: Decimal,
    pub peak_change: Decimal,
    pub peak_change_percentage: Decimal,
    pub is_improving: bool,
    pub detailed_changes: BTreeMap<String, BucketChange>,
}

impl UtilizationPattern {
    /// Top-N de horas pico, orden descendente por valor.
    /// Sort estable: los empates conservan el orden de clave original.
    pub fn identify_peak_hours(&self, top_n: usize) -> Vec<(u32, Decimal)> {
        top_buckets(&self.hourly_distribution, top_n)
    }

    /// Top-N de días pico, orden descendente por valor
    pub fn identify_peak_days(&self, top_n: usize) -> Vec<(u32, Decimal)> {
        top_buckets(&self.daily_distribution, top_n)
    }

    /// Buckets con utilización por debajo del umbral, etiquetados según
    /// el tipo de patrón
    pub fn identify_low_utilization_periods(&self, threshold: Decimal) -> Vec<LowUtilizationPeriod> {
        let mut low_periods = Vec::new();

        match self.pattern_type {
            PatternType::Daily => {
                for (hour, utilization) in &self.hourly_distribution {
                    if *utilization < threshold {
                        low_periods.push(LowUtilizationPeriod {
                            period: format!("Hour {}", hour),
                            utilization: *utilization,
                        });
                    }
                }
            }
            PatternType::Weekly => {
                for (day, utilization) in &self.daily_distribution {
                    if *utilization < threshold {
                        let name = DAY_NAMES
                            .get(*day as usize)
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| format!("Day {}", day));
                        low_periods.push(LowUtilizationPeriod {
                            period: name,
                            utilization: *utilization,
                        });
                    }
                }
            }
            PatternType::Monthly | PatternType::Seasonal => {
                for (month, utilization) in &self.monthly_distribution {
                    if *utilization < threshold {
                        let name = MONTH_NAMES
                            .get((*month as usize).wrapping_sub(1))
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| format!("Month {}", month));
                        low_periods.push(LowUtilizationPeriod {
                            period: name,
                            utilization: *utilization,
                        });
                    }
                }
            }
        }

        low_periods
    }

    /// Compara este patrón con el del período anterior.
    /// Requiere el mismo `pattern_type`; los porcentajes con denominador
    /// cero se reportan como 0%.
    pub fn compare_with_previous(&self, previous: &UtilizationPattern) -> CoreResult<PatternComparison> {
        if self.pattern_type != previous.pattern_type {
            return Err(validation_error(
                "pattern_type",
                "cannot compare patterns of different types",
            ));
        }

        let average_change = self.average_utilization - previous.average_utilization;
        let peak_change = self.peak_utilization - previous.peak_utilization;

        let mut detailed_changes = BTreeMap::new();

        match self.pattern_type {
            PatternType::Daily => {
                for (hour, value) in &self.hourly_distribution {
                    let prev_value = previous
                        .hourly_distribution
                        .get(hour)
                        .copied()
                        .unwrap_or(Decimal::ZERO);
                    detailed_changes
                        .insert(format!("hour_{}", hour), bucket_change(*value, prev_value));
                }
            }
            PatternType::Weekly => {
                for (day, value) in &self.daily_distribution {
                    let prev_value = previous
                        .daily_distribution
                        .get(day)
                        .copied()
                        .unwrap_or(Decimal::ZERO);
                    let name = DAY_NAMES
                        .get(*day as usize)
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| format!("day_{}", day));
                    detailed_changes.insert(name, bucket_change(*value, prev_value));
                }
            }
            PatternType::Monthly | PatternType::Seasonal => {
                for (month, value) in &self.monthly_distribution {
                    let prev_value = previous
                        .monthly_distribution
                        .get(month)
                        .copied()
                        .unwrap_or(Decimal::ZERO);
                    detailed_changes
                        .insert(format!("month_{}", month), bucket_change(*value, prev_value));
                }
            }
        }

        Ok(PatternComparison {
            average_change,
            average_change_percentage: percent_change(average_change, previous.average_utilization),
            peak_change,
            peak_change_percentage: percent_change(peak_change, previous.peak_utilization),
            is_improving: average_change > Decimal::ZERO,
            detailed_changes,
        })
    }
}

/// Ordena un mapa de buckets por valor descendente y toma los primeros N
fn top_buckets(distribution: &BTreeMap<u32, Decimal>, top_n: usize) -> Vec<(u32, Decimal)> {
    let mut buckets: Vec<(u32, Decimal)> = distribution.iter().map(|(k, v)| (*k, *v)).collect();
    buckets.sort_by(|a, b| b.1.cmp(&a.1)); // sort estable de la stdlib
    buckets.truncate(top_n);
    buckets
}

fn bucket_change(current: Decimal, previous: Decimal) -> BucketChange {
    let change = current - previous;
    BucketChange {
        current,
        previous,
        change,
        change_percentage: percent_change(change, previous),
    }
}

fn percent_change(change: Decimal, previous: Decimal) -> Decimal {
    if previous > Decimal::ZERO {
        (change / previous) * Decimal::from(100)
    } else {
        Decimal::ZERO
    }
}
