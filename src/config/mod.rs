//! Configuración de los motores
//!
//! Este módulo centraliza las constantes de negocio inyectables: benchmark
//! de costo por hora, ventanas de utilización, pesos del skill matching y
//! defaults de siembra de depreciación. `Default` lleva los valores de
//! producción; `from_env()` permite overrides por variable de entorno.

use rust_decimal::Decimal;
use std::env;

use crate::models::depreciation::DepreciationMethod;

/// Configuración compartida de los motores de tracking
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Benchmark de costo de mantenimiento por hora (USD)
    pub benchmark_cost_per_hour: Decimal,
    /// Ventanas de utilización en días, ordenadas de menor a mayor.
    /// El cálculo de estadísticas aplica fallback encadenado sobre este orden.
    pub utilization_windows: Vec<i64>,
    /// Ventana para el conteo de períodos idle (días)
    pub idle_stats_window_days: i64,
    /// Umbral de utilización baja (porcentaje)
    pub low_utilization_threshold: Decimal,
    /// Pesos del skill matching de técnicos
    pub skill_weights: SkillMatchWeights,
    /// Defaults al sembrar una depreciación desde una valuación
    pub valuation_seed: ValuationSeedDefaults,
}

/// Pesos aditivos del score de matching técnico/equipo
#[derive(Debug, Clone, Copy)]
pub struct SkillMatchWeights {
    /// Specialty del técnico contenida en la categoría del equipo
    pub specialty_category: i64,
    /// Skill contenida en el nombre del equipo
    pub skill_name: i64,
    /// Skill contenida en el tipo o categoría del equipo
    pub skill_type_category: i64,
    /// Skill contenida en el título o descripción de la tarea
    pub skill_task_text: i64,
}

/// Política de siembra de depreciación en la primera valuación.
/// Valores heredados del sistema original; ver DESIGN.md.
#[derive(Debug, Clone)]
pub struct ValuationSeedDefaults {
    /// Valor residual como fracción del monto de valuación
    pub residual_ratio: Decimal,
    /// Vida útil en años
    pub useful_life_years: i32,
    /// Método de depreciación
    pub method: DepreciationMethod,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            benchmark_cost_per_hour: Decimal::from(5),
            utilization_windows: vec![30, 90, 180, 365],
            idle_stats_window_days: 90,
            low_utilization_threshold: Decimal::from(30),
            skill_weights: SkillMatchWeights {
                specialty_category: 5,
                skill_name: 3,
                skill_type_category: 2,
                skill_task_text: 1,
            },
            valuation_seed: ValuationSeedDefaults {
                residual_ratio: Decimal::new(10, 2), // 0.10
                useful_life_years: 5,
                method: DepreciationMethod::StraightLine,
            },
        }
    }
}

impl EngineConfig {
    /// Carga la configuración con overrides opcionales del entorno
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(benchmark) = env::var("BENCHMARK_COST_PER_HOUR")
            .ok()
            .and_then(|v| v.parse::<Decimal>().ok())
        {
            config.benchmark_cost_per_hour = benchmark;
        }

        if let Some(windows) = env::var("UTILIZATION_WINDOWS").ok().map(|v| {
            v.split(',')
                .filter_map(|s| s.trim().parse::<i64>().ok())
                .collect::<Vec<_>>()
        }) {
            if !windows.is_empty() {
                config.utilization_windows = windows;
            }
        }

        if let Some(threshold) = env::var("LOW_UTILIZATION_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<Decimal>().ok())
        {
            config.low_utilization_threshold = threshold;
        }

        config
    }
}
