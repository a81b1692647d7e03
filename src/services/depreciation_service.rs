//! Motor de depreciación
//!
//! Calcula el valor libro bajo los cuatro métodos contables, genera el
//! schedule año a año y procesa valuaciones externas. Los años transcurridos
//! usan la fracción juliana (días / 365.25); ese detalle debe mantenerse
//! exacto para que los schedules regenerados coincidan con los históricos.

use chrono::{Months, NaiveDate};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::depreciation::{
    Depreciation, DepreciationMethod, ScheduleYear, ValuationRecord,
};
use crate::models::equipment::Equipment;
use crate::utils::clock::Clock;
use crate::utils::errors::{validation_error, CoreResult};
use crate::utils::time::{round2, years_elapsed};

/// Servicio de valuación por depreciación
pub struct DepreciationService {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl DepreciationService {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Valor libro del activo a una fecha dada.
    ///
    /// Antes del inicio de depreciación devuelve el valor inicial; en o
    /// después de `fully_depreciated_date` devuelve el residual. El resto
    /// despacha según el método configurado.
    pub fn current_value(&self, dep: &Depreciation, as_of: NaiveDate) -> CoreResult<Decimal> {
        if as_of <= dep.depreciation_start_date {
            return Ok(dep.initial_value);
        }

        if let Some(fully_date) = dep.fully_depreciated_date {
            if as_of >= fully_date {
                return Ok(dep.residual_value);
            }
        }

        let years = years_elapsed(dep.depreciation_start_date, as_of);

        match dep.method {
            DepreciationMethod::StraightLine => self.straight_line_value(dep, years),
            DepreciationMethod::DoubleDeclining => self.double_declining_value(dep, years),
            DepreciationMethod::SumOfYearsDigits => self.sum_of_years_value(dep, years),
            // Depende de datos de uso inyectados por el caller; sin ellos
            // se devuelve el valor corriente almacenado
            DepreciationMethod::UnitsOfProduction => Ok(dep.current_value),
        }
    }

    /// Depreciación lineal: cargo anual constante hasta la vida útil,
    /// con piso en el valor residual
    pub fn straight_line_value(&self, dep: &Depreciation, years: Decimal) -> CoreResult<Decimal> {
        let life = validated_life(dep)?;

        let annual = dep.depreciable_value() / life;
        let accumulated = annual * years.min(life);

        Ok((dep.initial_value - accumulated).max(dep.residual_value))
    }

    /// Doble saldo decreciente con cambio a lineal: en cada año, si el
    /// cargo decreciente cae por debajo del lineal para los años restantes,
    /// el resto de la vida se deprecia en línea recta
    pub fn double_declining_value(&self, dep: &Depreciation, years: Decimal) -> CoreResult<Decimal> {
        let life = validated_life(dep)?;

        let rate = Decimal::TWO / life;
        let mut value = dep.initial_value;
        let full_years = years.floor().to_i64().unwrap_or(0);

        for i in 0..full_years {
            let depreciation = value * rate;
            value -= depreciation;

            let remaining_years = life - Decimal::from(i) - Decimal::ONE;
            let straight_line_amount =
                (value - dep.residual_value) / remaining_years.max(Decimal::ONE);

            if depreciation < straight_line_amount && remaining_years > Decimal::ZERO {
                value -= straight_line_amount * remaining_years;
                break;
            }

            if value <= dep.residual_value {
                value = dep.residual_value;
                break;
            }
        }

        let partial_year = years - years.floor();
        if partial_year > Decimal::ZERO && value > dep.residual_value {
            value -= value * rate * partial_year;
        }

        Ok(value.max(dep.residual_value))
    }

    /// Suma de dígitos de los años: el año i deprecia
    /// `(inicial − residual) × (n − i) / (n(n+1)/2)`, prorrateando el año
    /// parcial final
    pub fn sum_of_years_value(&self, dep: &Depreciation, years: Decimal) -> CoreResult<Decimal> {
        let life = validated_life(dep)?;

        let sum_of_years = (life * (life + Decimal::ONE)) / Decimal::TWO;
        let depreciable = dep.depreciable_value();
        let mut value = dep.initial_value;
        let full_years = years.floor().to_i64().unwrap_or(0);

        for i in 0..full_years {
            let year_factor = life - Decimal::from(i);
            value -= (depreciable * year_factor) / sum_of_years;

            if value <= dep.residual_value {
                value = dep.residual_value;
                break;
            }
        }

        let partial_year = years - years.floor();
        if partial_year > Decimal::ZERO && value > dep.residual_value {
            let year_factor = life - years.floor();
            value -= (depreciable * year_factor * partial_year) / sum_of_years;
        }

        Ok(value.max(dep.residual_value))
    }

    /// Genera el schedule completo de la vida útil y lo persiste en el
    /// registro, junto con el cargo anual de referencia
    pub fn generate_schedule(&self, dep: &mut Depreciation) -> CoreResult<Vec<ScheduleYear>> {
        if dep.useful_life_years <= 0 {
            return Err(validation_error(
                "useful_life_years",
                "must be greater than zero",
            ));
        }

        let mut schedule = Vec::with_capacity(dep.useful_life_years as usize);
        let mut start_date = dep.depreciation_start_date;

        for year in 1..=dep.useful_life_years {
            let end_date = start_date
                .checked_add_months(Months::new(12))
                .ok_or_else(|| validation_error("depreciation_start_date", "date out of range"))?;

            let starting_value = round2(self.current_value(dep, start_date)?);
            let ending_value = round2(self.current_value(dep, end_date)?);

            schedule.push(ScheduleYear {
                year,
                start_date,
                end_date,
                starting_value,
                ending_value,
                depreciation_amount: starting_value - ending_value,
                accumulated_depreciation: round2(dep.initial_value) - ending_value,
                book_value: ending_value,
            });

            start_date = end_date;
        }

        let life = Decimal::from(dep.useful_life_years);
        dep.annual_depreciation_amount = Some(round2(dep.depreciable_value() / life));
        dep.annual_depreciation_rate = Some(match dep.method {
            DepreciationMethod::DoubleDeclining => Decimal::TWO / life,
            _ => Decimal::ONE / life,
        });
        dep.schedule = schedule.clone();

        debug!(
            "📉 Schedule generado para equipo {}: {} años, método {}",
            dep.equipment_id,
            schedule.len(),
            dep.method.label()
        );

        Ok(schedule)
    }

    /// Recalcula el valor corriente y actualiza el snapshot del equipo.
    /// `fully_depreciated_date` se estampa una sola vez.
    pub fn apply_to_equipment(
        &self,
        dep: &mut Depreciation,
        equipment: &mut Equipment,
    ) -> CoreResult<Decimal> {
        let now = self.clock.now();
        let today = now.date_naive();

        let value = round2(self.current_value(dep, today)?);
        let fully_depreciated = value <= dep.residual_value;

        dep.current_value = value;
        dep.last_depreciation_date = Some(today);
        if fully_depreciated && dep.fully_depreciated_date.is_none() {
            dep.fully_depreciated_date = Some(today);
        }

        equipment.depreciated_value = Some(value);
        equipment.is_fully_depreciated = fully_depreciated;
        equipment.last_depreciation_update = Some(now);

        Ok(value)
    }

    /// Registra una valuación externa. Si el equipo no tiene registro de
    /// depreciación, siembra uno con los defaults de configuración
    /// (residual 10% de la valuación, 5 años, línea recta), política
    /// heredada, ver DESIGN.md.
    pub fn record_valuation(
        &self,
        equipment: &mut Equipment,
        dep: &mut Option<Depreciation>,
        valuation_date: NaiveDate,
        valuation_amount: Decimal,
        method: impl Into<String>,
        valuation_type: impl Into<String>,
    ) -> CoreResult<ValuationRecord> {
        if valuation_amount <= Decimal::ZERO {
            return Err(validation_error(
                "valuation_amount",
                "must be greater than zero",
            ));
        }

        let record = ValuationRecord {
            id: Uuid::new_v4(),
            equipment_id: equipment.id,
            valuation_date,
            valuation_amount,
            method: method.into(),
            valuation_type: valuation_type.into(),
            created_at: self.clock.now(),
        };

        if dep.is_none() {
            let seed = &self.config.valuation_seed;
            let residual = round2(valuation_amount * seed.residual_ratio);
            info!(
                "🌱 Sembrando depreciación para equipo {}: inicial {}, residual {}, {} años",
                equipment.id, valuation_amount, residual, seed.useful_life_years
            );
            *dep = Some(Depreciation::new(
                equipment.id,
                valuation_amount,
                residual,
                seed.method,
                seed.useful_life_years,
                valuation_date,
            ));
        }

        if let Some(dep) = dep.as_mut() {
            self.apply_to_equipment(dep, equipment)?;
        }

        Ok(record)
    }

    /// Vida útil restante en años (0 si está totalmente depreciado o la
    /// vida nominal ya terminó)
    pub fn remaining_useful_life(&self, dep: &Depreciation, fully_depreciated: bool) -> Decimal {
        if fully_depreciated {
            return Decimal::ZERO;
        }

        let end = match dep.useful_life_end() {
            Some(end) => end,
            None => return Decimal::ZERO,
        };

        let today = self.clock.today();
        if today >= end {
            return Decimal::ZERO;
        }

        years_elapsed(today, end)
    }

    /// Estimación de costo de reemplazo: el estimado explícito si existe,
    /// si no un modelo simple de inflación del 3% anual sobre el costo de
    /// compra
    pub fn replacement_cost(&self, equipment: &Equipment) -> Option<Decimal> {
        if let Some(estimate) = equipment.replacement_cost_estimate {
            return Some(estimate);
        }

        let purchase_cost = equipment.purchase_cost?;
        let purchase_date = equipment
            .purchase_date
            .unwrap_or_else(|| equipment.created_at.date_naive());

        let years = years_elapsed(purchase_date, self.clock.today())
            .to_f64()
            .unwrap_or(0.0);
        let inflation_factor = 1.03_f64.powf(years.max(0.0));

        Decimal::from_f64_retain(inflation_factor).map(|factor| round2(purchase_cost * factor))
    }

    /// Ratio valor libro / última valuación de mercado
    pub fn book_to_market_ratio(
        &self,
        equipment: &Equipment,
        latest_valuation: Option<&ValuationRecord>,
    ) -> Option<Decimal> {
        let book_value = equipment.depreciated_value?;
        let valuation = latest_valuation?;

        if valuation.valuation_amount <= Decimal::ZERO {
            return None;
        }

        Some(book_value / valuation.valuation_amount)
    }
}

fn validated_life(dep: &Depreciation) -> CoreResult<Decimal> {
    if dep.useful_life_years <= 0 {
        return Err(validation_error(
            "useful_life_years",
            "must be greater than zero",
        ));
    }
    Ok(Decimal::from(dep.useful_life_years))
}
