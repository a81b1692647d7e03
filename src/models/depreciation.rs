//! Modelo de Depreciation
//!
//! Registro uno-a-uno con Equipment: parámetros contables, valor corriente
//! cacheado y schedule año a año. `fully_depreciated_date` se fija una sola
//! vez y no se sobreescribe.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Método de depreciación contable
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    StraightLine,
    DoubleDeclining,
    SumOfYearsDigits,
    /// Requiere datos de uso inyectados; no se calcula internamente
    UnitsOfProduction,
}

impl DepreciationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            DepreciationMethod::StraightLine => "Straight Line",
            DepreciationMethod::DoubleDeclining => "Double Declining Balance",
            DepreciationMethod::SumOfYearsDigits => "Sum of Years Digits",
            DepreciationMethod::UnitsOfProduction => "Units of Production",
        }
    }
}

/// Fila del schedule de depreciación para un año de vida útil
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleYear {
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_value: Decimal,
    pub ending_value: Decimal,
    pub depreciation_amount: Decimal,
    pub accumulated_depreciation: Decimal,
    pub book_value: Decimal,
}

/// Registro de depreciación de un equipo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Depreciation {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub initial_value: Decimal,
    pub residual_value: Decimal,
    pub current_value: Decimal,
    pub method: DepreciationMethod,
    pub useful_life_years: i32,
    pub depreciation_start_date: NaiveDate,
    pub last_depreciation_date: Option<NaiveDate>,
    /// Se fija una vez cuando el valor toca el residual; nunca se pisa
    pub fully_depreciated_date: Option<NaiveDate>,
    pub annual_depreciation_rate: Option<Decimal>,
    pub annual_depreciation_amount: Option<Decimal>,
    pub schedule: Vec<ScheduleYear>,
    pub created_by: Option<Uuid>,
}

impl Depreciation {
    pub fn new(
        equipment_id: Uuid,
        initial_value: Decimal,
        residual_value: Decimal,
        method: DepreciationMethod,
        useful_life_years: i32,
        depreciation_start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            equipment_id,
            initial_value,
            residual_value,
            current_value: initial_value,
            method,
            useful_life_years,
            depreciation_start_date,
            last_depreciation_date: None,
            fully_depreciated_date: None,
            annual_depreciation_rate: None,
            annual_depreciation_amount: None,
            schedule: Vec::new(),
            created_by: None,
        }
    }

    /// Monto total depreciable (inicial menos residual)
    pub fn depreciable_value(&self) -> Decimal {
        self.initial_value - self.residual_value
    }

    /// Fin nominal de la vida útil
    pub fn useful_life_end(&self) -> Option<NaiveDate> {
        self.depreciation_start_date
            .checked_add_months(chrono::Months::new(self.useful_life_years as u32 * 12))
    }
}

/// Hecho inmutable de valuación externa
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationRecord {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub valuation_date: NaiveDate,
    pub valuation_amount: Decimal,
    pub method: String,
    pub valuation_type: String,
    pub created_at: DateTime<Utc>,
}
