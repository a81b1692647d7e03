//! Utilidades de tiempo
//!
//! Aritmética de fechas compartida por los motores. Los años transcurridos
//! usan el año juliano (365.25 días); el cálculo debe ser reproducible
//! exactamente porque los schedules de depreciación dependen de él.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Días del año juliano, con dos decimales (365.25)
pub const DAYS_PER_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

/// Días entre dos fechas (puede ser negativo si `to < from`)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Años transcurridos entre dos fechas, como fracción juliana
pub fn years_elapsed(from: NaiveDate, to: NaiveDate) -> Decimal {
    Decimal::from(days_between(from, to)) / DAYS_PER_YEAR
}

/// Horas entre dos instantes, con granularidad de minutos
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Decimal {
    Decimal::from((to - from).num_minutes()) / Decimal::from(60)
}

/// Redondeo a dos decimales (convención de dinero y porcentajes)
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp(2)
}
