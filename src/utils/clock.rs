//! Proveedor de tiempo inyectable
//!
//! Los motores nunca llaman `Utc::now()` directamente: reciben un `Clock`
//! para que los cálculos temporales sean deterministas en tests.

use chrono::{DateTime, NaiveDate, Utc};

/// Fuente de "ahora" para todos los motores
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Fecha de hoy en UTC
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Reloj del sistema
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Reloj fijo para tests y recomputaciones reproducibles
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}
