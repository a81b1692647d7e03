//! Modelo de Technician
//!
//! Catálogo read-mostly de técnicos: skills, specialty y disponibilidad
//! AM/PM por día de semana. El workload y el skill match son computados por
//! el scheduler, nunca almacenados.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Disponibilidad de medio día
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HalfDayAvailability {
    pub am: bool,
    pub pm: bool,
}

impl Default for HalfDayAvailability {
    fn default() -> Self {
        Self { am: true, pm: true }
    }
}

/// Disponibilidad semanal, lunes a domingo
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekAvailability {
    pub mon: HalfDayAvailability,
    pub tue: HalfDayAvailability,
    pub wed: HalfDayAvailability,
    pub thu: HalfDayAvailability,
    pub fri: HalfDayAvailability,
    pub sat: HalfDayAvailability,
    pub sun: HalfDayAvailability,
}

impl WeekAvailability {
    fn for_date(&self, date: NaiveDate) -> HalfDayAvailability {
        match date.weekday() {
            chrono::Weekday::Mon => self.mon,
            chrono::Weekday::Tue => self.tue,
            chrono::Weekday::Wed => self.wed,
            chrono::Weekday::Thu => self.thu,
            chrono::Weekday::Fri => self.fri,
            chrono::Weekday::Sat => self.sat,
            chrono::Weekday::Sun => self.sun,
        }
    }
}

/// Técnico de mantenimiento
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub specialty: Option<String>,
    pub skills: Vec<String>,
    pub availability: WeekAvailability,
    pub certification: Option<String>,
    pub certification_expiry: Option<NaiveDate>,
    pub experience_years: Option<i32>,
    pub is_active: bool,
}

impl Technician {
    /// Verifica disponibilidad para un instante programado: día de semana
    /// + franja AM (antes de las 12 UTC) o PM
    pub fn is_available_at(&self, scheduled: DateTime<Utc>) -> bool {
        let half_day = self.availability.for_date(scheduled.date_naive());
        if scheduled.hour() < 12 {
            half_day.am
        } else {
            half_day.pm
        }
    }
}
