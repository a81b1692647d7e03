//! # Equipment Tracking Core
//!
//! Núcleo de tracking de equipos: valuación por depreciación, analítica
//! de utilización, agregación de costos y eficiencia, scheduling de
//! mantenimiento con matching de técnicos y ledger de reservas de partes.
//!
//! La biblioteca es síncrona y agnóstica de persistencia: los motores
//! operan sobre modelos en memoria que el caller carga y guarda. El reloj
//! se inyecta ([`utils::clock::Clock`]) para que todos los cálculos por
//! ventana sean deterministas bajo test.

pub mod config;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use config::EngineConfig;
pub use services::{
    CostService, DepreciationService, MaintenanceService, PartsLedger, UtilizationService,
};
pub use store::InventoryStore;
pub use utils::clock::{Clock, FixedClock, SystemClock};
pub use utils::errors::{CoreError, CoreResult};
