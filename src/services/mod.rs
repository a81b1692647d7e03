//! Motores del núcleo de tracking

pub mod cost_service;
pub mod depreciation_service;
pub mod maintenance_service;
pub mod parts_service;
pub mod utilization_service;

pub use cost_service::CostService;
pub use depreciation_service::DepreciationService;
pub use maintenance_service::{MaintenanceService, TechnicianWorkload};
pub use parts_service::{BatchReservation, PartsLedger};
pub use utilization_service::UtilizationService;
