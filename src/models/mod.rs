//! Modelos de dominio del núcleo de tracking

pub mod cost_record;
pub mod depreciation;
pub mod equipment;
pub mod events;
pub mod inventory;
pub mod maintenance_part;
pub mod maintenance_task;
pub mod metric;
pub mod technician;
pub mod utilization_log;
pub mod utilization_pattern;

pub use cost_record::{CostRecord, CostType, NewCostRecord};
pub use depreciation::{Depreciation, DepreciationMethod, ScheduleYear, ValuationRecord};
pub use equipment::{Equipment, EquipmentStatus, LifetimeUsage, WindowRate};
pub use events::DomainEvent;
pub use inventory::InventoryItem;
pub use maintenance_part::{MaintenancePart, PartStatus};
pub use maintenance_task::{MaintenanceTask, NewMaintenanceTask, TaskStatus};
pub use metric::{Metric, NewMetric};
pub use technician::{Technician, WeekAvailability};
pub use utilization_log::{IdlePeriod, StartUtilization, UtilizationLog, UtilizationStatus};
pub use utilization_pattern::{
    LowUtilizationPeriod, PatternComparison, PatternType, UtilizationPattern,
};
