//! Motor de scheduling de mantenimiento
//!
//! Ciclo de vida de tareas (pending → assigned → in_progress → terminal),
//! sweep de vencidas, y el matching técnico/tarea: score de skills por
//! substring case-insensitive más desempate por workload. Las transiciones
//! de asignación y completado producen hechos de dominio para entrega
//! externa.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::EngineConfig;
use crate::models::equipment::Equipment;
use crate::models::events::DomainEvent;
use crate::models::maintenance_task::{MaintenanceTask, NewMaintenanceTask, TaskStatus};
use crate::models::technician::Technician;
use crate::utils::clock::Clock;
use crate::utils::errors::{bad_request_error, validation_error, CoreResult};

/// Resumen de carga de trabajo de un técnico
#[derive(Debug, Clone)]
pub struct TechnicianWorkload {
    pub technician_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub assigned_count: usize,
    pub overdue_count: usize,
    pub completed_count: usize,
    /// assigned + 2 × overdue; las vencidas pesan doble
    pub total_workload: i64,
}

/// Servicio de tareas de mantenimiento y asignación de técnicos
pub struct MaintenanceService {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl MaintenanceService {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Crea una tarea en estado pending
    pub fn create_task(&self, new_task: NewMaintenanceTask) -> CoreResult<MaintenanceTask> {
        new_task
            .validate()
            .map_err(|e| bad_request_error(&format!("invalid maintenance task: {}", e)))?;

        let task = MaintenanceTask {
            id: Uuid::new_v4(),
            equipment_id: new_task.equipment_id,
            title: new_task.title,
            description: new_task.description,
            status: TaskStatus::Pending,
            scheduled_date: new_task.scheduled_date,
            completed_date: None,
            estimated_duration_minutes: new_task.estimated_duration_minutes,
            actual_duration_minutes: None,
            completion_notes: None,
            cancellation_reason: None,
            assigned_to: None,
            completed_by: None,
            parts_cost: new_task.parts_cost,
            labor_cost: new_task.labor_cost,
            created_by: new_task.created_by,
            created_at: self.clock.now(),
        };

        info!("🔧 Tarea de mantenimiento creada: {} ({})", task.title, task.id);
        Ok(task)
    }

    /// Asigna la tarea a un técnico y emite el hecho de asignación
    pub fn assign_task(
        &self,
        task: &mut MaintenanceTask,
        technician: &Technician,
    ) -> CoreResult<DomainEvent> {
        self.ensure_not_terminal(task)?;

        if !technician.is_active {
            return Err(validation_error("technician", "technician is not active"));
        }

        task.assigned_to = Some(technician.user_id);
        task.status = TaskStatus::Assigned;

        info!(
            "👷 Tarea {} asignada a {} ({})",
            task.id, technician.name, technician.user_id
        );
        Ok(DomainEvent::TaskAssigned {
            task_id: task.id,
            equipment_id: task.equipment_id,
            technician_id: technician.user_id,
            scheduled_date: task.scheduled_date,
        })
    }

    /// Marca la tarea como en curso
    pub fn start_task(&self, task: &mut MaintenanceTask) -> CoreResult<()> {
        self.ensure_not_terminal(task)?;
        task.status = TaskStatus::InProgress;
        Ok(())
    }

    /// Completa la tarea y emite el hecho de completado. Los estados
    /// terminales son absorbentes: completar dos veces es un error.
    pub fn complete_task(
        &self,
        task: &mut MaintenanceTask,
        completed_by: Uuid,
        actual_duration_minutes: Option<i64>,
        completion_notes: Option<String>,
    ) -> CoreResult<DomainEvent> {
        self.ensure_not_terminal(task)?;

        let now = self.clock.now();
        task.status = TaskStatus::Completed;
        task.completed_date = Some(now);
        task.completed_by = Some(completed_by);
        task.actual_duration_minutes = actual_duration_minutes;
        task.completion_notes = completion_notes;

        info!("✅ Tarea {} completada por {}", task.id, completed_by);
        Ok(DomainEvent::TaskCompleted {
            task_id: task.id,
            equipment_id: task.equipment_id,
            completed_by,
            completed_date: now,
        })
    }

    /// Cancela la tarea con un motivo
    pub fn cancel_task(
        &self,
        task: &mut MaintenanceTask,
        reason: impl Into<String>,
    ) -> CoreResult<()> {
        self.ensure_not_terminal(task)?;
        task.status = TaskStatus::Cancelled;
        task.cancellation_reason = Some(reason.into());
        Ok(())
    }

    /// Sweep periódico: toda tarea no terminal cuya fecha programada ya
    /// pasó se marca overdue. Devuelve cuántas cambiaron.
    pub fn sweep_overdue(&self, tasks: &mut [MaintenanceTask]) -> usize {
        let now = self.clock.now();
        let mut flagged = 0;

        for task in tasks.iter_mut() {
            if task.is_overdue(now) && task.status != TaskStatus::Overdue {
                task.status = TaskStatus::Overdue;
                flagged += 1;
            }
        }

        if flagged > 0 {
            warn!("⏰ {} tareas marcadas como vencidas", flagged);
        }
        flagged
    }

    /// Workload de un técnico: tareas activas asignadas + 2 × vencidas.
    /// Los dos conteos son disjuntos por estado, así que una tarea vencida
    /// aporta exactamente 2.
    pub fn workload_score(&self, technician: &Technician, tasks: &[MaintenanceTask]) -> i64 {
        let mut active = 0i64;
        let mut overdue = 0i64;

        for task in tasks {
            if task.assigned_to != Some(technician.user_id) {
                continue;
            }
            match task.status {
                TaskStatus::Pending | TaskStatus::Assigned | TaskStatus::InProgress => active += 1,
                TaskStatus::Overdue => overdue += 1,
                _ => {}
            }
        }

        active + 2 * overdue
    }

    /// Score aditivo de afinidad técnico/tarea/equipo.
    ///
    /// Matching por substring case-insensitive: specialty contra la
    /// categoría (+5), cada skill contra el nombre (+3), contra tipo o
    /// categoría (+2) y contra el texto de la tarea (+1).
    pub fn skill_match_score(
        &self,
        technician: &Technician,
        task: &MaintenanceTask,
        equipment: &Equipment,
    ) -> i64 {
        let weights = &self.config.skill_weights;
        let category = equipment.category.to_lowercase();
        let equipment_type = equipment.equipment_type.to_lowercase();
        let name = equipment.name.to_lowercase();
        let title = task.title.to_lowercase();
        let description = task
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        let mut score = 0i64;

        if let Some(specialty) = &technician.specialty {
            if category.contains(&specialty.to_lowercase()) {
                score += weights.specialty_category;
            }
        }

        for skill in &technician.skills {
            let skill = skill.to_lowercase();
            if skill.is_empty() {
                continue;
            }
            if name.contains(&skill) {
                score += weights.skill_name;
            }
            if equipment_type.contains(&skill) || category.contains(&skill) {
                score += weights.skill_type_category;
            }
            if title.contains(&skill) || description.contains(&skill) {
                score += weights.skill_task_text;
            }
        }

        score
    }

    /// Elige el mejor técnico para una tarea: disponibles a la fecha
    /// programada, ordenados por skill match descendente y workload
    /// ascendente. Los empates los gana el primero en el orden de entrada.
    pub fn find_best_technician<'a>(
        &self,
        task: &MaintenanceTask,
        equipment: &Equipment,
        technicians: &'a [Technician],
        tasks: &[MaintenanceTask],
    ) -> Option<&'a Technician> {
        let mut best: Option<(&Technician, i64, i64)> = None;

        for technician in technicians {
            if !technician.is_active || !technician.is_available_at(task.scheduled_date) {
                continue;
            }

            let skill = self.skill_match_score(technician, task, equipment);
            let workload = self.workload_score(technician, tasks);

            let better = match best {
                None => true,
                Some((_, best_skill, best_workload)) => {
                    skill > best_skill || (skill == best_skill && workload < best_workload)
                }
            };
            if better {
                best = Some((technician, skill, workload));
            }
        }

        best.map(|(technician, _, _)| technician)
    }

    /// Resumen de workload por técnico, ordenado de menos a más cargado
    pub fn technician_workloads(
        &self,
        technicians: &[Technician],
        tasks: &[MaintenanceTask],
    ) -> Vec<TechnicianWorkload> {
        let mut workloads: Vec<TechnicianWorkload> = technicians
            .iter()
            .filter(|t| t.is_active)
            .map(|technician| {
                let assigned: Vec<&MaintenanceTask> = tasks
                    .iter()
                    .filter(|t| t.assigned_to == Some(technician.user_id))
                    .collect();

                let assigned_count = assigned
                    .iter()
                    .filter(|t| {
                        matches!(
                            t.status,
                            TaskStatus::Pending | TaskStatus::Assigned | TaskStatus::InProgress
                        )
                    })
                    .count();
                let overdue_count = assigned
                    .iter()
                    .filter(|t| t.status == TaskStatus::Overdue)
                    .count();
                let completed_count = assigned.iter().filter(|t| t.is_completed()).count();

                TechnicianWorkload {
                    technician_id: technician.id,
                    user_id: technician.user_id,
                    name: technician.name.clone(),
                    assigned_count,
                    overdue_count,
                    completed_count,
                    total_workload: assigned_count as i64 + 2 * overdue_count as i64,
                }
            })
            .collect();

        workloads.sort_by_key(|w| w.total_workload);
        workloads
    }

    fn ensure_not_terminal(&self, task: &MaintenanceTask) -> CoreResult<()> {
        if task.status.is_terminal() {
            return Err(validation_error(
                "status",
                "task is already completed or cancelled",
            ));
        }
        Ok(())
    }
}
