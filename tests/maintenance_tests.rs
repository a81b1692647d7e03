use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use equipment_tracking::models::{
    DomainEvent, Equipment, MaintenanceTask, NewMaintenanceTask, TaskStatus, Technician,
    WeekAvailability,
};
use equipment_tracking::utils::clock::FixedClock;
use equipment_tracking::{CoreError, EngineConfig, MaintenanceService};

fn now() -> DateTime<Utc> {
    // Domingo 2025-06-15
    "2025-06-15T12:00:00Z".parse().unwrap()
}

fn service() -> MaintenanceService {
    MaintenanceService::new(EngineConfig::default(), Arc::new(FixedClock::new(now())))
}

fn test_equipment() -> Equipment {
    Equipment::new(
        "Hydraulic Excavator HX-300",
        "Excavators",
        "excavator",
        "2024-01-01T00:00:00Z".parse().unwrap(),
    )
}

fn test_technician(name: &str) -> Technician {
    Technician {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: name.to_string(),
        specialty: None,
        skills: Vec::new(),
        availability: WeekAvailability::default(),
        certification: None,
        certification_expiry: None,
        experience_years: None,
        is_active: true,
    }
}

fn new_task(equipment_id: Uuid, title: &str, scheduled_date: DateTime<Utc>) -> NewMaintenanceTask {
    NewMaintenanceTask {
        equipment_id,
        title: title.to_string(),
        description: None,
        scheduled_date,
        estimated_duration_minutes: None,
        parts_cost: None,
        labor_cost: None,
        created_by: None,
    }
}

fn pending_task(service: &MaintenanceService, equipment_id: Uuid) -> MaintenanceTask {
    service
        .create_task(new_task(
            equipment_id,
            "Cambio de aceite hidráulico",
            now() + Duration::days(2),
        ))
        .unwrap()
}

#[test]
fn test_create_task_starts_pending() {
    let service = service();
    let task = pending_task(&service, Uuid::new_v4());

    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.assigned_to.is_none());
    assert_eq!(task.created_at, now());
}

#[test]
fn test_create_task_rejects_short_title() {
    let service = service();
    let result = service.create_task(new_task(Uuid::new_v4(), "ok", now()));

    assert!(matches!(result, Err(CoreError::BadRequest(_))));
}

#[test]
fn test_assign_task_emits_event() {
    let service = service();
    let technician = test_technician("Marta Ruiz");
    let mut task = pending_task(&service, Uuid::new_v4());

    let event = service.assign_task(&mut task, &technician).unwrap();

    assert_eq!(task.status, TaskStatus::Assigned);
    assert_eq!(task.assigned_to, Some(technician.user_id));
    assert_eq!(
        event,
        DomainEvent::TaskAssigned {
            task_id: task.id,
            equipment_id: task.equipment_id,
            technician_id: technician.user_id,
            scheduled_date: task.scheduled_date,
        }
    );
}

#[test]
fn test_assign_task_rejects_inactive_technician() {
    let service = service();
    let mut technician = test_technician("Marta Ruiz");
    technician.is_active = false;
    let mut task = pending_task(&service, Uuid::new_v4());

    let result = service.assign_task(&mut task, &technician);
    assert!(matches!(result, Err(CoreError::Validation(_))));
    assert_eq!(task.status, TaskStatus::Pending);
}

#[test]
fn test_terminal_states_are_absorbing() {
    let service = service();
    let completed_by = Uuid::new_v4();
    let mut task = pending_task(&service, Uuid::new_v4());

    service.start_task(&mut task).unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);

    let event = service
        .complete_task(&mut task, completed_by, Some(90), Some("listo".into()))
        .unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.completed_date, Some(now()));
    assert!(matches!(event, DomainEvent::TaskCompleted { .. }));

    // Completada dos veces es un error, igual que cancelarla después
    assert!(matches!(
        service.complete_task(&mut task, completed_by, None, None),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        service.cancel_task(&mut task, "ya no hace falta"),
        Err(CoreError::Validation(_))
    ));
}

#[test]
fn test_cancel_task_records_reason() {
    let service = service();
    let mut task = pending_task(&service, Uuid::new_v4());

    service.cancel_task(&mut task, "equipo dado de baja").unwrap();

    assert_eq!(task.status, TaskStatus::Cancelled);
    assert_eq!(task.cancellation_reason.as_deref(), Some("equipo dado de baja"));
}

#[test]
fn test_sweep_overdue_skips_terminal_tasks() {
    let service = service();
    let equipment_id = Uuid::new_v4();

    let late = service
        .create_task(new_task(equipment_id, "Inspección anual", now() - Duration::days(3)))
        .unwrap();
    let on_time = pending_task(&service, equipment_id);
    let mut cancelled = service
        .create_task(new_task(equipment_id, "Revisión de frenos", now() - Duration::days(5)))
        .unwrap();
    service.cancel_task(&mut cancelled, "duplicada").unwrap();

    let mut tasks = vec![late, on_time, cancelled];
    let flagged = service.sweep_overdue(&mut tasks);

    assert_eq!(flagged, 1);
    assert_eq!(tasks[0].status, TaskStatus::Overdue);
    assert_eq!(tasks[1].status, TaskStatus::Pending);
    assert_eq!(tasks[2].status, TaskStatus::Cancelled);

    // El sweep es idempotente
    assert_eq!(service.sweep_overdue(&mut tasks), 0);
}

#[test]
fn test_workload_weighs_overdue_double() {
    let service = service();
    let technician = test_technician("Iván Peralta");
    let equipment_id = Uuid::new_v4();

    let mut pending = pending_task(&service, equipment_id);
    pending.assigned_to = Some(technician.user_id);

    let mut assigned = pending_task(&service, equipment_id);
    assigned.assigned_to = Some(technician.user_id);
    assigned.status = TaskStatus::Assigned;

    let mut overdue = service
        .create_task(new_task(equipment_id, "Inspección anual", now() - Duration::days(3)))
        .unwrap();
    overdue.assigned_to = Some(technician.user_id);
    overdue.status = TaskStatus::Overdue;

    let mut completed = pending_task(&service, equipment_id);
    completed.assigned_to = Some(technician.user_id);
    completed.status = TaskStatus::Completed;

    let tasks = vec![pending, assigned, overdue, completed];

    // 2 activas + 1 vencida que pesa doble = 4
    assert_eq!(service.workload_score(&technician, &tasks), 4);
}

#[test]
fn test_workload_counts_overdue_only_by_status() {
    let service = service();
    let technician = test_technician("Iván Peralta");
    let equipment_id = Uuid::new_v4();

    // Fecha ya pasada pero todavía pending: hasta que el sweep la marque
    // vencida cuenta 1, no 3
    let mut past_due = service
        .create_task(new_task(equipment_id, "Inspección anual", now() - Duration::days(3)))
        .unwrap();
    past_due.assigned_to = Some(technician.user_id);

    let mut tasks = vec![past_due];
    assert_eq!(service.workload_score(&technician, &tasks), 1);

    // Después del sweep la misma tarea pesa exactamente 2
    service.sweep_overdue(&mut tasks);
    assert_eq!(tasks[0].status, TaskStatus::Overdue);
    assert_eq!(service.workload_score(&technician, &tasks), 2);
}

#[test]
fn test_skill_match_score_weights() {
    let service = service();
    let equipment = test_equipment();
    let task = service
        .create_task(new_task(
            equipment.id,
            "Hydraulic system overhaul",
            now() + Duration::days(1),
        ))
        .unwrap();

    let mut technician = test_technician("Lucía Domínguez");
    technician.specialty = Some("Excavator".to_string());
    technician.skills = vec!["hydraulic".to_string()];

    // Specialty en categoría (+5), skill en nombre (+3) y en título (+1)
    assert_eq!(service.skill_match_score(&technician, &task, &equipment), 9);

    let unrelated = test_technician("Pedro Lima");
    assert_eq!(service.skill_match_score(&unrelated, &task, &equipment), 0);
}

#[test]
fn test_find_best_technician_prefers_skill_then_workload() {
    let service = service();
    let equipment = test_equipment();
    // Lunes a la mañana
    let scheduled: DateTime<Utc> = "2025-06-16T09:00:00Z".parse().unwrap();
    let task = service
        .create_task(new_task(equipment.id, "Hydraulic system overhaul", scheduled))
        .unwrap();

    let mut specialist = test_technician("Lucía Domínguez");
    specialist.skills = vec!["hydraulic".to_string()];

    let mut busy = test_technician("Iván Peralta");
    busy.skills = vec!["hydraulic".to_string()];
    let mut busy_task = pending_task(&service, equipment.id);
    busy_task.assigned_to = Some(busy.user_id);
    busy_task.status = TaskStatus::Assigned;

    let mut unavailable = test_technician("Marta Ruiz");
    unavailable.skills = vec!["hydraulic".to_string(), "excavator".to_string()];
    unavailable.availability.mon.am = false;

    let technicians = vec![busy.clone(), specialist.clone(), unavailable];
    let tasks = vec![busy_task];

    // Mismo skill match: gana el de menor workload; la no disponible
    // queda afuera aunque tenga mejor score
    let best = service
        .find_best_technician(&task, &equipment, &technicians, &tasks)
        .unwrap();
    assert_eq!(best.user_id, specialist.user_id);
}

#[test]
fn test_find_best_technician_tie_keeps_input_order() {
    let service = service();
    let equipment = test_equipment();
    let task = service
        .create_task(new_task(equipment.id, "Inspección general", now() + Duration::days(1)))
        .unwrap();

    let first = test_technician("Ana Torres");
    let second = test_technician("Bruno Sosa");

    let technicians = vec![first.clone(), second];
    let best = service
        .find_best_technician(&task, &equipment, &technicians, &[])
        .unwrap();
    assert_eq!(best.user_id, first.user_id);
}

#[test]
fn test_technician_workloads_sorted_ascending() {
    let service = service();
    let equipment_id = Uuid::new_v4();

    let light = test_technician("Ana Torres");
    let heavy = test_technician("Bruno Sosa");

    let mut first = pending_task(&service, equipment_id);
    first.assigned_to = Some(heavy.user_id);
    first.status = TaskStatus::Assigned;
    let mut second = pending_task(&service, equipment_id);
    second.assigned_to = Some(heavy.user_id);
    second.status = TaskStatus::InProgress;
    let mut third = service
        .create_task(new_task(equipment_id, "Inspección anual", now() - Duration::days(3)))
        .unwrap();
    third.assigned_to = Some(heavy.user_id);
    third.status = TaskStatus::Overdue;

    let tasks = vec![first, second, third];
    let workloads = service.technician_workloads(&[heavy.clone(), light.clone()], &tasks);

    assert_eq!(workloads.len(), 2);
    assert_eq!(workloads[0].user_id, light.user_id);
    assert_eq!(workloads[0].total_workload, 0);
    assert_eq!(workloads[1].user_id, heavy.user_id);
    // La vencida no suma en assigned_count; pesa doble en el total
    assert_eq!(workloads[1].assigned_count, 2);
    assert_eq!(workloads[1].overdue_count, 1);
    assert_eq!(workloads[1].total_workload, 4);
}
