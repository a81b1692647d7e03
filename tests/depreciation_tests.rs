use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use equipment_tracking::models::{Depreciation, DepreciationMethod, Equipment};
use equipment_tracking::utils::clock::FixedClock;
use equipment_tracking::{CoreError, DepreciationService, EngineConfig};

fn now() -> DateTime<Utc> {
    "2025-06-15T12:00:00Z".parse().unwrap()
}

fn service() -> DepreciationService {
    DepreciationService::new(EngineConfig::default(), Arc::new(FixedClock::new(now())))
}

fn test_depreciation(method: DepreciationMethod) -> Depreciation {
    Depreciation::new(
        uuid::Uuid::new_v4(),
        Decimal::from(10000),
        Decimal::from(1000),
        method,
        5,
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
    )
}

fn test_equipment() -> Equipment {
    Equipment::new(
        "Hydraulic Excavator HX-300",
        "Excavators",
        "excavator",
        "2020-01-01T00:00:00Z".parse().unwrap(),
    )
}

#[test]
fn test_straight_line_after_two_years() {
    let service = service();
    let dep = test_depreciation(DepreciationMethod::StraightLine);

    // 10000 inicial, 1000 residual, 5 años: cargo anual 1800
    let value = service
        .straight_line_value(&dep, Decimal::from(2))
        .unwrap();
    assert_eq!(value, Decimal::from(6400));
}

#[test]
fn test_straight_line_floors_at_residual() {
    let service = service();
    let dep = test_depreciation(DepreciationMethod::StraightLine);

    let value = service
        .straight_line_value(&dep, Decimal::from(10))
        .unwrap();
    assert_eq!(value, Decimal::from(1000));
}

#[test]
fn test_current_value_before_start_is_initial() {
    let service = service();
    let dep = test_depreciation(DepreciationMethod::StraightLine);

    let before = NaiveDate::from_ymd_opt(2019, 6, 1).unwrap();
    assert_eq!(service.current_value(&dep, before).unwrap(), Decimal::from(10000));

    let at_start = dep.depreciation_start_date;
    assert_eq!(service.current_value(&dep, at_start).unwrap(), Decimal::from(10000));
}

#[test]
fn test_current_value_after_fully_depreciated_date_is_residual() {
    let service = service();
    let mut dep = test_depreciation(DepreciationMethod::StraightLine);
    dep.fully_depreciated_date = NaiveDate::from_ymd_opt(2025, 1, 1);

    let later = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    assert_eq!(service.current_value(&dep, later).unwrap(), Decimal::from(1000));
}

#[test]
fn test_double_declining_first_year() {
    let service = service();
    let dep = test_depreciation(DepreciationMethod::DoubleDeclining);

    // Tasa 2/5 = 40%: primer año deprecia 4000
    let value = service
        .double_declining_value(&dep, Decimal::ONE)
        .unwrap();
    assert_eq!(value, Decimal::from(6000));
}

#[test]
fn test_double_declining_never_below_residual() {
    let service = service();
    let dep = test_depreciation(DepreciationMethod::DoubleDeclining);

    let value = service
        .double_declining_value(&dep, Decimal::from(20))
        .unwrap();
    assert_eq!(value, Decimal::from(1000));
}

#[test]
fn test_sum_of_years_first_year() {
    let service = service();
    let dep = test_depreciation(DepreciationMethod::SumOfYearsDigits);

    // Suma de dígitos 15: el año 1 deprecia 9000 * 5/15 = 3000
    let value = service.sum_of_years_value(&dep, Decimal::ONE).unwrap();
    assert_eq!(value, Decimal::from(7000));
}

#[test]
fn test_units_of_production_returns_stored_value() {
    let service = service();
    let mut dep = test_depreciation(DepreciationMethod::UnitsOfProduction);
    dep.current_value = Decimal::from(4321);

    let as_of = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    assert_eq!(service.current_value(&dep, as_of).unwrap(), Decimal::from(4321));
}

#[test]
fn test_generate_schedule_covers_useful_life() {
    let service = service();
    let mut dep = test_depreciation(DepreciationMethod::StraightLine);

    let schedule = service.generate_schedule(&mut dep).unwrap();

    assert_eq!(schedule.len(), 5);
    assert_eq!(schedule[0].starting_value, Decimal::from(10000));
    assert_eq!(schedule[4].ending_value, Decimal::from(1000));
    assert_eq!(schedule[4].book_value, Decimal::from(1000));
    assert_eq!(schedule[4].accumulated_depreciation, Decimal::from(9000));

    // Los años son contiguos
    for pair in schedule.windows(2) {
        assert_eq!(pair[0].end_date, pair[1].start_date);
    }

    assert_eq!(dep.annual_depreciation_amount, Some(Decimal::from(1800)));
    assert_eq!(dep.schedule.len(), 5);
}

#[test]
fn test_generate_schedule_rejects_zero_life() {
    let service = service();
    let mut dep = test_depreciation(DepreciationMethod::StraightLine);
    dep.useful_life_years = 0;

    let result = service.generate_schedule(&mut dep);
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[test]
fn test_apply_to_equipment_stamps_fully_depreciated_once() {
    let service = service();
    let mut equipment = test_equipment();
    // Vida útil terminada hace años respecto del reloj fijo
    let mut dep = Depreciation::new(
        equipment.id,
        Decimal::from(10000),
        Decimal::from(1000),
        DepreciationMethod::StraightLine,
        5,
        NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
    );

    let value = service.apply_to_equipment(&mut dep, &mut equipment).unwrap();

    assert_eq!(value, Decimal::from(1000));
    assert!(equipment.is_fully_depreciated);
    assert_eq!(equipment.depreciated_value, Some(Decimal::from(1000)));
    let stamped = dep.fully_depreciated_date;
    assert!(stamped.is_some());

    // Una segunda pasada no pisa la fecha original
    service.apply_to_equipment(&mut dep, &mut equipment).unwrap();
    assert_eq!(dep.fully_depreciated_date, stamped);
}

#[test]
fn test_record_valuation_seeds_depreciation() {
    let service = service();
    let mut equipment = test_equipment();
    let mut dep: Option<Depreciation> = None;

    let record = service
        .record_valuation(
            &mut equipment,
            &mut dep,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            Decimal::from(20000),
            "market_comparison",
            "appraisal",
        )
        .unwrap();

    assert_eq!(record.valuation_amount, Decimal::from(20000));

    // Siembra: residual 10%, 5 años, línea recta
    let seeded = dep.expect("debería sembrar un registro de depreciación");
    assert_eq!(seeded.initial_value, Decimal::from(20000));
    assert_eq!(seeded.residual_value, Decimal::from(2000));
    assert_eq!(seeded.useful_life_years, 5);
    assert_eq!(seeded.method, DepreciationMethod::StraightLine);
    assert!(equipment.depreciated_value.is_some());
}

#[test]
fn test_record_valuation_rejects_non_positive_amount() {
    let service = service();
    let mut equipment = test_equipment();
    let mut dep: Option<Depreciation> = None;

    let result = service.record_valuation(
        &mut equipment,
        &mut dep,
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        Decimal::ZERO,
        "market_comparison",
        "appraisal",
    );

    assert!(matches!(result, Err(CoreError::Validation(_))));
    assert!(dep.is_none());
}

#[test]
fn test_remaining_useful_life() {
    let service = service();
    let dep = test_depreciation(DepreciationMethod::StraightLine);

    // Vida 2020-2025, reloj fijo en 2025-06-15: ya terminó
    assert_eq!(service.remaining_useful_life(&dep, false), Decimal::ZERO);
    assert_eq!(service.remaining_useful_life(&dep, true), Decimal::ZERO);

    let future = Depreciation::new(
        uuid::Uuid::new_v4(),
        Decimal::from(10000),
        Decimal::from(1000),
        DepreciationMethod::StraightLine,
        5,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    );
    let remaining = service.remaining_useful_life(&future, false);
    assert!(remaining > Decimal::from(3));
    assert!(remaining < Decimal::from(4));
}

#[test]
fn test_replacement_cost_prefers_explicit_estimate() {
    let service = service();
    let mut equipment = test_equipment();
    equipment.replacement_cost_estimate = Some(Decimal::from(55000));
    equipment.purchase_cost = Some(Decimal::from(40000));

    assert_eq!(service.replacement_cost(&equipment), Some(Decimal::from(55000)));
}

#[test]
fn test_replacement_cost_inflates_purchase_cost() {
    let service = service();
    let mut equipment = test_equipment();
    equipment.purchase_cost = Some(Decimal::from(40000));
    equipment.purchase_date = NaiveDate::from_ymd_opt(2020, 6, 15);

    // ~5 años al 3% anual: algo más que el costo original
    let estimate = service.replacement_cost(&equipment).unwrap();
    assert!(estimate > Decimal::from(46000));
    assert!(estimate < Decimal::from(47000));
}

#[test]
fn test_book_to_market_ratio() {
    let service = service();
    let mut equipment = test_equipment();
    equipment.depreciated_value = Some(Decimal::from(6000));

    let valuation = equipment_tracking::models::ValuationRecord {
        id: uuid::Uuid::new_v4(),
        equipment_id: equipment.id,
        valuation_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        valuation_amount: Decimal::from(8000),
        method: "market_comparison".to_string(),
        valuation_type: "appraisal".to_string(),
        created_at: now(),
    };

    let ratio = service.book_to_market_ratio(&equipment, Some(&valuation)).unwrap();
    assert_eq!(ratio, Decimal::new(75, 2));

    assert!(service.book_to_market_ratio(&equipment, None).is_none());
}
