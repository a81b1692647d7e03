//! Ledger de reservas de partes
//!
//! Reserva, liberación y consumo de partes contra los contadores del
//! inventario. Reserva y liberación devuelven booleanos (fallar no es
//! excepcional); el consumo siempre se registra aunque el inventario
//! falte (modo degradado) y los contadores nunca quedan negativos.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::events::DomainEvent;
use crate::models::maintenance_part::MaintenancePart;
use crate::store::InventoryStore;
use crate::utils::clock::Clock;
use crate::utils::errors::{validation_error, CoreResult};

/// Resultado agregado de una reserva por lote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReservation {
    pub reserved: usize,
    pub failed: usize,
}

/// Servicio de reservas y consumo de partes
pub struct PartsLedger {
    store: InventoryStore,
    clock: Arc<dyn Clock>,
}

impl PartsLedger {
    pub fn new(store: InventoryStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Reserva la cantidad requerida de la parte contra el inventario.
    ///
    /// Falla (devuelve `false`, sin efectos) si la parte ya está
    /// reservada, no referencia inventario, el item no existe o no hay
    /// disponible suficiente. Chequeo y reserva ocurren bajo el mismo
    /// lock de escritura.
    pub fn reserve(
        &self,
        part: &mut MaintenancePart,
        reserved_by: Option<Uuid>,
        expiry: Option<DateTime<Utc>>,
    ) -> bool {
        if part.is_reserved {
            warn!("⚠️ Parte {} ya estaba reservada", part.id);
            return false;
        }

        let item_id = match part.inventory_item_id {
            Some(id) => id,
            None => {
                debug!("📦 Parte {} sin referencia a inventario", part.id);
                return false;
            }
        };

        let quantity = part.quantity_required;
        let reserved = self
            .store
            .with_item_mut(item_id, |item| {
                if item.available() < quantity {
                    return false;
                }
                item.reserved += quantity;
                true
            })
            .unwrap_or(false);

        if !reserved {
            debug!(
                "📦 Reserva rechazada para parte {}: sin stock disponible",
                part.id
            );
            return false;
        }

        part.is_reserved = true;
        part.reserved_by = reserved_by;
        part.reservation_date = Some(self.clock.now());
        part.reservation_expiry = expiry;

        info!("📦 Parte {} reservada ({} unidades)", part.id, quantity);
        true
    }

    /// Libera una reserva activa devolviendo las unidades al disponible.
    /// El contador nunca baja de cero. Devuelve `false` si no había
    /// reserva activa.
    pub fn release_reservation(&self, part: &mut MaintenancePart) -> bool {
        if !part.is_reserved {
            return false;
        }

        if let Some(item_id) = part.inventory_item_id {
            let quantity = part.quantity_required;
            let found = self
                .store
                .with_item_mut(item_id, |item| {
                    item.reserved = (item.reserved - quantity).max(0);
                })
                .is_some();
            if !found {
                warn!(
                    "⚠️ Inventario {} no encontrado al liberar la parte {}",
                    item_id, part.id
                );
            }
        }

        part.clear_reservation();
        info!("↩️ Reserva liberada para parte {}", part.id);
        true
    }

    /// Registra el consumo de una parte.
    ///
    /// Descuenta `quantity_used` del on-hand y, si había reserva, devuelve
    /// la cantidad originalmente reservada. Si el inventario falta, el
    /// consumo se registra igual sin tocar contadores. Emite `LowStock`
    /// cuando el item cae al nivel de reorden.
    pub fn record_usage(
        &self,
        part: &mut MaintenancePart,
        quantity_used: i64,
    ) -> CoreResult<Vec<DomainEvent>> {
        if quantity_used < 0 {
            return Err(validation_error("quantity_used", "must not be negative"));
        }

        let mut events = Vec::new();
        let was_reserved = part.is_reserved;
        let reserved_quantity = part.quantity_required;

        if let Some(item_id) = part.inventory_item_id {
            let outcome = self.store.with_item_mut(item_id, |item| {
                item.on_hand = (item.on_hand - quantity_used).max(0);
                if was_reserved {
                    item.reserved = (item.reserved - reserved_quantity).max(0);
                }
                if item.is_low_stock() {
                    Some(DomainEvent::LowStock {
                        inventory_item_id: item.id,
                        part_number: item.part_number.clone(),
                        on_hand: item.on_hand,
                        reorder_level: item.reorder_level.unwrap_or(0),
                    })
                } else {
                    None
                }
            });

            match outcome {
                Some(Some(event)) => {
                    warn!(
                        "📉 Stock bajo tras consumo de la parte {}: item {}",
                        part.id, item_id
                    );
                    events.push(event);
                }
                Some(None) => {}
                None => {
                    // Modo degradado: el consumo se registra igual
                    warn!(
                        "⚠️ Inventario {} no encontrado al consumir la parte {}",
                        item_id, part.id
                    );
                }
            }
        }

        part.quantity_used = Some(quantity_used);
        part.clear_reservation();

        info!(
            "🔩 Consumo registrado para parte {}: {} unidades ({})",
            part.id,
            quantity_used,
            part.status()
        );
        Ok(events)
    }

    /// Reserva todas las partes de una tarea; las que fallan no bloquean
    /// al resto
    pub fn reserve_parts_for_task(
        &self,
        parts: &mut [MaintenancePart],
        reserved_by: Option<Uuid>,
        expiry: Option<DateTime<Utc>>,
    ) -> BatchReservation {
        let mut result = BatchReservation::default();

        for part in parts.iter_mut() {
            if self.reserve(part, reserved_by, expiry) {
                result.reserved += 1;
            } else {
                result.failed += 1;
            }
        }

        info!(
            "📦 Reserva por lote: {} ok, {} rechazadas",
            result.reserved, result.failed
        );
        result
    }

    /// Sweep de reservas vencidas: libera toda reserva cuyo expiry ya
    /// pasó. Devuelve cuántas se liberaron.
    pub fn release_expired_reservations(&self, parts: &mut [MaintenancePart]) -> usize {
        let now = self.clock.now();
        let mut released = 0;

        for part in parts.iter_mut() {
            let expired = part.is_reserved
                && part.reservation_expiry.map(|e| e <= now).unwrap_or(false);
            if expired && self.release_reservation(part) {
                released += 1;
            }
        }

        released
    }
}
