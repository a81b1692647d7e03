//! Store de inventario en memoria
//!
//! Mapa compartido de items de inventario detrás de un RwLock. El ledger
//! de partes toma el lock de escritura para todo el read-modify-write de
//! contadores, de modo que chequeo de disponibilidad y reserva sean
//! atómicos entre sí.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::models::inventory::InventoryItem;

/// Store compartido de items de inventario
#[derive(Clone, Default)]
pub struct InventoryStore {
    items: Arc<RwLock<HashMap<Uuid, InventoryItem>>>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta o reemplaza un item
    pub fn insert(&self, item: InventoryItem) {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.insert(item.id, item);
    }

    /// Copia del item, si existe
    pub fn get(&self, id: Uuid) -> Option<InventoryItem> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.get(&id).cloned()
    }

    /// Muta un item bajo el lock de escritura. Devuelve `None` si el item
    /// no existe; si existe, el resultado del closure.
    pub fn with_item_mut<R>(
        &self,
        id: Uuid,
        mutate: impl FnOnce(&mut InventoryItem) -> R,
    ) -> Option<R> {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.get_mut(&id).map(mutate)
    }

    /// Items con stock en o por debajo del nivel de reorden
    pub fn low_stock_items(&self) -> Vec<InventoryItem> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items
            .values()
            .filter(|item| item.is_low_stock())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
