use std::collections::HashMap;

use shared::{
    domain::{quantity_label, ProductKey, Unit},
    error::SyncError,
    protocol::ListEvent,
};

use crate::{
    registry::{ProductRegistry, RenderOp},
    view::ListView,
};

/// Applies authority-pushed mutation events to the registry and forwards the
/// resulting render operations to the view.
///
/// This is the only component that calls registry mutators in response to
/// inbound events. Events must be applied in arrival order: quantities travel
/// as relative deltas, so the transport has to guarantee ordered, at-most-once
/// delivery. A failed event is rejected before any mutation happens and
/// produces no visible change.
pub struct ListSynchronizer<V: ListView> {
    registry: ProductRegistry,
    view: V,
    handles: HashMap<ProductKey, V::Handle>,
}

impl<V: ListView> ListSynchronizer<V> {
    pub fn new(view: V) -> Self {
        Self {
            registry: ProductRegistry::new(),
            view,
            handles: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &ProductRegistry {
        &self.registry
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Applies one inbound event atomically: either the registry mutates and
    /// the view receives exactly one render operation, or nothing changes.
    pub fn apply(&mut self, event: &ListEvent) -> Result<(), SyncError> {
        match event {
            ListEvent::AddToList {
                name,
                unit,
                quantity,
            } => {
                let key = normalize(name, unit)?;
                let Some(op) = self.registry.upsert_add(&key.name, key.unit, *quantity) else {
                    return Ok(());
                };
                self.render(op);
                Ok(())
            }
            ListEvent::UpdateTakenState { name, unit, taken } => {
                let key = normalize(name, unit)?;
                let op = self.registry.set_taken(&key, *taken)?;
                self.render(op);
                Ok(())
            }
            ListEvent::ReduceQuantity { name, unit } => {
                let key = normalize(name, unit)?;
                let op = self.registry.reduce_quantity(&key)?;
                self.render(op);
                Ok(())
            }
            ListEvent::RemoveTaken => {
                let op = self.registry.remove_taken();
                self.render(op);
                Ok(())
            }
            ListEvent::RemoveAll => {
                let op = self.registry.remove_all();
                self.render(op);
                Ok(())
            }
        }
    }

    fn render(&mut self, op: RenderOp) {
        match op {
            RenderOp::Insert { index, product } => {
                let key = product.key();
                let handle = self.view.insert(index, &product);
                self.handles.insert(key, handle);
            }
            RenderOp::UpdateQuantity { key, quantity } => {
                if let Some(handle) = self.handles.get_mut(&key) {
                    self.view
                        .set_quantity_label(handle, &quantity_label(quantity, key.unit));
                }
            }
            RenderOp::UpdateTaken { key, taken } => {
                if let Some(handle) = self.handles.get_mut(&key) {
                    self.view.set_taken(handle, taken);
                }
            }
            RenderOp::Remove { key } => {
                if let Some(handle) = self.handles.remove(&key) {
                    self.view.remove(handle);
                }
            }
            RenderOp::RemoveMany { keys } => {
                for key in keys {
                    if let Some(handle) = self.handles.remove(&key) {
                        self.view.remove(handle);
                    }
                }
            }
            RenderOp::Clear => {
                self.handles.clear();
                self.view.clear();
            }
        }
    }
}

/// Validates the payload identity fields and normalizes the unit token, so
/// "no unit" is never ambiguous with an empty string key.
fn normalize(name: &str, unit: &str) -> Result<ProductKey, SyncError> {
    if name.is_empty() {
        return Err(SyncError::malformed("product name must not be empty"));
    }
    let unit = Unit::parse(unit)?;
    Ok(ProductKey::new(name, unit))
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
