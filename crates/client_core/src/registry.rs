use std::collections::BTreeMap;

use shared::{
    domain::{Product, ProductKey, Unit},
    error::SyncError,
};

/// Render operation produced by a registry mutation.
///
/// Each mutating operation describes exactly what the view has to do, so the
/// rendering layer never re-derives state by re-scanning the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// A new product enters the list at the given sorted position.
    Insert { index: usize, product: Product },
    UpdateQuantity { key: ProductKey, quantity: f64 },
    UpdateTaken { key: ProductKey, taken: bool },
    Remove { key: ProductKey },
    /// Bulk removal of the given keys, in their list order.
    RemoveMany { keys: Vec<ProductKey> },
    Clear,
}

/// In-memory ordered collection of products, keyed by (name, unit) and
/// iterated in ascending lexicographic order of name.
///
/// The registry exclusively owns all product instances and is the single
/// source of truth for rendering. Every operation checks before it mutates,
/// so a failed call leaves the collection untouched.
#[derive(Debug, Default)]
pub struct ProductRegistry {
    items: BTreeMap<ProductKey, Product>,
}

impl ProductRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &ProductKey) -> Option<&Product> {
        self.items.get(key)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.items.values()
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.items.values().cloned().collect()
    }

    /// Adds `quantity_delta` to an existing product, or inserts a new one at
    /// its sorted position.
    ///
    /// A delta that brings an existing row to a non-positive quantity removes
    /// it, consistent with the reduce path. `None` is returned only for the
    /// degenerate case of a non-positive delta against an absent key: nothing
    /// is created and nothing has to be rendered.
    pub fn upsert_add(&mut self, name: &str, unit: Unit, quantity_delta: f64) -> Option<RenderOp> {
        let key = ProductKey::new(name, unit);
        if let Some(product) = self.items.get_mut(&key) {
            let quantity = product.quantity + quantity_delta;
            if quantity <= 0.0 {
                self.items.remove(&key);
                return Some(RenderOp::Remove { key });
            }
            product.quantity = quantity;
            return Some(RenderOp::UpdateQuantity { key, quantity });
        }

        if quantity_delta <= 0.0 {
            return None;
        }

        let product = Product {
            name: name.to_string(),
            unit,
            quantity: quantity_delta,
            taken: false,
        };
        // Keys strictly below the new one give its sorted insertion index.
        let index = self.items.range(..key.clone()).count();
        self.items.insert(key, product.clone());
        Some(RenderOp::Insert { index, product })
    }

    pub fn set_taken(&mut self, key: &ProductKey, taken: bool) -> Result<RenderOp, SyncError> {
        let product = self
            .items
            .get_mut(key)
            .ok_or_else(|| SyncError::not_found(key.clone()))?;
        product.taken = taken;
        Ok(RenderOp::UpdateTaken {
            key: key.clone(),
            taken,
        })
    }

    /// Subtracts the unit's minimum step. A resulting quantity of zero or
    /// below removes the product, keeping the quantity-always-positive
    /// invariant.
    pub fn reduce_quantity(&mut self, key: &ProductKey) -> Result<RenderOp, SyncError> {
        let product = self
            .items
            .get_mut(key)
            .ok_or_else(|| SyncError::not_found(key.clone()))?;
        let quantity = product.quantity - key.unit.min_step();
        if quantity <= 0.0 {
            self.items.remove(key);
            return Ok(RenderOp::Remove { key: key.clone() });
        }
        product.quantity = quantity;
        Ok(RenderOp::UpdateQuantity {
            key: key.clone(),
            quantity,
        })
    }

    pub fn remove_all(&mut self) -> RenderOp {
        self.items.clear();
        RenderOp::Clear
    }

    /// Removes every product marked taken, preserving the relative order of
    /// the remainder.
    pub fn remove_taken(&mut self) -> RenderOp {
        let keys: Vec<ProductKey> = self
            .items
            .iter()
            .filter(|(_, product)| product.taken)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            self.items.remove(key);
        }
        RenderOp::RemoveMany { keys }
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
