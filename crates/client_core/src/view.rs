use shared::domain::Product;

/// Seam between the synchronizer and the rendering layer.
///
/// Each product maps to exactly one view node; the synchronizer keeps the
/// (name, unit) to handle mapping, so no state is ever parsed back out of
/// rendered nodes. Implementations only execute the render operations they
/// are handed, in the order they are handed them.
pub trait ListView {
    type Handle;

    /// Creates the view node for a newly inserted product at `index`.
    fn insert(&mut self, index: usize, product: &Product) -> Self::Handle;

    /// Updates the quantity text label of an existing node.
    fn set_quantity_label(&mut self, handle: &mut Self::Handle, label: &str);

    /// Updates the taken/untaken styling of an existing node.
    fn set_taken(&mut self, handle: &mut Self::Handle, taken: bool);

    fn remove(&mut self, handle: Self::Handle);

    fn clear(&mut self);
}

/// View that renders nothing. Useful for headless clients that only observe
/// registry snapshots.
pub struct NullView;

impl ListView for NullView {
    type Handle = ();

    fn insert(&mut self, _index: usize, _product: &Product) -> Self::Handle {}

    fn set_quantity_label(&mut self, _handle: &mut Self::Handle, _label: &str) {}

    fn set_taken(&mut self, _handle: &mut Self::Handle, _taken: bool) {}

    fn remove(&mut self, _handle: Self::Handle) {}

    fn clear(&mut self) {}
}
