//! Shallow merge of partial updates.
//!
//! A slice is updated by merging a *patch* into it: every field present in the
//! patch replaces the slice's field wholesale, every absent field is left
//! untouched. Nested values are never merged recursively, so a patch carrying a
//! new `user` object replaces the old object rather than combining the two.
//!
//! Patches model "field absent" as `None`. Nullable slice fields therefore use
//! `Option<Option<T>>` in the patch: `None` leaves the field alone,
//! `Some(None)` clears it, `Some(Some(v))` sets it.

/// A state slice that accepts partial updates.
pub trait Merge {
    /// Partial form of the slice
    type Patch;

    /// Merge `patch` into `self` (shallow, later keys win)
    fn merge(&mut self, patch: Self::Patch);
}

/// Overwrite `target` when the patch carries a value for it.
pub fn merge_field<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
