//! Field adapters for values whose wire shape differs from their in-memory shape.

pub mod extattrs;
pub mod nullable;
pub mod reference_list;

pub use extattrs::ExtAttrs;
pub use nullable::{CollectionState, NullableCollection};
pub use reference_list::Referenced;
