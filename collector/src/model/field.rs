use crate::common::IDENTITY_FIELDS;

/// Trait that declares the field set of a model type.
///
/// # Purpose
/// Provides the runtime registry of declared fields for a model type. Only
/// declared fields take part in iteration, save payloads and the mapping view
/// of a [`crate::model::Model`]. Implemented automatically by the
/// `ModelSchema` derive macro.
///
/// # Characteristics
/// - Declared names are fixed when the type is defined
/// - Declaration order is preserved
/// - No validation or coercion of field values
/// - `_key` and `_ts` are identity fields and never declared
///
/// # Usage
/// ```ignore
/// #[derive(ModelSchema)]
/// #[model(name = "product")]
/// pub struct Product {
///     name: Field,
///     price: Field,
/// }
///
/// assert_eq!(Product::field_names(), &["name", "price"]);
/// ```
pub trait ModelSchema: 'static {
    /// Returns the default log identifier of the model type.
    fn model_name() -> &'static str;

    /// Returns the declared field names in declaration order.
    fn field_names() -> &'static [&'static str];

    /// Returns true if `name` is a declared field.
    fn is_field(name: &str) -> bool {
        Self::field_names().contains(&name)
    }
}

/// Marker for a declared field in a model struct.
///
/// The struct itself is never instantiated by the library; its members only
/// name the fields. Values live in the [`crate::model::Model`] instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Field;

/// Returns true for the identity names `_key` and `_ts`.
#[inline]
pub fn is_identity_field(name: &str) -> bool {
    IDENTITY_FIELDS.contains(&name)
}
