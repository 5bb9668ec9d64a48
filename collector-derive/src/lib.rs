#![recursion_limit = "128"]
//! # Collector Derive Macros
//!
//! This crate provides procedural macros for declaring collector models.
//!
//! ## Macros
//!
//! ### `ModelSchema`
//!
//! Derives the `ModelSchema` trait for a struct whose named members are
//! `Field` markers, and generates an extension trait `<Name>Fields` on
//! `Model<Name>` with one getter and one setter per declared field.
//!
//! - **Supported for**: Structs with named fields only
//! - **Struct attribute**: `#[model(name = "...")]` overrides the model name
//!
//! # Examples
//!
//! ```rust,ignore
//! use collector::model::{Field, Model};
//! use collector_derive::ModelSchema;
//!
//! #[derive(ModelSchema)]
//! #[model(name = "product")]
//! pub struct Product {
//!     name: Field,
//!     price: Field,
//! }
//!
//! // generated: trait ProductFields { fn name(&self) -> &Value; fn set_name(..); .. }
//! let mut product = Model::<Product>::empty(collection);
//! product.set_price(10);
//! assert_eq!(product.price(), &Value::from(10));
//! ```
//!
//! ## Error Messages
//!
//! Deriving fails at compile time for enums, unions, tuple structs and for
//! fields named `_key` or `_ts`, which are reserved for record identity.

extern crate proc_macro;
mod model_schema;

use crate::model_schema::generate_schema_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives the `ModelSchema` trait and the `<Name>Fields` accessor trait.
///
/// # Attributes
///
/// - `#[model(name = "...")]` - Model name used as default log target
///
/// # Errors
///
/// Returns a compile error if:
/// - Applied to an enum or union
/// - Used on tuple structs or unit structs
/// - A field is named `_key` or `_ts`
///
/// # Examples
///
/// ```rust,ignore
/// #[derive(ModelSchema)]
/// pub struct Item {
///     value: Field,
///     prop: Field,
/// }
/// ```
#[proc_macro_derive(ModelSchema, attributes(model))]
pub fn derive_model_schema(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_schema_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => {
                let error = syn::Error::new(
                    e.span(),
                    format!(
                        "Failed to derive ModelSchema for struct '{}': {}.\n\
                         Example: #[derive(ModelSchema)] pub struct MyModel {{ value: Field }}",
                        ast.ident, e
                    ),
                );
                error.to_compile_error().into()
            }
        },
        Data::Enum(_) => syn::Error::new_spanned(
            &ast,
            "Cannot derive ModelSchema for enums. Only structs with named fields are supported.",
        )
        .to_compile_error()
        .into(),
        Data::Union(_) => syn::Error::new_spanned(
            &ast,
            "Cannot derive ModelSchema for unions. Only structs with named fields are supported.",
        )
        .to_compile_error()
        .into(),
    }
}
