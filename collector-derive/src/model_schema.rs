use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{DataStruct, DeriveInput, Fields, LitStr, Result};

const RESERVED_FIELDS: [&str; 2] = ["_key", "_ts"];

// Methods reachable on `Model<T>` through inherent impls, `FieldMap`,
// `QueryApi` and the std traits it implements.
const RESERVED_METHODS: [&str; 39] = [
    "new",
    "empty",
    "create",
    "key",
    "ts",
    "ts_datetime",
    "collection",
    "logname",
    "get",
    "set",
    "field_value",
    "set_field_value",
    "untracked",
    "save",
    "delete",
    "execute",
    "ts_from_value",
    "key_from_value",
    "field_not_found",
    "immutable_field",
    "get_item",
    "set_item",
    "del_item",
    "keys",
    "to_record",
    "len",
    "is_empty",
    "contains_key",
    "chain",
    "select",
    "when",
    "prefix",
    "prefix_with_count",
    "clone",
    "clone_from",
    "eq",
    "ne",
    "fmt",
    "to_string",
];

/// Returns the generated accessor name that would shadow or be shadowed by
/// an existing `Model` method, if any.
fn conflicting_accessor(field_name: &str) -> Option<String> {
    let setter = format!("set_{}", field_name);
    [field_name.to_string(), setter]
        .into_iter()
        .find(|accessor| RESERVED_METHODS.contains(&accessor.as_str()))
}

pub(crate) fn generate_schema_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let name = &ast.ident;
    let vis = &ast.vis;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut model_name = name.to_string();
    for attr in &ast.attrs {
        if attr.path().is_ident("model") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    model_name = s.value();
                    Ok(())
                } else {
                    Err(meta.error("Unknown model attribute"))
                }
            })?
        }
    }

    let named = match &data.fields {
        Fields::Named(named) => named,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                "Only structs with named fields are supported",
            ))
        }
    };

    let mut field_idents = Vec::with_capacity(named.named.len());
    for field in &named.named {
        if let Some(ident) = &field.ident {
            let field_name = ident.to_string();
            if RESERVED_FIELDS.contains(&field_name.as_str()) {
                return Err(syn::Error::new_spanned(
                    ident,
                    format!("Field {} is reserved for record identity", field_name),
                ));
            }
            if let Some(accessor) = conflicting_accessor(&field_name) {
                return Err(syn::Error::new_spanned(
                    ident,
                    format!(
                        "Field {} would generate accessor {} which clashes with a Model method",
                        field_name, accessor
                    ),
                ));
            }
            field_idents.push(ident.clone());
        }
    }

    let field_names: Vec<String> = field_idents.iter().map(|ident| ident.to_string()).collect();
    let fields_trait = format_ident!("{}Fields", name);

    let getter_signatures = field_idents.iter().map(|ident| {
        quote! {
            fn #ident(&self) -> &collector::common::Value;
        }
    });

    let setter_signatures = field_idents.iter().map(|ident| {
        let setter = format_ident!("set_{}", ident);
        quote! {
            fn #setter<T: Into<collector::common::Value>>(&mut self, value: T);
        }
    });

    let accessors: Vec<proc_macro2::TokenStream> = field_idents
        .iter()
        .zip(field_names.iter())
        .map(|(ident, field_name)| {
            let setter = format_ident!("set_{}", ident);
            quote! {
                fn #ident(&self) -> &collector::common::Value {
                    self.field_value(#field_name)
                }

                fn #setter<T: Into<collector::common::Value>>(&mut self, value: T) {
                    self.set_field_value(#field_name, value.into())
                }
            }
        })
        .collect();

    let gen = quote! {
        impl #impl_generics collector::model::ModelSchema for #name #ty_generics #where_clause {
            fn model_name() -> &'static str {
                #model_name
            }

            fn field_names() -> &'static [&'static str] {
                &[#(#field_names),*]
            }
        }

        #vis trait #fields_trait {
            #(#getter_signatures)*
            #(#setter_signatures)*
        }

        impl #impl_generics #fields_trait for collector::model::Model<#name #ty_generics> #where_clause {
            #(#accessors)*
        }
    };

    Ok(TokenStream::from(gen))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields_have_no_conflict() {
        assert_eq!(conflicting_accessor("title"), None);
        assert_eq!(conflicting_accessor("value"), None);
        assert_eq!(conflicting_accessor("price"), None);
    }

    #[test]
    fn test_getter_conflicts() {
        assert_eq!(conflicting_accessor("key"), Some("key".to_string()));
        assert_eq!(conflicting_accessor("keys"), Some("keys".to_string()));
        assert_eq!(conflicting_accessor("select"), Some("select".to_string()));
        assert_eq!(conflicting_accessor("len"), Some("len".to_string()));
    }

    #[test]
    fn test_setter_conflicts() {
        assert_eq!(conflicting_accessor("item"), Some("set_item".to_string()));
        assert_eq!(
            conflicting_accessor("field_value"),
            Some("field_value".to_string())
        );
    }
}
