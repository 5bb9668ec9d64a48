#[cfg(test)]
#[allow(dead_code)]
mod tests {
    use collector::collection::{Collection, InMemoryCollection};
    use collector::common::Value;
    use collector::model::{Field, FieldMap, Model, ModelSchema};
    use collector::record;
    use collector_derive::ModelSchema;

    fn collection() -> Collection {
        Collection::new(InMemoryCollection::new("test"))
    }

    #[test]
    fn test_simple_model_schema() {
        #[derive(ModelSchema)]
        struct Book {
            title: Field,
            author: Field,
        }

        assert_eq!(Book::model_name(), "Book");
        assert_eq!(Book::field_names(), &["title", "author"]);
        assert!(Book::is_field("title"));
        assert!(!Book::is_field("isbn"));
    }

    #[test]
    fn test_model_schema_with_name() {
        #[derive(ModelSchema)]
        #[model(name = "library_book")]
        struct Book {
            title: Field,
        }

        assert_eq!(Book::model_name(), "library_book");
        let model = Model::<Book>::empty(collection());
        assert_eq!(model.logname(), "library_book");
    }

    #[test]
    fn test_empty_model_schema() {
        #[derive(ModelSchema)]
        struct Empty {}

        assert!(Empty::field_names().is_empty());
        let model = Model::<Empty>::new(collection(), None, record! { "_key": "k" }).unwrap();
        assert_eq!(model.keys(), vec!["_key"]);
    }

    #[test]
    fn test_generated_accessors() {
        #[derive(ModelSchema)]
        struct Product {
            name: Field,
            price: Field,
        }

        let mut product = Model::<Product>::empty(collection());
        assert!(product.name().is_null());

        product.set_name("chair");
        product.set_price(49.5);
        assert_eq!(product.name(), &Value::from("chair"));
        assert_eq!(product.price(), &Value::from(49.5));
        assert_eq!(product.get_item("price").unwrap(), Value::from(49.5));

        product.set_price(None::<i64>);
        assert!(product.price().is_null());
    }

    #[test]
    fn test_declaration_order_drives_mapping_view() {
        #[derive(ModelSchema)]
        struct Ordered {
            zeta: Field,
            alpha: Field,
            mid: Field,
        }

        let model = Model::<Ordered>::new(
            collection(),
            None,
            record! { "mid": 3, "alpha": 1, "_ts": 10 },
        )
        .unwrap();
        assert_eq!(model.keys(), vec!["zeta", "alpha", "mid", "_ts"]);
        assert_eq!(
            model.to_string(),
            r#"{"zeta":null,"alpha":1,"mid":3,"_ts":10}"#
        );
    }
}
