use crate::common::Value;

/// One `(name, value)` pair of the wire query string. Names may repeat and
/// their order is meaningful.
pub type QueryParam = (String, String);

/// Builds a wire parameter, rendering the value as wire text.
#[inline]
pub fn param<V: Into<Value>>(name: &str, value: V) -> QueryParam {
    (name.to_string(), value.into().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_renders_wire_text() {
        assert_eq!(param("key", "foo"), ("key".to_string(), "foo".to_string()));
        assert_eq!(param("prefixcount", 5), ("prefixcount".to_string(), "5".to_string()));
    }
}
