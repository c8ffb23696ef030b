//! Field selection on serialized records

use std::collections::BTreeSet;

use serde_json::Value;

/// Keeps only the selected top-level keys of a JSON object, plus `id`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    fields: Option<BTreeSet<String>>,
}

impl Projection {
    pub fn new(select: Option<&[String]>) -> Self {
        Self {
            fields: select.map(|fields| fields.iter().cloned().collect()),
        }
    }

    pub fn is_full(&self) -> bool {
        self.fields.is_none()
    }

    pub fn apply(&self, mut record: Value) -> Value {
        if let (Some(fields), Value::Object(map)) = (&self.fields, &mut record) {
            map.retain(|key, _| key == "id" || fields.contains(key));
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_selected_fields_and_id() {
        let select = vec!["name".to_string(), "averageCost".to_string(), "nope".to_string()];
        let projected = Projection::new(Some(&select)).apply(json!({
            "id": "x",
            "name": "Devworks",
            "averageCost": 10000,
            "description": "long",
        }));
        assert_eq!(projected, json!({"id": "x", "name": "Devworks", "averageCost": 10000}));
    }

    #[test]
    fn no_select_returns_the_record_untouched() {
        let record = json!({"id": "x", "name": "Devworks"});
        assert!(Projection::new(None).is_full());
        assert_eq!(Projection::new(None).apply(record.clone()), record);
    }
}
