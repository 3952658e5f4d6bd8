use serde::Deserialize;
use serde_json::Value;

use mediashelf_inventory::{CreateItem, ItemQuery};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /items`.
///
/// Fields are kept as raw JSON so that a value of the wrong JSON type reads
/// as "absent" instead of failing the whole body.
#[derive(Debug, Default, Deserialize)]
pub struct CreateItemRequest {
    #[serde(rename = "type")]
    pub item_type: Option<Value>,
    pub title: Option<Value>,
    pub author: Option<Value>,
    pub year: Option<Value>,
}

impl CreateItemRequest {
    pub fn into_command(self) -> CreateItem {
        let text = |v: Option<Value>| match v {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        CreateItem {
            item_type: text(self.item_type),
            title: text(self.title),
            author: text(self.author),
            year: self.year.as_ref().and_then(Value::as_i64),
        }
    }
}

/// Query string of `GET /items`.
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

impl ListItemsQuery {
    pub fn to_query(&self) -> ItemQuery {
        ItemQuery::new(self.q.as_deref(), self.item_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> CreateItem {
        serde_json::from_value::<CreateItemRequest>(body).unwrap().into_command()
    }

    #[test]
    fn well_formed_body_maps_every_field() {
        let cmd = parse(json!({"type": "book", "title": "Dune", "author": "Frank Herbert", "year": 1965}));
        assert_eq!(
            cmd,
            CreateItem {
                item_type: Some("book".into()),
                title: Some("Dune".into()),
                author: Some("Frank Herbert".into()),
                year: Some(1965),
            }
        );
    }

    #[test]
    fn wrongly_typed_fields_read_as_absent() {
        let cmd = parse(json!({"type": 3, "title": ["x"], "author": false, "year": "1965"}));
        assert_eq!(cmd, CreateItem::default());
    }

    #[test]
    fn null_year_is_absent() {
        let cmd = parse(json!({"type": "film", "title": "Heat", "year": null}));
        assert_eq!(cmd.year, None);
    }

    #[test]
    fn list_query_is_normalised() {
        let q = ListItemsQuery { q: Some("  SPACE ".into()), item_type: Some("Comic".into()) }.to_query();
        assert_eq!(q.text(), Some("space"));
        assert_eq!(q.item_type(), None);
    }
}
