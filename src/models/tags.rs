//! Wire-side tag wrapper.
//!
//! Several entities carry their tags as `{"tags": {"customerTags": [...]}}`
//! on the wire. Annotate a `Vec<String>` field with
//! `#[serde(default, with = "tags")]` to flatten that wrapper away.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize, Default)]
struct Wrapper {
    #[serde(rename = "customerTags", default)]
    customer_tags: Vec<String>,
}

pub(crate) fn serialize<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    Wrapper {
        customer_tags: tags.to_vec(),
    }
    .serialize(serializer)
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    Ok(Wrapper::deserialize(deserializer)?.customer_tags)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Entity {
        #[serde(default, with = "super")]
        tags: Vec<String>,
    }

    #[test]
    fn test_tags_explode_and_nest() {
        let entity = Entity {
            tags: vec!["prod".to_string(), "team-a".to_string()],
        };
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"tags": {"customerTags": ["prod", "team-a"]}})
        );

        let back: Entity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_missing_wrapper_contents() {
        let entity: Entity = serde_json::from_str(r#"{"tags":{}}"#).unwrap();
        assert!(entity.tags.is_empty());
    }
}
