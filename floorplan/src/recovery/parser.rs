//! Strict parsing of repaired text into a [`FloorPlan`].

use once_cell::sync::Lazy;

use crate::{
    error::ParseError,
    model::{FloorPlan, FloorPlanRecord, Room},
    schema::SchemaInfo,
};

static FORMAT_INSTRUCTIONS: Lazy<String> = Lazy::new(|| {
    let schema = FloorPlan::schema().to_json_schema();
    format!(
        "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\
         \n\
         As an example, for the schema {{\"properties\": {{\"foo\": {{\"title\": \"Foo\", \
         \"description\": \"a list of strings\", \"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}, \
         \"required\": [\"foo\"]}}\n\
         the object {{\"foo\": [\"bar\", \"baz\"]}} is a well-formatted instance of the schema. \
         The object {{\"properties\": {{\"foo\": [\"bar\", \"baz\"]}}}} is not well-formatted.\n\
         \n\
         Here is the output schema:\n\
         ```\n\
         {schema}\n\
         ```"
    )
});

/// Text describing the expected JSON shape, for embedding in prompts.
///
/// Rendered from the same [`SchemaInfo`] descriptions the parser validates
/// against, so every field name and accepted enumeration value appears
/// exactly as the parser expects it.
pub fn format_instructions() -> &'static str {
    &FORMAT_INSTRUCTIONS
}

/// Parses strict JSON into a floor plan.
///
/// The text must be a single JSON object with a `rooms` array of room
/// records. Closed-set fields must hold one of their canonical values,
/// `"Unknown"`, or be absent.
///
/// # Errors
///
/// [`ParseError::Json`] for invalid JSON or a mismatched shape (missing
/// `rooms`, wrong value types), and [`ParseError::Schema`] with a path such
/// as `rooms[2].location` for values outside the schema.
///
/// # Examples
///
/// ```
/// use floorplan::recovery::parse_floor_plan;
///
/// let plan = parse_floor_plan(r#"{"rooms": [{"name": "Hall", "link": []}]}"#).unwrap();
/// assert_eq!(plan.len(), 1);
/// assert!(parse_floor_plan(r#"{"rooms": [{"name": "Hall", "size": "XXL"}]}"#).is_err());
/// ```
pub fn parse_floor_plan(text: &str) -> Result<FloorPlan, ParseError> {
    let record: FloorPlanRecord = serde_json::from_str(text)?;

    let rooms = record
        .rooms
        .into_iter()
        .enumerate()
        .map(|(index, room)| {
            Room::try_from(room).map_err(|err| ParseError::in_room(index, err))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FloorPlan::new(rooms))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        error::SchemaViolation,
        model::{Location, RoomType, Size},
        schema::ClosedSet,
    };

    #[test]
    fn test_parse_valid() {
        let text = r#"{"rooms": [
            {"name": "Kitchen", "type": "Kitchen", "link": ["DiningRoom"], "location": "south", "size": "S"},
            {"name": "DiningRoom", "type": "DiningRoom", "link": ["Kitchen"], "location": "south", "size": "M"}
        ]}"#;

        let plan = parse_floor_plan(text).unwrap();
        assert_eq!(plan.len(), 2);

        let kitchen = plan.find_room("Kitchen").unwrap();
        assert_eq!(kitchen.room_type(), Some(RoomType::Kitchen));
        assert_eq!(kitchen.location(), Some(Location::South));
        assert_eq!(kitchen.size(), Some(Size::Small));
        assert_eq!(kitchen.link(), &[Some("DiningRoom".to_string())]);
    }

    #[test]
    fn test_missing_rooms() {
        let err = parse_floor_plan(r#"{"room": []}"#).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
        assert!(err.to_string().contains("rooms"));
    }

    #[test]
    fn test_wrong_value_type() {
        let err = parse_floor_plan(r#"{"rooms": [{"name": "A", "size": 3}]}"#).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_floor_plan(r#"{"rooms": [{"name": "A",}]}"#).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_out_of_set_value_has_path() {
        let text = r#"{"rooms": [
            {"name": "A", "location": "north"},
            {"name": "B", "location": "up"}
        ]}"#;

        match parse_floor_plan(text).unwrap_err() {
            ParseError::Schema { path, source } => {
                assert_eq!(path, "rooms[1].location");
                assert_eq!(
                    source,
                    SchemaViolation::unknown_value("location", "Location", "up")
                );
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_name_has_path() {
        let err = parse_floor_plan(r#"{"rooms": [{"name": ""}]}"#).unwrap_err();
        assert_eq!(err.path(), Some("rooms[0].name"));
    }

    #[test]
    fn test_missing_name_has_path() {
        let err = parse_floor_plan(r#"{"rooms": [{"link": []}]}"#).unwrap_err();
        assert_eq!(err.path(), Some("rooms[0].name"));
    }

    #[test]
    fn test_empty_rooms_allowed() {
        let plan = parse_floor_plan(r#"{"rooms": []}"#).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_round_trip_through_record_form() {
        let text = r#"{"rooms": [
            {"name": "Hall", "link": [null, "Kitchen"]},
            {"name": "Kitchen", "type": "Kitchen", "link": ["Hall"], "location": "center", "size": "XL"}
        ]}"#;
        let plan = parse_floor_plan(text).unwrap();

        let reparsed = parse_floor_plan(&plan.to_json()).unwrap();
        assert!(plan.same_content(&reparsed));
        assert_eq!(reparsed.to_serializable(), plan.to_serializable());
        assert_eq!(reparsed.find_room("Hall").unwrap().room_type(), None);
    }

    #[test]
    fn test_format_instructions_list_every_value() {
        let instructions = format_instructions();

        for value in RoomType::canonical_values()
            .into_iter()
            .chain(Location::canonical_values())
            .chain(Size::canonical_values())
        {
            assert!(
                instructions.contains(&format!("\"{value}\"")),
                "missing {value}"
            );
        }

        for field in ["rooms", "name", "type", "link", "location", "size"] {
            assert!(
                instructions.contains(&format!("\"{field}\"")),
                "missing {field}"
            );
        }
    }

    #[test]
    fn test_format_instructions_embed_schema() {
        let instructions = format_instructions();
        let start = instructions.find("```\n").unwrap() + 4;
        let end = instructions.rfind("\n```").unwrap();
        let schema: serde_json::Value = serde_json::from_str(&instructions[start..end]).unwrap();
        assert_eq!(schema, FloorPlan::schema().to_json_schema());
    }
}
