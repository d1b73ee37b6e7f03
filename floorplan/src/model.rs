//! Rooms, floor plans and their external record form.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use floorplan_derive::ClosedSet;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    error::SchemaViolation,
    schema::{ClosedSet, Field, Schema, SchemaInfo},
};

/// Placeholder written for absent optional fields in the record form.
pub const UNKNOWN: &str = "Unknown";

/// Functional type of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ClosedSet)]
pub enum RoomType {
    LivingRoom,
    MasterRoom,
    Kitchen,
    Bathroom,
    DiningRoom,
    CommonRoom,
    SecondRoom,
    ChildRoom,
    StudyRoom,
    GuestRoom,
    Balcony,
    Entrance,
    Storage,
}

/// Compass position of a room within the layout. North is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ClosedSet)]
#[closed_set(rename_all = "lowercase")]
pub enum Location {
    North,
    Northwest,
    West,
    Southwest,
    South,
    Southeast,
    East,
    Northeast,
    Center,
}

/// Size of a room relative to the whole layout outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ClosedSet)]
pub enum Size {
    #[closed_set(rename = "XL")]
    ExtraLarge,
    #[closed_set(rename = "L")]
    Large,
    #[closed_set(rename = "M")]
    Medium,
    #[closed_set(rename = "S")]
    Small,
    #[closed_set(rename = "XS")]
    ExtraSmall,
}

/// Process-local identity of a [`Room`].
///
/// Assigned once at construction and never serialized. Two rooms with
/// identical fields are still different rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(Uuid);

impl RoomId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A single room of a floor plan.
///
/// Equality and hashing use the room's [`RoomId`] only; use
/// [`Room::same_content`] to compare field values.
///
/// # Examples
///
/// ```
/// use floorplan::model::{Room, RoomType, Size};
///
/// let kitchen = Room::new("Kitchen")
///     .unwrap()
///     .with_type(RoomType::Kitchen)
///     .with_size(Size::Small)
///     .with_link(vec![Some("DiningRoom".to_string())]);
///
/// assert_eq!(kitchen.name(), "Kitchen");
/// assert_eq!(kitchen.size(), Some(Size::Small));
/// ```
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    name: String,
    room_type: Option<RoomType>,
    link: Vec<Option<String>>,
    location: Option<Location>,
    size: Option<Size>,
}

impl Room {
    /// Creates a room with no type, links, location or size.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaViolation::EmptyName`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, SchemaViolation> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaViolation::EmptyName);
        }

        Ok(Self {
            id: RoomId::generate(),
            name,
            room_type: None,
            link: Vec::new(),
            location: None,
            size: None,
        })
    }

    /// Sets the room type.
    pub fn with_type(mut self, room_type: RoomType) -> Self {
        self.room_type = Some(room_type);
        self
    }

    /// Sets the adjacency list.
    pub fn with_link(mut self, link: Vec<Option<String>>) -> Self {
        self.link = link;
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets the size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    #[inline]
    pub fn id(&self) -> RoomId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn room_type(&self) -> Option<RoomType> {
        self.room_type
    }

    /// Names of adjacent rooms. Entries may be absent.
    #[inline]
    pub fn link(&self) -> &[Option<String>] {
        &self.link
    }

    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    #[inline]
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Returns true if both rooms hold the same field values, ignoring identity.
    pub fn same_content(&self, other: &Room) -> bool {
        self.name == other.name
            && self.room_type == other.room_type
            && self.link == other.link
            && self.location == other.location
            && self.size == other.size
    }

    /// External record form, with `"Unknown"` for absent values.
    pub fn to_record(&self) -> RoomRecord {
        RoomRecord {
            name: Some(self.name.clone()),
            room_type: Some(or_unknown(self.room_type)),
            link: self
                .link
                .iter()
                .map(|entry| Some(entry.clone().unwrap_or_else(|| UNKNOWN.to_string())))
                .collect(),
            location: Some(or_unknown(self.location)),
            size: Some(or_unknown(self.size)),
        }
    }
}

impl PartialEq for Room {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Room {}

impl Hash for Room {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl TryFrom<RoomRecord> for Room {
    type Error = SchemaViolation;

    fn try_from(record: RoomRecord) -> Result<Self, Self::Error> {
        let name = record
            .name
            .ok_or(SchemaViolation::MissingField { field: "name" })?;
        let room_type = optional_value::<RoomType>("type", record.room_type.as_deref())?;
        let location = optional_value::<Location>("location", record.location.as_deref())?;
        let size = optional_value::<Size>("size", record.size.as_deref())?;

        let link = record
            .link
            .into_iter()
            .map(|entry| entry.filter(|name| name != UNKNOWN))
            .collect();

        let mut room = Room::new(name)?.with_link(link);
        room.room_type = room_type;
        room.location = location;
        room.size = size;
        Ok(room)
    }
}

impl SchemaInfo for Room {
    fn schema() -> Schema {
        Schema::Object {
            name: "Room".to_string(),
            fields: vec![
                Field::new("name", String::schema())
                    .with_description("The name of the room. Ensure it is unique."),
                Field::new("type", RoomType::schema())
                    .optional()
                    .with_description("The type of the room."),
                Field::new("link", <Vec<Option<String>>>::schema())
                    .with_description("The names of the rooms this room is connected to."),
                Field::new("location", Location::schema())
                    .optional()
                    .with_description(
                        "The location of the room within the layout. \
                         Top represents the north, bottom represents the south.",
                    ),
                Field::new("size", Size::schema())
                    .optional()
                    .with_description(
                        "The size of the room, calculated as a proportion \
                         of the entire layout outline.",
                    ),
            ],
        }
    }
}

fn or_unknown<T: ClosedSet>(value: Option<T>) -> String {
    value.map_or(UNKNOWN, |v| v.as_str()).to_string()
}

fn optional_value<T: ClosedSet>(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<T>, SchemaViolation> {
    match value {
        None | Some(UNKNOWN) => Ok(None),
        Some(value) => T::parse_field(field, value).map(Some),
    }
}

/// An ordered set of rooms describing one layout.
///
/// Built once from a complete room list and not mutated afterwards; an
/// update produces a new plan.
#[derive(Debug, Clone, Default)]
pub struct FloorPlan {
    rooms: Vec<Room>,
}

impl FloorPlan {
    /// Creates a floor plan from rooms in order.
    ///
    /// Duplicate names are accepted; [`FloorPlan::find_room`] only ever
    /// returns the first of them.
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Returns the first room whose name equals `name` exactly.
    pub fn find_room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.name == name)
    }

    /// External record form of every room, in order.
    pub fn to_serializable(&self) -> Vec<RoomRecord> {
        self.rooms.iter().map(Room::to_record).collect()
    }

    /// External record form of the whole plan.
    pub fn to_record(&self) -> FloorPlanRecord {
        FloorPlanRecord {
            rooms: self.to_serializable(),
        }
    }

    /// Textual serialization `{"rooms": [...]}` of the record form.
    pub fn to_json(&self) -> String {
        self.to_string()
    }

    /// Returns true if both plans hold the same rooms in the same order,
    /// compared by content.
    pub fn same_content(&self, other: &FloorPlan) -> bool {
        self.rooms.len() == other.rooms.len()
            && self
                .rooms
                .iter()
                .zip(&other.rooms)
                .all(|(a, b)| a.same_content(b))
    }
}

impl fmt::Display for FloorPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.to_record()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl TryFrom<FloorPlanRecord> for FloorPlan {
    type Error = SchemaViolation;

    fn try_from(record: FloorPlanRecord) -> Result<Self, Self::Error> {
        let rooms = record
            .rooms
            .into_iter()
            .map(Room::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Self::new(rooms))
    }
}

impl SchemaInfo for FloorPlan {
    fn schema() -> Schema {
        Schema::Object {
            name: "FloorPlan".to_string(),
            fields: vec![Field::new("rooms", <Vec<Room>>::schema())],
        }
    }
}

/// External form of a room: plain strings, `"Unknown"` for absent values.
///
/// Reading is more lenient than writing: optional fields may also be `null`
/// or missing, link entries may be `null`, and `link` itself may be missing,
/// `null` or the bare string `"Unknown"` (all meaning no links). A missing
/// or `null` name is read so that validation can report it with its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub room_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_link")]
    pub link: Vec<Option<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// External form of a floor plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlanRecord {
    pub rooms: Vec<RoomRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkField {
    List(Vec<Option<String>>),
    Text(String),
}

fn deserialize_link<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LinkField>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(LinkField::List(entries)) => Ok(entries),
        Some(LinkField::Text(text)) if text == UNKNOWN => Ok(Vec::new()),
        Some(LinkField::Text(text)) => Err(D::Error::custom(format!(
            "expected an array of room names for `link`, found string \"{text}\""
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn kitchen() -> Room {
        Room::new("Kitchen")
            .unwrap()
            .with_type(RoomType::Kitchen)
            .with_link(vec![Some("DiningRoom".to_string())])
            .with_location(Location::South)
            .with_size(Size::Small)
    }

    #[test]
    fn test_closed_set_strings() {
        assert_eq!(RoomType::LivingRoom.as_str(), "LivingRoom");
        assert_eq!(Location::Northwest.as_str(), "northwest");
        assert_eq!(Size::ExtraLarge.as_str(), "XL");
        assert_eq!(Size::ExtraSmall.to_string(), "XS");
    }

    #[test]
    fn test_closed_set_sizes() {
        assert_eq!(RoomType::VARIANTS.len(), 13);
        assert_eq!(Location::VARIANTS.len(), 9);
        assert_eq!(Size::canonical_values(), vec!["XL", "L", "M", "S", "XS"]);
    }

    #[test]
    fn test_closed_set_is_exact() {
        assert_eq!(Location::from_canonical("center"), Some(Location::Center));
        assert_eq!(Location::from_canonical("Center"), None);
        assert_eq!(RoomType::from_canonical("kitchen"), None);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(Room::new("").unwrap_err(), SchemaViolation::EmptyName);
        assert_eq!(Room::new("   ").unwrap().name(), "   ");
    }

    #[test]
    fn test_record_without_name() {
        let record: RoomRecord = serde_json::from_str(r#"{"type": "Kitchen", "link": []}"#).unwrap();
        assert_eq!(record.name, None);
        assert_eq!(
            Room::try_from(record).unwrap_err(),
            SchemaViolation::MissingField { field: "name" }
        );
    }

    #[test]
    fn test_record_with_unknown_type_rejected() {
        let record = RoomRecord {
            name: Some("Garage".to_string()),
            room_type: Some("Garage".to_string()),
            link: Vec::new(),
            location: None,
            size: None,
        };

        let err = Room::try_from(record).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::UnknownValue {
                field: "type",
                set: "RoomType",
                value: "Garage".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_maps_to_absent() {
        let record = RoomRecord {
            name: Some("Hall".to_string()),
            room_type: Some(UNKNOWN.to_string()),
            link: vec![Some(UNKNOWN.to_string()), Some("Kitchen".to_string())],
            location: Some(UNKNOWN.to_string()),
            size: None,
        };

        let room = Room::try_from(record).unwrap();
        assert_eq!(room.room_type(), None);
        assert_eq!(room.location(), None);
        assert_eq!(room.size(), None);
        assert_eq!(room.link(), &[None, Some("Kitchen".to_string())]);
    }

    #[test]
    fn test_to_record_substitutes_unknown() {
        let room = Room::new("Hall").unwrap().with_link(vec![None]);
        assert_eq!(
            room.to_record(),
            RoomRecord {
                name: Some("Hall".to_string()),
                room_type: Some("Unknown".to_string()),
                link: vec![Some("Unknown".to_string())],
                location: Some("Unknown".to_string()),
                size: Some("Unknown".to_string()),
            }
        );
    }

    #[test]
    fn test_identity_not_content() {
        let a = kitchen();
        let b = kitchen();
        assert_ne!(a, b);
        assert!(a.same_content(&b));

        let a_clone = a.clone();
        assert_eq!(a, a_clone);

        let set: HashSet<Room> = [a, a_clone, b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_find_room_returns_first_duplicate() {
        let first = kitchen();
        let second = Room::new("Kitchen").unwrap().with_size(Size::Large);
        let first_id = first.id();
        let plan = FloorPlan::new(vec![first, second]);

        let found = plan.find_room("Kitchen").unwrap();
        assert_eq!(found.id(), first_id);
        assert_eq!(found.size(), Some(Size::Small));
    }

    #[test]
    fn test_find_room_missing() {
        let plan = FloorPlan::new(vec![kitchen()]);
        assert!(plan.find_room("kitchen").is_none());
        assert!(plan.find_room("Bathroom").is_none());
    }

    #[test]
    fn test_to_serializable_preserves_order() {
        let plan = FloorPlan::new(vec![
            Room::new("B").unwrap(),
            Room::new("A").unwrap(),
            Room::new("C").unwrap(),
        ]);
        let names: Vec<_> = plan
            .to_serializable()
            .into_iter()
            .filter_map(|record| record.name)
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_to_json_shape() {
        let plan = FloorPlan::new(vec![kitchen()]);
        let value: serde_json::Value = serde_json::from_str(&plan.to_json()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "rooms": [{
                    "name": "Kitchen",
                    "type": "Kitchen",
                    "link": ["DiningRoom"],
                    "location": "south",
                    "size": "S",
                }]
            })
        );
    }

    #[test]
    fn test_record_link_forms() {
        let bare: RoomRecord =
            serde_json::from_str(r#"{"name": "A", "link": "Unknown"}"#).unwrap();
        assert!(bare.link.is_empty());

        let missing: RoomRecord = serde_json::from_str(r#"{"name": "A"}"#).unwrap();
        assert!(missing.link.is_empty());

        let nulls: RoomRecord =
            serde_json::from_str(r#"{"name": "A", "link": [null, "B"], "size": null}"#).unwrap();
        assert_eq!(nulls.link, vec![None, Some("B".to_string())]);
        assert_eq!(nulls.size, None);

        let other = serde_json::from_str::<RoomRecord>(r#"{"name": "A", "link": "B"}"#);
        assert!(other.is_err());
    }

    #[test]
    fn test_room_schema_fields() {
        match Room::schema() {
            Schema::Object { name, fields } => {
                assert_eq!(name, "Room");
                let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, vec!["name", "type", "link", "location", "size"]);
                assert!(fields[0].required);
                assert!(!fields[1].required);
            }
            other => panic!("expected object schema, got {other:?}"),
        }
    }
}
