//! # floorplan
//!
//! Extracts structured floor plans from free-text descriptions using a
//! language model, and recovers usable JSON from the model's imperfect
//! replies.
//!
//! Replies from language models often wrap JSON in prose, leave comments in
//! it, or add trailing commas. Recovery handles this locally:
//! - the first balanced `{...}` region is isolated
//! - comments and trailing commas are removed
//! - the result is parsed strictly against the floor plan schema
//!
//! ## Quick Start
//!
//! ```rust
//! use floorplan::recover;
//!
//! let reply = r#"Here is the JSON:
//! {"rooms": [
//!     {"name": "Kitchen", "type": "Kitchen", "link": ["Hall"], "size": "M"},
//!     {"name": "Hall", "type": "Entrance", "link": ["Kitchen"],},
//! ]}"#;
//!
//! let plan = recover(reply).unwrap();
//! assert_eq!(plan.len(), 2);
//! assert_eq!(plan.find_room("Hall").unwrap().link(), &[Some("Kitchen".to_string())]);
//! ```
//!
//! ## Talking to a model
//!
//! [`FloorPlanExtractor`] renders the prompt, sends one completion request
//! and recovers the reply. Any [`CompletionClient`](completion::CompletionClient)
//! works, including a closure:
//!
//! ```rust
//! use floorplan::{completion::CompletionRequest, error::CompletionError, FloorPlanExtractor};
//!
//! let extractor = FloorPlanExtractor::new(
//!     |_: &CompletionRequest| -> Result<String, CompletionError> {
//!         Ok(r#"{"rooms": [{"name": "Bedroom", "type": "MasterRoom", "link": [], "location": "north"}]}"#.into())
//!     },
//!     "llama3:instruct",
//! );
//!
//! let json = extractor.extract_information("A bedroom in the north.").unwrap();
//! assert!(json.contains(r#""location":"north""#));
//! ```

// Generated `ClosedSet` impls name this crate by path.
extern crate self as floorplan;

pub mod completion;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod recovery;
pub mod schema;

pub use error::{Error, Result};
pub use model::{FloorPlan, Location, Room, RoomType, Size};
pub use pipeline::FloorPlanExtractor;
pub use recovery::{format_instructions, recover, recover_with_report};

/// Extracts a floor plan from `description` and returns its serialization.
///
/// Convenience for a one-off call; see [`FloorPlanExtractor::extract_information`].
///
/// # Errors
///
/// Returns an error if the completion fails or its reply cannot be recovered.
pub fn extract_information<C>(client: C, model: &str, description: &str) -> Result<String>
where
    C: completion::CompletionClient,
{
    FloorPlanExtractor::new(client, model).extract_information(description)
}

/// Updates a serialized floor plan with `new_description`.
///
/// Convenience for a one-off call; see [`FloorPlanExtractor::update_floor_plan`].
///
/// # Errors
///
/// Returns an error if the completion fails or its reply cannot be recovered.
pub fn update_floor_plan<C>(
    client: C,
    model: &str,
    existing: &str,
    new_description: &str,
) -> Result<String>
where
    C: completion::CompletionClient,
{
    FloorPlanExtractor::new(client, model).update_floor_plan(existing, new_description)
}
