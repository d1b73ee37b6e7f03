//! Recovery of a floor plan from raw completion text.
//!
//! Three local stages, applied in order:
//!
//! 1. [`extract_object`] isolates the first balanced `{...}` region
//! 2. [`repair`] applies the fixed sequence of textual repairs
//! 3. [`parse_floor_plan`] parses strict JSON into the schema model

mod extractor;
mod parser;
mod repair;

use std::ops::Range;

pub use extractor::{extract_object, find_object_span};
pub use parser::{format_instructions, parse_floor_plan};
pub use repair::{
    normalize_key_values, remove_comments, remove_trailing_commas, repair, Repair, Repaired,
};
use tracing::{debug, trace, warn};

use crate::{error::Result, model::FloorPlan};

/// A recovered floor plan along with how it was recovered.
#[derive(Debug, Clone)]
pub struct Recovery {
    /// The parsed floor plan.
    pub plan: FloorPlan,
    /// Byte range of the extracted region within the completion text.
    pub span: Range<usize>,
    /// Repairs that changed the extracted text, in the order applied.
    pub repairs: Vec<Repair>,
}

/// Recovers a floor plan from raw completion text.
///
/// # Errors
///
/// [`Error::Extraction`](crate::error::Error::Extraction) when no balanced
/// object is found, [`Error::Parse`](crate::error::Error::Parse) when the
/// repaired text is not a valid floor plan.
///
/// # Examples
///
/// ```
/// use floorplan::recover;
///
/// let reply = r#"Here you go: {"rooms": [{"name": "Study", "type": "StudyRoom", "link": [],}]}"#;
/// let plan = recover(reply).unwrap();
/// assert_eq!(plan.rooms()[0].name(), "Study");
/// ```
pub fn recover(completion: &str) -> Result<FloorPlan> {
    recover_with_report(completion).map(|recovery| recovery.plan)
}

/// Like [`recover`], but also reports the extracted span and applied repairs.
pub fn recover_with_report(completion: &str) -> Result<Recovery> {
    let span = find_object_span(completion).map_err(|err| {
        warn!(error = %err, "no JSON object in completion");
        err
    })?;
    trace!(start = span.start, end = span.end, "extracted JSON region");

    let Repaired { text, applied } = repair(&completion[span.clone()]);
    if !applied.is_empty() {
        debug!(repairs = ?applied, "repaired extracted JSON");
    }

    let plan = parse_floor_plan(&text).map_err(|err| {
        warn!(error = %err, "completion did not match the floor plan schema");
        err
    })?;

    Ok(Recovery {
        plan,
        span,
        repairs: applied,
    })
}
