/*!
 * Validation of parsed segments.
 *
 * - `segments`: filters invalid segments and orders the survivors by start
 *
 * Temporally overlapping segments that are individually valid are kept
 * as-is; validation only filters and sorts.
 */

pub mod segments;

// Re-export main types
pub use segments::{validate_segments, DropReason, SegmentValidator, ValidationSummary};
