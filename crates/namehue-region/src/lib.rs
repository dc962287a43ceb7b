//! # namehue-region - Marker-Delimited Stylesheet Regions
//!
//! Several independent writers share one stylesheet file. Each owns a region
//! bounded by a unique pair of marker lines, for example:
//!
//! ```css
//! .site-header { color: #333; }
//! /* COLORS START */
//! [class$="chatmessage-ash"] strong { color: #27a836 !important; }
//! /* COLORS END */
//! /* ICONS START */
//! /* ICONS END */
//! ```
//!
//! [`replace_region`] swaps one region's lines for a freshly generated body
//! and leaves every other byte of the text as it was. It is a pure function:
//! reading and writing the file is the caller's business.
//!
//! ## Guarantees
//!
//! - Replacing a region twice with the same body gives the same text as
//!   replacing it once.
//! - Replacing region A never changes region B or any unowned content.
//! - Unbalanced, reordered or duplicated markers are reported as a
//!   [`RegionError`] instead of guessing where to splice.

mod error;
mod region;

pub use error::{RegionError, Result};
pub use region::{extract_region, locate, replace_region, Region, Span};
