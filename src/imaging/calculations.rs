//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Proportional scaling is expressed as an [`Extent`] accumulator threaded
//! through successive anchor calls. Each call sees the *previous call's*
//! result, not the original source size, so the order of anchoring matters
//! whenever a step rounds:
//!
//! ```text
//! 1000x333 ─anchor_width(10)→ 10x3 ─anchor_height(7)→ 23x7
//! 1000x333 ─anchor_height(7)→ 21x7
//! ```

/// Scale `secondary` so that the `secondary / primary` ratio survives pinning
/// `primary` to `target`.
///
/// Returns the new `(primary, secondary)`. A `target` of 0 means "not
/// requested" and leaves the pair untouched, as does a zero `primary` (there
/// is no ratio to preserve).
///
/// # Examples
/// ```
/// # use thumbwright::imaging::scale_to_dimension;
/// // 800x600 pinned to a width of 400 → 400x300
/// assert_eq!(scale_to_dimension(400, 800, 600), (400, 300));
///
/// // target 0 is a no-op
/// assert_eq!(scale_to_dimension(0, 800, 600), (800, 600));
/// ```
pub fn scale_to_dimension(target: u32, primary: u32, secondary: u32) -> (u32, u32) {
    if target == 0 || primary == 0 {
        return (primary, secondary);
    }
    let scaled = (secondary as f64 * target as f64 / primary as f64).round() as u32;
    (target, scaled)
}

/// A width/height pair carried between successive scaling steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pin the width to `target`, deriving the height from the current ratio.
    pub fn anchor_width(self, target: u32) -> Self {
        let (width, height) = scale_to_dimension(target, self.width, self.height);
        Self { width, height }
    }

    /// Pin the height to `target`, deriving the width from the current ratio.
    pub fn anchor_height(self, target: u32) -> Self {
        let (height, width) = scale_to_dimension(target, self.height, self.width);
        Self { width, height }
    }
}

/// Proportional size for layout purposes.
///
/// Anchors `width` first and then `height` on the *same* accumulator, so a
/// request carrying both compounds. Zero for either axis skips that step;
/// `(0, 0)` returns the source size.
pub fn proportional_size(source: (u32, u32), width: u32, height: u32) -> (u32, u32) {
    let extent = Extent::new(source.0, source.1)
        .anchor_width(width)
        .anchor_height(height);
    (extent.width, extent.height)
}

/// Derive one axis from the other while preserving the source aspect ratio.
///
/// `known_source` / `other_source` is the source ratio along the two axes;
/// returns `round(other_source * known_target / known_source)`.
pub(crate) fn derive_axis(other_source: u32, known_target: u32, known_source: u32) -> u32 {
    if known_source == 0 {
        return other_source;
    }
    (other_source as f64 * known_target as f64 / known_source as f64).round() as u32
}
