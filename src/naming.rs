//! Artifact naming: the cache identity of a thumbnail.
//!
//! A thumbnail's file name encodes every plan field that changes its pixels'
//! geometry, so the name alone identifies the variant:
//!
//! ```text
//! photo.jpg + crop (10, 20) + target 200x150
//!   → photo-10x20px-200x150size.jpg
//! ```
//!
//! Quality is *not* part of the name: two requests differing
//! only in quality share one artifact, and whichever ran first wins.
//!
//! Names are pure functions of `(file name, plan)`. The same inputs always
//! give the same name, and any difference in `crop_x`, `crop_y`,
//! `target_width` or `target_height` gives a different one.

use crate::imaging::ResizePlan;

/// A file name split at its last dot.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitName<'a> {
    /// Everything before the last dot (the whole name if there is none).
    pub stem: &'a str,
    /// Text after the last dot, without the dot.
    pub extension: Option<&'a str>,
}

/// Split `file_name` into stem and extension.
///
/// - `"photo.jpg"` → stem `"photo"`, extension `Some("jpg")`
/// - `"archive.tar.gz"` → stem `"archive.tar"`, extension `Some("gz")`
/// - `"README"` → stem `"README"`, extension `None`
/// - `".hidden"` → stem `".hidden"`, extension `None`
pub fn split_file_name(file_name: &str) -> SplitName<'_> {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => SplitName {
            stem: &file_name[..pos],
            extension: Some(&file_name[pos + 1..]),
        },
        _ => SplitName {
            stem: file_name,
            extension: None,
        },
    }
}

/// Suffix inserted between stem and extension, e.g. `-10x20px-200x150size`.
pub fn variant_suffix(plan: &ResizePlan) -> String {
    format!(
        "-{}x{}px-{}x{}size",
        plan.crop_x, plan.crop_y, plan.target_width, plan.target_height
    )
}

/// Cache file name for `plan` applied to the source file `file_name`.
///
/// The source extension is kept verbatim (including its case).
pub fn artifact_name(file_name: &str, plan: &ResizePlan) -> String {
    let split = split_file_name(file_name);
    match split.extension {
        Some(ext) => format!("{}{}.{}", split.stem, variant_suffix(plan), ext),
        None => format!("{}{}", split.stem, variant_suffix(plan)),
    }
}
