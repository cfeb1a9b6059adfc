//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`render`](crate::render) orchestrator (which decides
//! what thumbnail to create) and the [`backend`](super::backend) (which does the
//! actual pixel work). This separation allows swapping backends (e.g. for
//! testing with a mock) without changing the resolution logic.
//!
//! ## Types
//!
//! - [`ResizeOptions`]: the raw, all-optional request option bag.
//! - [`ResizePlan`]: fully resolved geometry and quality for one thumbnail.
//! - [`Resample`]: source rectangle → destination rectangle wiring for the backend.

use serde::{Deserialize, Serialize};

/// Raw resize/crop request.
///
/// Every field is optional. Dimension fields treat `0` the same as absent.
/// The serde aliases accept the short option names used in query strings and
/// config files (`x`, `rewidth`, `prowidth`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeOptions {
    /// Left edge of the source region.
    #[serde(alias = "x")]
    pub crop_x: u32,
    /// Top edge of the source region.
    #[serde(alias = "y")]
    pub crop_y: u32,
    /// Encoder quality; 0 selects the format default.
    pub quality: u32,
    /// Width of the source region to sample, overriding the baseline.
    #[serde(alias = "width")]
    pub crop_width: Option<u32>,
    /// Height of the source region to sample, overriding the baseline.
    #[serde(alias = "height")]
    pub crop_height: Option<u32>,
    /// Hard target width.
    #[serde(alias = "rewidth")]
    pub explicit_width: Option<u32>,
    /// Hard target height.
    #[serde(alias = "reheight")]
    pub explicit_height: Option<u32>,
    /// Target width with the height derived from the source ratio.
    #[serde(alias = "prowidth")]
    pub proportional_width: Option<u32>,
    /// Target height with the width derived from the source ratio.
    #[serde(alias = "proheight")]
    pub proportional_height: Option<u32>,
}

/// A fully resolved thumbnail request.
///
/// `source_crop_*` are signed: the resolver subtracts the crop origin from the
/// baseline without checking bounds. Use [`ResizePlan::validate`] before
/// handing the plan to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizePlan {
    pub target_width: u32,
    pub target_height: u32,
    pub source_crop_width: i64,
    pub source_crop_height: i64,
    pub crop_x: u32,
    pub crop_y: u32,
    pub quality: u32,
}

impl ResizePlan {
    /// Check the plan describes a non-empty destination and a source region
    /// lying entirely inside a `source_width` x `source_height` image.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self, source_width: u32, source_height: u32) -> Result<(), String> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(format!(
                "target size {}x{} is empty",
                self.target_width, self.target_height
            ));
        }
        if self.source_crop_width <= 0 || self.source_crop_height <= 0 {
            return Err(format!(
                "source region {}x{} at ({}, {}) is empty",
                self.source_crop_width, self.source_crop_height, self.crop_x, self.crop_y
            ));
        }
        let right = self.crop_x as i64 + self.source_crop_width;
        let bottom = self.crop_y as i64 + self.source_crop_height;
        if right > source_width as i64 || bottom > source_height as i64 {
            return Err(format!(
                "source region ({}, {})-({}, {}) exceeds the {}x{} image",
                self.crop_x, self.crop_y, right, bottom, source_width, source_height
            ));
        }
        Ok(())
    }

    /// Backend wiring for this plan. Only meaningful after [`validate`](Self::validate).
    pub fn resample(&self) -> Resample {
        Resample {
            src_x: self.crop_x,
            src_y: self.crop_y,
            src_width: self.source_crop_width.max(0) as u32,
            src_height: self.source_crop_height.max(0) as u32,
            dest_width: self.target_width,
            dest_height: self.target_height,
        }
    }
}

/// Copy `src_*` rectangle of the source canvas, scaled, into the destination
/// rectangle anchored at `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resample {
    pub src_x: u32,
    pub src_y: u32,
    pub src_width: u32,
    pub src_height: u32,
    pub dest_width: u32,
    pub dest_height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(crop: (u32, u32), region: (i64, i64), target: (u32, u32)) -> ResizePlan {
        ResizePlan {
            target_width: target.0,
            target_height: target.1,
            source_crop_width: region.0,
            source_crop_height: region.1,
            crop_x: crop.0,
            crop_y: crop.1,
            quality: 0,
        }
    }

    #[test]
    fn options_default_is_empty() {
        let o = ResizeOptions::default();
        assert_eq!(o.crop_x, 0);
        assert_eq!(o.quality, 0);
        assert!(o.explicit_width.is_none());
        assert!(o.proportional_height.is_none());
    }

    #[test]
    fn options_accept_short_aliases() {
        let json = r#"{"x": 5, "y": 6, "rewidth": 100, "proheight": 40, "quality": 70}"#;
        let o: ResizeOptions = serde_json::from_str(json).unwrap();
        assert_eq!(o.crop_x, 5);
        assert_eq!(o.crop_y, 6);
        assert_eq!(o.explicit_width, Some(100));
        assert_eq!(o.proportional_height, Some(40));
        assert_eq!(o.quality, 70);
    }

    #[test]
    fn options_reject_unknown_keys() {
        let json = r#"{"rotate": 90}"#;
        assert!(serde_json::from_str::<ResizeOptions>(json).is_err());
    }

    #[test]
    fn validate_accepts_full_image() {
        assert!(plan((0, 0), (800, 600), (400, 300)).validate(800, 600).is_ok());
    }

    #[test]
    fn validate_accepts_inner_region() {
        assert!(plan((100, 50), (700, 550), (70, 55)).validate(800, 600).is_ok());
    }

    #[test]
    fn validate_rejects_zero_target() {
        let err = plan((0, 0), (800, 600), (0, 300)).validate(800, 600).unwrap_err();
        assert!(err.contains("empty"), "{err}");
    }

    #[test]
    fn validate_rejects_negative_region() {
        // crop_x beyond the baseline width
        assert!(plan((900, 0), (-100, 600), (800, 600)).validate(800, 600).is_err());
    }

    #[test]
    fn validate_rejects_region_past_edge() {
        let err = plan((0, 0), (1000, 600), (1000, 600)).validate(800, 600).unwrap_err();
        assert!(err.contains("exceeds"), "{err}");
    }

    #[test]
    fn resample_wires_plan_fields() {
        let r = plan((10, 20), (300, 200), (150, 100)).resample();
        assert_eq!(
            r,
            Resample {
                src_x: 10,
                src_y: 20,
                src_width: 300,
                src_height: 200,
                dest_width: 150,
                dest_height: 100,
            }
        );
    }
}
