//! Resize parameter resolution.
//!
//! Turns a raw [`ResizeOptions`] bag plus the probed source size into a
//! [`ResizePlan`]. The rules run in a fixed order and later rules overwrite
//! earlier ones:
//!
//! 1. **Baseline**: `crop_width ?? explicit_width ?? source.width` (same for height).
//! 2. **Height phase**: explicit height wins; otherwise a proportional height
//!    smaller than the source sets the height and derives the width.
//! 3. **Width phase**: explicit width wins; otherwise a proportional width
//!    smaller than the source sets the width and derives the height,
//!    replacing anything the height phase derived.
//! 4. **Target**: whatever the phases produced, else the baseline.
//! 5. **Source region**: baseline minus crop origin. This is measured against
//!    the baseline, *not* the proportional target.
//!
//! Nothing here rejects degenerate geometry; see [`ResizePlan::validate`].

use super::calculations::derive_axis;
use super::params::{ResizeOptions, ResizePlan};

/// Zero is treated as "not given" for every dimension option.
fn given(value: Option<u32>) -> Option<u32> {
    value.filter(|&v| v > 0)
}

/// Resolve a request against a `source_width` x `source_height` image.
pub fn resolve_plan(options: &ResizeOptions, source_width: u32, source_height: u32) -> ResizePlan {
    let explicit_width = given(options.explicit_width);
    let explicit_height = given(options.explicit_height);

    let rewidth = given(options.crop_width)
        .or(explicit_width)
        .unwrap_or(source_width);
    let reheight = given(options.crop_height)
        .or(explicit_height)
        .unwrap_or(source_height);

    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;

    if let Some(h) = explicit_height {
        height = Some(h);
    } else if let Some(h) = given(options.proportional_height).filter(|&h| h < source_height) {
        height = Some(h);
        width = Some(derive_axis(source_width, h, source_height));
    }

    if let Some(w) = explicit_width {
        width = Some(w);
    } else if let Some(w) = given(options.proportional_width).filter(|&w| w < source_width) {
        width = Some(w);
        height = Some(derive_axis(source_height, w, source_width));
    }

    ResizePlan {
        target_width: width.unwrap_or(rewidth),
        target_height: height.unwrap_or(reheight),
        source_crop_width: rewidth as i64 - options.crop_x as i64,
        source_crop_height: reheight as i64 - options.crop_y as i64,
        crop_x: options.crop_x,
        crop_y: options.crop_y,
        quality: options.quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ResizeOptions {
        ResizeOptions::default()
    }

    #[test]
    fn empty_options_keep_source_size() {
        let p = resolve_plan(&opts(), 800, 600);
        assert_eq!((p.target_width, p.target_height), (800, 600));
        assert_eq!((p.source_crop_width, p.source_crop_height), (800, 600));
        assert_eq!((p.crop_x, p.crop_y), (0, 0));
    }

    #[test]
    fn explicit_width_wins_over_proportional() {
        let o = ResizeOptions {
            explicit_width: Some(100),
            proportional_width: Some(50),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        assert_eq!(p.target_width, 100);
        // explicit width does not derive a height
        assert_eq!(p.target_height, 600);
    }

    #[test]
    fn explicit_height_wins_over_proportional() {
        let o = ResizeOptions {
            explicit_height: Some(120),
            proportional_height: Some(60),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        assert_eq!((p.target_width, p.target_height), (800, 120));
    }

    #[test]
    fn proportional_width_derives_height() {
        let o = ResizeOptions {
            proportional_width: Some(400),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        assert_eq!((p.target_width, p.target_height), (400, 300));
        // the source region stays the whole image
        assert_eq!((p.source_crop_width, p.source_crop_height), (800, 600));
    }

    #[test]
    fn proportional_height_derives_width() {
        let o = ResizeOptions {
            proportional_height: Some(300),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        assert_eq!((p.target_width, p.target_height), (400, 300));
    }

    #[test]
    fn proportional_not_smaller_than_source_is_ignored() {
        let o = ResizeOptions {
            proportional_width: Some(800),
            proportional_height: Some(2000),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        assert_eq!((p.target_width, p.target_height), (800, 600));
    }

    #[test]
    fn proportional_width_overwrites_proportional_height() {
        let o = ResizeOptions {
            proportional_width: Some(200),
            proportional_height: Some(100),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        // width phase runs last: 200 → height 150, height phase's 100 is lost
        assert_eq!((p.target_width, p.target_height), (200, 150));
    }

    #[test]
    fn explicit_width_keeps_proportional_height_derivation() {
        let o = ResizeOptions {
            explicit_width: Some(500),
            proportional_height: Some(300),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        // height phase: 300 and width 400; width phase: explicit 500 replaces 400
        assert_eq!((p.target_width, p.target_height), (500, 300));
        assert_eq!(p.source_crop_width, 500);
        assert_eq!(p.source_crop_height, 600);
    }

    #[test]
    fn source_region_subtracts_crop_origin_from_baseline() {
        let o = ResizeOptions {
            crop_x: 50,
            crop_y: 20,
            proportional_width: Some(400),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        assert_eq!((p.source_crop_width, p.source_crop_height), (750, 580));
        assert_eq!((p.target_width, p.target_height), (400, 300));
    }

    #[test]
    fn crop_origin_past_baseline_goes_negative() {
        let o = ResizeOptions {
            crop_x: 900,
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        assert_eq!(p.source_crop_width, -100);
    }

    #[test]
    fn zero_dimensions_are_absent() {
        let o = ResizeOptions {
            explicit_width: Some(0),
            proportional_height: Some(0),
            crop_width: Some(0),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        assert_eq!((p.target_width, p.target_height), (800, 600));
        assert_eq!(p.source_crop_width, 800);
    }

    #[test]
    fn crop_region_overrides_baseline() {
        let o = ResizeOptions {
            crop_x: 100,
            crop_y: 100,
            crop_width: Some(500),
            crop_height: Some(400),
            explicit_width: Some(200),
            explicit_height: Some(150),
            ..opts()
        };
        let p = resolve_plan(&o, 800, 600);
        assert_eq!((p.source_crop_width, p.source_crop_height), (400, 300));
        assert_eq!((p.target_width, p.target_height), (200, 150));
    }

    #[test]
    fn quality_passes_through() {
        let o = ResizeOptions {
            quality: 85,
            ..opts()
        };
        assert_eq!(resolve_plan(&o, 10, 10).quality, 85);
    }
}
