//! 🍒欢迎光临🍒
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx2dF, Idx3d};

pub use crate::data::{MaskSlice, MaskSliceMut, MaskVolume, VoxelSize};

pub use crate::roi::{Contour, Roi, RoiStore};

pub use crate::convert::{
    mask_from_rois, rois_from_label, rois_from_mask, MaskRequest, RasterizeError,
};

#[cfg(feature = "rayon")]
pub use crate::convert::{par_rois_from_label, par_rois_from_mask};

pub use crate::overlay::{
    colorize, compose, place, ColorMode, OverlayError, OverlayItem, OverlayPlacement,
};

pub use crate::stats::{analyze_regions, AnalyzerReport, RegionAnalyzer, StatsError};

pub use crate::consts::gray::{BACKGROUND, FOREGROUND};
pub use crate::consts::rgb::{Rgb, OVERLAY_PALETTE};
