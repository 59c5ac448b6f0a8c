//! ROI 序列与 3D 掩码体数据的双向转换.
//!
//! - [`mask_from_rois`]: 将 ROI 序列栅格化为二值掩码;
//! - [`rois_from_mask`] / [`rois_from_label`]: 从二值掩码或标签图
//!   逐切片提取 ROI 序列.
//!
//! 两个方向共用同一套像素判定规则 (像素中心采样的 even-odd 填充,
//! 像素角点坐标系的轮廓), 因此 "提取后回填" 是逐像素精确的.

mod extract;
mod rasterize;
mod trace;

pub use extract::{rois_from_label, rois_from_mask};
pub use rasterize::{mask_from_rois, MaskRequest, RasterizeError};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        pub use extract::{par_rois_from_label, par_rois_from_mask};
    }
}
