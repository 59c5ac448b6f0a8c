//! 分割结果的 overlay 上色与摆放.
//!
//! 本模块不负责实际渲染: 它只给 ROI 打上描边颜色,
//! 并决定每个 ROI 在显示目标上的切片摆放方式, 渲染由外部的
//! 显示组件完成.

use crate::consts::rgb::{Rgb, OVERLAY_PALETTE};
use crate::convert::rois_from_label;
use crate::{Idx3d, MaskVolume, Roi};

/// Overlay 颜色策略.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorMode {
    /// 按标签出现顺序循环使用 [`OVERLAY_PALETTE`] 的 7 种颜色.
    Multicolor,

    /// 所有标签使用同一种颜色.
    Fixed(Rgb),
}

/// ROI 在显示目标上的切片摆放方式.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayPlacement {
    /// 不重写: 按 ROI 自身的关联信息显示 (未关联时显示在所有位置).
    AsDrawn,

    /// 固定 z, 单一栈位置 (普通图像栈).
    SameZ(usize),

    /// 固定 z, 所有通道与所有时间帧 (hyperstack).
    SameZAllFrames(usize),
}

/// 一条已上色、已决定摆放方式的 overlay 条目.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayItem {
    /// 描边颜色已写入的 ROI.
    pub roi: Roi,

    /// 摆放方式.
    pub placement: OverlayPlacement,
}

/// Overlay 构建错误.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OverlayError {
    /// 分割体数据与显示目标的 `(z, H, W)` 尺寸不一致.
    ShapeMismatch {
        /// 分割体数据的尺寸.
        segmentation: Idx3d,

        /// 显示目标的尺寸.
        target: Idx3d,
    },
}

/// 为 `labels` 中的每个标签分配一种颜色, 分配顺序与输入顺序一致.
///
/// multicolor 模式下按 [`OVERLAY_PALETTE`] 循环分配 (第 8 个标签
/// 又从红色开始); fixed 模式下所有标签同色.
pub fn colorize(labels: &[u8], mode: ColorMode) -> Vec<(u8, Rgb)> {
    match mode {
        ColorMode::Fixed(color) => labels.iter().map(|&label| (label, color)).collect(),
        ColorMode::Multicolor => labels
            .iter()
            .zip(OVERLAY_PALETTE.iter().cycle())
            .map(|(&label, &color)| (label, color))
            .collect(),
    }
}

/// 给每个 ROI 打上描边颜色 `color`, 并根据显示目标决定摆放方式.
///
/// 仅当 `target_depth > 2` 时才重写摆放信息: hyperstack 目标摆放到
/// "同 z, 所有通道/时间帧", 普通栈摆放到 "同 z 单栈位置";
/// 未关联切片的 ROI 以及浅目标 (`target_depth <= 2`) 保持原样.
pub fn place(
    rois: Vec<Roi>,
    color: Rgb,
    target_depth: usize,
    hyperstack: bool,
) -> Vec<OverlayItem> {
    rois.into_iter()
        .map(|mut roi| {
            roi.set_stroke(color);
            let placement = match roi.slice() {
                Some(z) if target_depth > 2 => {
                    if hyperstack {
                        OverlayPlacement::SameZAllFrames(z)
                    } else {
                        OverlayPlacement::SameZ(z)
                    }
                }
                _ => OverlayPlacement::AsDrawn,
            };
            OverlayItem { roi, placement }
        })
        .collect()
}

/// 从分割体数据 (二值掩码或标签图) 构建完整的 overlay 条目序列.
///
/// 标签按升序发现并依序上色, 每个标签的 ROI 逐切片提取后交给
/// [`place`] 摆放.
///
/// # 返回值
///
/// 分割体数据与显示目标尺寸不一致时返回
/// [`OverlayError::ShapeMismatch`], 此时不会构建任何条目.
pub fn compose(
    segmentation: &MaskVolume,
    target_shape: Idx3d,
    hyperstack: bool,
    mode: ColorMode,
) -> Result<Vec<OverlayItem>, OverlayError> {
    if segmentation.shape() != target_shape {
        return Err(OverlayError::ShapeMismatch {
            segmentation: segmentation.shape(),
            target: target_shape,
        });
    }

    let labels = segmentation.labels();
    let mut items = Vec::new();
    for (label, color) in colorize(&labels, mode) {
        let rois = rois_from_label(segmentation, label);
        items.extend(place(rois, color, target_shape.0, hyperstack));
    }
    Ok(items)
}
