use std::ops::Range;

use either::Either;
use itertools::Itertools;
use log::{debug, warn};
use num::ToPrimitive;

use crate::consts::gray::FOREGROUND;
use crate::roi::bounds_of;
use crate::{Contour, Idx3d, MaskSliceMut, MaskVolume, Roi, VoxelSize};

/// 栅格化目标配置.
///
/// 该结构同时承担 "手动指定尺寸" 与 "继承参考体数据几何信息"
/// 两种用法, 后者见 [`MaskRequest::like`].
#[derive(Clone, Debug, PartialEq)]
pub struct MaskRequest {
    /// 目标尺寸, 按照 `(z, H, W)` 格式. 每个分量都必须不小于 1.
    pub shape: Idx3d,

    /// 是否将 ROI 只绘制到其关联切片. 为 `false` 时所有 ROI
    /// 都被绘制到所有切片.
    pub associate: bool,

    /// 可选的体素物理分辨率, 原样附加到结果掩码上.
    pub calibration: Option<VoxelSize>,
}

impl MaskRequest {
    /// 以手动指定的目标尺寸构造.
    #[inline]
    pub fn new(shape: Idx3d, associate: bool) -> Self {
        Self {
            shape,
            associate,
            calibration: None,
        }
    }

    /// 附加体素物理分辨率.
    #[inline]
    pub fn with_calibration(mut self, calibration: VoxelSize) -> Self {
        self.calibration = Some(calibration);
        self
    }

    /// 继承参考体数据的尺寸与物理分辨率.
    #[inline]
    pub fn like(reference: &MaskVolume, associate: bool) -> Self {
        Self {
            shape: reference.shape(),
            associate,
            calibration: reference.calibration(),
        }
    }
}

/// 栅格化输入校验错误.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RasterizeError {
    /// 目标尺寸存在为 0 的分量. 参数为被拒绝的 `(z, H, W)`.
    InvalidShape(Idx3d),
}

/// 将 `rois` 按输入顺序栅格化为二值掩码, 前景值为 255, 背景值为 0.
///
/// 每个 ROI 的目标切片由 `request.associate` 与其自身的关联信息决定:
///
/// - 目标深度为 1 时, 关联信息被完全忽略, 一律绘制到唯一切片;
/// - `associate` 且 ROI 关联的切片在范围内: 只绘制该切片;
/// - `associate` 且 ROI 关联的切片超出范围: 该 ROI 不绘制;
/// - `associate` 但 ROI 未关联切片: 记录一条 warning 并退化为
///   绘制到所有切片, 而不是丢弃数据;
/// - `!associate`: 绘制到所有切片.
///
/// 重叠 ROI 按并集处理 (前景值只有一种, 重复写入幂等).
///
/// # 返回值
///
/// 目标尺寸含 0 分量时返回 [`RasterizeError::InvalidShape`],
/// 此时不会分配任何体数据. 空 ROI 序列不是错误, 会得到全背景掩码
/// (附带一条 warning).
pub fn mask_from_rois(rois: &[Roi], request: &MaskRequest) -> Result<MaskVolume, RasterizeError> {
    let (z_len, h_len, w_len) = request.shape;
    if z_len < 1 || h_len < 1 || w_len < 1 {
        return Err(RasterizeError::InvalidShape(request.shape));
    }
    if rois.is_empty() {
        warn!("输入 roi 序列为空, 结果掩码为全背景");
    }

    let mut mask = MaskVolume::zeros(request.shape);
    if let Some(calibration) = request.calibration {
        mask.set_calibration(calibration);
    }

    for (idx, roi) in rois.iter().enumerate() {
        let Some(target) = target_slices(roi, idx, z_len, request.associate) else {
            continue;
        };
        match target {
            Either::Left(z) => {
                mask.slice_at_mut(z).fill_even_odd(roi.contours(), FOREGROUND);
            }
            Either::Right(range) => {
                for z in range {
                    mask.slice_at_mut(z).fill_even_odd(roi.contours(), FOREGROUND);
                }
            }
        }
    }
    Ok(mask)
}

/// 决定第 `idx` 个 ROI 要绘制的目标切片: 单切片或切片区间.
/// 返回 `None` 表示该 ROI 不绘制.
fn target_slices(
    roi: &Roi,
    idx: usize,
    z_len: usize,
    associate: bool,
) -> Option<Either<usize, Range<usize>>> {
    if z_len == 1 {
        // 2D 没有切片概念, 关联信息一律忽略.
        return Some(Either::Left(0));
    }
    if !associate {
        return Some(Either::Right(0..z_len));
    }
    match roi.slice() {
        Some(z) if z < z_len => Some(Either::Left(z)),
        Some(z) => {
            debug!("roi {idx} 关联的切片 {z} 超出范围 (共 {z_len} 片), 不绘制");
            None
        }
        None => {
            warn!("roi {idx} 未关联切片, 退化为绘制到所有切片");
            Some(Either::Right(0..z_len))
        }
    }
}

/// 填充算法实现块.
impl<'a> MaskSliceMut<'a> {
    /// 以 even-odd 规则将 `contours` 覆盖的像素全部填充为 `value`.
    ///
    /// 判定规则 (边界包含规则): 像素属于覆盖区域, 当且仅当其中心
    /// `(h + 0.5, w + 0.5)` 在轮廓集合内部 (奇偶规则). 因此由
    /// 像素角点坐标构成的轮廓回填后与原像素集逐像素一致.
    /// 超出图像范围的部分被裁剪.
    pub fn fill_even_odd(&mut self, contours: &[Contour], value: u8) {
        let (h_len, w_len) = self.shape();
        let Some(((h_min, _), (h_max, _))) = bounds_of(contours) else {
            return;
        };
        let h_lo = h_min.floor().max(0.0).to_usize().unwrap_or(0);
        let h_hi = h_max.ceil().min(h_len as f64).to_usize().unwrap_or(0);

        let mut crossings: Vec<f64> = Vec::with_capacity(8);
        for h in h_lo..h_hi {
            let y = h as f64 + 0.5;

            crossings.clear();
            for contour in contours {
                for ((h_a, w_a), (h_b, w_b)) in contour.edges() {
                    // 半开区间判定, 恰好经过顶点的扫描线不会被计数两次.
                    if y >= h_a.min(h_b) && y < h_a.max(h_b) {
                        let t = (y - h_a) / (h_b - h_a);
                        crossings.push(w_a + t * (w_b - w_a));
                    }
                }
            }
            crossings.sort_by(f64::total_cmp);

            // 退化轮廓可能产生奇数个交点, 多余的尾交点被 `tuples` 丢弃.
            for (enter, exit) in crossings.iter().tuples() {
                let w_lo = (*enter - 0.5).ceil().max(0.0) as usize;
                let w_hi = (*exit - 0.5).ceil().min(w_len as f64).max(0.0) as usize;
                for w in w_lo..w_hi {
                    self[(h, w)] = value;
                }
            }
        }
    }
}
