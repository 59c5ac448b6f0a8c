//! 2D ROI 及其轮廓表示.
//!
//! 轮廓顶点位于像素角点坐标系: 像素 `(h, w)` 占据 `[h, h + 1) x [w, w + 1)`.
//! 一个 ROI 可以由多条闭合轮廓组成, 整体按照 even-odd 规则解释,
//! 因此孔洞和不相连的部分只是额外的轮廓而已.

use crate::consts::rgb::Rgb;
use crate::{Idx2d, Idx2dF};

mod store;

pub use store::RoiStore;

/// 一条闭合的多边形轮廓. 末顶点到首顶点的闭合边是隐式的.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contour {
    points: Vec<Idx2dF>,
}

impl Contour {
    /// 直接构造. 少于 3 个顶点的轮廓是退化的, 栅格化时不覆盖任何像素.
    #[inline]
    pub fn new(points: Vec<Idx2dF>) -> Self {
        Self { points }
    }

    /// 获取顶点序列.
    #[inline]
    pub fn points(&self) -> &[Idx2dF] {
        &self.points
    }

    /// 获取顶点个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 轮廓是否没有任何顶点?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 获取能按序迭代所有边 (含闭合边) 的迭代器.
    pub fn edges(&self) -> impl Iterator<Item = (Idx2dF, Idx2dF)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// 获取顶点的包围盒 `(min, max)`. 空轮廓返回 `None`.
    pub fn bounds(&self) -> Option<(Idx2dF, Idx2dF)> {
        let mut it = self.points.iter().copied();
        let first = it.next()?;
        Some(it.fold((first, first), |((h0, w0), (h1, w1)), (h, w)| {
            ((h0.min(h), w0.min(w)), (h1.max(h), w1.max(w)))
        }))
    }
}

/// 计算一组轮廓的整体包围盒 `(min, max)`. 没有任何顶点时返回 `None`.
pub(crate) fn bounds_of(contours: &[Contour]) -> Option<(Idx2dF, Idx2dF)> {
    contours
        .iter()
        .filter_map(Contour::bounds)
        .reduce(|((h0, w0), (h1, w1)), ((h2, w2), (h3, w3))| {
            ((h0.min(h2), w0.min(w2)), (h1.max(h3), w1.max(w3)))
        })
}

/// 单个 2D ROI: 一组 even-odd 轮廓, 可选地关联到某个切片.
///
/// ROI 创建后除 `stroke` (显示用描边颜色, 由 overlay 组件写入) 外不可变.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roi {
    contours: Vec<Contour>,
    slice: Option<usize>,
    stroke: Option<Rgb>,
}

impl Roi {
    /// 由轮廓集合直接构造. 新 ROI 不关联切片, 也没有描边颜色.
    #[inline]
    pub fn new(contours: Vec<Contour>) -> Self {
        Self {
            contours,
            slice: None,
            stroke: None,
        }
    }

    /// 由单条轮廓的顶点序列构造.
    #[inline]
    pub fn polygon(points: Vec<Idx2dF>) -> Self {
        Self::new(vec![Contour::new(points)])
    }

    /// 构造一个覆盖像素矩形 `[h, h + height) x [w, w + width)` 的 ROI.
    pub fn rect((h, w): Idx2d, (height, width): Idx2d) -> Self {
        let (h0, w0) = (h as f64, w as f64);
        let (h1, w1) = ((h + height) as f64, (w + width) as f64);
        Self::polygon(vec![(h0, w0), (h0, w1), (h1, w1), (h1, w0)])
    }

    /// 关联到第 `z` 个 (0-based) 切片.
    #[inline]
    pub fn with_slice(mut self, z: usize) -> Self {
        self.slice = Some(z);
        self
    }

    /// 获取轮廓集合.
    #[inline]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// 获取关联的切片索引 (0-based). `None` 代表未关联.
    #[inline]
    pub fn slice(&self) -> Option<usize> {
        self.slice
    }

    /// 获取描边颜色 (若有).
    #[inline]
    pub fn stroke(&self) -> Option<Rgb> {
        self.stroke
    }

    /// 覆写描边颜色. 这是 ROI 唯一的创建后可变属性.
    #[inline]
    pub fn set_stroke(&mut self, color: Rgb) {
        self.stroke = Some(color);
    }

    /// 获取所有轮廓顶点的包围盒 `(min, max)`. 没有任何顶点时返回 `None`.
    #[inline]
    pub fn bounds(&self) -> Option<(Idx2dF, Idx2dF)> {
        bounds_of(&self.contours)
    }
}

#[cfg(test)]
mod tests {
    use super::{Contour, Roi};
    use crate::consts::rgb::RED;

    #[test]
    fn test_rect_corners() {
        let roi = Roi::rect((1, 2), (3, 4));
        assert_eq!(roi.contours().len(), 1);
        assert_eq!(
            roi.contours()[0].points(),
            &[(1.0, 2.0), (1.0, 6.0), (4.0, 6.0), (4.0, 2.0)]
        );
        assert_eq!(roi.bounds(), Some(((1.0, 2.0), (4.0, 6.0))));
    }

    #[test]
    fn test_slice_association() {
        let roi = Roi::rect((0, 0), (2, 2));
        assert_eq!(roi.slice(), None);
        assert_eq!(roi.with_slice(4).slice(), Some(4));
    }

    #[test]
    fn test_stroke_annotation() {
        let mut roi = Roi::rect((0, 0), (1, 1));
        assert_eq!(roi.stroke(), None);
        roi.set_stroke(RED);
        assert_eq!(roi.stroke(), Some(RED));
    }

    #[test]
    fn test_contour_edges_close_the_loop() {
        let c = Contour::new(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let last = c.edges().last().unwrap();
        assert_eq!(last, ((1.0, 1.0), (0.0, 0.0)));
        assert_eq!(c.edges().count(), 3);
    }
}
