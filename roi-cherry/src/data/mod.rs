use std::ops::{Index, IndexMut};

use ndarray::{Array3, ArrayView, ArrayViewMut, Axis, Ix3};

use crate::consts::gray::*;
use crate::{Idx2d, Idx3d};

pub mod slice;

pub use slice::{MaskSlice, MaskSliceMut};

/// 单个体素的物理分辨率, 以毫米为单位.
///
/// 该值只会从参考体数据 **复制** 过来, 本 crate 不会计算它.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelSize {
    /// 空间方向 (相邻 2D 切片的方向) 分辨率.
    pub z_mm: f64,

    /// 高方向 (自然图像的垂直方向) 分辨率.
    pub height_mm: f64,

    /// 宽方向 (自然图像的水平方向) 分辨率.
    pub width_mm: f64,
}

impl VoxelSize {
    /// 直接构造.
    #[inline]
    pub const fn new(z_mm: f64, height_mm: f64, width_mm: f64) -> Self {
        Self {
            z_mm,
            height_mm,
            width_mm,
        }
    }

    /// 获取体素的实际体积值, 以立方毫米为单位.
    #[inline]
    pub fn voxel(&self) -> f64 {
        self.z_mm * self.height_mm * self.width_mm
    }

    /// 获取水平切片方向的像素实际面积值, 以平方毫米为单位.
    #[inline]
    pub fn slice_pixel(&self) -> f64 {
        self.height_mm * self.width_mm
    }

    /// 体素分辨率在三个维度上是否是各向同的?
    #[inline]
    pub fn is_isotropic(&self) -> bool {
        self.z_mm == self.height_mm && self.z_mm == self.width_mm
    }
}

/// 3D 掩码体数据. 体素值以 `u8` 保存: 二值模式为 `{0, 255}`,
/// 标签模式为 `{0, 1, 2, ...}`, 其中 0 代表背景.
///
/// 数据按照 `(z, H, W)` 模式组织与访问.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskVolume {
    data: Array3<u8>,
    calibration: Option<VoxelSize>,
}

impl Index<Idx3d> for MaskVolume {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx3d> for MaskVolume {
    #[inline]
    fn index_mut(&mut self, index: Idx3d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl MaskVolume {
    /// 创建一个全背景体数据, `shape` 按照 `(z, H, W)` 格式给出.
    ///
    /// 任一维度为 0 时程序 panic. 对用户输入的尺寸校验是调用者
    /// (如栅格化入口) 的责任.
    pub fn zeros(shape: Idx3d) -> Self {
        let (z, h, w) = shape;
        assert!(z >= 1 && h >= 1 && w >= 1, "体数据维度不能为 0");
        Self {
            data: Array3::zeros(shape),
            calibration: None,
        }
    }

    /// 根据裸数据直接创建体数据. `data` 按照 `(z, H, W)` 组织.
    #[inline]
    pub fn from_array(data: Array3<u8>) -> Self {
        Self {
            data,
            calibration: None,
        }
    }

    /// 获取数据形状大小, 按照 `(z, H, W)` 格式.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        let &[z, h, w] = self.data.shape() else {
            unreachable!()
        };
        (z, h, w)
    }

    /// 获取数据水平切片形状大小.
    #[inline]
    pub fn slice_shape(&self) -> Idx2d {
        let (_, h, w) = self.shape();
        (h, w)
    }

    /// 获取水平切片个数.
    #[inline]
    pub fn len_z(&self) -> usize {
        self.shape().0
    }

    /// 获得图像的高.
    #[inline]
    pub fn height(&self) -> usize {
        self.shape().1
    }

    /// 获得图像的宽.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape().2
    }

    /// 获取数据体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        let (z, h, w) = self.shape();
        z * h * w
    }

    /// 检查索引是否合法.
    #[inline]
    pub fn check(&self, (z0, h0, w0): &Idx3d) -> bool {
        let (z, h, w) = self.shape();
        *z0 < z && *h0 < h && *w0 < w
    }

    /// 获取体素物理分辨率 (若有).
    #[inline]
    pub fn calibration(&self) -> Option<VoxelSize> {
        self.calibration
    }

    /// 覆写体素物理分辨率. 该值应当从参考体数据复制而来.
    #[inline]
    pub fn set_calibration(&mut self, calibration: VoxelSize) {
        self.calibration = Some(calibration);
    }

    /// 获取 z 空间的第 `z_index` 层不可变切片.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z_index: usize) -> MaskSlice<'_> {
        MaskSlice::new(self.data.index_axis(Axis(0), z_index))
    }

    /// 获取 z 空间的第 `z_index` 层可变切片.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at_mut(&mut self, z_index: usize) -> MaskSliceMut<'_> {
        MaskSliceMut::new(self.data.index_axis_mut(Axis(0), z_index))
    }

    /// 获取能按升序迭代水平不可变切片的迭代器.
    #[inline]
    pub fn slice_iter(&self) -> impl ExactSizeIterator<Item = MaskSlice> {
        self.data.axis_iter(Axis(0)).map(MaskSlice::new)
    }

    /// 获取能按升序迭代水平可变切片的迭代器.
    #[inline]
    pub fn slice_iter_mut(&mut self) -> impl ExactSizeIterator<Item = MaskSliceMut> {
        self.data.axis_iter_mut(Axis(0)).map(MaskSliceMut::new)
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, u8, Ix3> {
        self.data.view()
    }

    /// 获得数据的一份可变 shallow copy.
    #[inline]
    pub fn data_mut(&mut self) -> ArrayViewMut<'_, u8, Ix3> {
        self.data.view_mut()
    }

    /// 获取体数据中值为 `label` 的体素个数.
    #[inline]
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|p| **p == label).count()
    }

    /// 该体数据是否为全背景?
    #[inline]
    pub fn is_background(&self) -> bool {
        self.data.iter().copied().all(is_background)
    }

    /// 将体数据中值为 `old` 的体素全部替换为 `new`.
    ///
    /// 返回总共成功替换的个数.
    pub fn replace(&mut self, old: u8, new: u8) -> usize {
        let mut cnt = 0usize;
        self.data_mut()
            .iter_mut()
            .filter(|pix| **pix == old)
            .for_each(|p| {
                cnt += 1;
                *p = new;
            });
        cnt
    }

    /// 收集满足谓词 `pred` 的所有体素对应的下标, 结果按行优先存储.
    pub fn filter_pos<P: Fn(u8) -> bool>(&self, pred: P) -> Vec<Idx3d> {
        self.data
            .indexed_iter()
            .filter_map(|(ref pos, pixel)| pred(*pixel).then_some(*pos))
            .collect()
    }

    /// 获取体数据中出现过的所有非零标签值, 按升序排列.
    ///
    /// 标签集是按需计算的, 不会被缓存.
    pub fn labels(&self) -> Vec<u8> {
        let mut seen = [false; 256];
        for &p in self.data.iter() {
            seen[p as usize] = true;
        }
        (1..=u8::MAX)
            .filter(|label| seen[*label as usize])
            .collect()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
    }
}

/// 并发操作部分
#[cfg(feature = "rayon")]
impl MaskVolume {
    /// 借助 `rayon`, 并行地对每个水平不可变切片实施 `op` 操作.
    pub fn par_for_each_slice<F>(&self, op: F)
    where
        F: Fn(MaskSlice) + Sync + Send,
    {
        self.data()
            .axis_iter(Axis(0))
            .into_par_iter()
            .for_each(|v| {
                op(MaskSlice::new(v));
            });
    }

    /// 借助 `rayon`, 并行地对每个水平可变切片实施 `op` 操作.
    pub fn par_for_each_slice_mut<F>(&mut self, op: F)
    where
        F: Fn(MaskSliceMut) + Sync + Send,
    {
        self.data_mut()
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|v| {
                op(MaskSliceMut::new(v));
            });
    }

    /// 借助 `rayon`, 并行地将体数据中值为 `old` 的体素全部替换为 `new`.
    ///
    /// 返回总共成功替换的个数.
    pub fn par_replace(&mut self, old: u8, new: u8) -> usize {
        let cnt = AtomicUsize::new(0);
        self.data_mut()
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|v| {
                let mut sli = MaskSliceMut::new(v);
                let local = sli.replace(old, new);
                cnt.fetch_add(local, Ordering::Release);
            });

        cnt.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::{MaskVolume, VoxelSize};

    #[test]
    fn test_zeros_shape() {
        let v = MaskVolume::zeros((3, 4, 5));
        assert_eq!(v.shape(), (3, 4, 5));
        assert_eq!(v.slice_shape(), (4, 5));
        assert_eq!(v.len_z(), 3);
        assert_eq!(v.size(), 60);
        assert!(v.is_background());
        assert!(v.calibration().is_none());
    }

    #[test]
    #[should_panic]
    fn test_zeros_zero_extent() {
        let _ = MaskVolume::zeros((0, 4, 5));
    }

    #[test]
    fn test_labels_ascending() {
        let mut v = MaskVolume::zeros((2, 3, 3));
        v[(0, 1, 1)] = 7;
        v[(1, 0, 0)] = 2;
        v[(1, 2, 2)] = 2;
        assert_eq!(v.labels(), vec![2, 7]);
    }

    #[test]
    fn test_count_and_replace() {
        let mut v = MaskVolume::zeros((1, 2, 2));
        v[(0, 0, 0)] = 5;
        v[(0, 1, 1)] = 5;
        assert_eq!(v.count(5), 2);
        assert_eq!(v.replace(5, 9), 2);
        assert_eq!(v.count(5), 0);
        assert_eq!(v.count(9), 2);
    }

    #[test]
    fn test_voxel_size() {
        let c = VoxelSize::new(2.0, 0.5, 0.5);
        assert_eq!(c.voxel(), 0.5);
        assert_eq!(c.slice_pixel(), 0.25);
        assert!(!c.is_isotropic());
        assert!(VoxelSize::new(1.0, 1.0, 1.0).is_isotropic());
    }

    #[test]
    fn test_filter_pos_row_major() {
        let mut v = MaskVolume::zeros((1, 2, 2));
        v[(0, 0, 1)] = 1;
        v[(0, 1, 0)] = 1;
        assert_eq!(v.filter_pos(|p| p == 1), vec![(0, 0, 1), (0, 1, 0)]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_replace() {
        let mut v = MaskVolume::zeros((4, 8, 8));
        v[(0, 0, 0)] = 3;
        v[(3, 7, 7)] = 3;
        assert_eq!(v.par_replace(3, 1), 2);
        assert_eq!(v.count(1), 2);
    }
}
