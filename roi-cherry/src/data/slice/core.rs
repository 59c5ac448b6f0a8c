use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use ndarray::iter::{Iter, IterMut};
use ndarray::{ArrayView2, ArrayViewMut2, Ix2};

use super::neighbour4;
use crate::consts::gray::*;
use crate::{Area2d, Areas2d, Idx2d};

/// 不可变、借用的二维水平掩码切片.
pub struct MaskSlice<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::MaskVolume`].
    ///
    /// 这里有意把代码写死为 `ArrayView` 降低灵活性, 但使结构的意图更加明确.
    data: ArrayView2<'a, u8>,
}

impl Index<Idx2d> for MaskSlice<'_> {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

/// 可变、借用的二维水平掩码切片.
pub struct MaskSliceMut<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::MaskVolume`].
    ///
    /// 这里有意把代码写死为 `ArrayViewMut` 降低灵活性, 但使结构的意图更加明确.
    data: ArrayViewMut2<'a, u8>,
}

impl Index<Idx2d> for MaskSliceMut<'_> {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx2d> for MaskSliceMut<'_> {
    #[inline]
    fn index_mut(&mut self, index: Idx2d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

/// 可变方法集合.
impl<'a> MaskSliceMut<'a> {
    /// 获得 **底层** 数据的一份可变 shallow copy.
    #[inline]
    pub fn array_view_mut(&mut self) -> ArrayViewMut2<u8> {
        self.data.view_mut()
    }

    /// 获取可以迭代并修改图像像素的迭代器.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, u8, Ix2> {
        self.data.iter_mut()
    }

    /// 获取给定位置 (高, 宽) 的像素值, 并可就地修改. 越界时返回 `None`.
    #[inline]
    pub fn get_mut(&mut self, pos: Idx2d) -> Option<&mut u8> {
        self.data.get_mut(pos)
    }

    /// 将水平切片中值为 `old` 的像素全部替换为 `new`.
    ///
    /// 返回总共成功替换的个数.
    pub fn replace(&mut self, old: u8, new: u8) -> usize {
        let mut cnt = 0usize;
        self.array_view_mut()
            .iter_mut()
            .filter(|pix| **pix == old)
            .for_each(|p| {
                cnt += 1;
                *p = new;
            });
        cnt
    }

    /// 将 `it` 中的每个索引对应的像素改为 `new`.
    ///
    /// 如果存在越界索引, 则程序 panic.
    pub fn fill_batch<I: IntoIterator<Item = Idx2d>>(&mut self, it: I, new: u8) {
        for pos in it.into_iter() {
            self[pos] = new;
        }
    }
}

/// 切片不可变方法集合.
macro_rules! impl_mask_slice_immut {
    ($life: lifetime, $slice: ty, $array: ty) => {
        /// 不可变方法集合.
        impl<$life> $slice {
            /// 直接初始化.
            #[inline]
            pub(crate) fn new(data: $array) -> Self {
                Self { data }
            }

            /// 获得 **底层** 数据的一份不可变 shallow copy.
            #[inline]
            pub fn array_view(&self) -> ArrayView2<u8> {
                self.data.view()
            }

            /// 获取可以迭代图像像素的迭代器.
            #[inline]
            pub fn iter(&self) -> Iter<'_, u8, Ix2> {
                self.data.iter()
            }

            /// 获取给定位置 (高, 宽) 的像素值. 越界时返回 `None`.
            #[inline]
            pub fn get(&self, pos: Idx2d) -> Option<&u8> {
                self.data.get(pos)
            }

            /// 该图是否为全背景图?
            #[inline]
            pub fn is_background(&self) -> bool {
                self.data.iter().copied().all(is_background)
            }

            /// 图像的分辨率 (高, 宽).
            #[inline]
            pub fn shape(&self) -> Idx2d {
                let &[h, w] = self.data.shape() else {
                    unreachable!()
                };
                (h, w)
            }

            /// 图像的像素个数.
            #[inline]
            pub fn size(&self) -> usize {
                let (h, w) = self.shape();
                h * w
            }

            /// 获得图像的高.
            #[inline]
            pub fn height(&self) -> usize {
                self.shape().0
            }

            /// 获得图像的宽.
            #[inline]
            pub fn width(&self) -> usize {
                self.shape().1
            }

            /// 判断一个索引是否合法 (未越界).
            #[inline]
            pub fn check(&self, (h, w): Idx2d) -> bool {
                let (h_len, w_len) = self.shape();
                h < h_len && w < w_len
            }

            /// 统计图像中值为 `label` 的像素总个数.
            #[inline]
            pub fn count(&self, label: u8) -> usize {
                self.data.iter().filter(|&p| *p == label).count()
            }

            /// 以行优先规则, 获取能迭代图像所有索引的迭代器.
            #[inline]
            pub fn pos_iter(&self) -> impl Iterator<Item = Idx2d> {
                let (h, w) = self.shape();
                (0..h).flat_map(move |first| (0..w).map(move |second| (first, second)))
            }

            /// 以行优先规则, 获取能迭代图像所有 `(索引, 像素值)` 的迭代器.
            #[inline]
            pub fn indexed_iter(&self) -> impl Iterator<Item = (Idx2d, &u8)> {
                self.data.indexed_iter()
            }

            /// 获得 `pos` 的 4-邻域像素索引. 保证返回的索引都不越界.
            pub fn n4_positions(&self, pos: Idx2d) -> Vec<Idx2d> {
                neighbour4(pos)
                    .into_iter()
                    .filter(|p| self.check(*p))
                    .collect()
            }

            /// 按照 4-相邻规则获取所有区域. 两个像素 `p1` 和 `p2` 属于同一个区域,
            /// 当且仅当存在一条从 `p1` 到 `p2` 的 4-相邻路径, 且路径上的所有像素
            /// (包括 `p1` 和 `p2`) 都满足谓词 `pred`.
            ///
            /// 区域按照其首个像素的行优先序排列, 保证每次运行产生同样的结果.
            pub fn areas<P: Fn(u8) -> bool + Copy>(&self, pred: P) -> Areas2d {
                let (_, w_len) = self.shape();
                let flat = |(h, w): Idx2d| h * w_len + w;

                let mut visited = vec![false; self.size()];
                let mut bfs_q = VecDeque::with_capacity(4);
                let mut ans = Areas2d::with_capacity(1);

                for pos in self.pos_iter() {
                    if visited[flat(pos)] || !pred(self[pos]) {
                        continue;
                    }
                    visited[flat(pos)] = true;
                    bfs_q.push_back(pos);
                    let mut this_area = Area2d::with_capacity(1);

                    while let Some(cur) = bfs_q.pop_front() {
                        this_area.push(cur);
                        for next in self.n4_positions(cur) {
                            if !visited[flat(next)] && pred(self[next]) {
                                visited[flat(next)] = true;
                                bfs_q.push_back(next);
                            }
                        }
                    }
                    ans.push(this_area);
                }
                ans
            }
        }
    };
}

impl_mask_slice_immut!('a, MaskSlice<'a>, ArrayView2<'a, u8>);
impl_mask_slice_immut!('a, MaskSliceMut<'a>, ArrayViewMut2<'a, u8>);

#[cfg(test)]
mod tests {
    use crate::consts::gray::is_foreground;
    use crate::MaskVolume;

    #[test]
    fn test_slice_basic() {
        let mut v = MaskVolume::zeros((1, 3, 4));
        v[(0, 1, 2)] = 255;
        let sli = v.slice_at(0);
        assert_eq!(sli.shape(), (3, 4));
        assert_eq!(sli.size(), 12);
        assert_eq!(sli[(1, 2)], 255);
        assert_eq!(sli.count(255), 1);
        assert!(!sli.is_background());
        assert!(sli.check((2, 3)));
        assert!(!sli.check((3, 0)));
    }

    #[test]
    fn test_n4_positions_at_corner() {
        let v = MaskVolume::zeros((1, 3, 3));
        let sli = v.slice_at(0);
        assert_eq!(sli.n4_positions((0, 0)), vec![(1, 0), (0, 1)]);
        assert_eq!(sli.n4_positions((1, 1)).len(), 4);
    }

    #[test]
    fn test_areas_two_components() {
        // 两个 4-连通前景块: 左上角的 L 形和右下角的单像素.
        let mut v = MaskVolume::zeros((1, 4, 4));
        for pos in [(0, 0), (1, 0), (1, 1)] {
            v[(0, pos.0, pos.1)] = 255;
        }
        v[(0, 3, 3)] = 255;

        let sli = v.slice_at(0);
        let areas = sli.areas(is_foreground);
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].len(), 3);
        assert_eq!(areas[1], vec![(3, 3)]);
    }

    #[test]
    fn test_areas_diagonal_not_connected() {
        let mut v = MaskVolume::zeros((1, 2, 2));
        v[(0, 0, 0)] = 255;
        v[(0, 1, 1)] = 255;
        assert_eq!(v.slice_at(0).areas(is_foreground).len(), 2);
    }

    #[test]
    fn test_fill_batch_and_replace() {
        let mut v = MaskVolume::zeros((1, 2, 2));
        let mut sli = v.slice_at_mut(0);
        sli.fill_batch([(0, 0), (0, 1)], 255);
        assert_eq!(sli.count(255), 2);
        assert_eq!(sli.replace(255, 1), 2);
        assert_eq!(sli.count(1), 2);
    }
}
