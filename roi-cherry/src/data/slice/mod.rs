//! 掩码切片视图的操作.

mod core;

pub use core::{MaskSlice, MaskSliceMut};

use crate::Idx2d;

/// 获得 `(h, w)` 的 4-邻居索引. 不检查越界.
///
/// 下溢的分量会 wrap 到 `usize::MAX`, 调用侧的越界检查会将其过滤.
#[inline]
pub(crate) fn neighbour4((h, w): Idx2d) -> [Idx2d; 4] {
    [
        (h.wrapping_sub(1), w),
        (h.saturating_add(1), w),
        (h, w.wrapping_sub(1)),
        (h, w.saturating_add(1)),
    ]
}
