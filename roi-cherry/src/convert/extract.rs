use super::trace::trace_area;
use crate::consts::gray::{is_foreground, BACKGROUND};
use crate::{MaskSlice, MaskVolume, Roi};

/// 从二值掩码中逐切片提取 ROI 序列. 阈值取 1 (体素值 `>= 1` 即前景),
/// 因此标签图作为输入同样可用.
///
/// 每个切片上的每个 4-连通前景块产生一个 ROI, 其轮廓包括外轮廓与
/// 孔洞轮廓. 全背景切片不产生任何 ROI.
///
/// # 返回值
///
/// ROI 按切片升序排列; 同一切片内按前景块首像素的行优先序排列
/// (保证确定性). 目标深度大于 1 时, 每个 ROI 都携带其来源切片索引;
/// 深度为 1 时不携带 (2D 没有切片概念).
pub fn rois_from_mask(mask: &MaskVolume) -> Vec<Roi> {
    rois_with(mask, is_foreground)
}

/// 与 [`rois_from_mask`] 类似, 但只提取标签图中值恰好为 `label`
/// 的体素 (精确匹配). `label` 为 0 (背景) 时结果恒为空.
pub fn rois_from_label(mask: &MaskVolume, label: u8) -> Vec<Roi> {
    if label == BACKGROUND {
        return Vec::new();
    }
    rois_with(mask, move |p| p == label)
}

fn rois_with<P: Fn(u8) -> bool + Copy>(mask: &MaskVolume, pred: P) -> Vec<Roi> {
    let stamp = mask.len_z() > 1;
    let mut ans = Vec::new();
    for (z, sli) in mask.slice_iter().enumerate() {
        ans.extend(
            slice_rois(&sli, pred)
                .into_iter()
                .map(|roi| if stamp { roi.with_slice(z) } else { roi }),
        );
    }
    ans
}

/// 提取单个切片上的所有 ROI (不含切片关联信息).
fn slice_rois<P: Fn(u8) -> bool + Copy>(sli: &MaskSlice, pred: P) -> Vec<Roi> {
    sli.areas(pred)
        .iter()
        .map(|area| Roi::new(trace_area(area)))
        .collect()
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use ndarray::Axis;
        use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
    }
}

/// 借助 `rayon`, 并行地运行 [`rois_from_mask`].
///
/// 各切片相互独立, 结果与串行版本完全一致 (仍按切片升序).
#[cfg(feature = "rayon")]
pub fn par_rois_from_mask(mask: &MaskVolume) -> Vec<Roi> {
    par_rois_with(mask, is_foreground)
}

/// 借助 `rayon`, 并行地运行 [`rois_from_label`].
#[cfg(feature = "rayon")]
pub fn par_rois_from_label(mask: &MaskVolume, label: u8) -> Vec<Roi> {
    if label == BACKGROUND {
        return Vec::new();
    }
    par_rois_with(mask, move |p| p == label)
}

#[cfg(feature = "rayon")]
fn par_rois_with<P: Fn(u8) -> bool + Copy + Sync>(mask: &MaskVolume, pred: P) -> Vec<Roi> {
    let stamp = mask.len_z() > 1;
    let per_slice: Vec<Vec<Roi>> = mask
        .data()
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|v| slice_rois(&MaskSlice::new(v), pred))
        .collect();

    per_slice
        .into_iter()
        .enumerate()
        .flat_map(|(z, rois)| {
            rois.into_iter()
                .map(move |roi| if stamp { roi.with_slice(z) } else { roi })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{rois_from_label, rois_from_mask};
    use crate::consts::gray::FOREGROUND;
    use crate::convert::{mask_from_rois, MaskRequest};
    use crate::{Idx2d, MaskVolume, Roi};

    /// 将单个 roi 回填到 `(1, shape)` 的掩码里, 返回前景像素集.
    fn refill(roi: &Roi, shape: Idx2d) -> Vec<Idx2d> {
        let req = MaskRequest::new((1, shape.0, shape.1), true);
        let mask = mask_from_rois(std::slice::from_ref(roi), &req).unwrap();
        mask.filter_pos(|p| p == FOREGROUND)
            .into_iter()
            .map(|(_, h, w)| (h, w))
            .collect()
    }

    #[test]
    fn test_full_slice_rect_round_trip() {
        // 占满一整个切片的矩形, 栅格化后提取, 再回填应当逐像素一致.
        let roi = Roi::rect((0, 0), (4, 5)).with_slice(1);
        let req = MaskRequest::new((3, 4, 5), true);
        let mask = mask_from_rois(std::slice::from_ref(&roi), &req).unwrap();

        let extracted = rois_from_mask(&mask);
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].slice(), Some(1));

        let full: Vec<Idx2d> = (0..4).flat_map(|h| (0..5).map(move |w| (h, w))).collect();
        assert_eq!(refill(&extracted[0], (4, 5)), full);
    }

    #[test]
    fn test_depth_one_extraction_has_no_slice() {
        let mut v = MaskVolume::zeros((1, 3, 3));
        v[(0, 1, 1)] = FOREGROUND;
        let rois = rois_from_mask(&v);
        assert_eq!(rois.len(), 1);
        assert_eq!(rois[0].slice(), None);
    }

    #[test]
    fn test_background_slices_contribute_nothing() {
        let mut v = MaskVolume::zeros((4, 3, 3));
        v[(2, 0, 0)] = FOREGROUND;
        let rois = rois_from_mask(&v);
        assert_eq!(rois.len(), 1);
        assert_eq!(rois[0].slice(), Some(2));
    }

    #[test]
    fn test_two_masses_give_two_rois_in_order() {
        let mut v = MaskVolume::zeros((1, 5, 5));
        v[(0, 0, 4)] = FOREGROUND;
        v[(0, 3, 0)] = FOREGROUND;
        let rois = rois_from_mask(&v);
        assert_eq!(rois.len(), 2);
        // 行优先序: (0, 4) 先于 (3, 0).
        assert_eq!(rois[0].bounds().unwrap().0, (0.0, 4.0));
        assert_eq!(rois[1].bounds().unwrap().0, (3.0, 0.0));
    }

    #[test]
    fn test_slice_order_is_ascending() {
        let mut v = MaskVolume::zeros((3, 3, 3));
        v[(2, 0, 0)] = FOREGROUND;
        v[(0, 1, 1)] = FOREGROUND;
        let rois = rois_from_mask(&v);
        assert_eq!(rois.len(), 2);
        assert_eq!(rois[0].slice(), Some(0));
        assert_eq!(rois[1].slice(), Some(2));
    }

    #[test]
    fn test_ring_round_trip_keeps_hole() {
        let mut v = MaskVolume::zeros((1, 5, 5));
        for h in 1..4 {
            for w in 1..4 {
                if (h, w) != (2, 2) {
                    v[(0, h, w)] = FOREGROUND;
                }
            }
        }
        let rois = rois_from_mask(&v);
        assert_eq!(rois.len(), 1);
        assert_eq!(rois[0].contours().len(), 2);

        let expect: Vec<Idx2d> = v
            .filter_pos(|p| p == FOREGROUND)
            .into_iter()
            .map(|(_, h, w)| (h, w))
            .collect();
        assert_eq!(refill(&rois[0], (5, 5)), expect);
    }

    #[test]
    fn test_label_extraction_exact_match() {
        // 切片 0 上有一个值为 2 的正方形, 其余为背景.
        let mut v = MaskVolume::zeros((2, 5, 5));
        for h in 1..3 {
            for w in 1..3 {
                v[(0, h, w)] = 2;
            }
        }

        let rois = rois_from_label(&v, 2);
        assert_eq!(rois.len(), 1);
        assert_eq!(rois[0].slice(), Some(0));
        assert_eq!(
            refill(&rois[0], (5, 5)),
            vec![(1, 1), (1, 2), (2, 1), (2, 2)]
        );

        // 值 3 从未出现过.
        assert!(rois_from_label(&v, 3).is_empty());
        // 背景标签恒为空.
        assert!(rois_from_label(&v, 0).is_empty());
    }

    #[test]
    fn test_label_extraction_separates_labels() {
        let mut v = MaskVolume::zeros((1, 4, 4));
        v[(0, 0, 0)] = 1;
        v[(0, 0, 1)] = 2;
        assert_eq!(rois_from_label(&v, 1).len(), 1);
        assert_eq!(rois_from_label(&v, 2).len(), 1);
        // 二值模式把两个标签都算作前景, 且两者 4-相邻, 是同一个块.
        assert_eq!(rois_from_mask(&v).len(), 1);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let mut v = MaskVolume::zeros((2, 6, 6));
        for pos in [(0, 1, 1), (0, 1, 2), (0, 4, 4), (1, 2, 3)] {
            v[pos] = FOREGROUND;
        }
        assert_eq!(rois_from_mask(&v), rois_from_mask(&v));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_extraction_matches_sequential() {
        use super::{par_rois_from_label, par_rois_from_mask};

        let mut v = MaskVolume::zeros((5, 8, 8));
        for z in 0..5 {
            for h in 0..8 {
                for w in 0..8 {
                    if (h + w + z) % 3 == 0 {
                        v[(z, h, w)] = ((z % 2) + 1) as u8;
                    }
                }
            }
        }
        assert_eq!(par_rois_from_mask(&v), rois_from_mask(&v));
        assert_eq!(par_rois_from_label(&v, 2), rois_from_label(&v, 2));
    }
}
