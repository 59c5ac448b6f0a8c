use super::Roi;

/// 列表式 ROI 存储.
///
/// 对应宿主应用中由用户交互填充的 ROI 管理器: 支持追加、按序读取、
/// 计数与整体清空. 它是栅格化的输入来源, 也是轮廓提取的输出去向.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoiStore {
    rois: Vec<Roi>,
}

impl RoiStore {
    /// 创建一个空存储.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个 ROI.
    #[inline]
    pub fn add(&mut self, roi: Roi) {
        self.rois.push(roi);
    }

    /// 获取第 `index` 个 ROI. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Roi> {
        self.rois.get(index)
    }

    /// 获取存储的 ROI 个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.rois.len()
    }

    /// 存储是否为空?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rois.is_empty()
    }

    /// 清空存储. 重新填充之前通常先调用它.
    #[inline]
    pub fn reset(&mut self) {
        self.rois.clear();
    }

    /// 获取能按序迭代所有 ROI 的迭代器.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Roi> {
        self.rois.iter()
    }

    /// 以切片形式获取所有 ROI.
    #[inline]
    pub fn rois(&self) -> &[Roi] {
        &self.rois
    }
}

impl Extend<Roi> for RoiStore {
    fn extend<T: IntoIterator<Item = Roi>>(&mut self, iter: T) {
        self.rois.extend(iter);
    }
}

impl FromIterator<Roi> for RoiStore {
    fn from_iter<T: IntoIterator<Item = Roi>>(iter: T) -> Self {
        Self {
            rois: Vec::from_iter(iter),
        }
    }
}
