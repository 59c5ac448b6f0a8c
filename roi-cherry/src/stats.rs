//! 区域统计协作者接口.
//!
//! 几何统计 (体积, 表面积等) 由外部协作者计算, 本 crate 只定义
//! seam. 协作者缺席是一个 **可恢复** 的情况: 掩码此时已经创建完成,
//! 统计失败不应使整个操作作废.

use crate::MaskVolume;

/// 一张简单的统计结果表: 每列一个度量, 每行一个区域.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalyzerReport {
    /// 度量名称, 与每行的分量一一对应.
    pub columns: Vec<String>,

    /// 每个区域一行.
    pub rows: Vec<Vec<f64>>,
}

/// 区域统计协作者. 由外部实现.
pub trait RegionAnalyzer {
    /// 对一个已完成的掩码计算统计表. 2D/3D 的区分由实现者自行决定
    /// (例如按 `mask.len_z()` 分流).
    fn analyze(&self, mask: &MaskVolume) -> AnalyzerReport;
}

/// 区域统计错误.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StatsError {
    /// 统计协作者不可用. 调用者应将此情况报告给用户, 而不是中止
    /// 已完成的掩码/ROI 操作.
    AnalyzerUnavailable,
}

/// 运行统计协作者 (若有).
pub fn analyze_regions(
    analyzer: Option<&dyn RegionAnalyzer>,
    mask: &MaskVolume,
) -> Result<AnalyzerReport, StatsError> {
    let Some(analyzer) = analyzer else {
        return Err(StatsError::AnalyzerUnavailable);
    };
    Ok(analyzer.analyze(mask))
}
