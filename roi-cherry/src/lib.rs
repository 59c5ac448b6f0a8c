#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 提供逐切片手绘 2D ROI 与 3D 二值/标签掩码体数据之间的双向转换,
//! 以及分割结果的 overlay 上色与摆放功能.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 体数据统一按照 `(z, H, W)` 格式组织与访问, 其中 `z` 为切片方向.
//! 2. ROI 轮廓顶点位于像素角点坐标系: 像素 `(h, w)` 占据
//!   `[h, h + 1) x [w, w + 1)`, 其中心为 `(h + 0.5, w + 0.5)`.
//! 3. 在非期望情况下 (如索引越界), 程序会直接 panic, 而不会导致内存错误.
//!   用户输入错误 (如非法目标尺寸) 则通过 `Result` 报告.
//!
//! # 功能一览
//!
//! ### ROI 栅格化 ✅
//!
//! 将 ROI 序列按 even-odd 规则填充为 3D 二值掩码, 支持
//! "关联到单切片" 与 "绘制到所有切片" 两种策略.
//!
//! 实现位于 `roi-cherry/src/convert/rasterize.rs`.
//!
//! ### 轮廓提取 ✅
//!
//! 从二值掩码或标签图逐切片提取 4-连通前景块的外轮廓与孔洞轮廓,
//! 重建 ROI 序列. 提取结果回填后逐像素精确.
//!
//! 实现位于 `roi-cherry/src/convert/{extract, trace}.rs`.
//!
//! ### Overlay 上色与摆放 ✅
//!
//! 按标签发现顺序循环分配 7 色调色板 (或统一固定色),
//! 并根据目标栈类型重写 ROI 的切片摆放信息.
//!
//! 实现位于 `roi-cherry/src/overlay.rs`.
//!
//! ### 区域统计协作者接口 ✅
//!
//! 几何统计由外部协作者完成, 本 crate 只定义 seam 与
//! "协作者缺席" 的可恢复错误.
//!
//! 实现位于 `roi-cherry/src/stats.rs`.

/// 二维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 高精度二维坐标, 用于 ROI 轮廓顶点 (像素角点坐标系).
pub type Idx2dF = (f64, f64);

type Area2d = Vec<Idx2d>;
type Areas2d = Vec<Area2d>;

/// 3D 掩码体数据基础结构.
mod data;

pub use data::{MaskSlice, MaskSliceMut, MaskVolume, VoxelSize};

pub mod consts;

/// 2D ROI 与 ROI 存储.
mod roi;

pub use roi::{Contour, Roi, RoiStore};

pub mod convert;

pub mod overlay;

pub mod stats;

pub mod prelude;
