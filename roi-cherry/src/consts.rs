//! 通用常量.

/// 单通道掩码像素值.
pub mod gray {
    /// 掩码背景像素值.
    pub const BACKGROUND: u8 = 0;

    /// 二值掩码前景像素值.
    pub const FOREGROUND: u8 = 255;

    /// 像素是否是前景? 非背景即前景, 因此标签图也适用 (阈值取 1).
    #[inline]
    pub const fn is_foreground(p: u8) -> bool {
        p != BACKGROUND
    }

    /// 像素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        p == BACKGROUND
    }
}

/// RGB 颜色与 overlay 调色板.
pub mod rgb {
    /// 24-bit RGB 颜色.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Rgb {
        /// 红色通道.
        pub r: u8,

        /// 绿色通道.
        pub g: u8,

        /// 蓝色通道.
        pub b: u8,
    }

    impl Rgb {
        /// 直接构造.
        #[inline]
        pub const fn new(r: u8, g: u8, b: u8) -> Self {
            Self { r, g, b }
        }
    }

    /// 红色.
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    /// 绿色.
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);

    /// 青色.
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);

    /// 品红色.
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);

    /// 橙色.
    pub const ORANGE: Rgb = Rgb::new(255, 200, 0);

    /// 蓝色.
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    /// 黄色.
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);

    /// multicolor 模式的默认颜色顺序. 标签个数超过 7 时循环使用.
    pub const OVERLAY_PALETTE: [Rgb; 7] = [RED, GREEN, CYAN, MAGENTA, ORANGE, BLUE, YELLOW];
}
