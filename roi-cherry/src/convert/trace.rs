//! 像素块的边缘轮廓追踪.
//!
//! 在像素角点格子上行走: 前景像素与非前景像素 (或图像边界) 之间的
//! 每条单位边都是边界边, 按固定方向规则 (前景在行进方向的同一侧)
//! 定向后缝合成若干闭合回路. 外轮廓与孔洞轮廓会各自成环,
//! 整体按 even-odd 规则回填即逐像素还原原像素块.
//!
//! 鞍点角点 (两个前景像素仅对角接触) 同时存在两条出边,
//! 此时优先选择右转的那条 (right-turn-first). 该决策只影响回路的
//! 切分方式, 不影响回填结果.

use std::collections::{HashMap, HashSet};

use crate::roi::Contour;
use crate::{Area2d, Idx2d, Idx2dF};

/// 角点间的单位方向 `(dh, dw)`.
type Dir = (isize, isize);

/// 追踪 `pixels` 的所有边界回路. `pixels` 是一个 4-连通像素块,
/// 其顺序决定了回路的输出顺序 (保证确定性).
pub(crate) fn trace_area(pixels: &Area2d) -> Vec<Contour> {
    let set: HashSet<Idx2d> = pixels.iter().copied().collect();

    // 有向边界边, 按像素顺序生成. 角点坐标范围是像素坐标 + 1,
    // 不会溢出. (0 - 1) 下溢到 usize::MAX, 不可能命中集合, 判定正确.
    let mut edges: Vec<(Idx2d, Idx2d)> = Vec::with_capacity(pixels.len() * 2);
    for &(h, w) in pixels {
        if !set.contains(&(h.wrapping_sub(1), w)) {
            edges.push(((h, w), (h, w + 1)));
        }
        if !set.contains(&(h, w + 1)) {
            edges.push(((h, w + 1), (h + 1, w + 1)));
        }
        if !set.contains(&(h + 1, w)) {
            edges.push(((h + 1, w + 1), (h + 1, w)));
        }
        if !set.contains(&(h, w.wrapping_sub(1))) {
            edges.push(((h + 1, w), (h, w)));
        }
    }

    let mut by_start: HashMap<Idx2d, Vec<usize>> = HashMap::with_capacity(edges.len());
    for (i, (start, _)) in edges.iter().enumerate() {
        by_start.entry(*start).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut contours = Vec::with_capacity(1);
    for first in 0..edges.len() {
        if !used[first] {
            contours.push(walk_loop(first, &edges, &by_start, &mut used));
        }
    }
    contours
}

#[inline]
fn direction((a, b): &(Idx2d, Idx2d)) -> Dir {
    (
        b.0 as isize - a.0 as isize,
        b.1 as isize - a.1 as isize,
    )
}

/// 从第 `first` 条边出发走完一条闭合回路, 返回其拐点序列.
/// 共线的中间角点会被合并掉.
fn walk_loop(
    first: usize,
    edges: &[(Idx2d, Idx2d)],
    by_start: &HashMap<Idx2d, Vec<usize>>,
    used: &mut [bool],
) -> Contour {
    let start_corner = edges[first].0;
    let mut points: Vec<Idx2dF> = Vec::with_capacity(8);
    let mut prev_dir: Option<Dir> = None;
    let mut cur = first;

    loop {
        used[cur] = true;
        let (corner, next_corner) = edges[cur];
        let dir = direction(&edges[cur]);
        if prev_dir != Some(dir) {
            points.push((corner.0 as f64, corner.1 as f64));
        }
        prev_dir = Some(dir);

        if next_corner == start_corner {
            break;
        }
        cur = next_edge(next_corner, dir, by_start, used, edges);
    }

    // 回路闭合处共线时, 起始角点不是拐点, 将其去除.
    if points.len() > 2 {
        let last = *points.last().unwrap();
        if unit_dir(last, points[0]) == unit_dir(points[0], points[1]) {
            points.remove(0);
        }
    }
    Contour::new(points)
}

/// 两个 (整数值的) 角点坐标之间的单位方向.
#[inline]
fn unit_dir((h0, w0): Idx2dF, (h1, w1): Idx2dF) -> Dir {
    (
        (h1 - h0).signum() as isize,
        (w1 - w0).signum() as isize,
    )
}

/// 在角点 `corner` 处选择下一条未使用的出边.
/// 鞍点处有两条出边可选, 优先右转.
fn next_edge(
    corner: Idx2d,
    incoming: Dir,
    by_start: &HashMap<Idx2d, Vec<usize>>,
    used: &[bool],
    edges: &[(Idx2d, Idx2d)],
) -> usize {
    let candidates = by_start
        .get(&corner)
        .expect("闭合回路不应在中途断开");
    let mut free = candidates.iter().copied().filter(|i| !used[*i]);

    let first = free.next().expect("闭合回路不应在中途断开");
    match free.next() {
        None => first,
        Some(second) => {
            // 右转方向: (dh, dw) -> (dw, -dh).
            let right = (incoming.1, -incoming.0);
            if direction(&edges[second]) == right {
                second
            } else {
                first
            }
        }
    }
}
