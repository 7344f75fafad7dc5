//! rimscan-nn: nearest-neighbor index over a cloud (balanced k-d tree).

use rimscan_core::CloudView;
use smallvec::SmallVec;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor { pub idx: usize, pub dist2: f32 }

pub type Neighbors = SmallVec<[Neighbor; 16]>;

/// Geometry-first neighborhood queries at arbitrary positions.
pub trait NeighborIndex3 {
    /// Up to `k` closest points to `q`, nearest first.
    fn knn(&self, q: [f32; 3], k: usize) -> Neighbors;

    fn nearest(&self, q: [f32; 3]) -> Option<Neighbor> { self.knn(q, 1).first().copied() }
}

/// Implicit k-d tree: `perm[lo..hi]` is a subtree whose median sits at
/// `(lo + hi) / 2`, left half <= median <= right half on that node's axis.
/// Points sharing a coordinate are fine; nothing is bucketed.
pub struct KdTree<'a> {
    pts: CloudView<'a>,
    perm: Vec<u32>,
    axes: Vec<u8>,
}

impl<'a> KdTree<'a> {
    pub fn build(pts: CloudView<'a>) -> Self {
        let n = pts.len();
        let mut tree = Self { pts, perm: (0..n as u32).collect(), axes: vec![0; n] };
        tree.split(0, n);
        tree
    }

    pub fn len(&self) -> usize { self.perm.len() }
    pub fn is_empty(&self) -> bool { self.perm.is_empty() }

    fn split(&mut self, lo: usize, hi: usize) {
        if hi - lo <= 1 { return; }
        let axis = self.widest_axis(lo, hi);
        let mid = (lo + hi) / 2;
        let pts = self.pts;
        self.perm[lo..hi].select_nth_unstable_by(mid - lo, |&a, &b| {
            pts.coord(a as usize, axis).total_cmp(&pts.coord(b as usize, axis))
        });
        self.axes[mid] = axis as u8;
        self.split(lo, mid);
        self.split(mid + 1, hi);
    }

    fn widest_axis(&self, lo: usize, hi: usize) -> usize {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for &i in &self.perm[lo..hi] {
            let p = self.pts.point(i as usize);
            for a in 0..3 { min[a] = min[a].min(p[a]); max[a] = max[a].max(p[a]); }
        }
        let spread = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
        (0..3).max_by(|&a, &b| spread[a].total_cmp(&spread[b])).unwrap_or(0)
    }

    fn search(&self, lo: usize, hi: usize, q: [f32; 3], k: usize, best: &mut Neighbors) {
        if lo >= hi { return; }
        let mid = (lo + hi) / 2;
        let i = self.perm[mid] as usize;
        let p = self.pts.point(i);
        let d2 = (p[0]-q[0]).powi(2) + (p[1]-q[1]).powi(2) + (p[2]-q[2]).powi(2);
        offer(best, k, Neighbor { idx: i, dist2: d2 });

        let axis = self.axes[mid] as usize;
        let diff = q[axis] - p[axis];
        let (near, far) = if diff < 0.0 { ((lo, mid), (mid + 1, hi)) } else { ((mid + 1, hi), (lo, mid)) };
        self.search(near.0, near.1, q, k, best);
        let worst = best.last().map_or(f32::INFINITY, |n| n.dist2);
        if best.len() < k || diff * diff < worst {
            self.search(far.0, far.1, q, k, best);
        }
    }
}

/// Insert into a list sorted by distance, capped at `k` entries.
fn offer(best: &mut Neighbors, k: usize, n: Neighbor) {
    if best.len() == k && best.last().is_some_and(|w| n.dist2 >= w.dist2) { return; }
    let at = best.partition_point(|b| b.dist2 <= n.dist2);
    best.insert(at, n);
    best.truncate(k);
}

impl<'a> NeighborIndex3 for KdTree<'a> {
    fn knn(&self, q: [f32; 3], k: usize) -> Neighbors {
        let mut best = Neighbors::new();
        if k == 0 { return best; }
        self.search(0, self.perm.len(), q, k, &mut best);
        best
    }
}
