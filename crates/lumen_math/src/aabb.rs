use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box used as a cheap ray reject.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Minimum extent along any axis; thinner slabs get inflated to this.
    pub const MIN_EXTENT: f64 = 1e-4;

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Box spanned by two opposite corners (in any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(
            Interval::new(min.x, max.x),
            Interval::new(min.y, max.y),
            Interval::new(min.z, max.z),
        )
    }

    /// Tightest box around a point cloud, padded on flat axes.
    ///
    /// Returns [`Aabb::EMPTY`] for an empty iterator.
    pub fn enclosing<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::EMPTY;
        };
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Self::from_points(min, max)
    }

    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&a.x, &b.x),
            y: Interval::surrounding(&a.y, &b.y),
            z: Interval::surrounding(&a.z, &b.z),
        }
    }

    /// Interval for axis `n` (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn min_point(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max_point(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Slab test: does `ray` pass through the box within `ray_t`?
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv_d = 1.0 / ray.direction[axis];
            let origin = ray.origin[axis];

            let mut t0 = (slab.min - origin) * inv_d;
            let mut t1 = (slab.max - origin) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }
        true
    }

    /// Inflate any axis thinner than [`Aabb::MIN_EXTENT`].
    ///
    /// A flat NURBS patch or an axis-aligned triangle would otherwise give a
    /// zero-width slab that grazing rays slip through.
    fn pad_to_minimums(&mut self) {
        if self.x.size() < Self::MIN_EXTENT {
            self.x = self.x.expand(Self::MIN_EXTENT);
        }
        if self.y.size() < Self::MIN_EXTENT {
            self.y = self.y.expand(Self::MIN_EXTENT);
        }
        if self.z.size() < Self::MIN_EXTENT {
            self.z = self.z.expand(Self::MIN_EXTENT);
        }
    }
}
