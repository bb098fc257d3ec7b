use serde::{Deserialize, Serialize};

use crate::{Cell, GRID_SIDE};

/// Pixel-ish layout unit. The widget layer decides what one unit means.
pub type Px = f32;

/// Fraction of a square's width used as the connecting line's diameter.
pub const DIAMETER_FACTOR: Px = 0.10;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointPx {
    pub x: Px,
    pub y: Px,
}

impl PointPx {
    pub const fn new(x: Px, y: Px) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, target: Self, t: f32) -> Self {
        Self {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}

/// Left/top inclusive, right/bottom exclusive; a rect with no area is "empty"
/// and behaves as the identity for [`RectPx::union`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RectPx {
    pub left: Px,
    pub top: Px,
    pub right: Px,
    pub bottom: Px,
}

impl RectPx {
    pub const EMPTY: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub fn from_points(a: PointPx, b: PointPx) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn around(center: PointPx, half_width: Px, half_height: Px) -> Self {
        Self {
            left: center.x - half_width,
            top: center.y - half_height,
            right: center.x + half_width,
            bottom: center.y + half_height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn inflate(self, amount: Px) -> Self {
        Self {
            left: self.left - amount,
            top: self.top - amount,
            right: self.right + amount,
            bottom: self.bottom + amount,
        }
    }

    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn contains(&self, point: PointPx) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Insets {
    pub left: Px,
    pub top: Px,
    pub right: Px,
    pub bottom: Px,
}

/// How the widget resolves its box when the container offers a non-square area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Aspect {
    /// Both sides shrink to the smaller dimension.
    #[default]
    Square,
    /// Width is kept, height shrinks to the smaller dimension.
    LockWidth,
    /// Height is kept, width shrinks to the smaller dimension.
    LockHeight,
}

impl Aspect {
    pub fn resolve(self, width: Px, height: Px) -> (Px, Px) {
        let min = width.min(height);
        match self {
            Aspect::Square => (min, min),
            Aspect::LockWidth => (width, min),
            Aspect::LockHeight => (min, height),
        }
    }
}

/// Layout of the 3x3 grid inside a resolved box: per-square sizes and the
/// screen-space center of every cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridGeometry {
    width: Px,
    height: Px,
    insets: Insets,
}

impl GridGeometry {
    pub fn new(width: Px, height: Px, insets: Insets) -> Self {
        Self {
            width,
            height,
            insets,
        }
    }

    pub fn square_width(&self) -> Px {
        (self.width - self.insets.left - self.insets.right) / GRID_SIDE as Px
    }

    pub fn square_height(&self) -> Px {
        (self.height - self.insets.top - self.insets.bottom) / GRID_SIDE as Px
    }

    pub fn center_x(&self, col: u8) -> Px {
        let square = self.square_width();
        self.insets.left + col as Px * square + square / 2.0
    }

    pub fn center_y(&self, row: u8) -> Px {
        let square = self.square_height();
        self.insets.top + row as Px * square + square / 2.0
    }

    pub fn center(&self, cell: Cell) -> PointPx {
        PointPx::new(self.center_x(cell.col()), self.center_y(cell.row()))
    }

    /// Radius covering the connecting line's stroke, used to pad dirty rects.
    pub fn line_radius(&self) -> Px {
        self.square_width() * DIAMETER_FACTOR / 2.0
    }

    pub(crate) fn inset_top(&self) -> Px {
        self.insets.top
    }

    pub(crate) fn inset_left(&self) -> Px {
        self.insets.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_account_for_insets() {
        let geom = GridGeometry::new(
            320.0,
            200.0,
            Insets {
                left: 10.0,
                top: 20.0,
                right: 10.0,
                bottom: 0.0,
            },
        );

        assert_eq!(geom.square_width(), 100.0);
        assert_eq!(geom.square_height(), 60.0);
        assert_eq!(geom.center_x(0), 60.0);
        assert_eq!(geom.center_y(2), 170.0);
    }

    #[test]
    fn cell_centers_line_up_on_the_square_grid() {
        let geom = GridGeometry::new(300.0, 300.0, Insets::default());
        let center = geom.center(Cell::new_unchecked(1, 1));

        assert_eq!(center, PointPx::new(150.0, 150.0));
        assert_eq!(geom.center(Cell::new_unchecked(0, 2)).x, 250.0);
    }

    #[test]
    fn aspect_resolution_shrinks_the_right_side() {
        assert_eq!(Aspect::Square.resolve(400.0, 300.0), (300.0, 300.0));
        assert_eq!(Aspect::LockWidth.resolve(400.0, 300.0), (400.0, 300.0));
        assert_eq!(Aspect::LockHeight.resolve(400.0, 300.0), (300.0, 300.0));
        assert_eq!(Aspect::LockHeight.resolve(300.0, 400.0), (300.0, 400.0));
    }

    #[test]
    fn union_treats_empty_rects_as_identity() {
        let rect = RectPx::from_points(PointPx::new(10.0, 10.0), PointPx::new(20.0, 30.0));

        assert_eq!(RectPx::EMPTY.union(rect), rect);
        assert_eq!(rect.union(RectPx::EMPTY), rect);

        let grown = rect.union(RectPx::around(PointPx::new(0.0, 0.0), 5.0, 5.0));
        assert_eq!(grown.left, -5.0);
        assert_eq!(grown.bottom, 30.0);
    }

    #[test]
    fn inflate_pads_every_side() {
        let rect = RectPx::from_points(PointPx::new(0.0, 0.0), PointPx::new(10.0, 10.0)).inflate(2.0);

        assert_eq!(rect.left, -2.0);
        assert_eq!(rect.right, 12.0);
        assert!(rect.contains(PointPx::new(-1.0, 11.0)));
    }
}
