use std::ops::{Mul, Add, Sub};

/// A 2D point in canvas units, y pointing up
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// The x-coordinate
    x: f64,
    /// The y-coordinate
    y: f64,
}

impl Point {
    /// Creates a new point
    ///
    /// # Parameters
    ///
    /// x: The x-coordinate
    ///
    /// y: The y-coordinate
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
        }
    }

    /// Creates a point at the given distance from origo in the direction of angle
    ///
    /// # Parameters
    ///
    /// radius: The distance from origo
    ///
    /// angle: The angle in radians measured from the positive x-axis
    pub fn polar(radius: f64, angle: f64) -> Self {
        Self::new(radius * angle.cos(), radius * angle.sin())
    }

    /// Retrieves the x-coordinate
    pub fn get_x(&self) -> f64 {
        self.x
    }

    /// Retrieves the y-coordinate
    pub fn get_y(&self) -> f64 {
        self.y
    }

    /// Calculates the euclidean distance to another point
    ///
    /// # Parameters
    ///
    /// other: The point to measure to
    pub fn distance(&self, other: &Point) -> f64 {
        let diff = other - self;
        (diff.x * diff.x + diff.y * diff.y).sqrt()
    }

    /// Retrieves the data for the gpu
    pub fn get_data(&self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }
}

impl Add<&Point> for &Point {
    type Output = Point;

    fn add(self, rhs: &Point) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<&Point> for &Point {
    type Output = Point;

    fn sub(self, rhs: &Point) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Defines a 2x2 matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    /// The values of the matrix
    values: [[f64; 2]; 2],
}

impl Matrix {
    /// Creates a new matrix
    ///
    /// # Parameters
    ///
    /// values: The values of the matrix, first index is row, second index is column
    pub fn new(values: &[[f64; 2]; 2]) -> Self {
        Self { values: *values }
    }

    /// Retrieves the data for the gpu in column major order
    pub fn get_data(&self) -> [f32; 4] {
        [self.values[0][0] as f32, self.values[1][0] as f32, self.values[0][1] as f32, self.values[1][1] as f32]
    }
}

impl Mul<Matrix> for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Self::Output {
        Self::new(&[[
                self.values[0][0] * rhs.values[0][0] + self.values[0][1] * rhs.values[1][0],
                self.values[0][0] * rhs.values[0][1] + self.values[0][1] * rhs.values[1][1]
            ], [
                self.values[1][0] * rhs.values[0][0] + self.values[1][1] * rhs.values[1][0],
                self.values[1][0] * rhs.values[0][1] + self.values[1][1] * rhs.values[1][1],
        ]])
    }
}

impl Mul<Point> for Matrix {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        Point::new(
            self.values[0][0] * rhs.x + self.values[0][1] * rhs.y,
            self.values[1][0] * rhs.x + self.values[1][1] * rhs.y,
        )
    }
}

/// A linear 2D transform taking canvas coordinates to clip space.
///
/// The canvas is always centered on origo so no translation is needed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform2D {
    /// The linear part of the transform
    center_transform: Matrix,
}

impl Transform2D {
    /// Creates the identity operation
    pub fn identity() -> Self {
        Self { center_transform: Matrix::new(&[[1.0, 0.0], [0.0, 1.0]]) }
    }

    /// Scale at origo
    ///
    /// # Parameters
    ///
    /// scale: The ratio to scale x and y with
    pub fn scale(scale: &Point) -> Self {
        Self { center_transform: Matrix::new(&[[scale.x, 0.0], [0.0, scale.y]]) }
    }

    /// Creates the transform showing a square canvas of the given side length
    /// centered in a window, letterboxing the longer window axis
    ///
    /// # Parameters
    ///
    /// canvas_size: The side length of the canvas in logical units
    ///
    /// width: The width of the window in pixels
    ///
    /// height: The height of the window in pixels
    pub fn fit_canvas(canvas_size: f64, width: u32, height: u32) -> Self {
        let width = width.max(1) as f64;
        let height = height.max(1) as f64;
        let shortest = width.min(height);
        let unit = 2.0 / canvas_size;

        Self::scale(&Point::new(unit * shortest / width, unit * shortest / height))
    }

    /// Retrieves the data for the center transform
    pub fn get_data_center_transform(&self) -> [f32; 4] {
        self.center_transform.get_data()
    }
}

impl Mul<Transform2D> for Transform2D {
    type Output = Transform2D;

    fn mul(self, rhs: Transform2D) -> Self::Output {
        Self { center_transform: self.center_transform * rhs.center_transform }
    }
}

impl Mul<Point> for Transform2D {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        self.center_transform * rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_point_lies_on_circle() {
        let point = Point::polar(3.0, 1.1);
        assert!((point.distance(&Point::new(0.0, 0.0)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn fit_canvas_maps_square_window_corners_to_clip_corners() {
        let transform = Transform2D::fit_canvas(500.0, 500, 500);
        let corner = transform * Point::new(250.0, -250.0);
        assert!((corner.get_x() - 1.0).abs() < 1e-12);
        assert!((corner.get_y() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn fit_canvas_letterboxes_wide_window() {
        let transform = Transform2D::fit_canvas(500.0, 1000, 500);
        let corner = transform * Point::new(250.0, 250.0);
        assert!((corner.get_x() - 0.5).abs() < 1e-12);
        assert!((corner.get_y() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn transforms_compose_by_multiplication() {
        let double = Transform2D::scale(&Point::new(2.0, 2.0));
        let half = Transform2D::scale(&Point::new(0.5, 0.5));
        assert_eq!(double * half, Transform2D::identity());
    }

    #[test]
    fn matrix_data_is_column_major() {
        let matrix = Matrix::new(&[[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(matrix.get_data(), [1.0, 3.0, 2.0, 4.0]);
    }
}
