use std::f64::consts::PI;
use thiserror::Error;
use super::{
    CANVAS_SIZE, MAX_HEXAGONS, MIN_HEXAGONS, SQRT_3,
    types::Point,
};

/// Calculates the side length of the hexagons such that a row of them fits the canvas
///
/// # Parameters
///
/// hexagons_per_row: The number of hexagons in one row
pub fn side_length(hexagons_per_row: usize) -> f64 {
    CANVAS_SIZE / (hexagons_per_row as f64 * 1.5 + 0.5)
}

/// Calculates the flat to flat height of a regular hexagon
///
/// # Parameters
///
/// side_length: The length of one side of the hexagon
pub fn hexagon_height(side_length: f64) -> f64 {
    side_length * SQRT_3
}

/// Calculates the 6 vertices of a regular hexagon.
///
/// Vertex i lies at the angle 60 * i degrees from the positive x-axis, so the
/// vertices are ordered counter clockwise starting to the right of the center.
///
/// # Parameters
///
/// center: The center of the hexagon
///
/// side_length: The length of one side of the hexagon
pub fn hexagon_vertices(center: &Point, side_length: f64) -> [Point; 6] {
    std::array::from_fn(|i| {
        let angle = (60.0 * i as f64) * PI / 180.0;
        center + &Point::polar(side_length, angle)
    })
}

/// Calculates the center of a cell in a grid of grid_size x grid_size hexagons.
/// The grid is centered on origo, columns advance to the right and rows advance down,
/// odd columns are shifted down by half a hexagon to interlock with their neighbours.
///
/// # Parameters
///
/// position: The cell to find the center of
///
/// grid_size: The number of hexagons in each row and column
pub fn cell_center(position: &CellPosition, grid_size: usize) -> Point {
    HexagonGeometry::new(grid_size).cell_center(position, grid_size)
}

/// The requested size of the grid, validated to lie within the allowed bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    /// The number of hexagons in one row, this is also the number of rows
    hexagons_per_row: usize,
}

impl GridSpec {
    /// Creates a new grid spec
    ///
    /// # Parameters
    ///
    /// hexagons_per_row: The number of hexagons in one row
    ///
    /// # Errors
    ///
    /// Returns GridSpecError::OutOfRange if hexagons_per_row is outside of MIN_HEXAGONS..=MAX_HEXAGONS
    pub fn new(hexagons_per_row: usize) -> Result<Self, GridSpecError> {
        if !(MIN_HEXAGONS..=MAX_HEXAGONS).contains(&hexagons_per_row) {
            return Err(GridSpecError::OutOfRange(hexagons_per_row));
        }

        Ok(Self {
            hexagons_per_row,
        })
    }

    /// Retrieves the number of hexagons in one row
    pub fn get_hexagons_per_row(&self) -> usize {
        self.hexagons_per_row
    }

    /// Retrieves the total number of cells in the grid
    pub fn get_cell_count(&self) -> usize {
        self.hexagons_per_row * self.hexagons_per_row
    }

    /// Derives the geometry of the hexagons for this grid
    pub fn geometry(&self) -> HexagonGeometry {
        HexagonGeometry::new(self.hexagons_per_row)
    }

    /// Retrieves the position of the cell with the given index, cells are ordered column by column
    ///
    /// # Parameters
    ///
    /// index: The index of the cell, must be less than get_cell_count()
    pub fn position(&self, index: usize) -> CellPosition {
        CellPosition::new(index % self.hexagons_per_row, index / self.hexagons_per_row)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridSpecError {
    #[error("The number of hexagons per row must be between {} and {} but received {}", MIN_HEXAGONS, MAX_HEXAGONS, .0)]
    OutOfRange(usize),
}

/// The size of every hexagon in a grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexagonGeometry {
    /// The length of one side
    side_length: f64,
    /// The flat to flat height
    height: f64,
}

impl HexagonGeometry {
    /// Derives the geometry for a grid with the given number of hexagons per row
    ///
    /// # Parameters
    ///
    /// hexagons_per_row: The number of hexagons in one row
    pub fn new(hexagons_per_row: usize) -> Self {
        let side_length = side_length(hexagons_per_row);

        Self {
            side_length,
            height: hexagon_height(side_length),
        }
    }

    /// Retrieves the side length
    pub fn get_side_length(&self) -> f64 {
        self.side_length
    }

    /// Retrieves the height
    pub fn get_height(&self) -> f64 {
        self.height
    }

    /// Calculates the center of a cell, see geometry::cell_center
    ///
    /// # Parameters
    ///
    /// position: The cell to find the center of
    ///
    /// grid_size: The number of hexagons in each row and column
    pub fn cell_center(&self, position: &CellPosition, grid_size: usize) -> Point {
        let dx = 1.5 * self.side_length;
        let dy = self.height;
        let steps = grid_size.saturating_sub(1) as f64;

        let total_width = dx * steps + 2.0 * self.side_length;
        let total_height = dy * steps + self.height;

        let start_x = -total_width / 2.0 + self.side_length;
        let start_y = total_height / 2.0 - self.height / 2.0;

        let x = start_x + position.col as f64 * dx;
        let mut y = start_y - position.row as f64 * dy;
        if position.col % 2 == 1 {
            y -= self.height / 2.0;
        }

        Point::new(x, y)
    }

    /// Calculates the vertices of a hexagon with this geometry
    ///
    /// # Parameters
    ///
    /// center: The center of the hexagon
    pub fn vertices(&self, center: &Point) -> [Point; 6] {
        hexagon_vertices(center, self.side_length)
    }
}

/// The location of a cell in the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellPosition {
    /// The row, 0 is the top row
    pub row: usize,
    /// The column, 0 is the leftmost column
    pub col: usize,
}

impl CellPosition {
    /// Creates a new cell position
    ///
    /// # Parameters
    ///
    /// row: The row index
    ///
    /// col: The column index
    pub const fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn close(a: &Point, b: &Point) -> bool {
        a.distance(b) < EPSILON
    }

    #[test]
    fn side_length_is_positive_and_decreasing() {
        let mut previous = f64::INFINITY;
        for n in MIN_HEXAGONS..=MAX_HEXAGONS {
            let side = side_length(n);
            assert!(side > 0.0, "side length for {n} is {side}");
            assert!(side < previous, "side length did not decrease at {n}");
            previous = side;
        }
    }

    #[test]
    fn side_length_matches_formula() {
        assert!((side_length(4) - 500.0 / 6.5).abs() < EPSILON);
        assert!((side_length(20) - 500.0 / 30.5).abs() < EPSILON);
    }

    #[test]
    fn height_is_side_times_sqrt_3() {
        assert!((hexagon_height(2.0) - 2.0 * 3f64.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn vertices_lie_on_circle_at_60_degree_steps() {
        let center = Point::new(12.5, -40.0);
        let vertices = hexagon_vertices(&center, 10.0);

        assert_eq!(vertices.len(), 6);
        for (i, vertex) in vertices.iter().enumerate() {
            assert!((vertex.distance(&center) - 10.0).abs() < EPSILON);
            let angle = (vertex.get_y() - center.get_y()).atan2(vertex.get_x() - center.get_x());
            let expected = (60.0 * i as f64).to_radians();
            let diff = (angle - expected).rem_euclid(2.0 * PI);
            assert!(diff < EPSILON || 2.0 * PI - diff < EPSILON, "vertex {i} at angle {angle}");
        }
        assert!(close(&vertices[0], &Point::new(22.5, -40.0)));
    }

    #[test]
    fn grid_spec_rejects_out_of_range() {
        assert_eq!(GridSpec::new(3), Err(GridSpecError::OutOfRange(3)));
        assert_eq!(GridSpec::new(21), Err(GridSpecError::OutOfRange(21)));
        assert!(GridSpec::new(4).is_ok());
        assert!(GridSpec::new(20).is_ok());
    }

    #[test]
    fn positions_are_ordered_column_by_column() {
        let grid = GridSpec::new(4).unwrap();
        assert_eq!(grid.get_cell_count(), 16);
        assert_eq!(grid.position(0), CellPosition::new(0, 0));
        assert_eq!(grid.position(1), CellPosition::new(1, 0));
        assert_eq!(grid.position(4), CellPosition::new(0, 1));
        assert_eq!(grid.position(15), CellPosition::new(3, 3));
    }

    #[test]
    fn neighbouring_cells_are_spaced_for_tiling() {
        for n in MIN_HEXAGONS..=MAX_HEXAGONS {
            let geometry = HexagonGeometry::new(n);
            let side = geometry.get_side_length();
            let height = geometry.get_height();

            for row in 0..n {
                for col in 0..n - 1 {
                    let left = geometry.cell_center(&CellPosition::new(row, col), n);
                    let right = geometry.cell_center(&CellPosition::new(row, col + 1), n);
                    assert!((right.get_x() - left.get_x() - 1.5 * side).abs() < EPSILON);
                    assert!(((left.get_y() - right.get_y()).abs() - height / 2.0).abs() < EPSILON);
                }
            }

            for row in 0..n - 1 {
                let upper = geometry.cell_center(&CellPosition::new(row, 0), n);
                let lower = geometry.cell_center(&CellPosition::new(row + 1, 0), n);
                assert!((upper.get_y() - lower.get_y() - height).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn odd_columns_are_shifted_down() {
        let geometry = HexagonGeometry::new(6);
        let even = geometry.cell_center(&CellPosition::new(2, 2), 6);
        let odd = geometry.cell_center(&CellPosition::new(2, 3), 6);
        assert!((even.get_y() - odd.get_y() - geometry.get_height() / 2.0).abs() < EPSILON);
    }

    #[test]
    fn neighbours_share_an_edge() {
        let n = 5;
        let geometry = HexagonGeometry::new(n);
        let even = geometry.vertices(&geometry.cell_center(&CellPosition::new(1, 0), n));
        let odd = geometry.vertices(&geometry.cell_center(&CellPosition::new(1, 1), n));

        // The lower right edge of an even cell is the upper left edge of the odd cell next to it
        assert!(close(&even[0], &odd[2]));
        assert!(close(&even[5], &odd[3]));
    }

    #[test]
    fn grid_is_centered_horizontally_on_origo() {
        let n = 7;
        let left = cell_center(&CellPosition::new(0, 0), n);
        let right = cell_center(&CellPosition::new(0, n - 1), n);
        assert!((left.get_x() + right.get_x()).abs() < EPSILON);
    }

    #[test]
    fn top_left_cell_starts_below_top_edge() {
        let n = 4;
        let geometry = HexagonGeometry::new(n);
        let top_left = geometry.cell_center(&CellPosition::new(0, 0), n);
        let total_height = geometry.get_height() * n as f64;
        assert!((top_left.get_y() - (total_height / 2.0 - geometry.get_height() / 2.0)).abs() < EPSILON);
    }
}
