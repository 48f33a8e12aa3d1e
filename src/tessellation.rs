use std::fmt;
use thiserror::Error;
use log::{debug, info};
use super::{
    color::{self, ColorName},
    geometry::{GridSpec, HexagonGeometry, CellPosition},
    types::Point,
};

/// Decides how cells are colored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PlacementMode {
    /// Neighbouring cells switch between the two colors like a checkerboard
    Alternating,
    /// A diagonal gradient from the first color in the top left to the second in the bottom right
    Gradient,
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alternating => f.write_str("alternating"),
            Self::Gradient => f.write_str("gradient"),
        }
    }
}

/// Everything needed to compose a mosaic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MosaicConfig {
    /// The size of the grid
    pub grid: GridSpec,
    /// The first color
    pub first: ColorName,
    /// The second color
    pub second: ColorName,
    /// How the two colors are placed
    pub placement: PlacementMode,
}

impl MosaicConfig {
    /// Finds the fill color of a cell as a #rrggbb string
    ///
    /// # Parameters
    ///
    /// position: The cell to color
    pub fn cell_color(&self, position: &CellPosition) -> String {
        let n = self.grid.get_hexagons_per_row();
        match self.placement {
            PlacementMode::Alternating => {
                let name = if (position.row + position.col) % 2 == 0 {
                    self.first
                } else {
                    self.second
                };
                name.rgb().to_hex()
            }
            PlacementMode::Gradient => color::gradient_color(self.first.as_str(), self.second.as_str(), position.row, position.col, n, n),
        }
    }
}

/// A single filled hexagon to draw
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    /// The corners in counter clockwise order starting right of the center
    pub vertices: [Point; 6],
    /// The fill color as #rrggbb
    pub fill_color: String,
}

impl DrawCommand {
    /// Traces the hexagon onto a canvas: pen up to the first vertex, then a filled
    /// path through the remaining vertices and back to the first one
    ///
    /// # Parameters
    ///
    /// canvas: The canvas to draw on
    ///
    /// # Errors
    ///
    /// Forwards any error from the canvas
    pub fn trace<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), C::Error> {
        let [first, rest @ ..] = &self.vertices;

        canvas.move_to(first);
        canvas.begin_fill();
        for vertex in rest {
            canvas.line_to(vertex);
        }
        canvas.line_to(first);
        canvas.end_fill(&self.fill_color)
    }
}

/// A pen based drawing surface
pub trait Canvas {
    type Error;

    /// Moves the pen without drawing
    ///
    /// # Parameters
    ///
    /// point: The point to move to
    fn move_to(&mut self, point: &Point);

    /// Draws a line from the current pen position
    ///
    /// # Parameters
    ///
    /// point: The end of the line
    fn line_to(&mut self, point: &Point);

    /// Starts recording a filled shape at the current pen position
    fn begin_fill(&mut self);

    /// Fills the shape traced since begin_fill
    ///
    /// # Parameters
    ///
    /// color: The fill color as #rrggbb
    fn end_fill(&mut self, color: &str) -> Result<(), Self::Error>;
}

/// The phases of a composer, a composer only ever moves forward
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Configured,
    Drawing,
    Done,
}

#[derive(Clone, Debug)]
enum State {
    Idle,
    Configured(MosaicConfig),
    Drawing {
        config: MosaicConfig,
        geometry: HexagonGeometry,
        next: usize,
    },
    Done,
}

/// Walks the grid and produces one draw command per cell.
///
/// Cells are visited column by column, top to bottom within each column.
#[derive(Clone, Debug)]
pub struct Composer {
    state: State,
}

impl Composer {
    /// Creates an idle composer
    pub fn new() -> Self {
        Self {
            state: State::Idle,
        }
    }

    /// Creates a composer that is already configured
    ///
    /// # Parameters
    ///
    /// config: The mosaic to compose
    pub fn with_config(config: MosaicConfig) -> Self {
        Self {
            state: State::Configured(config),
        }
    }

    /// Fixes the configuration
    ///
    /// # Parameters
    ///
    /// config: The mosaic to compose
    ///
    /// # Errors
    ///
    /// Returns ComposerError::AlreadyConfigured unless the composer is idle
    pub fn configure(&mut self, config: MosaicConfig) -> Result<(), ComposerError> {
        match self.state {
            State::Idle => {
                debug!("Composer configured with {:?}", config);
                self.state = State::Configured(config);
                Ok(())
            }
            _ => Err(ComposerError::AlreadyConfigured(self.phase())),
        }
    }

    /// Retrieves the current phase
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Configured(_) => Phase::Configured,
            State::Drawing { .. } => Phase::Drawing,
            State::Done => Phase::Done,
        }
    }

    /// Produces the next draw command, returns None once all cells have been emitted
    /// or if the composer has not been configured
    pub fn next_command(&mut self) -> Option<DrawCommand> {
        if let State::Configured(config) = self.state {
            debug!("Composer started drawing {} cells", config.grid.get_cell_count());
            self.state = State::Drawing {
                config,
                geometry: config.grid.geometry(),
                next: 0,
            };
        }

        let State::Drawing { config, geometry, next } = &mut self.state else {
            return None;
        };

        if *next >= config.grid.get_cell_count() {
            debug!("Composer done");
            self.state = State::Done;
            return None;
        }

        let n = config.grid.get_hexagons_per_row();
        let position = config.grid.position(*next);
        let center = geometry.cell_center(&position, n);
        let command = DrawCommand {
            vertices: geometry.vertices(&center),
            fill_color: config.cell_color(&position),
        };
        *next += 1;

        Some(command)
    }

    /// Draws every remaining cell onto the canvas
    ///
    /// Returns the number of hexagons drawn
    ///
    /// # Parameters
    ///
    /// canvas: The canvas to draw on
    ///
    /// # Errors
    ///
    /// Forwards the first error from the canvas, the remaining cells are not drawn
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<usize, C::Error> {
        let mut count = 0;
        while let Some(command) = self.next_command() {
            command.trace(canvas)?;
            count += 1;
        }

        info!("Drew {} hexagons", count);
        Ok(count)
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Composer {
    type Item = DrawCommand;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_command()
    }
}

/// Composes every draw command of a mosaic
///
/// # Parameters
///
/// config: The mosaic to compose
pub fn compose(config: MosaicConfig) -> Vec<DrawCommand> {
    Composer::with_config(config).collect()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposerError {
    #[error("The composer can only be configured while idle but it is {:?}", .0)]
    AlreadyConfigured(Phase),
}
