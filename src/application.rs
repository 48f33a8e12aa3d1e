use winit::{
    window::{Window, WindowBuilder},
    event_loop::{EventLoop, ControlFlow},
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, WindowEvent, KeyboardInput, ElementState, VirtualKeyCode},
    error::OsError,
};
use thiserror::Error;
use log::{error, info, warn};
use super::{
    CANVAS_SIZE,
    color::ParseColorError,
    locale,
    tessellation::{Composer, MosaicConfig},
    render::{RenderState, NewRenderStateError},
    gpu_canvas::{GpuCanvas, RenderError},
};

/// Opens a window, draws the mosaic and waits until the window is clicked or closed
///
/// # Parameters
///
/// config: The mosaic to draw
///
/// # Errors
///
/// Only returns if the window could not be set up, see NewStateError for the possible errors
pub async fn run(config: MosaicConfig) -> Result<(), NewStateError> {
    // Create the event loop
    let event_loop = EventLoop::new();

    // Create the window
    let size = LogicalSize::new(CANVAS_SIZE, CANVAS_SIZE);
    let window = WindowBuilder::new()
        .with_title(locale::WINDOW_TITLE)
        .with_inner_size(size)
        .build(&event_loop)?;

    // Create the state
    let mut state = State::new(window, config).await?;
    println!();
    println!("{}", locale::MOSAIC_READY);

    // Run the event loop
    event_loop.run(move |event, _, control_flow| state.handle_event(&event, control_flow))
}

/// Holds the state of the application
struct State {
    /// The main window
    window: Window,
    /// The render state
    render_state: RenderState,
    /// The inner size of the window
    size: PhysicalSize<u32>,
    /// The canvas holding the mosaic
    canvas: GpuCanvas,
}

impl State {
    /// Create a new state and draws the mosaic onto its canvas
    ///
    /// # Parameters
    ///
    /// window: The window to use for the application
    ///
    /// config: The mosaic to draw
    ///
    /// # Errors
    ///
    /// See NewStateError for the possible errors
    async fn new(window: Window, config: MosaicConfig) -> Result<Self, NewStateError> {
        // Get the size of the window
        let size = window.inner_size();

        if size.width == 0 || size.height == 0 {
            return Err(NewStateError::InvalidSize(size));
        }

        // Initialize the render state
        let render_state = RenderState::new(&window).await?;

        // Draw everything before the first frame so it is shown at once
        info!("Drawing {} x {} {} mosaic in {} and {}", config.grid.get_hexagons_per_row(), config.grid.get_hexagons_per_row(), config.placement, config.first, config.second);
        let mut canvas = GpuCanvas::new(&render_state);
        Composer::with_config(config).draw(&mut canvas)?;
        canvas.flush(&render_state);

        Ok(Self {
            window,
            render_state,
            size,
            canvas,
        })
    }

    /// Render the screen
    ///
    /// # Errors
    ///
    /// See gpu_canvas::RenderError for the possible errors
    fn render(&self) -> Result<(), RenderError> {
        self.canvas.render(&self.render_state)
    }

    /// Handles all events from winit
    ///
    /// # Parameters
    ///
    /// event: The event to handle
    ///
    /// control_flow: The location to set the control flow
    fn handle_event(&mut self, event: &Event<'_, ()>, control_flow: &mut ControlFlow) {
        control_flow.set_wait();

        match event {
            // Run the window event handler
            Event::WindowEvent { window_id, event } => if *window_id == self.window.id() {
                self.handle_window_event(event, control_flow);
            }

            // Render the screen
            Event::RedrawRequested(window_id) => if *window_id == self.window.id() {
                match self.render() {
                    Ok(_) => {}

                    // Reconfigure the surface if lost
                    Err(RenderError::SurfaceTexture(wgpu::SurfaceError::Lost)) => {
                        self.resize(self.size);
                        self.window.request_redraw();
                    }

                    // The system is out of memory, we should probably quit
                    Err(RenderError::SurfaceTexture(wgpu::SurfaceError::OutOfMemory)) => {
                        error!("System is out of memory");
                        control_flow.set_exit();
                    }

                    // All other errors (Outdated, Timeout) should be resolved by the next frame
                    Err(e) => {
                        warn!("Error while rendering: {:?}", e);
                        self.window.request_redraw();
                    }
                }
            }

            _ => ()
        }
    }

    /// Handle a window event
    ///
    /// # Parameters
    ///
    /// event: The event to handle
    ///
    /// control_flow: The location to set the control flow
    fn handle_window_event(&mut self, event: &WindowEvent<'_>, control_flow: &mut ControlFlow) {
        match event {
            // Close the window
            WindowEvent::CloseRequested => control_flow.set_exit(),

            // A click dismisses the mosaic
            WindowEvent::MouseInput { state: ElementState::Pressed, .. } => {
                info!("Window clicked, exiting");
                control_flow.set_exit();
            }

            // The size of the window has changed
            WindowEvent::Resized(physical_size) => {
                self.resize(*physical_size);
            }

            // The window has been dragged into an area with a different scale factor
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                self.resize(**new_inner_size);
            }

            WindowEvent::KeyboardInput { input, .. } => {
                self.handle_keyboard_input(input, control_flow);
            }

            _ => (),
        }
    }

    /// Handle a keyboard input, escape exits
    ///
    /// # Parameters
    ///
    /// input: The input to handle
    ///
    /// control_flow: The location to set the control flow
    fn handle_keyboard_input(&mut self, input: &KeyboardInput, control_flow: &mut ControlFlow) {
        if input.state == ElementState::Pressed && input.virtual_keycode == Some(VirtualKeyCode::Escape) {
            control_flow.set_exit();
        }
    }

    /// Reconfigure if the window has been resized
    ///
    /// # Parameters
    ///
    /// new_size: The new size to set
    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        // Reconfigure the surface
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.render_state.resize(new_size);
            self.window.request_redraw();
        }
    }
}

/// The error types for when creating a new state
#[derive(Error, Debug)]
pub enum NewStateError {
    /// The window could not be opened
    #[error("Unable to open window: {}", .0)]
    Window(OsError),
    /// The width or height of the window is too small
    #[error("The width and height of the window must be larger than 0 but received {:?}", .0)]
    InvalidSize(PhysicalSize<u32>),
    /// The render state could not be created
    #[error("Unable to initialize the render state: {}", .0)]
    RenderInitError(NewRenderStateError),
    /// The mosaic could not be drawn
    #[error("Unable to draw the mosaic: {}", .0)]
    Draw(ParseColorError),
}

impl From<OsError> for NewStateError {
    fn from(value: OsError) -> Self {
        Self::Window(value)
    }
}

impl From<NewRenderStateError> for NewStateError {
    fn from(value: NewRenderStateError) -> Self {
        Self::RenderInitError(value)
    }
}

impl From<ParseColorError> for NewStateError {
    fn from(value: ParseColorError) -> Self {
        Self::Draw(value)
    }
}
