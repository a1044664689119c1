//! Pointer input
//!
//! Mouse and touch events collapse into one `PointerEvent`. The `Editor`
//! turns pointer gestures into board edits for the active tool, and key
//! presses into `Command`s.

use glam::Vec2;

use crate::renderer::Renderer;
use crate::sim::{Edit, SimState};

/// Gravity change per key press (px/s²)
const GRAVITY_STEP: f32 = 0.1;
/// Drop interval change per key press (ms)
const DROPPER_TIMEOUT_STEP: f32 = 100.0;

/// A pointer position in client (page) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Touch { client_x: f32, client_y: f32 },
    Mouse { client_x: f32, client_y: f32 },
}

impl PointerEvent {
    pub fn position(&self) -> Vec2 {
        match *self {
            PointerEvent::Touch { client_x, client_y }
            | PointerEvent::Mouse { client_x, client_y } => Vec2::new(client_x, client_y),
        }
    }

    /// Position relative to the drawing surface
    pub fn canvas_position(&self, renderer: &dyn Renderer) -> Vec2 {
        let p = self.position();
        renderer.translate_pointer(p.x, p.y)
    }
}

/// What a pointer gesture does to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Drag to draw a line
    #[default]
    Line,
    /// Tap to place a dropper
    Dropper,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Line => "line",
            Tool::Dropper => "dropper",
        }
    }
}

/// Everything the keyboard can do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Undo,
    Clear,
    SelectTool(Tool),
    /// Change gravity by this many px/s²
    Gravity(f32),
    /// Change the drop interval by this many ms
    DropperTimeout(f32),
    NextRoot,
    NextScale,
    NextInstrument,
    /// Restore default gravity and drop interval
    ResetParams,
    /// Log the current share token
    Share,
}

impl Command {
    /// Key binding, by `KeyboardEvent.key` name
    pub fn from_key(key: &str) -> Option<Self> {
        let command = match key {
            "u" | "z" => Command::Undo,
            "c" => Command::Clear,
            "l" => Command::SelectTool(Tool::Line),
            "d" => Command::SelectTool(Tool::Dropper),
            "ArrowUp" => Command::Gravity(GRAVITY_STEP),
            "ArrowDown" => Command::Gravity(-GRAVITY_STEP),
            "ArrowRight" => Command::DropperTimeout(DROPPER_TIMEOUT_STEP),
            "ArrowLeft" => Command::DropperTimeout(-DROPPER_TIMEOUT_STEP),
            "n" => Command::NextRoot,
            "s" => Command::NextScale,
            "i" => Command::NextInstrument,
            "r" => Command::ResetParams,
            "p" => Command::Share,
            _ => return None,
        };
        Some(command)
    }
}

/// Pointer gesture handling. Positions are in canvas coordinates.
#[derive(Debug, Default)]
pub struct Editor {
    tool: Tool,
}

impl Editor {
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, discarding any line still being drafted
    pub fn set_tool(&mut self, state: &mut SimState, tool: Tool) {
        state.current_line = None;
        self.tool = tool;
        log::debug!("Tool: {}", tool.as_str());
    }

    pub fn pointer_down(&mut self, state: &mut SimState, pos: Vec2) {
        match self.tool {
            Tool::Line => state.current_line = Some((pos, pos)),
            Tool::Dropper => state.submit(Edit::AddDropper(pos)),
        }
    }

    pub fn pointer_move(&mut self, state: &mut SimState, pos: Vec2) {
        if let Some((_, to)) = state.current_line.as_mut() {
            *to = pos;
        }
    }

    /// Run a keyboard command. Board edits go through the edit queue;
    /// parameter and voice changes take effect on the next tick.
    pub fn command(&mut self, state: &mut SimState, command: Command) {
        match command {
            Command::Undo => state.request_undo(),
            Command::Clear => state.submit(Edit::Clear),
            Command::SelectTool(tool) => self.set_tool(state, tool),
            Command::Gravity(delta) => state.params = state.params.adjusted(delta, 0.0),
            Command::DropperTimeout(delta) => state.params = state.params.adjusted(0.0, delta),
            Command::NextRoot => state.voice.root = state.voice.root.transpose(1),
            Command::NextScale => state.voice.scale = state.voice.scale.next(),
            Command::NextInstrument => state.voice.instrument = state.voice.instrument.next(),
            Command::ResetParams => state.params.reset(),
            Command::Share => match state.share_token() {
                Ok(token) => log::info!("Share token: {}", token),
                Err(e) => log::warn!("Failed to encode board: {}", e),
            },
        }
        log::debug!(
            "{:?}: gravity {:.2}, delay {:.0}ms, {} {} {}",
            command,
            state.params.gravity,
            state.params.dropper_timeout,
            state.voice.instrument.as_str(),
            state.voice.root.as_str(),
            state.voice.scale.as_str()
        );
    }

    /// Finish the drafted line. It is committed through the edit queue,
    /// where its end point gets clamped to the canvas.
    pub fn pointer_up(&mut self, state: &mut SimState, pos: Vec2) {
        if let Some((from, _)) = state.current_line.take() {
            state.submit(Edit::AddLine { from, to: pos });
        }
    }
}
