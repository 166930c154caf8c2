//! The rendering collaborator.
//!
//! The [`Renderer`](crate::system::Renderer) system does not draw anything itself;
//! it sorts the visible objects and hands a [`DrawCommand`] for each of them
//! to a [`Backend`], which draws whatever it is given.

use crate::attribute::builtin::Vec2;
use crate::object::ObjectId;

/// A single quad to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// The object being drawn.
    pub object:    ObjectId,
    /// The center of the quad in world units.
    pub position:  Vec2,
    /// The extent of the quad.
    pub size:      Vec2,
    /// The stacking position the command was sorted by.
    pub stack_pos: i32,
    /// RGBA colour multiplier.
    pub color:     [f32; 4],
}

/// Draws the commands produced by the renderer system.
pub trait Backend: Send + 'static {
    /// Called once per frame before the first command.
    fn begin(&mut self) {}

    /// Draws one command.
    fn draw(&mut self, command: &DrawCommand);

    /// Called once per frame after the last command.
    fn finish(&mut self) {}
}
