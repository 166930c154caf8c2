//! The attribute types shipped with the engine.
//!
//! Identifiers `0..=6` are reserved for these types.
//! Games may rebind any of them to their own type.

use std::ops;

use super::{AttrTypeId, Attribute};
use crate::resource::ResourceId;
use crate::window::Key;

/// The id of [`Translation`].
pub const TRANSLATION: AttrTypeId = AttrTypeId::new(0);
/// The id of [`Velocity`].
pub const VELOCITY: AttrTypeId = AttrTypeId::new(1);
/// The id of [`Renderable`].
pub const RENDERABLE: AttrTypeId = AttrTypeId::new(2);
/// The id of [`Controllable`].
pub const CONTROLLABLE: AttrTypeId = AttrTypeId::new(3);
/// The id of [`Collidable`].
pub const COLLIDABLE: AttrTypeId = AttrTypeId::new(4);
/// The id of [`Text`].
pub const TEXT: AttrTypeId = AttrTypeId::new(5);
/// The id of [`Sprite`].
pub const SPRITE: AttrTypeId = AttrTypeId::new(6);

/// Registers every builtin attribute type under its reserved id.
pub fn register_all(registry: &mut super::Registry) {
    registry.register::<Translation>(TRANSLATION);
    registry.register::<Velocity>(VELOCITY);
    registry.register::<Renderable>(RENDERABLE);
    registry.register::<Controllable>(CONTROLLABLE);
    registry.register::<Collidable>(COLLIDABLE);
    registry.register::<Text>(TEXT);
    registry.register::<Sprite>(SPRITE);
}

/// A two-dimensional vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// The horizontal component.
    pub x: f32,
    /// The vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Constructs a vector.
    pub const fn new(x: f32, y: f32) -> Self { Self { x, y } }
}

impl ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self { Self::new(self.x + rhs.x, self.y + rhs.y) }
}

impl ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self { Self::new(self.x - rhs.x, self.y - rhs.y) }
}

impl ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self { Self::new(self.x * rhs, self.y * rhs) }
}

/// The position of an object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translation {
    /// The position in world units.
    pub position: Vec2,
}

impl Attribute for Translation {}

/// The rate of change of [`Translation`], in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

impl Attribute for Velocity {}

/// Marks an object as drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    /// The extent of the drawn quad.
    pub size:      Vec2,
    /// Objects with a higher stacking position are drawn later, i.e. on top.
    pub stack_pos: i32,
    /// RGBA colour multiplier.
    pub color:     [f32; 4],
    /// Invisible objects are skipped by the renderer system.
    pub visible:   bool,
}

impl Default for Renderable {
    fn default() -> Self {
        Self { size: Vec2::new(1.0, 1.0), stack_pos: 0, color: [1.0; 4], visible: true }
    }
}

impl Attribute for Renderable {}

/// Marks an object as driven by player input.
#[derive(Debug, Clone, PartialEq)]
pub struct Controllable {
    /// The speed applied along the held direction.
    pub speed: f32,
    /// The direction keys currently held.
    pub held:  Held,
}

impl Default for Controllable {
    fn default() -> Self { Self { speed: 1.0, held: Held::default() } }
}

impl Attribute for Controllable {}

impl Controllable {
    /// The unnormalized direction of the held keys.
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        Vec2::new(axis(self.held.left, self.held.right), axis(self.held.down, self.held.up))
    }
}

/// The set of direction keys held on a [`Controllable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Held {
    /// [`Key::Up`] is held.
    pub up:    bool,
    /// [`Key::Down`] is held.
    pub down:  bool,
    /// [`Key::Left`] is held.
    pub left:  bool,
    /// [`Key::Right`] is held.
    pub right: bool,
}

impl Held {
    /// Updates the held state of `key`.
    ///
    /// Returns false if `key` is not a direction key.
    pub fn apply(&mut self, key: Key, pressed: bool) -> bool {
        let slot = match key {
            Key::Up => &mut self.up,
            Key::Down => &mut self.down,
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }
}

/// An axis-aligned collision box centered on the [`Translation`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Collidable {
    /// Half of the box extent on each axis.
    pub half_extents: Vec2,
    /// Non-solid boxes are ignored by the collider system.
    pub solid:        bool,
}

impl Attribute for Collidable {}

/// A string drawn by a text renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// The content.
    pub text: String,
    /// The glyph height in world units.
    pub size: f32,
}

impl Default for Text {
    fn default() -> Self { Self { text: String::new(), size: 12.0 } }
}

impl Attribute for Text {}

/// A region of a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sprite {
    /// The texture resource, if assigned.
    pub texture: Option<ResourceId>,
    /// The size of the region in texels.
    pub region:  Vec2,
}

impl Attribute for Sprite {}
