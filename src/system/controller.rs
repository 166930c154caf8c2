//! Steers controllable objects with the direction keys.

use super::{skip_missing, Frame, System};
use crate::attribute::builtin::{Controllable, Velocity, CONTROLLABLE, VELOCITY};
use crate::error::Result;
use crate::window::{InputEvent, Key};
use crate::Mask;

/// Applies key events to [`Controllable`] and sets [`Velocity`] from the held direction.
#[derive(Debug, Default)]
pub struct Controller;

impl System for Controller {
    fn debug_name(&self) -> String { "controller".into() }

    fn signature(&self) -> Mask { crate::mask![CONTROLLABLE, VELOCITY] }

    fn update(&mut self, frame: &Frame<'_>) -> Result<()> {
        let keys: Vec<(Key, bool)> = frame
            .input()
            .iter()
            .filter_map(|event| match *event {
                InputEvent::KeyPressed(key) => Some((key, true)),
                InputEvent::KeyReleased(key) => Some((key, false)),
                _ => None,
            })
            .collect();

        let ctx = frame.ctx();
        for &id in frame.objects() {
            let steer = ctx.attribute::<Controllable>(id, CONTROLLABLE).map(|mut controllable| {
                for &(key, pressed) in &keys {
                    controllable.held.apply(key, pressed);
                }
                controllable.direction() * controllable.speed
            });
            let Some(steer) = skip_missing(steer)? else { continue };

            if let Some(mut velocity) = skip_missing(ctx.attribute::<Velocity>(id, VELOCITY))? {
                velocity.0 = steer;
            }
        }
        Ok(())
    }
}
