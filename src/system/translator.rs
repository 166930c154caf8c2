//! Moves objects along their velocity.

use super::{skip_missing, Frame, System};
use crate::attribute::builtin::{Translation, Velocity, TRANSLATION, VELOCITY};
use crate::error::Result;
use crate::Mask;

/// Applies [`Velocity`] to [`Translation`] every frame.
#[derive(Debug, Default)]
pub struct Translator;

impl System for Translator {
    fn debug_name(&self) -> String { "translator".into() }

    fn signature(&self) -> Mask { crate::mask![TRANSLATION, VELOCITY] }

    fn update(&mut self, frame: &Frame<'_>) -> Result<()> {
        let ctx = frame.ctx();
        for &id in frame.objects() {
            let velocity = ctx.attribute::<Velocity>(id, VELOCITY).map(|velocity| velocity.0);
            let Some(velocity) = skip_missing(velocity)? else { continue };

            let translation = ctx.attribute::<Translation>(id, TRANSLATION);
            if let Some(mut translation) = skip_missing(translation)? {
                translation.position += velocity * frame.dt();
            }
        }
        Ok(())
    }
}
