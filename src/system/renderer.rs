//! Hands visible objects to a rendering backend.

use super::{skip_missing, Frame, System};
use crate::attribute::builtin::{Renderable, Translation, RENDERABLE, TRANSLATION};
use crate::error::Result;
use crate::render::{Backend, DrawCommand};
use crate::Mask;

/// Draws every visible [`Renderable`] object,
/// ordered by stacking position and then by object id.
pub struct Renderer {
    backend: Box<dyn Backend>,
}

impl Renderer {
    /// Creates a renderer system drawing to `backend`.
    pub fn new(backend: impl Backend) -> Self { Self { backend: Box::new(backend) } }
}

impl System for Renderer {
    fn debug_name(&self) -> String { "renderer".into() }

    fn signature(&self) -> Mask { crate::mask![TRANSLATION, RENDERABLE] }

    fn update(&mut self, frame: &Frame<'_>) -> Result<()> {
        let ctx = frame.ctx();

        let mut commands = Vec::with_capacity(frame.objects().len());
        for &id in frame.objects() {
            let renderable = ctx.attribute::<Renderable>(id, RENDERABLE).map(|r| r.clone());
            let Some(renderable) = skip_missing(renderable)? else { continue };
            if !renderable.visible {
                continue;
            }

            let position = ctx.attribute::<Translation>(id, TRANSLATION).map(|t| t.position);
            let Some(position) = skip_missing(position)? else { continue };

            commands.push(DrawCommand {
                object: id,
                position,
                size: renderable.size,
                stack_pos: renderable.stack_pos,
                color: renderable.color,
            });
        }
        commands.sort_by_key(|command| (command.stack_pos, command.object));

        self.backend.begin();
        for command in &commands {
            self.backend.draw(command);
        }
        self.backend.finish();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::attribute::builtin::{Renderable, RENDERABLE, TRANSLATION};
    use crate::system::RENDERER;
    use crate::test_util::RecordingBackend;
    use crate::tracer;

    #[test]
    fn test_draw_order() {
        let backend = RecordingBackend::default();
        let ctx = crate::context_test!(RENDERER => Renderer::new(backend.clone()));

        let ids: Vec<_> = (0..4)
            .map(|_| ctx.create_object_with(crate::mask![TRANSLATION, RENDERABLE]).expect("registered"))
            .collect();
        for (&id, stack_pos) in ids.iter().zip([2, 0, 2, -1]) {
            ctx.attribute::<Renderable>(id, RENDERABLE).expect("attached").stack_pos = stack_pos;
        }
        ctx.attribute::<Renderable>(ids[1], RENDERABLE).expect("attached").visible = false;

        ctx.update(0.016, &tracer::Noop).expect("frame succeeds");

        let drawn: Vec<_> = backend.frames().concat().iter().map(|command| command.object).collect();
        assert_eq!(drawn, vec![ids[3], ids[0], ids[2]]);
        assert_eq!(backend.frames().len(), 1);
    }
}
