//! Detects overlapping collision boxes.

use itertools::Itertools;

use super::{skip_missing, Frame, System};
use crate::attribute::builtin::{Collidable, Translation, Vec2, COLLIDABLE, TRANSLATION};
use crate::error::Result;
use crate::event::{ObjectEvent, COLLISION};
use crate::object::ObjectId;
use crate::Mask;

/// Dispatches a [`COLLISION`] event for every pair of overlapping solid [`Collidable`] boxes.
///
/// The event is dispatched once per pair,
/// with `object` being the one with the lower id.
#[derive(Debug, Default)]
pub struct Collider;

#[derive(Debug, Clone, Copy)]
struct Aabb {
    id:           ObjectId,
    center:       Vec2,
    half_extents: Vec2,
}

impl Aabb {
    fn overlaps(&self, other: &Self) -> bool {
        let distance = self.center - other.center;
        let reach = self.half_extents + other.half_extents;
        distance.x.abs() < reach.x && distance.y.abs() < reach.y
    }
}

impl System for Collider {
    fn debug_name(&self) -> String { "collider".into() }

    fn signature(&self) -> Mask { crate::mask![TRANSLATION, COLLIDABLE] }

    fn update(&mut self, frame: &Frame<'_>) -> Result<()> {
        let ctx = frame.ctx();

        let mut boxes = Vec::with_capacity(frame.objects().len());
        for &id in frame.objects() {
            let collidable = ctx.attribute::<Collidable>(id, COLLIDABLE).map(|c| *c);
            let Some(collidable) = skip_missing(collidable)? else { continue };
            if !collidable.solid {
                continue;
            }

            let center = ctx.attribute::<Translation>(id, TRANSLATION).map(|t| t.position);
            let Some(center) = skip_missing(center)? else { continue };
            boxes.push(Aabb { id, center, half_extents: collidable.half_extents });
        }

        let collisions: Vec<_> =
            boxes.iter().tuple_combinations().filter(|(a, b)| a.overlaps(b)).collect();
        log::trace!("{} collisions among {} boxes", collisions.len(), boxes.len());

        for (a, b) in collisions {
            ctx.dispatch(ObjectEvent { kind: COLLISION, object: a.id, other: Some(b.id) });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Collider;
    use crate::attribute::builtin::{Collidable, Translation, Vec2, COLLIDABLE, TRANSLATION};
    use crate::event::{ObjectEvent, COLLISION};
    use crate::object::ObjectId;
    use crate::system::COLLIDER;
    use crate::test_util::RecordingListener;
    use crate::{tracer, Context};

    fn spawn(ctx: &Context, x: f32, solid: bool) -> ObjectId {
        let id = ctx.create_object_with(crate::mask![TRANSLATION, COLLIDABLE]).expect("registered");
        ctx.attribute::<Translation>(id, TRANSLATION).expect("attached").position = Vec2::new(x, 0.0);
        *ctx.attribute::<Collidable>(id, COLLIDABLE).expect("attached") =
            Collidable { half_extents: Vec2::new(1.0, 1.0), solid };
        id
    }

    #[test]
    fn test_overlapping_pairs() {
        let ctx = crate::context_test!(COLLIDER => Collider);
        let listener = Arc::new(RecordingListener::default());
        ctx.add_listener(COLLISION, listener.clone());

        let a = spawn(&ctx, 0.0, true);
        let b = spawn(&ctx, 1.5, true);
        let _far = spawn(&ctx, 10.0, true);
        let _ghost = spawn(&ctx, 0.5, false);
        let _touching = spawn(&ctx, -2.0, true);

        ctx.update(0.0, &tracer::Noop).expect("frame succeeds");

        assert_eq!(listener.events(), vec![ObjectEvent {
            kind:   COLLISION,
            object: a,
            other:  Some(b),
        }]);
    }
}
