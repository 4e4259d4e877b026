//! Target resolution, run before every cycle.
//!
//! Resolvers only write [`Target`]; [`Movement`](crate::Movement) moves
//! towards it. When several resolvers apply to one entity the last one
//! declared wins, so avoidance is usually declared after following.

use std::marker::PhantomData;

use components::{AvoidClosest, FollowClosest, StaticEntityAvoid, StaticEntityTarget, Target};
use sim_component::{Component, EntityId};
use sim_math::{IVec2, Transform};
use sim_system::{Context, Event, Interest, System};
use tracing::trace;

/// Positions of every entity that has a `T` and a [`Transform`].
fn positions_of<T: Component>(ctx: &Context<'_>) -> anyhow::Result<Vec<(EntityId, Transform)>> {
    let mut out = Vec::new();
    ctx.view::<(T, Transform)>()?
        .for_each(|entity, _, t| out.push((entity.id(), *t)))?;
    Ok(out)
}

/// The candidate closest to `from`, ignoring `self_id`.
fn closest(
    candidates: &[(EntityId, Transform)],
    self_id: EntityId,
    from: &Transform,
) -> Option<(Transform, i64)> {
    candidates
        .iter()
        .filter(|(id, _)| *id != self_id)
        .map(|(_, t)| (*t, from.dist_squared(t)))
        .min_by_key(|(_, d)| *d)
}

/// The point reached by stepping from `from` directly away from `threat`.
fn flee_point(from: IVec2, threat: IVec2) -> IVec2 {
    from + (from - threat)
}

/// Points entities marked [`FollowClosest<T>`] at the nearest `T`.
pub struct FollowClosestResolver<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> Default for FollowClosestResolver<T> {
    fn default() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T: Component> System for FollowClosestResolver<T> {
    fn interest(&self, event: Event) -> Interest {
        match event {
            Event::PreCycle => Interest::CONTEXTUAL,
            _ => Interest::NONE,
        }
    }

    fn on_event_with_context(
        &mut self,
        _event: Event,
        ctx: &mut Context<'_>,
    ) -> anyhow::Result<()> {
        let candidates = positions_of::<T>(ctx)?;
        if candidates.is_empty() {
            return Ok(());
        }
        ctx.view_mut::<(Transform, Target, FollowClosest<T>)>()?
            .for_each(|entity, t, target, _| {
                if let Some((nearest, _)) = closest(&candidates, entity.id(), t) {
                    target.position = nearest.position;
                }
            })?;
        Ok(())
    }
}

/// Points entities marked [`AvoidClosest<T>`] away from the nearest `T`
/// while it is within the marker's radius.
pub struct AvoidClosestResolver<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> Default for AvoidClosestResolver<T> {
    fn default() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T: Component> System for AvoidClosestResolver<T> {
    fn interest(&self, event: Event) -> Interest {
        match event {
            Event::PreCycle => Interest::CONTEXTUAL,
            _ => Interest::NONE,
        }
    }

    fn on_event_with_context(
        &mut self,
        _event: Event,
        ctx: &mut Context<'_>,
    ) -> anyhow::Result<()> {
        let threats = positions_of::<T>(ctx)?;
        if threats.is_empty() {
            return Ok(());
        }
        ctx.view_mut::<(Transform, Target, AvoidClosest<T>)>()?
            .for_each(|entity, t, target, avoid| {
                let radius = i64::from(avoid.radius);
                if let Some((threat, d)) = closest(&threats, entity.id(), t) {
                    if d < radius * radius && threat.position != t.position {
                        target.position = flee_point(t.position, threat.position);
                        trace!(entity = %entity.id(), "fleeing");
                    }
                }
            })?;
        Ok(())
    }
}

/// Resolves [`StaticEntityTarget`] and [`StaticEntityAvoid`] against the
/// current position of the referenced entity. References to entities
/// without a transform are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTargetResolver;

impl System for StaticTargetResolver {
    fn name(&self) -> &str {
        "static_target_resolver"
    }

    fn interest(&self, event: Event) -> Interest {
        match event {
            Event::PreCycle => Interest::CONTEXTUAL,
            _ => Interest::NONE,
        }
    }

    fn on_event_with_context(
        &mut self,
        _event: Event,
        ctx: &mut Context<'_>,
    ) -> anyhow::Result<()> {
        let follow = ctx.view_mut::<(Target, StaticEntityTarget)>()?;
        let avoid = ctx.view_mut::<(Target, StaticEntityAvoid)>()?;
        let ctx = &*ctx;
        let position_of = |id: EntityId| {
            ctx.entity(id)
                .get::<Transform>()
                .ok()
                .map(|t| t.position)
        };

        follow.for_each(|_, target, marker| {
            if let Some(position) = position_of(marker.entity) {
                target.position = position;
            }
        })?;

        avoid.for_each(|entity, target, marker| {
            let here = position_of(entity.id());
            let threat = position_of(marker.entity);
            if let (Some(here), Some(threat)) = (here, threat) {
                if here != threat {
                    target.position = flee_point(here, threat);
                }
            }
        })?;
        Ok(())
    }
}
