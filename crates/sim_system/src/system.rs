//! The [`System`] trait and its declared call forms.
//!
//! A system reacts to events in one or both of two forms:
//!
//! - plain, `on_event(event)`, for work that needs no entity access;
//! - contextual, `on_event_with_context(event, ctx)`, with a [`Context`].
//!
//! Which forms a system handles for which event is declared up front by
//! [`System::interest`]. The dispatcher reads those declarations once, when
//! the system is added, and calls every declared form on each delivery.

use crate::context::Context;
use crate::event::Event;

/// The call forms a system handles for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interest {
    /// Call [`System::on_event`].
    pub plain: bool,
    /// Call [`System::on_event_with_context`].
    pub contextual: bool,
}

impl Interest {
    /// Not interested in the event.
    pub const NONE: Interest = Interest {
        plain: false,
        contextual: false,
    };
    /// Plain form only.
    pub const PLAIN: Interest = Interest {
        plain: true,
        contextual: false,
    };
    /// Contextual form only.
    pub const CONTEXTUAL: Interest = Interest {
        plain: false,
        contextual: true,
    };
    /// Both forms; the system is called twice per delivery.
    pub const BOTH: Interest = Interest {
        plain: true,
        contextual: true,
    };

    /// Returns `true` if no form is declared.
    #[must_use]
    pub const fn is_none(self) -> bool {
        !self.plain && !self.contextual
    }
}

/// A behavior unit driven by simulation events.
///
/// # Examples
///
/// ```rust
/// use sim_system::{Context, Event, Interest, System};
///
/// #[derive(Default)]
/// struct CycleCounter {
///     seen: u64,
/// }
///
/// impl System for CycleCounter {
///     fn interest(&self, event: Event) -> Interest {
///         match event {
///             Event::Cycle => Interest::CONTEXTUAL,
///             _ => Interest::NONE,
///         }
///     }
///
///     fn on_event_with_context(
///         &mut self,
///         _event: Event,
///         ctx: &mut Context<'_>,
///     ) -> anyhow::Result<()> {
///         self.seen = ctx.cycle() + 1;
///         Ok(())
///     }
/// }
/// ```
pub trait System {
    /// Name used in logs and error reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The call forms this system handles for `event`.
    fn interest(&self, event: Event) -> Interest;

    /// Plain handler, called when [`Interest::plain`] is set for `event`.
    ///
    /// # Errors
    ///
    /// Any error aborts the simulation run.
    fn on_event(&mut self, event: Event) -> anyhow::Result<()> {
        let _ = event;
        Ok(())
    }

    /// Contextual handler, called when [`Interest::contextual`] is set for
    /// `event`.
    ///
    /// # Errors
    ///
    /// Any error aborts the simulation run.
    fn on_event_with_context(&mut self, event: Event, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let _ = (event, ctx);
        Ok(())
    }
}

impl<S: System + ?Sized> System for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn interest(&self, event: Event) -> Interest {
        (**self).interest(event)
    }

    fn on_event(&mut self, event: Event) -> anyhow::Result<()> {
        (**self).on_event(event)
    }

    fn on_event_with_context(&mut self, event: Event, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        (**self).on_event_with_context(event, ctx)
    }
}
