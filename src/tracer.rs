//! Exposes testing, profiling and tracing capabilities of the frame update.

use std::fmt;
use std::time::Instant;

use crate::state::StateTypeId;
use crate::system::SystemTypeId;

/// A handler that receives frame-related events from [`Context::update`](crate::Context::update).
pub trait Tracer: Sync {
    /// Context from [`start_cycle`](Self::start_cycle) to [`end_cycle`](Self::end_cycle).
    type CycleContext;
    /// A frame starts.
    fn start_cycle(&self) -> Self::CycleContext;
    /// A frame ends.
    fn end_cycle(&self, context: Self::CycleContext);

    /// Context from [`start_run_system`](Self::start_run_system)
    /// to [`end_run_system`](Self::end_run_system).
    type RunSystemContext;
    /// A system starts running on `objects` objects.
    fn start_run_system(
        &self,
        system: SystemTypeId,
        debug_name: &str,
        objects: usize,
    ) -> Self::RunSystemContext;
    /// A system stops running.
    fn end_run_system(&self, context: Self::RunSystemContext, system: SystemTypeId, debug_name: &str);

    /// A system is not run in this frame.
    fn skip_system(&self, system: SystemTypeId, debug_name: &str, reason: SkipReason);

    /// A requested state switch is applied.
    fn switch_state(&self, from: Option<StateTypeId>, to: StateTypeId);
}

/// The reason a system was not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The system is disabled.
    Disabled,
    /// No object matches the system signature.
    Empty,
}

/// An empty tracer.
pub struct Noop;

impl Tracer for Noop {
    type CycleContext = ();
    fn start_cycle(&self) {}
    fn end_cycle(&self, _: ()) {}

    type RunSystemContext = ();
    fn start_run_system(&self, _: SystemTypeId, _: &str, _: usize) {}
    fn end_run_system(&self, _: (), _: SystemTypeId, _: &str) {}

    fn skip_system(&self, _: SystemTypeId, _: &str, _: SkipReason) {}

    fn switch_state(&self, _: Option<StateTypeId>, _: StateTypeId) {}
}

/// A tracer that logs all events.
pub struct Log(
    /// The log level to log events with.
    pub log::Level,
);

struct ElapsedFmt(Instant);

impl fmt::Display for ElapsedFmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{:?}", self.0.elapsed()) }
}

impl Tracer for Log {
    type CycleContext = Instant;
    fn start_cycle(&self) -> Instant {
        log::log!(self.0, "start_cycle()");
        Instant::now()
    }
    fn end_cycle(&self, context: Instant) {
        log::log!(self.0, "end_cycle(elapsed: {})", ElapsedFmt(context));
    }

    type RunSystemContext = Instant;
    fn start_run_system(&self, system: SystemTypeId, debug_name: &str, objects: usize) -> Instant {
        log::log!(
            self.0,
            "start_run_system(system: {system}, debug_name: {debug_name}, objects: {objects})"
        );
        Instant::now()
    }
    fn end_run_system(&self, context: Instant, system: SystemTypeId, debug_name: &str) {
        log::log!(
            self.0,
            "end_run_system(system: {system}, debug_name: {debug_name}, elapsed: {})",
            ElapsedFmt(context)
        );
    }

    fn skip_system(&self, system: SystemTypeId, debug_name: &str, reason: SkipReason) {
        log::log!(
            self.0,
            "skip_system(system: {system}, debug_name: {debug_name}, reason: {reason:?})"
        );
    }

    fn switch_state(&self, from: Option<StateTypeId>, to: StateTypeId) {
        log::log!(self.0, "switch_state(from: {from:?}, to: {to})");
    }
}

/// Groups multiple tracers into a tuple and dispatches each call to them in serial.
pub struct Aggregate<T>(
    /// A tuple of child tracers to execute in serial.
    pub T,
);

macro_rules! impl_aggregate {
    ($($ty:ident $index:tt),+) => {
        impl<$($ty: Tracer),+> Tracer for Aggregate<($($ty,)+)> {
            type CycleContext = ($($ty::CycleContext,)+);
            fn start_cycle(&self) -> Self::CycleContext { ($(self.0.$index.start_cycle(),)+) }
            fn end_cycle(&self, context: Self::CycleContext) {
                $(self.0.$index.end_cycle(context.$index);)+
            }

            type RunSystemContext = ($($ty::RunSystemContext,)+);
            fn start_run_system(
                &self,
                system: SystemTypeId,
                debug_name: &str,
                objects: usize,
            ) -> Self::RunSystemContext {
                ($(self.0.$index.start_run_system(system, debug_name, objects),)+)
            }
            fn end_run_system(
                &self,
                context: Self::RunSystemContext,
                system: SystemTypeId,
                debug_name: &str,
            ) {
                $(self.0.$index.end_run_system(context.$index, system, debug_name);)+
            }

            fn skip_system(&self, system: SystemTypeId, debug_name: &str, reason: SkipReason) {
                $(self.0.$index.skip_system(system, debug_name, reason);)+
            }

            fn switch_state(&self, from: Option<StateTypeId>, to: StateTypeId) {
                $(self.0.$index.switch_state(from, to);)+
            }
        }
    };
}

impl_aggregate!(A 0);
impl_aggregate!(A 0, B 1);
impl_aggregate!(A 0, B 1, C 2);
impl_aggregate!(A 0, B 1, C 2, D 3);
