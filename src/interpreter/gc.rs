//! Sweeping of collectable entities.
//!
//! Variables, lists and classes created while a method, template or `try`
//! body runs are flagged collectable. Once the outermost such body has
//! returned, and no if-chain is being evaluated, they are swept. The lock
//! flag does not protect against a sweep.

use tracing::{debug, trace};

use crate::{host::Host,
            interpreter::{session::Session, store::Store}};

impl Store {
    /// Drops every collectable variable, list, class and class member, and
    /// returns how many went.
    pub fn sweep(&mut self) -> usize {
        let mut swept = self.variables.retain(|v| !v.collectable);
        swept += self.lists.retain(|l| !l.collectable);
        swept += self.classes.retain(|c| !c.collectable);
        for class in self.classes.iter_mut() {
            swept += class.variables.retain(|v| !v.collectable);
        }
        swept
    }
}

impl<H: Host> Session<H> {
    /// Sweeps collectable entities unless a body or if-chain is still
    /// running. Returns how many were swept.
    pub fn collect_garbage(&mut self) -> usize {
        if self.state.executions > 0 || self.state.if_depth > 0 {
            trace!(executions = self.state.executions,
                   if_depth = self.state.if_depth,
                   "sweep deferred");
            return 0;
        }
        let swept = self.store.sweep();
        if swept > 0 {
            debug!(swept, "garbage collected");
        }
        swept
    }
}
