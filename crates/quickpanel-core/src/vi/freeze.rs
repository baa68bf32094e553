use crate::host::Container;
use tracing::debug;

/// Reference-counted scroll freeze on the hosting container.
///
/// The container's freeze primitive is a counter, so every push made here is
/// popped again on release.
#[derive(Debug, Default)]
pub struct FreezeController {
    depth: u32,
}

impl FreezeController {
    /// Push one freeze level unless already engaged.
    pub fn engage(&mut self, container: &mut dyn Container) {
        if self.depth > 0 {
            return;
        }
        container.freeze_input();
        self.depth += 1;
        debug!("Container input frozen");
    }

    /// Pop every level pushed by `engage`.
    pub fn release(&mut self, container: &mut dyn Container) {
        if self.depth == 0 {
            return;
        }
        while self.depth > 0 {
            container.unfreeze_input();
            self.depth -= 1;
        }
        debug!("Container input unfrozen");
    }

    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.depth > 0
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }
}
