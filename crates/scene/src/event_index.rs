//! Dense local-id index mapping render vertices back to event resource ids.
//!
//! Local ids are u32s streamed alongside vertex data; the renderer hands them
//! back on pick. The index is append-only within one refresh and cleared by
//! the next, so ids from an old refresh must never resolve against new data.
//!
//! Ordering contract:
//! - `assign` returns 0-based ids in assignment order with no gaps, matching
//!   the order vertices are streamed.
//! - Layers sharing one refresh (focus quakes, then blasts) share the same
//!   id space by assigning through the same handle.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RefreshHandle {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The handle belongs to a refresh that has since been superseded.
    Stale { handle: u64, current: u64 },
    NotFound { local_id: u32 },
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexError::Stale { handle, current } => {
                write!(f, "refresh handle {handle} is stale (current {current})")
            }
            IndexError::NotFound { local_id } => write!(f, "no event with local id {local_id}"),
        }
    }
}

impl std::error::Error for IndexError {}

#[derive(Debug, Default)]
pub struct EventIndex {
    generation: u64,
    ids: Vec<String>,
}

impl EventIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new refresh: clears all ids and invalidates prior handles.
    pub fn begin_refresh(&mut self) -> RefreshHandle {
        self.generation += 1;
        self.ids.clear();
        RefreshHandle {
            generation: self.generation,
        }
    }

    fn check(&self, handle: RefreshHandle) -> Result<(), IndexError> {
        if handle.generation != self.generation {
            return Err(IndexError::Stale {
                handle: handle.generation,
                current: self.generation,
            });
        }
        Ok(())
    }

    /// Appends a domain id and returns its dense local id.
    pub fn assign(
        &mut self,
        handle: RefreshHandle,
        domain_id: impl Into<String>,
    ) -> Result<u32, IndexError> {
        self.check(handle)?;
        let local = self.ids.len() as u32;
        self.ids.push(domain_id.into());
        Ok(local)
    }

    pub fn resolve(&self, handle: RefreshHandle, local_id: u32) -> Result<&str, IndexError> {
        self.check(handle)?;
        self.ids
            .get(local_id as usize)
            .map(String::as_str)
            .ok_or(IndexError::NotFound { local_id })
    }

    /// Local id of a domain id within the current refresh, if present.
    pub fn position_of(
        &self,
        handle: RefreshHandle,
        domain_id: &str,
    ) -> Result<Option<u32>, IndexError> {
        self.check(handle)?;
        Ok(self
            .ids
            .iter()
            .position(|id| id == domain_id)
            .map(|i| i as u32))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
