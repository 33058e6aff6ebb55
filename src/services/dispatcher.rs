use crate::models::activity_types::RequestToken;
use crate::models::permission_types::Permission;
use std::collections::HashMap;

/// User action waiting behind a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Capture,
    Load,
    Download,
}

/// What to do when the host answers a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Permission { permission: Permission, then: Action },
    CameraPreview,
    GalleryPick,
    ConfirmSave,
}

/// Pending host requests keyed by token. Each token resolves at most once.
#[derive(Debug, Default)]
pub struct ResultDispatcher {
    next_token: u64,
    pending: HashMap<RequestToken, Continuation>,
}

impl ResultDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, continuation: Continuation) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.pending.insert(token, continuation);
        log::debug!("Registered {:?} as {}", continuation, token);
        token
    }

    /// Removes and returns the continuation for `token`.
    pub fn take(&mut self, token: RequestToken) -> Option<Continuation> {
        let continuation = self.pending.remove(&token);
        if continuation.is_none() {
            log::warn!("Result for unknown or already handled request {}", token);
        }
        continuation
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let mut dispatcher = ResultDispatcher::new();
        let a = dispatcher.register(Continuation::CameraPreview);
        let b = dispatcher.register(Continuation::GalleryPick);
        assert_ne!(a, b);
        assert_eq!(dispatcher.pending(), 2);
    }

    #[test]
    fn test_token_resolves_once() {
        let mut dispatcher = ResultDispatcher::new();
        let token = dispatcher.register(Continuation::ConfirmSave);
        assert_eq!(dispatcher.take(token), Some(Continuation::ConfirmSave));
        assert_eq!(dispatcher.take(token), None);
        assert_eq!(dispatcher.pending(), 0);
    }

    #[test]
    fn test_unknown_token_ignored() {
        let mut dispatcher = ResultDispatcher::new();
        dispatcher.register(Continuation::GalleryPick);
        assert_eq!(dispatcher.take(RequestToken(99)), None);
        assert_eq!(dispatcher.pending(), 1);
    }
}
