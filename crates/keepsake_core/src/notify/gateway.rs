//! In-memory notification gateway.

use super::{
    AuthorizationState, NotificationGateway, NotificationHandle, NotificationRequest, NotifyError,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct GatewayState {
    next_handle: u64,
    pending: BTreeMap<NotificationHandle, NotificationRequest>,
}

/// Gateway that keeps pending deliveries in memory.
///
/// Used by tests and the CLI; nothing is ever delivered.
#[derive(Debug)]
pub struct InMemoryNotificationGateway {
    authorization: Mutex<AuthorizationState>,
    state: Mutex<GatewayState>,
}

impl Default for InMemoryNotificationGateway {
    fn default() -> Self {
        Self::with_authorization(AuthorizationState::Authorized)
    }
}

impl InMemoryNotificationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authorization(authorization: AuthorizationState) -> Self {
        Self {
            authorization: Mutex::new(authorization),
            state: Mutex::new(GatewayState::default()),
        }
    }

    pub fn set_authorization(&self, authorization: AuthorizationState) {
        if let Ok(mut current) = self.authorization.lock() {
            *current = authorization;
        }
    }

    /// Pending deliveries ordered by handle.
    pub fn pending(&self) -> Vec<(NotificationHandle, NotificationRequest)> {
        self.lock()
            .map(|state| {
                state
                    .pending
                    .iter()
                    .map(|(handle, request)| (handle.clone(), request.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().map(|state| state.pending.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, GatewayState>, NotifyError> {
        self.state
            .lock()
            .map_err(|_| NotifyError::Platform("gateway lock poisoned".to_string()))
    }
}

impl NotificationGateway for InMemoryNotificationGateway {
    fn authorization(&self) -> AuthorizationState {
        self.authorization
            .lock()
            .map(|state| *state)
            .unwrap_or(AuthorizationState::NotDetermined)
    }

    fn schedule(&self, request: NotificationRequest) -> Result<NotificationHandle, NotifyError> {
        let mut state = self.lock()?;
        state.next_handle += 1;
        let handle = NotificationHandle(format!("local-{:06}", state.next_handle));
        state.pending.insert(handle.clone(), request);
        Ok(handle)
    }

    fn cancel(&self, handle: &NotificationHandle) -> Result<(), NotifyError> {
        self.lock()?
            .pending
            .remove(handle)
            .map(|_| ())
            .ok_or_else(|| NotifyError::UnknownHandle(handle.clone()))
    }
}
