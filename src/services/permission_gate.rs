use crate::models::activity_types::RequestToken;
use crate::models::permission_types::Permission;
use crate::services::dispatcher::{Action, Continuation, ResultDispatcher};
use crate::services::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Granted,
    /// A prompt is up; the action resumes when its result arrives.
    Requested(RequestToken),
}

/// Checks `permission`; when missing, asks the host once and parks `then`.
pub fn ensure<H: Host>(
    host: &mut H,
    dispatcher: &mut ResultDispatcher,
    permission: Permission,
    then: Action,
) -> GateOutcome {
    if host.check_permission(permission).is_granted() {
        return GateOutcome::Granted;
    }

    let token = dispatcher.register(Continuation::Permission { permission, then });
    log::info!("Requesting {:?} permission ({})", permission, token);
    host.request_permission(permission, token);
    GateOutcome::Requested(token)
}

/// Handles the user's answer. Returns whether the parked action may run.
pub fn on_result<H: Host>(host: &mut H, permission: Permission, granted: bool) -> bool {
    if granted {
        log::info!("{:?} permission granted", permission);
    } else {
        log::warn!("{:?} permission denied", permission);
        host.show_notice(permission.denial_notice());
    }
    granted
}
