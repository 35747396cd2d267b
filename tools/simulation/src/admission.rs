//! Legitimate user admission
//!
//! A login takes one slot of capacity for the length of its processing
//! window. It is checked twice: at admission (is there a free slot?) and
//! after the window (did concurrent load push the server past capacity
//! while the request was in flight?). Exactly one of Successful,
//! TimedOut or Busy is the terminal outcome.
//!
//! The slot is held on top of the server's own load and released before
//! the tick ends, so it never takes part in decay or the ceiling.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use types::log::LogCategory;
use types::status::LoginOutcome;

use crate::trail::LogTrail;

/// A login that has been admitted and currently holds one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "an admitted login must be finished to release its slot"]
pub struct InFlightLogin {
    /// Server load plus the held slot at admission
    pub admitted_load: u32,
}

impl InFlightLogin {
    /// Try to admit a login against the current server load.
    ///
    /// Rejects with `LoginOutcome::Busy` when `load + 1 > capacity`.
    pub fn begin(load: u32, capacity: u32, trail: &mut LogTrail) -> Result<Self, LoginOutcome> {
        let held = load.saturating_add(1);
        if held > capacity {
            warn!(load, capacity, "login rejected: server busy");
            trail.record(
                LogCategory::Server,
                "Connection attempt from user failed. Server busy.",
            );
            return Err(LoginOutcome::Busy);
        }
        trail.record(LogCategory::User, "Processing valid login request...");
        Ok(Self { admitted_load: held })
    }

    /// Complete the login once the processing window has passed.
    ///
    /// `load` is the server load at the end of the window, without the
    /// slot. The request times out when that load plus the slot exceeds
    /// capacity. Releasing the slot leaves `load` as it is.
    pub fn finish(self, load: u32, capacity: u32, trail: &mut LogTrail) -> LoginOutcome {
        let held = load.saturating_add(1);
        if held > capacity {
            warn!(load = held, capacity, "login timed out under load spike");
            trail.record(LogCategory::Server, "Login request timed out due to high load.");
            LoginOutcome::TimedOut
        } else {
            info!(load = held, capacity, "login successful");
            trail.record(LogCategory::User, "Login successful.");
            LoginOutcome::Successful
        }
    }
}

/// Result of a complete login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAdmission {
    pub accepted: bool,
    pub outcome: LoginOutcome,
    pub load: u32,
    pub message: String,
}

/// Run a full login attempt.
///
/// `during` maps the server load at admission to the load at the end of
/// the processing window; it stands for whatever other work mutates the
/// server while the request is being handled. The returned load never
/// includes the released slot.
pub fn admit_user<F>(load: u32, capacity: u32, trail: &mut LogTrail, during: F) -> UserAdmission
where
    F: FnOnce(u32) -> u32,
{
    match InFlightLogin::begin(load, capacity, trail) {
        Ok(login) => {
            let after_window = during(load);
            let outcome = login.finish(after_window, capacity, trail);
            UserAdmission {
                accepted: true,
                outcome,
                load: after_window,
                message: outcome.user_message().to_string(),
            }
        }
        Err(outcome) => UserAdmission {
            accepted: false,
            outcome,
            load,
            message: outcome.user_message().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn trail() -> LogTrail {
        LogTrail::new(20, Utc::now())
    }

    #[test]
    fn test_quiet_server_login_succeeds() {
        let mut log = trail();
        let result = admit_user(5, 20, &mut log, |l| l);
        assert!(result.accepted);
        assert_eq!(result.outcome, LoginOutcome::Successful);
        assert_eq!(result.load, 5);
        assert_eq!(log.count(LogCategory::User), 2);
    }

    #[test]
    fn test_full_server_rejects_busy() {
        let mut log = trail();
        let result = admit_user(20, 20, &mut log, |l| l + 100);
        assert!(!result.accepted);
        assert_eq!(result.outcome, LoginOutcome::Busy);
        assert_eq!(result.load, 20);
        assert!(result.message.contains("busy"));
        assert_eq!(log.latest().unwrap().category(), LogCategory::Server);
    }

    #[test]
    fn test_last_free_slot_is_admitted() {
        let mut log = trail();
        let result = admit_user(19, 20, &mut log, |l| {
            assert_eq!(l, 19);
            l
        });
        assert_eq!(result.outcome, LoginOutcome::Successful);
        assert_eq!(result.load, 19);
    }

    #[test]
    fn test_spike_during_window_times_out() {
        let mut log = trail();
        let result = admit_user(10, 20, &mut log, |l| l + 15);
        assert!(result.accepted);
        assert_eq!(result.outcome, LoginOutcome::TimedOut);
        assert_eq!(result.load, 25);
        assert!(result.message.contains("timed out"));
    }

    #[test]
    fn test_slot_is_held_on_top_of_load() {
        let mut log = trail();
        let login = InFlightLogin::begin(0, 20, &mut log).unwrap();
        assert_eq!(login.admitted_load, 1);
        assert_eq!(login.finish(0, 20, &mut log), LoginOutcome::Successful);
    }

    #[test]
    fn test_window_ending_at_capacity_times_out() {
        let mut log = trail();
        // 20 units of server work plus the held slot is one over capacity.
        let result = admit_user(5, 20, &mut log, |_| 20);
        assert_eq!(result.outcome, LoginOutcome::TimedOut);
        assert_eq!(result.load, 20);

        let result = admit_user(5, 20, &mut log, |_| 19);
        assert_eq!(result.outcome, LoginOutcome::Successful);
        assert_eq!(result.load, 19);
    }
}
