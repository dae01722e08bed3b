use serde::{Deserialize, Serialize};

use crate::contract::model::OrderStatus;
use crate::domain::error::DomainError;

/// Which order status changes the admin panel accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status may be set to any other status.
    #[default]
    Unrestricted,
    /// Orders move forward through the kitchen workflow; delivered and cancelled are terminal.
    Lifecycle,
}

impl TransitionPolicy {
    pub fn allows(self, from: OrderStatus, to: OrderStatus) -> bool {
        use OrderStatus::*;

        if from == to {
            return true;
        }
        match self {
            TransitionPolicy::Unrestricted => true,
            TransitionPolicy::Lifecycle => matches!(
                (from, to),
                (Pending, Confirmed)
                    | (Confirmed, Preparing)
                    | (Preparing, Ready)
                    | (Ready, Delivered)
                    | (Pending | Confirmed | Preparing | Ready, Cancelled)
            ),
        }
    }

    pub fn check(self, from: OrderStatus, to: OrderStatus) -> Result<(), DomainError> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(DomainError::IllegalTransition { from, to })
        }
    }

    /// Statuses reachable from `from` in one step, excluding `from` itself.
    pub fn next_statuses(self, from: OrderStatus) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|&to| to != from && self.allows(from, to))
            .collect()
    }
}
