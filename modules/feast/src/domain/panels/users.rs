use rust_decimal::Decimal;
use tracing::instrument;

use super::{contains_lowercase, CollectionPanel, Searchable};
use crate::contract::model::{User, UserPatch, UserStatus};
use crate::domain::error::DomainError;

pub type UsersPanel = CollectionPanel<User>;

impl Searchable for User {
    fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.email, &self.phone]
            .into_iter()
            .any(|field| contains_lowercase(field, needle))
    }
}

/// Aggregates shown above the users table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub blocked: usize,
    pub total_spent: Decimal,
    pub total_orders: u64,
}

impl UserStats {
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        users.into_iter().fold(Self::default(), |mut acc, u| {
            acc.total += 1;
            match u.status {
                UserStatus::Active => acc.active += 1,
                UserStatus::Inactive => acc.inactive += 1,
                UserStatus::Blocked => acc.blocked += 1,
            }
            acc.total_spent += u.total_spent;
            acc.total_orders += u64::from(u.total_orders);
            acc
        })
    }
}

impl CollectionPanel<User> {
    /// Partial update carrying only the status.
    #[instrument(name = "feast.users.set_status", skip(self), fields(status = %status))]
    pub async fn set_status(&mut self, id: &str, status: UserStatus) -> Result<(), DomainError> {
        self.require(id)?;
        self.update(id, &UserPatch { status }).await
    }

    pub fn stats(&self) -> UserStats {
        UserStats::from_users(self.items())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user(name: &str, status: UserStatus, orders: u32, spent: i64) -> User {
        User {
            id: name.to_lowercase(),
            name: name.to_string(),
            email: format!("{}@example.dz", name.to_lowercase()),
            phone: "0550000000".into(),
            address: String::new(),
            join_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            total_orders: orders,
            total_spent: Decimal::new(spent, 0),
            status,
            last_order: None,
        }
    }

    #[test]
    fn stats_aggregate_by_status() {
        let users = [
            user("Karim", UserStatus::Active, 3, 120),
            user("Lina", UserStatus::Active, 1, 40),
            user("Omar", UserStatus::Blocked, 0, 0),
            user("Sara", UserStatus::Inactive, 2, 55),
        ];
        let stats = UserStats::from_users(&users);
        assert_eq!(
            stats,
            UserStats {
                total: 4,
                active: 2,
                inactive: 1,
                blocked: 1,
                total_spent: Decimal::new(215, 0),
                total_orders: 6,
            }
        );
    }

    #[test]
    fn search_covers_email() {
        let u = user("Karim", UserStatus::Active, 0, 0);
        assert!(u.matches("karim@"));
        assert!(!u.matches("lina"));
    }
}
