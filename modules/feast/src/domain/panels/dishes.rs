use rust_decimal::Decimal;
use tracing::instrument;

use super::{contains_lowercase, CollectionPanel, Searchable};
use crate::contract::model::{Dish, DishDraft};
use crate::domain::error::DomainError;

pub type DishesPanel = CollectionPanel<Dish>;

impl Searchable for Dish {
    fn matches(&self, needle: &str) -> bool {
        self.name.contains_lowercase(needle)
            || self
                .category_id
                .as_deref()
                .is_some_and(|c| contains_lowercase(c, needle))
    }
}

fn validate(draft: &DishDraft) -> Result<(), DomainError> {
    if draft.name.is_blank() {
        return Err(DomainError::validation("name", "is required"));
    }
    if !matches!(draft.category_id.as_deref(), Some(c) if !c.trim().is_empty()) {
        return Err(DomainError::validation("category_id", "is required"));
    }
    if draft.price <= Decimal::ZERO {
        return Err(DomainError::validation("price", "must be greater than zero"));
    }
    Ok(())
}

impl CollectionPanel<Dish> {
    /// Create a dish, or replace the whole record of `editing`.
    #[instrument(name = "feast.dishes.save", skip(self, draft))]
    pub async fn save(&mut self, editing: Option<&str>, draft: DishDraft) -> Result<(), DomainError> {
        if let Err(e) = validate(&draft) {
            self.notifier().error(e.to_string());
            return Err(e);
        }
        match editing {
            Some(id) => self.update(id, &draft).await,
            None => self.create(&draft).await.map(|_| ()),
        }
    }

    /// Flip `is_available` with a full-record update. Returns the new availability.
    #[instrument(name = "feast.dishes.toggle_availability", skip(self))]
    pub async fn toggle_availability(&mut self, id: &str) -> Result<bool, DomainError> {
        let mut draft = self.require(id)?.to_draft();
        draft.is_available = !draft.is_available;
        let available = draft.is_available;
        self.update(id, &draft).await?;
        Ok(available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::LocalizedText;

    fn draft() -> DishDraft {
        DishDraft {
            category_id: Some("mains".into()),
            name: LocalizedText::uniform("Rechta"),
            description: LocalizedText::default(),
            price: Decimal::new(900, 2),
            image_url: None,
            is_available: true,
            display_order: 1,
        }
    }

    #[test]
    fn complete_draft_is_valid() {
        assert!(validate(&draft()).is_ok());
    }

    #[test]
    fn missing_fields_are_reported() {
        let cases = [
            (
                DishDraft {
                    name: LocalizedText::default(),
                    ..draft()
                },
                "name",
            ),
            (
                DishDraft {
                    category_id: Some(" ".into()),
                    ..draft()
                },
                "category_id",
            ),
            (
                DishDraft {
                    price: Decimal::ZERO,
                    ..draft()
                },
                "price",
            ),
        ];
        for (draft, expected) in cases {
            match validate(&draft) {
                Err(DomainError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected validation error on {expected}, got {other:?}"),
            }
        }
    }
}
