use tracing::{debug, instrument};

use crate::contract::model::{CartItem, Category, Dish, Language};
use crate::domain::cart::CartStore;
use crate::domain::error::DomainError;
use crate::domain::ports::CollectionPort;
use crate::domain::resource::Resource;

/// The menu as fetched on page load: categories and dishes, each ordered by `display_order`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    dishes: Vec<Dish>,
}

/// One category heading with its dishes, text resolved in a single language.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSection<'a> {
    pub category_id: &'a str,
    pub title: &'a str,
    pub dishes: Vec<&'a Dish>,
}

impl Catalog {
    pub fn new(mut categories: Vec<Category>, mut dishes: Vec<Dish>) -> Self {
        Category::arrange(&mut categories);
        Dish::arrange(&mut dishes);
        Self { categories, dishes }
    }

    /// Fetch categories and dishes concurrently. Either failure fails the load.
    #[instrument(name = "feast.catalog.load", skip_all)]
    pub async fn load(
        categories: &dyn CollectionPort<Category>,
        dishes: &dyn CollectionPort<Dish>,
    ) -> Result<Self, DomainError> {
        let (categories, dishes) = tokio::try_join!(categories.list(), dishes.list())
            .map_err(DomainError::from_infra)?;
        debug!(
            categories = categories.len(),
            dishes = dishes.len(),
            "catalog loaded"
        );
        Ok(Self::new(categories, dishes))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    /// Menu sections in category order. Categories without dishes are left out.
    pub fn sections(&self, lang: Language) -> Vec<MenuSection<'_>> {
        self.categories
            .iter()
            .filter_map(|category| {
                let dishes: Vec<&Dish> = self
                    .dishes
                    .iter()
                    .filter(|d| d.category_id.as_deref() == Some(category.id.as_str()))
                    .collect();
                (!dishes.is_empty()).then(|| MenuSection {
                    category_id: &category.id,
                    title: category.name.get(lang),
                    dishes,
                })
            })
            .collect()
    }

    /// Look a dish up by id, or by its exact name (case-insensitive) in `lang`.
    pub fn find(&self, key: &str, lang: Language) -> Option<&Dish> {
        let key = key.trim();
        self.dishes.iter().find(|d| d.id == key).or_else(|| {
            let wanted = key.to_lowercase();
            self.dishes
                .iter()
                .find(|d| d.name.get(lang).to_lowercase() == wanted)
        })
    }

    /// Put `quantity` units of a dish in the cart, named in `lang`.
    /// Unavailable dishes cannot be ordered.
    pub fn add_to_cart(
        &self,
        cart: &mut CartStore,
        key: &str,
        quantity: u32,
        lang: Language,
    ) -> Result<CartItem, DomainError> {
        let dish = self
            .find(key, lang)
            .ok_or_else(|| DomainError::not_found(Dish::KIND, key))?;

        let name = dish.name.get(lang).to_string();
        if !dish.is_available {
            return Err(DomainError::DishUnavailable { name });
        }

        let item = CartItem::new(dish.id.clone(), name, dish.price)
            .with_quantity(quantity.max(1))
            .with_image(dish.image_url.clone());
        cart.add(item.clone());
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::LocalizedText;
    use rust_decimal::Decimal;

    fn dish(id: &str, name: LocalizedText, available: bool) -> Dish {
        Dish {
            id: id.to_string(),
            category_id: Some("desserts".into()),
            name,
            description: LocalizedText::default(),
            price: Decimal::new(600, 2),
            image_url: None,
            is_available: available,
            display_order: 1,
            created_at: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![Category {
                id: "desserts".into(),
                name: LocalizedText::uniform("Desserts"),
                display_order: 1,
            }],
            vec![dish(
                "creme",
                LocalizedText {
                    en: "Custard".into(),
                    ar: "كريمة".into(),
                    fr: "Crème brûlée".into(),
                },
                true,
            )],
        )
    }

    #[test]
    fn name_lookup_ignores_case_beyond_ascii() {
        let catalog = catalog();
        let found = catalog.find("  CRÈME BRÛLÉE ", Language::Fr).map(|d| d.id.as_str());
        assert_eq!(found, Some("creme"));
        assert!(catalog.find("CRÈME BRÛLÉE", Language::En).is_none());
    }

    #[test]
    fn zero_quantity_adds_one_unit_in_the_chosen_language() {
        let catalog = catalog();
        let mut cart = CartStore::new();

        let item = catalog
            .add_to_cart(&mut cart, "creme", 0, Language::Fr)
            .unwrap();

        assert_eq!(item.name, "Crème brûlée");
        assert_eq!(cart.item_count(), 1);
    }
}
