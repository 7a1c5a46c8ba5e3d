// Working set of chosen products, order total and the affiliate checkout link.
use crate::config::CheckoutConfig;
use crate::model::{CartItem, ConfigError, Product};
use reqwest::Url;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Every detected product starts selected with quantity 1.
    pub fn from_detected(products: Vec<Product>) -> Self {
        let mut cart = Self::default();
        for product in products {
            cart.add(product);
        }
        cart
    }

    /// Adds a manually chosen product; returns false when its SKU is already in the cart.
    pub fn add(&mut self, product: Product) -> bool {
        if self.items.iter().any(|i| i.product.sku == product.sku) {
            return false;
        }
        self.items.push(CartItem::new(product));
        true
    }

    pub fn toggle(&mut self, sku: &str) -> Option<bool> {
        let item = self.items.iter_mut().find(|i| i.product.sku == sku)?;
        item.selected = !item.selected;
        Some(item.selected)
    }

    /// Quantities below 1 are raised to 1.
    pub fn set_quantity(&mut self, sku: &str, quantity: u32) -> Option<u32> {
        let item = self.items.iter_mut().find(|i| i.product.sku == sku)?;
        item.quantity = quantity.max(1);
        Some(item.quantity)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn selected(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|i| i.selected)
    }

    pub fn total(&self) -> f64 {
        calculate_total(&self.items)
    }
}

/// Sum of `price * quantity` over selected items.
pub fn calculate_total(items: &[CartItem]) -> f64 {
    items
        .iter()
        .filter(|i| i.selected)
        .map(|i| i.product.price * f64::from(i.quantity.max(1)))
        .sum()
}

/// Builds checkout URLs against a validated base address.
#[derive(Debug, Clone)]
pub struct CheckoutLinks {
    base: Url,
    ga_id: String,
    redirect: String,
}

impl CheckoutLinks {
    pub fn new(cfg: &CheckoutConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&cfg.base_url)
            .map_err(|e| ConfigError::Invalid(format!("checkout base_url: {}", e)))?;
        Ok(Self {
            base,
            ga_id: cfg.ga_id.clone(),
            redirect: cfg.redirect.clone(),
        })
    }

    /// `None` when the sponsor id is blank or nothing is selected.
    pub fn generate(&self, sponsor_id: &str, items: &[CartItem]) -> Option<String> {
        let sponsor_id = sponsor_id.trim();
        let selected: Vec<&CartItem> = items.iter().filter(|i| i.selected).collect();
        if sponsor_id.is_empty() || selected.is_empty() {
            return None;
        }

        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("sponsorid", sponsor_id);
            for (n, item) in selected.iter().enumerate() {
                query.append_pair(
                    &format!("item-{}", n + 1),
                    &format!("{}|{}", item.product.sku, item.quantity.max(1)),
                );
            }
            query.append_pair("destroy", "1");
            query.append_pair("ga_id", &self.ga_id);
            query.append_pair("redirect", &self.redirect);
        }

        info!("Checkout link built with {} items", selected.len());
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn btt() -> Product {
        Product {
            name: "Beyond Tangy Tangerine 2.0".into(),
            sku: "USYG100076".into(),
            price: 45.00,
        }
    }

    fn selenium() -> Product {
        Product {
            name: "Ultimate Selenium".into(),
            sku: "20971".into(),
            price: 19.95,
        }
    }

    #[test]
    fn total_multiplies_by_quantity() {
        let mut cart = Cart::from_detected(vec![btt()]);
        cart.set_quantity("USYG100076", 2);
        assert_eq!(cart.total(), 90.00);
    }

    #[test]
    fn total_skips_deselected() {
        let mut cart = Cart::from_detected(vec![btt(), selenium()]);
        assert_eq!(cart.toggle("20971"), Some(false));
        assert_eq!(cart.total(), 45.00);
        assert_eq!(cart.selected().count(), 1);
    }

    #[test]
    fn quantity_is_clamped_and_unknown_sku_ignored() {
        let mut cart = Cart::from_detected(vec![btt()]);
        assert_eq!(cart.set_quantity("USYG100076", 0), Some(1));
        assert_eq!(cart.set_quantity("nope", 3), None);
        assert_eq!(cart.toggle("nope"), None);
    }

    #[test]
    fn manual_add_skips_duplicates() {
        let mut cart = Cart::from_detected(vec![btt()]);
        assert!(!cart.add(btt()));
        assert!(cart.add(selenium()));
        assert_eq!(cart.items().len(), 2);
        assert!(cart.items()[1].selected);
    }

    #[test]
    fn checkout_url_lists_selected_items() {
        let links = CheckoutLinks::new(&CheckoutConfig::default()).unwrap();
        let mut cart = Cart::from_detected(vec![btt(), selenium()]);
        cart.set_quantity("USYG100076", 2);
        cart.toggle("20971");

        let url = links.generate("123456", cart.items()).unwrap();
        assert_eq!(
            url,
            "https://ygy1.com/customer-checkout/v1.3/?sponsorid=123456\
             &item-1=USYG100076%7C2&destroy=1&ga_id=UA-20019232-44\
             &redirect=http%3A%2F%2Fdailywithdoc.com%2Fthank-you"
        );
    }

    #[test]
    fn checkout_url_needs_sponsor_and_selection() {
        let links = CheckoutLinks::new(&CheckoutConfig::default()).unwrap();
        let mut cart = Cart::from_detected(vec![btt()]);
        assert!(links.generate("  ", cart.items()).is_none());

        cart.toggle("USYG100076");
        assert!(links.generate("123456", cart.items()).is_none());
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let cfg = CheckoutConfig {
            base_url: "not a url".into(),
            ..CheckoutConfig::default()
        };
        assert!(matches!(CheckoutLinks::new(&cfg), Err(ConfigError::Invalid(_))));
    }
}
