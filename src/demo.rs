//! Built-in catalog that stands in for the backend (`--demo`).

use crate::api::{ApiError, ProductApi};
use crate::model::{BackendProduct, NewProduct};
use std::sync::Mutex;

/// In-memory backend seeded with a fixed catalog. Ids are assigned the way
/// a server would: one past the highest numeric id seen so far.
pub struct DemoCatalog {
    products: Mutex<Vec<BackendProduct>>,
}

impl DemoCatalog {
    pub fn new(products: Vec<BackendProduct>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_products())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<BackendProduct>> {
        self.products
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProductApi for DemoCatalog {
    fn list_products(&self) -> Result<Vec<BackendProduct>, ApiError> {
        Ok(self.lock().clone())
    }

    fn create_product(&self, product: &NewProduct) -> Result<BackendProduct, ApiError> {
        let mut products = self.lock();
        let next_id = products
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let created = BackendProduct {
            id: next_id.to_string(),
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            image_url: product.image_url.clone(),
        };
        products.push(created.clone());
        Ok(created)
    }
}

pub fn seed_products() -> Vec<BackendProduct> {
    let entry = |id: &str, title: &str, price: f64, description: &str, image_url: &str| {
        BackendProduct {
            id: id.to_string(),
            title: title.to_string(),
            price,
            description: description.to_string(),
            image_url: image_url.to_string(),
        }
    };

    vec![
        entry(
            "1",
            "Zapatillas Runner",
            59999.0,
            "Zapatillas livianas para entrenar todos los días. Suela con buena tracción.",
            "https://images.unsplash.com/photo-1518449073234-4f6a97a66c0f",
        ),
        entry(
            "2",
            "Auriculares BT",
            32999.0,
            "Auriculares Bluetooth con cancelación pasiva y 20h de batería.",
            "https://images.unsplash.com/photo-1518449073234-4f6a97a66c0f",
        ),
        entry(
            "3",
            "Mochila Urbana",
            27999.0,
            "Mochila resistente al agua con compartimento para notebook 15.6\".",
            "https://images.unsplash.com/photo-1520975922203-bc1e7298a8b0",
        ),
        entry(
            "4",
            "Remera DryFit",
            14999.0,
            "Tela respirable y liviana para entrenamientos intensos.",
            "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab",
        ),
    ]
}
