//! Product records in their backend shape and their display shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A product as the backend sends it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendProduct {
    /// Server-assigned identifier.
    pub id: String,
    pub title: String,
    /// Non-negative amount, unit agnostic.
    pub price: f64,
    pub description: String,
    /// Image location as a URI string.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl<'de> Deserialize<'de> for BackendProduct {
    /// Accepts `id` either as a JSON string or as a JSON number, since simple
    /// JSON backends differ on that point. Numbers are kept as their decimal text.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Proxy {
            id: Value,
            title: String,
            price: f64,
            description: String,
            #[serde(rename = "imageUrl")]
            image_url: String,
        }

        let proxy = Proxy::deserialize(deserializer)?;
        let id = match proxy.id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "product id must be a string or a number, got {}",
                    other
                )));
            }
        };

        Ok(BackendProduct {
            id,
            title: proxy.title,
            price: proxy.price,
            description: proxy.description,
            image_url: proxy.image_url,
        })
    }
}

/// Body of a create request: exactly the four client-supplied fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Reference to an image that the rendering layer knows how to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Uri(String),
}

impl ImageRef {
    pub fn uri(&self) -> &str {
        match self {
            ImageRef::Uri(uri) => uri,
        }
    }
}

/// A product ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayProduct {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub image: ImageRef,
}

/// Maps a backend record to its display form. Only `image_url` changes shape.
pub fn adapt(product: &BackendProduct) -> DisplayProduct {
    DisplayProduct {
        id: product.id.clone(),
        title: product.title.clone(),
        price: product.price,
        description: product.description.clone(),
        image: ImageRef::Uri(product.image_url.clone()),
    }
}

/// Adapts every record, preserving order.
pub fn adapt_all(products: &[BackendProduct]) -> Vec<DisplayProduct> {
    products.iter().map(adapt).collect()
}

/// Formats a price the way `es-AR` locales print numbers: `.` groups
/// thousands, `,` separates at most three fraction digits.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return format!("${}", price);
    }

    let scaled = (price.abs() * 1000.0).round() as u64;
    let whole = (scaled / 1000).to_string();
    let fraction = format!("{:03}", scaled % 1000);
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(whole.len() + 8);
    out.push('$');
    if price < 0.0 && scaled != 0 {
        out.push('-');
    }
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if !fraction.is_empty() {
        out.push(',');
        out.push_str(fraction);
    }
    out
}
