//! Draft state and validation for the "new product" modal.

use crate::app_core::text_input::TextInput;
use crate::model::NewProduct;
use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Fill in every field. The price must be a number.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Price,
    Description,
    ImageUrl,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Title,
        FormField::Price,
        FormField::Description,
        FormField::ImageUrl,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Price => "Price (number)",
            FormField::Description => "Description",
            FormField::ImageUrl => "Image URL (https)",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Price,
            FormField::Price => FormField::Description,
            FormField::Description => FormField::ImageUrl,
            FormField::ImageUrl => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::ImageUrl,
            FormField::Price => FormField::Title,
            FormField::Description => FormField::Price,
            FormField::ImageUrl => FormField::Description,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    EmptyField(FormField),

    #[error("price '{0}' is not a valid non-negative number")]
    InvalidPrice(String),
}

/// Editable text of the four product fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProductDraft {
    pub title: TextInput,
    pub price: TextInput,
    pub description: TextInput,
    pub image_url: TextInput,
}

impl NewProductDraft {
    pub fn field(&self, field: FormField) -> &TextInput {
        match field {
            FormField::Title => &self.title,
            FormField::Price => &self.price,
            FormField::Description => &self.description,
            FormField::ImageUrl => &self.image_url,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut TextInput {
        match field {
            FormField::Title => &mut self.title,
            FormField::Price => &mut self.price,
            FormField::Description => &mut self.description,
            FormField::ImageUrl => &mut self.image_url,
        }
    }

    /// Every field must be non-blank and the price a finite, non-negative
    /// number. Values are returned trimmed.
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        for field in FormField::ALL {
            if self.field(field).text().trim().is_empty() {
                return Err(ValidationError::EmptyField(field));
            }
        }

        let raw_price = self.price.text().trim();
        let price = raw_price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| ValidationError::InvalidPrice(raw_price.to_string()))?;

        Ok(NewProduct {
            title: self.title.text().trim().to_string(),
            price,
            description: self.description.text().trim().to_string(),
            image_url: self.image_url.text().trim().to_string(),
        })
    }
}

/// The creation modal: exists only while it is open.
#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub draft: NewProductDraft,
    pub focus: FormField,
    /// A create request is in flight; submit and cancel are disabled.
    pub saving: bool,
    pub error: Option<String>,
}

impl CreateForm {
    pub fn focused_input(&mut self) -> &mut TextInput {
        self.draft.field_mut(self.focus)
    }
}
