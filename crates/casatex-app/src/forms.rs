// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{AddOnProduct, FormKind, Product, ProductId, ProductSize};

/// An image chosen for upload alongside a product form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormInput {
    pub title: String,
    pub category: String,
    pub price: f64,
    pub short_description: String,
    pub long_description: String,
    pub features: Vec<String>,
    pub size: ProductSize,
    pub image: Option<ImageUpload>,
}

/// One requested add-on line on an inquiry: a product plus how many and,
/// optionally, the dimensions the customer wants it made in.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOnSelection {
    pub product_id: ProductId,
    pub title: String,
    pub category: String,
    pub quantity: u32,
    pub height: f64,
    pub width: f64,
    pub dimension: String,
}

impl AddOnSelection {
    pub fn for_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            category: product.category.clone(),
            quantity: 1,
            height: 0.0,
            width: 0.0,
            dimension: String::new(),
        }
    }

    pub fn into_add_on(self) -> AddOnProduct {
        AddOnProduct {
            id: self.product_id,
            title: self.title,
            category: self.category,
            quantity: self.quantity,
            height: self.height,
            width: self.width,
            dimension: self.dimension,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeadFormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub main_product: AddOnSelection,
    pub add_ons: Vec<AddOnSelection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPayload {
    Product(ProductFormInput),
    Inquiry(LeadFormInput),
    Contact(ContactFormInput),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Product(_) => FormKind::Product,
            Self::Inquiry(_) => FormKind::Inquiry,
            Self::Contact(_) => FormKind::Contact,
        }
    }

    pub fn blank_product() -> ProductFormInput {
        ProductFormInput {
            title: String::new(),
            category: String::new(),
            price: 0.0,
            short_description: String::new(),
            long_description: String::new(),
            features: Vec::new(),
            size: ProductSize::default(),
            image: None,
        }
    }

    /// Seed a product form from an existing catalog row for editing. The
    /// image is left unset; the backend keeps the old one when no new image
    /// part is sent.
    pub fn edit_product(product: &Product) -> ProductFormInput {
        ProductFormInput {
            title: product.title.clone(),
            category: product.category.clone(),
            price: product.price,
            short_description: product.short_description.clone(),
            long_description: product.long_description.clone(),
            features: product.features.clone(),
            size: product.size,
            image: None,
        }
    }

    pub fn blank_inquiry(main_product: &Product) -> LeadFormInput {
        LeadFormInput {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            main_product: AddOnSelection::for_product(main_product),
            add_ons: Vec::new(),
        }
    }

    pub fn blank_contact() -> ContactFormInput {
        ContactFormInput {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Product(product) => product.validate(),
            Self::Inquiry(inquiry) => inquiry.validate(),
            Self::Contact(contact) => contact.validate(),
        }
    }
}

impl ProductFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            bail!("product title is required -- enter a title and retry");
        }
        if self.category.trim().is_empty() {
            bail!("product category is required -- choose a category and retry");
        }
        if self.short_description.trim().is_empty() {
            bail!("product short description is required -- enter one and retry");
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            bail!("product price must be positive");
        }
        if self.size.length < 0.0 || self.size.width < 0.0 {
            bail!("product dimensions cannot be negative");
        }
        Ok(())
    }
}

impl LeadFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("your name is required -- enter a name and retry");
        }
        if self.email.trim().is_empty() {
            bail!("an email address is required -- enter one and retry");
        }
        if self.phone.trim().is_empty() {
            bail!("a phone number is required -- enter one and retry");
        }
        if self.main_product.product_id.is_empty() {
            bail!("the inquiry is missing its product");
        }
        for selection in std::iter::once(&self.main_product).chain(&self.add_ons) {
            if selection.quantity < 1 {
                bail!("quantity must be at least 1 for {}", selection.title);
            }
            if selection.height < 0.0 || selection.width < 0.0 {
                bail!("requested dimensions cannot be negative for {}", selection.title);
            }
        }
        Ok(())
    }
}

impl ContactFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("your name is required -- enter a name and retry");
        }
        if self.email.trim().is_empty() {
            bail!("an email address is required -- enter one and retry");
        }
        Ok(())
    }
}
