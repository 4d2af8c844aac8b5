// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Completed,
}

impl LeadStatus {
    pub const ALL: [Self; 3] = [Self::New, Self::Contacted, Self::Completed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Contacted => 1,
            Self::Completed => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Contacted,
}

impl ContactStatus {
    pub const ALL: [Self; 2] = [Self::New, Self::Contacted];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            _ => None,
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Contacted => 1,
        }
    }
}

/// Dimensions in inches. Older catalog rows predate the size column and
/// decode to all-zero, which the UI treats as "no dimensions recorded".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductSize {
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub width: f64,
}

impl ProductSize {
    pub fn is_present(&self) -> bool {
        self.length > 0.0 || self.width > 0.0
    }
}

/// A catalog row as the backend returns it. The backend stores `features`
/// and `size` as JSON-encoded text on older rows, so both fields decode
/// from either representation and fail closed to empty defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "de_price")]
    pub price: f64,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default, deserialize_with = "de_features")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "de_size")]
    pub size: ProductSize,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnProduct {
    #[serde(default)]
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub dimension: String,
}

/// A customer inquiry bundling contact details and the requested products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLead {
    #[serde(default)]
    pub id: LeadId,
    #[serde(default)]
    pub lead_details: LeadDetails,
    #[serde(default)]
    pub add_on_products: Vec<AddOnProduct>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "de_lead_status")]
    pub status: LeadStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub id: ContactId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "de_contact_status")]
    pub status: ContactStatus,
}

/// Server-reported pagination metadata. The listing controller corrects
/// `total_pages`/`has_next_page` for small first pages; see `listing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Catalog,
    Leads,
    Contacts,
}

impl TabKind {
    pub const ALL: [Self; 3] = [Self::Catalog, Self::Leads, Self::Contacts];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Leads => "leads",
            Self::Contacts => "contacts",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "catalog" => Some(Self::Catalog),
            "leads" => Some(Self::Leads),
            "contacts" => Some(Self::Contacts),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    Product,
    Inquiry,
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Filter,
    Form(FormKind),
}

fn de_features<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(decode_features(raw))
}

fn decode_features(raw: Option<Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => {
            serde_json::from_value(Value::Array(items)).unwrap_or_default()
        }
        Some(Value::String(encoded)) => serde_json::from_str(&encoded).unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn de_size<'de, D>(deserializer: D) -> Result<ProductSize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(decode_size(raw))
}

fn decode_size(raw: Option<Value>) -> ProductSize {
    match raw {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
        Some(Value::String(encoded)) => serde_json::from_str(&encoded).unwrap_or_default(),
        _ => ProductSize::default(),
    }
}

fn de_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn de_lead_status<'de, D>(deserializer: D) -> Result<LeadStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(LeadStatus::parse)
        .unwrap_or_default())
}

fn de_contact_status<'de, D>(deserializer: D) -> Result<ContactStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(ContactStatus::parse)
        .unwrap_or_default())
}
