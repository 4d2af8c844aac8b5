// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client as HttpClient, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;

use casatex_app::{
    Contact, ContactFormInput, ContactId, ContactStatus, LeadFormInput, LeadId, LeadStatus,
    ListQuery, PageInfo, Product, ProductFormInput, ProductId, ProductLead,
};

/// Blocking client for the storefront REST backend. One request at a time,
/// no retries; every failure comes back as a single actionable message.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{path}", self.base_url))
            .with_context(|| format!("invalid backend URL for {path}"))
    }

    pub fn list_products(&self, query: &ListQuery) -> Result<(Vec<Product>, PageInfo)> {
        let mut url = self.endpoint("/v1/products/getallProducts")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(title) = &query.title {
                pairs.append_pair("title", title);
            }
            if let Some(category) = &query.category {
                pairs.append_pair("category", category);
            }
            if let Some(sort_by) = query.sort_by {
                pairs.append_pair("sortBy", sort_by);
            }
            if let Some(sort_order) = query.sort_order {
                pairs.append_pair("sortOrder", sort_order);
            }
        }

        let response = self.send(self.http.get(url))?;
        let parsed: DataEnvelope<ProductListData> =
            decode(response, "decode product list response")?;
        Ok((parsed.data.products, parsed.data.pagination))
    }

    pub fn get_product(&self, id: &ProductId) -> Result<Product> {
        let url = self.endpoint(&format!("/v1/products/getProduct/{id}"))?;
        let response = self.send(self.http.get(url))?;
        let parsed: DataEnvelope<Product> = decode(response, "decode product response")?;
        Ok(parsed.data)
    }

    pub fn create_product(&self, form: &ProductFormInput) -> Result<Product> {
        let url = self.endpoint("/v1/products/newProduct")?;
        let multipart = product_form(form, true)?;
        let response = self.send(self.http.post(url).multipart(multipart))?;
        let parsed: DataEnvelope<Product> = decode(response, "decode created product")?;
        Ok(parsed.data)
    }

    pub fn update_product(&self, id: &ProductId, form: &ProductFormInput) -> Result<Product> {
        let url = self.endpoint(&format!("/v1/products/updateProduct/{id}"))?;
        let multipart = product_form(form, false)?;
        let response = self.send(self.http.put(url).multipart(multipart))?;
        let parsed: DataEnvelope<Product> = decode(response, "decode updated product")?;
        Ok(parsed.data)
    }

    pub fn delete_product(&self, id: &ProductId) -> Result<()> {
        let url = self.endpoint(&format!("/v1/products/deleteProduct/{id}"))?;
        self.send(self.http.delete(url))?;
        Ok(())
    }

    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        let url = self.endpoint("/v1/contacts/getallContacts")?;
        let response = self.send(self.http.get(url))?;
        let parsed: DataEnvelope<Vec<Contact>> = decode(response, "decode contact list")?;
        Ok(parsed.data)
    }

    pub fn create_contact(&self, form: &ContactFormInput) -> Result<Contact> {
        let url = self.endpoint("/v1/contacts/newContact")?;
        let payload = serde_json::json!({
            "name": form.name,
            "email": form.email,
            "phone": form.phone,
            "message": form.message,
            "timestamp": stamp()?,
            "status": ContactStatus::New.as_str(),
        });
        let response = self.send(self.http.post(url).json(&payload))?;
        let parsed: DataEnvelope<Contact> = decode(response, "decode created contact")?;
        Ok(parsed.data)
    }

    pub fn update_contact_status(&self, id: &ContactId, status: ContactStatus) -> Result<()> {
        let url = self.endpoint(&format!("/v1/contacts/updateContact/{id}"))?;
        let payload = serde_json::json!({ "status": status.as_str() });
        self.send(self.http.put(url).json(&payload))?;
        Ok(())
    }

    pub fn delete_contact(&self, id: &ContactId) -> Result<()> {
        let url = self.endpoint(&format!("/v1/contacts/deleteContact/{id}"))?;
        self.send(self.http.delete(url))?;
        Ok(())
    }

    pub fn list_leads(&self) -> Result<Vec<ProductLead>> {
        let url = self.endpoint("/v1/product-leads/getallProductLeads")?;
        let response = self.send(self.http.get(url))?;
        let parsed: DataEnvelope<Vec<ProductLead>> = decode(response, "decode lead list")?;
        Ok(parsed.data)
    }

    pub fn create_lead(&self, form: &LeadFormInput) -> Result<ProductLead> {
        let url = self.endpoint("/v1/product-leads/newProductLead")?;

        let mut requested = Vec::with_capacity(form.add_ons.len() + 1);
        requested.push(form.main_product.clone().into_add_on());
        requested.extend(form.add_ons.iter().cloned().map(|add_on| add_on.into_add_on()));

        let payload = serde_json::json!({
            "leadDetails": {
                "name": form.name,
                "email": form.email,
                "phone": form.phone,
                "message": form.message,
            },
            "addOnProducts": requested,
            "timestamp": stamp()?,
            "status": LeadStatus::New.as_str(),
        });
        let response = self.send(self.http.post(url).json(&payload))?;
        let parsed: DataEnvelope<ProductLead> = decode(response, "decode created lead")?;
        Ok(parsed.data)
    }

    pub fn update_lead_status(&self, id: &LeadId, status: LeadStatus) -> Result<()> {
        let url = self.endpoint(&format!("/v1/product-leads/updateProductLead/{id}"))?;
        let payload = serde_json::json!({ "status": status.as_str() });
        self.send(self.http.put(url).json(&payload))?;
        Ok(())
    }

    pub fn delete_lead(&self, id: &LeadId) -> Result<()> {
        let url = self.endpoint(&format!("/v1/product-leads/deleteProductLead/{id}"))?;
        self.send(self.http.delete(url))?;
        Ok(())
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(response)
    }
}

/// Multipart body for a product create/update. `features` and `size` ride
/// as JSON-encoded strings; the backend stores them verbatim. Create stamps
/// both timestamps, update only touches `updatedAt`.
fn product_form(form: &ProductFormInput, stamp_created: bool) -> Result<Form> {
    let features = serde_json::to_string(&form.features).context("encode features")?;
    let size = serde_json::to_string(&form.size).context("encode size")?;
    let now = stamp()?;

    let mut multipart = Form::new()
        .text("title", form.title.clone())
        .text("category", form.category.clone())
        .text("price", form.price.to_string())
        .text("shortDescription", form.short_description.clone())
        .text("longDescription", form.long_description.clone())
        .text("features", features)
        .text("size", size)
        .text("updatedAt", now.clone());
    if stamp_created {
        multipart = multipart.text("createdAt", now);
    }
    if let Some(image) = &form.image {
        let part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
        multipart = multipart.part("image", part);
    }
    Ok(multipart)
}

fn stamp() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format timestamp")
}

fn decode<T: DeserializeOwned>(response: Response, what: &'static str) -> Result<T> {
    response.json().context(what)
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check api.base_url and that the backend is up ({} )",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(error) = parsed.error
            && !error.is_empty()
        {
            return anyhow!("server error ({}): {}", status.as_u16(), error);
        }
        if let Some(message) = parsed.message
            && !message.is_empty()
        {
            return anyhow!("server error ({}): {}", status.as_u16(), message);
        }
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ProductListData {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    pagination: PageInfo,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    message: Option<String>,
}
