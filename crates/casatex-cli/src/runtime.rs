// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use casatex_api::Client;
use casatex_app::{
    Contact, ContactFormInput, ContactId, ContactStatus, LeadFormInput, LeadId, LeadStatus,
    ListQuery, PageInfo, Product, ProductFormInput, ProductId, ProductLead,
};
use casatex_tui::ProductWriteTarget;

pub struct ApiRuntime<'a> {
    client: &'a Client,
}

impl<'a> ApiRuntime<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }
}

impl casatex_tui::AppRuntime for ApiRuntime<'_> {
    fn load_products(&mut self, query: &ListQuery) -> Result<(Vec<Product>, PageInfo)> {
        self.client.list_products(query)
    }

    fn load_product(&mut self, id: &ProductId) -> Result<Product> {
        self.client.get_product(id)
    }

    fn load_leads(&mut self) -> Result<Vec<ProductLead>> {
        self.client.list_leads()
    }

    fn load_contacts(&mut self) -> Result<Vec<Contact>> {
        self.client.list_contacts()
    }

    fn save_product(&mut self, target: &ProductWriteTarget, form: &ProductFormInput) -> Result<()> {
        match target {
            ProductWriteTarget::Create => self.client.create_product(form).map(|_| ()),
            ProductWriteTarget::Edit(id) => self.client.update_product(id, form).map(|_| ()),
        }
    }

    fn delete_product(&mut self, id: &ProductId) -> Result<()> {
        self.client.delete_product(id)
    }

    fn submit_inquiry(&mut self, form: &LeadFormInput) -> Result<()> {
        self.client.create_lead(form).map(|_| ())
    }

    fn submit_contact(&mut self, form: &ContactFormInput) -> Result<()> {
        self.client.create_contact(form).map(|_| ())
    }

    fn set_lead_status(&mut self, id: &LeadId, status: LeadStatus) -> Result<()> {
        self.client.update_lead_status(id, status)
    }

    fn delete_lead(&mut self, id: &LeadId) -> Result<()> {
        self.client.delete_lead(id)
    }

    fn set_contact_status(&mut self, id: &ContactId, status: ContactStatus) -> Result<()> {
        self.client.update_contact_status(id, status)
    }

    fn delete_contact(&mut self, id: &ContactId) -> Result<()> {
        self.client.delete_contact(id)
    }
}
