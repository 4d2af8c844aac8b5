// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use casatex_api::Client;
use casatex_app::{CatalogPager, LeadId, LeadStatus, ListQuery, ProductId, SuggestionIndex};
use casatex_testkit::{StorefrontFaker, page_info, wire_product_json, wire_product_list_json};
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Response, Server};

fn json_response(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body).with_status_code(200).with_header(
        Header::from_bytes("Content-Type", "application/json").expect("valid content type header"),
    )
}

#[test]
fn connection_error_names_the_base_url() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .get_product(&ProductId::new("prod_01"))
        .expect_err("request should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(message.contains("http://127.0.0.1:1"));
    assert!(message.contains("api.base_url"));
}

#[test]
fn list_products_sends_pagination_and_sort_params() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            request.url(),
            "/v1/products/getallProducts?page=1&limit=9&sortBy=updatedAt&sortOrder=desc"
        );
        let body = r#"{
            "data": {
                "products": [{"id": "prod_01", "title": "Punja Durry", "price": "1500"}],
                "pagination": {
                    "total": 40, "page": 1, "limit": 9,
                    "totalPages": 5, "hasNextPage": true, "hasPrevPage": false
                }
            }
        }"#;
        request
            .respond(json_response(body))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let pager = CatalogPager::new(9);
    let (products, pagination) = client.list_products(&pager.query())?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Punja Durry");
    assert_eq!(products[0].price, 1500.0);
    assert_eq!(pagination.total_pages, 5);
    assert!(pagination.has_next_page);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn filtered_list_omits_the_sort_params() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            request.url(),
            "/v1/products/getallProducts?page=1&limit=9&title=durry&category=Durries"
        );
        let body = r#"{"data": {"products": [], "pagination": {
            "total": 0, "page": 1, "limit": 9,
            "totalPages": 0, "hasNextPage": false, "hasPrevPage": false
        }}}"#;
        request
            .respond(json_response(body))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let mut pager = CatalogPager::new(9);
    pager.set_filters("durry", "Durries");
    let (products, _) = client.list_products(&pager.query())?;
    assert!(products.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn get_product_decodes_json_encoded_fields() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/v1/products/getProduct/prod_01");
        let body = r#"{"data": {
            "id": "prod_01",
            "title": "Handwoven Carpet",
            "features": "[\"Premium cotton\"]",
            "size": "{\"length\": 90, \"width\": 60}"
        }}"#;
        request
            .respond(json_response(body))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let product = client.get_product(&ProductId::new("prod_01"))?;
    assert_eq!(product.features, vec!["Premium cotton".to_owned()]);
    assert_eq!(product.size.length, 90.0);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn suggestion_fetch_requests_the_full_index() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let mut faker = StorefrontFaker::new(7);
    let products = faker.products(8);
    let body = serde_json::to_string(&serde_json::json!({
        "data": { "products": products, "pagination": page_info(8, 1, 1000, 1) }
    }))?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/v1/products/getallProducts?page=1&limit=1000");
        request
            .respond(json_response(&body))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let (fetched, _) = client.list_products(&ListQuery::for_suggestions(1000))?;
    assert_eq!(fetched.len(), 8);

    let index = SuggestionIndex::from_products(&fetched);
    assert!(!index.is_empty());
    for category in index.categories() {
        assert!(casatex_testkit::categories().contains(&category.as_str()));
    }

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn wire_format_rows_decode_through_the_listing() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let rows = vec![
        wire_product_json("prod_01", "Punja Durry"),
        wire_product_json("prod_02", "Wool Carpet"),
    ];
    let body = wire_product_list_json(&rows, &page_info(2, 1, 9, 1));

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(&body))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let pager = CatalogPager::new(9);
    let (products, pagination) = client.list_products(&pager.query())?;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].features.len(), 2);
    assert_eq!(products[0].size.width, 48.0);
    assert_eq!(pagination.total, 2);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn lead_status_update_sends_the_wire_string() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Put);
        assert_eq!(request.url(), "/v1/product-leads/updateProductLead/lead_01");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        assert_eq!(body, r#"{"status":"contacted"}"#);

        request
            .respond(json_response(r#"{"data": {"id": "lead_01", "status": "contacted"}}"#))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    client.update_lead_status(&LeadId::new("lead_01"), LeadStatus::Contacted)?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn backend_error_envelope_is_surfaced() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string(r#"{"message": "Product not found"}"#)
            .with_status_code(404)
            .with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .get_product(&ProductId::new("missing"))
        .expect_err("missing product should error");
    assert!(error.to_string().contains("Product not found"));
    assert!(error.to_string().contains("404"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn delete_product_hits_the_delete_endpoint() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Delete);
        assert_eq!(request.url(), "/v1/products/deleteProduct/prod_01");
        request
            .respond(json_response(r#"{"data": {"id": "prod_01"}}"#))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    client.delete_product(&ProductId::new("prod_01"))?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn create_product_sends_a_multipart_body() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "/v1/products/newProduct");

        let content_type = request
            .headers()
            .iter()
            .find(|header| header.field.equiv("Content-Type"))
            .map(|header| header.value.as_str().to_owned())
            .expect("content type header");
        assert!(content_type.starts_with("multipart/form-data"));

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        assert!(body.contains("name=\"title\""));
        assert!(body.contains("Punja Durry"));
        assert!(body.contains("name=\"features\""));
        assert!(body.contains(r#"[\"Premium cotton\"]"#) || body.contains(r#"["Premium cotton"]"#));
        assert!(body.contains("name=\"size\""));
        assert!(body.contains("name=\"createdAt\""));
        assert!(body.contains("name=\"updatedAt\""));
        assert!(body.contains("name=\"image\""));
        assert!(body.contains("filename=\"durry.jpg\""));

        request
            .respond(json_response(r#"{"data": {"id": "prod_new", "title": "Punja Durry"}}"#))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let mut form = casatex_app::FormPayload::blank_product();
    form.title = "Punja Durry".to_owned();
    form.category = "Durries".to_owned();
    form.price = 1500.0;
    form.short_description = "Handwoven".to_owned();
    form.features = vec!["Premium cotton".to_owned()];
    form.image = Some(casatex_app::ImageUpload {
        file_name: "durry.jpg".to_owned(),
        bytes: b"not a real jpeg".to_vec(),
    });

    let created = client.create_product(&form)?;
    assert_eq!(created.id, ProductId::new("prod_new"));

    handle.join().expect("server thread should join");
    Ok(())
}
