// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use casatex_app::{
    AddOnProduct, Contact, ContactId, ContactStatus, LeadDetails, LeadId, LeadStatus, PageInfo,
    Product, ProductId, ProductLead, ProductSize,
};
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const WEAVES: [&str; 10] = [
    "Punja", "Chindi", "Panja", "Handloom", "Jacquard", "Dhurrie", "Kilim", "Flatweave", "Tufted",
    "Braided",
];

const ITEMS: [&str; 12] = [
    "Durry",
    "Carpet",
    "Runner",
    "Bath Mat",
    "Door Mat",
    "Area Rug",
    "Bedsheet",
    "Cushion Cover",
    "Table Runner",
    "Throw",
    "Curtain",
    "Prayer Mat",
];

const CATEGORIES: [&str; 8] = [
    "Durries",
    "Carpets",
    "Rugs",
    "Bath",
    "Bedding",
    "Cushions",
    "Curtains",
    "Table Linen",
];

const MATERIALS: [&str; 8] = [
    "cotton", "wool", "jute", "chenille", "polyester", "recycled yarn", "bamboo silk", "linen",
];

const FEATURES: [&str; 10] = [
    "Premium cotton",
    "Easy to maintain",
    "Reversible design",
    "Machine washable",
    "Fade resistant",
    "Handwoven",
    "Anti-skid backing",
    "Vacuum friendly",
    "Colorfast dyes",
    "Export quality",
];

const FIRST_NAMES: [&str; 14] = [
    "Bhumika", "Madhvi", "Ravi", "Priya", "Arjun", "Neha", "Kiran", "Sanjay", "Pooja", "Vikram",
    "Anita", "Rahul", "Meera", "Deepak",
];
const LAST_NAMES: [&str; 12] = [
    "Sharma", "Patel", "Verma", "Gupta", "Singh", "Mehta", "Joshi", "Reddy", "Nair", "Kapoor",
    "Bose", "Iyer",
];

const MESSAGES: [&str; 8] = [
    "Looking for bulk pricing on this item",
    "Do you ship internationally?",
    "Is a custom size available?",
    "Please share fabric swatches",
    "Interested in wholesale rates",
    "Can this be made in a different colour?",
    "Need delivery before the end of the month",
    "What is the lead time for a large order?",
];

const LEAD_STATUSES: [LeadStatus; 3] =
    [LeadStatus::New, LeadStatus::Contacted, LeadStatus::Completed];
const CONTACT_STATUSES: [ContactStatus; 2] = [ContactStatus::New, ContactStatus::Contacted];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic generator for storefront fixtures. The same seed always
/// produces the same sequence of products, leads, and contacts.
#[derive(Debug, Clone)]
pub struct StorefrontFaker {
    rng: DeterministicRng,
    counter: u64,
}

impl StorefrontFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            counter: 0,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn product(&mut self) -> Product {
        let weave = self.pick(&WEAVES);
        let item = self.pick(&ITEMS);
        let material = self.pick(&MATERIALS);
        let category = self.pick(&CATEGORIES).to_owned();
        let id = self.next_id("prod");

        let created = self.datetime_between(
            reference_now() - Duration::days(365),
            reference_now() - Duration::days(30),
        );
        let updated = self.datetime_between(created, reference_now());

        let mut features = Vec::new();
        let feature_count = 1 + self.rng.int_n(3);
        for _ in 0..feature_count {
            let feature = self.pick(&FEATURES).to_owned();
            if !features.contains(&feature) {
                features.push(feature);
            }
        }

        let length = f64::from(self.int_range(24, 120));
        let width = f64::from(self.int_range(16, 96));

        Product {
            id: ProductId::new(id.as_str()),
            title: format!("{weave} {item}"),
            category,
            price: f64::from(self.int_range(300, 15_000)),
            short_description: format!("Handcrafted {material} {}", item.to_ascii_lowercase()),
            long_description: format!(
                "A {} {} woven from {material}, finished by hand and checked for colorfastness.",
                weave.to_ascii_lowercase(),
                item.to_ascii_lowercase(),
            ),
            features,
            size: ProductSize { length, width },
            image_url: format!("/uploads/{id}.jpg"),
            created_at: format_timestamp(created),
            updated_at: format_timestamp(updated),
        }
    }

    pub fn products(&mut self, count: usize) -> Vec<Product> {
        (0..count).map(|_| self.product()).collect()
    }

    pub fn lead(&mut self) -> ProductLead {
        let main = self.add_on();
        let mut add_ons = vec![main];
        if self.rng.int_n(3) == 0 {
            add_ons.push(self.add_on());
        }

        ProductLead {
            id: LeadId::new(self.next_id("lead")),
            lead_details: self.lead_details(),
            add_on_products: add_ons,
            timestamp: format_timestamp(self.recent_datetime()),
            status: LEAD_STATUSES[self.rng.int_n(LEAD_STATUSES.len())],
        }
    }

    pub fn contact(&mut self) -> Contact {
        let (name, email) = self.person();
        Contact {
            id: ContactId::new(self.next_id("contact")),
            name,
            email,
            phone: self.phone(),
            message: self.pick(&MESSAGES).to_owned(),
            timestamp: format_timestamp(self.recent_datetime()),
            status: CONTACT_STATUSES[self.rng.int_n(CONTACT_STATUSES.len())],
        }
    }

    fn lead_details(&mut self) -> LeadDetails {
        let (name, email) = self.person();
        LeadDetails {
            name,
            email,
            phone: self.phone(),
            message: self.pick(&MESSAGES).to_owned(),
        }
    }

    fn add_on(&mut self) -> AddOnProduct {
        let product = self.product();
        AddOnProduct {
            id: product.id,
            title: product.title,
            category: product.category,
            quantity: 1 + self.rng.int_n(4) as u32,
            height: product.size.length,
            width: product.size.width,
            dimension: String::new(),
        }
    }

    fn person(&mut self) -> (String, String) {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let email = format!(
            "{}.{}@example.com",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase()
        );
        (format!("{first} {last}"), email)
    }

    fn phone(&mut self) -> String {
        format!("98{:08}", self.int_range(0, 99_999_999))
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}_{:04}", self.counter)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = (self.rng.next_u64() % (span as u64)) as i64;
        (i64::from(min) + offset) as i32
    }

    fn recent_datetime(&mut self) -> OffsetDateTime {
        self.datetime_between(reference_now() - Duration::days(180), reference_now())
    }

    fn datetime_between(&mut self, start: OffsetDateTime, end: OffsetDateTime) -> OffsetDateTime {
        let start_ts = start.unix_timestamp();
        let end_ts = end.unix_timestamp();
        if end_ts <= start_ts {
            return start;
        }
        let span = (end_ts - start_ts) as u64;
        let offset = self.rng.next_u64() % (span + 1);
        OffsetDateTime::from_unix_timestamp(start_ts + offset as i64).expect("valid unix timestamp")
    }
}

pub fn fixture_datetime() -> &'static str {
    "2026-02-19T12:34:56Z"
}

/// A raw product row the way the backend actually serves it, with `features`
/// and `size` as JSON-encoded strings rather than structured values.
pub fn wire_product_json(id: &str, title: &str) -> String {
    format!(
        r#"{{"id": "{id}", "title": "{title}", "category": "Durries", "price": "1500",
            "shortDescription": "Handwoven", "longDescription": "",
            "features": "[\"Premium cotton\", \"Easy to maintain\"]",
            "size": "{{\"length\": 72, \"width\": 48}}",
            "imageUrl": "/uploads/{id}.jpg",
            "createdAt": "{created}", "updatedAt": "{updated}",
            "__v": 0}}"#,
        created = fixture_datetime(),
        updated = fixture_datetime(),
    )
}

/// A full `{{"data": {{"products": [...], "pagination": {{...}}}}}}` listing
/// body for mock servers.
pub fn wire_product_list_json(products: &[String], pagination: &PageInfo) -> String {
    format!(
        r#"{{"data": {{"products": [{}], "pagination": {{
            "total": {}, "page": {}, "limit": {},
            "totalPages": {}, "hasNextPage": {}, "hasPrevPage": {}
        }}}}}}"#,
        products.join(", "),
        pagination.total,
        pagination.page,
        pagination.limit,
        pagination.total_pages,
        pagination.has_next_page,
        pagination.has_prev_page,
    )
}

pub fn page_info(total: u64, page: u32, limit: u32, total_pages: u32) -> PageInfo {
    PageInfo {
        total,
        page,
        limit,
        total_pages,
        has_next_page: page < total_pages,
        has_prev_page: page > 1,
    }
}

pub fn categories() -> &'static [&'static str] {
    &CATEGORIES
}

fn format_timestamp(datetime: OffsetDateTime) -> String {
    datetime.format(&Rfc3339).expect("RFC 3339 formattable")
}

fn reference_now() -> OffsetDateTime {
    let date = Date::from_calendar_date(REFERENCE_YEAR, Month::January, 1)
        .expect("valid calendar date");
    let midnight = Time::from_hms(0, 0, 0).expect("valid midnight");
    date.with_time(midnight).assume_utc()
}
