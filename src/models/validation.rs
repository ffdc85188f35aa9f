//! Structural validation of decoded orders.
//!
//! Checks presence and shape only. Cross-field consistency (for example item
//! track numbers matching the order's) is not enforced.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::{Uuid, Variant};

use crate::error::{OrderError, Result};
use crate::models::{Item, Order};

static E164: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").unwrap());

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").unwrap());

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap());

// == Identifier Format ==
/// Accepted syntax for `order_uid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdFormat {
    /// Version 4 UUID in canonical lowercase hyphenated form
    #[default]
    Uuid,
    /// 1-64 characters from `[A-Za-z0-9_-]`
    Token,
}

impl IdFormat {
    pub fn accepts(self, id: &str) -> bool {
        match self {
            // Braced, urn, simple and uppercase spellings would key the same
            // order differently.
            IdFormat::Uuid => Uuid::try_parse(id).is_ok_and(|uuid| {
                uuid.get_version_num() == 4
                    && uuid.get_variant() == Variant::RFC4122
                    && uuid.hyphenated().to_string() == id
            }),
            IdFormat::Token => TOKEN.is_match(id),
        }
    }
}

impl FromStr for IdFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uuid" => Ok(IdFormat::Uuid),
            "token" => Ok(IdFormat::Token),
            other => Err(format!("unknown order id format '{}'", other)),
        }
    }
}

impl fmt::Display for IdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdFormat::Uuid => f.write_str("uuid"),
            IdFormat::Token => f.write_str("token"),
        }
    }
}

// == Validator ==
/// Validates orders before they are persisted.
///
/// Every violation found is reported, joined into one
/// [`OrderError::ValidationFailed`] message.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderValidator {
    id_format: IdFormat,
}

impl OrderValidator {
    pub fn new(id_format: IdFormat) -> Self {
        Self { id_format }
    }

    pub fn validate(&self, order: &Order) -> Result<()> {
        let mut problems = Vec::new();

        if order.order_uid.is_empty() {
            problems.push("order_uid is required".to_string());
        } else if !self.id_format.accepts(&order.order_uid) {
            problems.push(format!("order_uid is not a valid {}", self.id_format));
        }

        required(&mut problems, "track_number", &order.track_number);
        required(&mut problems, "entry", &order.entry);
        required(&mut problems, "locale", &order.locale);
        required(&mut problems, "customer_id", &order.customer_id);

        let delivery = &order.delivery;
        required(&mut problems, "delivery.name", &delivery.name);
        required(&mut problems, "delivery.zip", &delivery.zip);
        required(&mut problems, "delivery.city", &delivery.city);
        required(&mut problems, "delivery.address", &delivery.address);
        required(&mut problems, "delivery.region", &delivery.region);
        if !E164.is_match(&delivery.phone) {
            problems.push("delivery.phone must be in E.164 format".to_string());
        }
        if !EMAIL.is_match(&delivery.email) {
            problems.push("delivery.email is not a valid email address".to_string());
        }

        let payment = &order.payment;
        required(&mut problems, "payment.transaction", &payment.transaction);
        required(&mut problems, "payment.currency", &payment.currency);
        non_negative(&mut problems, "payment.amount", payment.amount);
        non_negative(&mut problems, "payment.delivery_cost", payment.delivery_cost);
        non_negative(&mut problems, "payment.goods_total", payment.goods_total);
        non_negative(&mut problems, "payment.custom_fee", payment.custom_fee);

        if order.items.is_empty() {
            problems.push("items must contain at least one item".to_string());
        }
        for (i, item) in order.items.iter().enumerate() {
            check_item(&mut problems, i, item);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(OrderError::ValidationFailed(problems.join("; ")))
        }
    }
}

fn check_item(problems: &mut Vec<String>, i: usize, item: &Item) {
    let field = |name: &str| format!("items[{}].{}", i, name);

    required(problems, &field("track_number"), &item.track_number);
    required(problems, &field("name"), &item.name);
    non_negative(problems, &field("chrt_id"), item.chrt_id);
    non_negative(problems, &field("price"), item.price);
    non_negative(problems, &field("sale"), item.sale);
    non_negative(problems, &field("total_price"), item.total_price);
    non_negative(problems, &field("nm_id"), item.nm_id);
}

fn required(problems: &mut Vec<String>, field: &str, value: &str) {
    if value.is_empty() {
        problems.push(format!("{} is required", field));
    }
}

fn non_negative(problems: &mut Vec<String>, field: &str, value: i64) {
    if value < 0 {
        problems.push(format!("{} must not be negative", field));
    }
}
