//! # Client Quote Documents
//!
//! Turns a [`ClientQuote`] into something a client can receive: a printable
//! HTML page, a WhatsApp message and share link, plus the daily JSON backup.
//!
//! ## Data Flow
//! ```text
//! WorkOrder ──► ClientQuote::from_order ──┬──► render_quote_html ──► print / PDF
//!                (sale figures only)       │
//!                                          └──► whatsapp_message ──► whatsapp_link
//!                                                                  whatsapp://send?phone=52…
//! ```
//!
//! Every renderer here reads prices from the `ClientQuote`, never from the
//! order's tasks, so real costs have no path into these documents.

use askama::Template;
use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use url::Url;

use crate::budget::{ClientLine, ClientQuote};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::WorkOrder;

/// Base of the WhatsApp deep link.
pub const WHATSAPP_BASE_URL: &str = "whatsapp://send";

/// Characters left as they are in a URI component; everything else is
/// `%XX`-encoded, spaces included.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// =============================================================================
// HTML Quote
// =============================================================================

/// Printable quote page. Text fields are HTML-escaped by the template.
#[derive(Template)]
#[template(path = "quote.html")]
struct QuoteTemplate<'a> {
    shop: &'a str,
    order_id: &'a str,
    client: &'a str,
    vehicle: String,
    plates: &'a str,
    lines: &'a [ClientLine],
    total: Money,
}

/// Renders the printable quote.
///
/// Columns are Concepto, Refacciones, Mano de Obra and Subtotal. A missing
/// client name prints as `N/A`.
pub fn render_quote_html(order: &WorkOrder, quote: &ClientQuote, shop_name: &str) -> CoreResult<String> {
    let client = match order.client_name.trim() {
        "" => "N/A",
        name => name,
    };
    let vehicle = [
        order.vehicle.brand.as_str(),
        order.vehicle.model.as_str(),
        order.vehicle.year.as_str(),
    ]
    .join(" ")
    .trim()
    .to_string();

    let page = QuoteTemplate {
        shop: shop_name,
        order_id: &quote.order_id,
        client,
        vehicle,
        plates: &order.vehicle.plates,
        lines: &quote.lines,
        total: quote.total_sale,
    };
    Ok(page.render()?)
}

// =============================================================================
// WhatsApp
// =============================================================================

/// Plain-text quote for WhatsApp, using its `*bold*` markup.
///
/// ```text
/// *Presupuesto Taller Ruiz*
/// Orden: #250615-01
/// Vehículo: Nissan Versa
/// Placas: ABC-123
///
/// • Cambio de aceite: $800.00
///
/// *Total: $800.00*
/// ```
pub fn whatsapp_message(order: &WorkOrder, quote: &ClientQuote, shop_name: &str) -> String {
    let lines = quote
        .lines
        .iter()
        .map(|line| format!("• {}: {}", line.description, line.subtotal))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "*Presupuesto {}*\nOrden: #{}\nVehículo: {} {}\nPlacas: {}\n\n{}\n\n*Total: {}*",
        shop_name,
        quote.order_id,
        order.vehicle.brand,
        order.vehicle.model,
        order.vehicle.plates,
        lines,
        quote.total_sale,
    )
}

/// Builds `whatsapp://send?phone=<cc><digits>&text=<message>`.
///
/// Everything but digits is stripped from `phone` and `country_code`.
/// A phone with no digits left is rejected. The text is percent-encoded as
/// a URI component, so a space is `%20`, never `+`.
pub fn whatsapp_link(phone: &str, country_code: &str, message: &str) -> Result<Url, ValidationError> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "client_phone".to_string(),
        });
    }
    let cc: String = country_code.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut url = Url::parse(WHATSAPP_BASE_URL).map_err(|e| ValidationError::InvalidFormat {
        field: "whatsapp_link".to_string(),
        reason: e.to_string(),
    })?;
    url.set_query(Some(&format!(
        "phone={}{}&text={}",
        cc,
        digits,
        utf8_percent_encode(message, URI_COMPONENT)
    )));
    Ok(url)
}

/// Message plus link for an order in one step.
///
/// Fails with [`CoreError::MissingClientPhone`] when the order has no usable
/// phone number.
pub fn share_quote_link(order: &WorkOrder, shop_name: &str, country_code: &str) -> CoreResult<Url> {
    let quote = ClientQuote::from_order(order);
    let message = whatsapp_message(order, &quote, shop_name);

    whatsapp_link(&order.client_phone, country_code, &message).map_err(|e| match e {
        ValidationError::Required { .. } => CoreError::MissingClientPhone {
            order_id: order.id.clone(),
        },
        other => other.into(),
    })
}

// =============================================================================
// Daily Export
// =============================================================================

/// Backup document for one day's orders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyExport<'a> {
    /// `YYYY-MM-DD`
    pub export_date: String,
    pub total_orders: usize,
    pub orders: Vec<&'a WorkOrder>,
}

impl<'a> DailyExport<'a> {
    /// Picks the orders whose `created_at` falls on `date` (UTC).
    pub fn for_date(orders: &'a [WorkOrder], date: NaiveDate) -> Self {
        let orders: Vec<&WorkOrder> = orders
            .iter()
            .filter(|o| o.created_at.date_naive() == date)
            .collect();

        DailyExport {
            export_date: date.format("%Y-%m-%d").to_string(),
            total_orders: orders.len(),
            orders,
        }
    }
}

/// Pretty-printed JSON backup of the orders created on `date`.
///
/// This is a full backup, real costs included.
pub fn export_daily(orders: &[WorkOrder], date: NaiveDate) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DailyExport::for_date(orders, date))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::WorkTask;
    use chrono::{TimeZone, Utc};

    fn sample_order() -> WorkOrder {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap();
        let mut order = WorkOrder::new("250615-01", now);
        order.client_name = "Ana <Ruiz>".to_string();
        order.client_phone = "(55) 1234-5678".to_string();
        order.vehicle.brand = "Nissan".to_string();
        order.vehicle.model = "Versa".to_string();
        order.vehicle.year = "2019".to_string();
        order.vehicle.plates = "ABC-123".to_string();

        let mut oil = WorkTask::new(&order.id, now);
        oil.description = "Cambio de aceite".to_string();
        oil.sale_cost = Money::from_cents(500_00);
        oil.labor_sale_cost = Money::from_cents(300_00);
        oil.real_cost = Money::from_cents(217_00);
        oil.labor_real_cost = Money::from_cents(103_00);
        order.upsert_task(oil, now);

        let mut brakes = WorkTask::new(&order.id, now);
        brakes.description = "Balatas & discos".to_string();
        brakes.sale_cost = Money::from_cents(1_150_00);
        brakes.labor_sale_cost = Money::from_cents(50_00);
        brakes.real_cost = Money::from_cents(911_00);
        brakes.labor_real_cost = Money::from_cents(37_00);
        order.upsert_task(brakes, now);

        order
    }

    #[test]
    fn test_client_quote_totals() {
        let order = sample_order();
        let quote = ClientQuote::from_order(&order);
        assert_eq!(quote.lines.len(), 2);
        assert_eq!(quote.lines[0].subtotal, Money::from_cents(800_00));
        assert_eq!(quote.lines[1].subtotal, Money::from_cents(1_200_00));
        assert_eq!(quote.total_sale, Money::from_cents(2_000_00));
    }

    #[test]
    fn test_html_quote_has_no_real_cost_or_margin() {
        let order = sample_order();
        let html = render_quote_html(&order, &ClientQuote::from_order(&order), "Taller Ruiz").unwrap();

        assert!(html.contains("<th>Concepto</th>"));
        assert!(html.contains("<th>Refacciones</th>"));
        assert!(html.contains("<th>Mano de Obra</th>"));
        assert!(html.contains("$500.00"));
        assert!(html.contains("$1,200.00"));
        assert!(html.contains("Total: $2,000.00"));
        assert!(html.contains("Documento generado por Taller Ruiz"));

        // Real costs and margin ($320.00 + $948.00 → $732.00) never appear
        for leaked in ["217.00", "103.00", "911.00", "37.00", "320.00", "948.00", "732.00", "1,268.00"] {
            assert!(!html.contains(leaked), "leaked {leaked}");
        }
        assert!(!html.to_lowercase().contains("margen"));
    }

    #[test]
    fn test_html_escapes_free_text() {
        let order = sample_order();
        let html = render_quote_html(&order, &ClientQuote::from_order(&order), "Taller Ruiz").unwrap();
        assert!(html.contains("Ana &lt;Ruiz&gt;"));
        assert!(html.contains("Balatas &amp; discos"));
        assert!(!html.contains("<Ruiz>"));
    }

    #[test]
    fn test_html_without_client_name_shows_placeholder() {
        let mut order = sample_order();
        order.client_name.clear();
        let html = render_quote_html(&order, &ClientQuote::from_order(&order), "Taller").unwrap();
        assert!(html.contains("<p><span>Cliente:</span> N/A</p>"));
    }

    #[test]
    fn test_whatsapp_message_lines() {
        let order = sample_order();
        let message = whatsapp_message(&order, &ClientQuote::from_order(&order), "Taller Ruiz");

        assert!(message.starts_with("*Presupuesto Taller Ruiz*\nOrden: #250615-01\n"));
        assert!(message.contains("Vehículo: Nissan Versa\nPlacas: ABC-123"));
        assert!(message.contains("• Cambio de aceite: $800.00\n• Balatas & discos: $1,200.00"));
        assert!(message.ends_with("*Total: $2,000.00*"));
        assert!(!message.contains("217"));
    }

    #[test]
    fn test_whatsapp_link_strips_non_digits_and_encodes_text() {
        let link = whatsapp_link("(55) 1234-5678", "+52", "Total: $10 & más").unwrap();

        assert_eq!(link.scheme(), "whatsapp");
        let pairs: Vec<(String, String)> = link
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("phone".to_string(), "525512345678".to_string()));
        assert_eq!(pairs[1], ("text".to_string(), "Total: $10 & más".to_string()));
        assert!(!link.as_str().contains(' '));
    }

    #[test]
    fn test_whatsapp_link_encodes_spaces_as_percent_20() {
        let link = whatsapp_link("5512345678", "52", "Orden: #250615-01 Total $10").unwrap();

        assert_eq!(
            link.as_str(),
            "whatsapp://send?phone=525512345678&text=Orden%3A%20%23250615-01%20Total%20%2410"
        );
        assert!(!link.as_str().contains('+'));
    }

    #[test]
    fn test_whatsapp_link_keeps_literal_plus_encoded() {
        let link = whatsapp_link("5512345678", "52", "aceite + filtro").unwrap();
        assert!(link.as_str().ends_with("text=aceite%20%2B%20filtro"));
    }

    #[test]
    fn test_whatsapp_link_requires_phone() {
        assert!(matches!(
            whatsapp_link("", "52", "hola"),
            Err(ValidationError::Required { .. })
        ));
        assert!(whatsapp_link("n/a", "52", "hola").is_err());
    }

    #[test]
    fn test_share_quote_link_missing_phone() {
        let mut order = sample_order();
        order.client_phone = "   ".to_string();
        let err = share_quote_link(&order, "Taller", "52").unwrap_err();
        assert!(matches!(err, CoreError::MissingClientPhone { order_id } if order_id == "250615-01"));
    }

    #[test]
    fn test_export_daily_filters_by_date() {
        let today = sample_order();
        let yesterday_time = Utc.with_ymd_and_hms(2025, 6, 14, 23, 0, 0).unwrap();
        let yesterday = WorkOrder::new("250614-03", yesterday_time);

        let orders = vec![today, yesterday];
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let json = export_daily(&orders, date).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["exportDate"], "2025-06-15");
        assert_eq!(value["totalOrders"], 1);
        assert_eq!(value["orders"][0]["id"], "250615-01");
        assert!(json.contains("\n  \"exportDate\""));
    }

    #[test]
    fn test_export_daily_empty_day() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let json = export_daily(&[], date).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalOrders"], 0);
        assert_eq!(value["orders"].as_array().map(Vec::len), Some(0));
    }
}
