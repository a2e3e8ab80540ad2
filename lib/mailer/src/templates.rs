//! HTML bodies for the transactional emails.
//!
//! Every interpolated value is escaped; callers pass raw user input.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Write;

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TicketLine {
    #[serde(alias = "type", alias = "ticketType")]
    pub name: String,
    pub quantity: u32,
    /// Unit price in dollars.
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub customer_name: String,
    pub order_id: String,
    pub event_name: String,
    pub tickets: Vec<TicketLine>,
    pub total: f64,
}

/// A rendered subject and body pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Turns newlines into paragraphs.
fn paragraphs(message: &str) -> String {
    message
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape_html(p).replace('\n', "<br>")))
        .collect()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body style=\"font-family:sans-serif;color:#222\">\
         <h1 style=\"font-size:20px\">{}</h1>{body}</body></html>",
        escape_html(title)
    )
}

pub fn order_confirmation(order: &OrderConfirmation) -> Rendered {
    let subject = format!("Your tickets for {}", order.event_name);

    let mut rows = String::new();
    let mut text_rows = String::new();
    for line in &order.tickets {
        let line_total = line.price * f64::from(line.quantity);
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&line.name),
            line.quantity,
            money(line_total)
        );
        let _ = writeln!(
            text_rows,
            "  {} x {}: {}",
            line.quantity,
            line.name,
            money(line_total)
        );
    }

    let body = format!(
        "<p>Hi {name},</p>\
         <p>Thank you for your order. Order number: <strong>{order_id}</strong></p>\
         <table><tr><th>Ticket</th><th>Qty</th><th>Amount</th></tr>{rows}</table>\
         <p><strong>Total: {total}</strong></p>\
         <p>We look forward to seeing you at {event}.</p>",
        name = escape_html(&order.customer_name),
        order_id = escape_html(&order.order_id),
        total = money(order.total),
        event = escape_html(&order.event_name),
    );

    let text = format!(
        "Hi {},\n\nThank you for your order. Order number: {}\n\n{}\nTotal: {}\n",
        order.customer_name,
        order.order_id,
        text_rows,
        money(order.total)
    );

    Rendered {
        html: layout(&subject, &body),
        subject,
        text,
    }
}

fn detail_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn admin_notification(subject: &str, message: &str, details: Option<&Map<String, Value>>) -> Rendered {
    let mut body = paragraphs(message);
    let mut text = format!("{message}\n");

    if let Some(details) = details.filter(|d| !d.is_empty()) {
        body.push_str("<table>");
        text.push('\n');
        for (key, value) in details {
            let value = detail_value(value);
            let _ = write!(
                body,
                "<tr><th align=\"left\">{}</th><td>{}</td></tr>",
                escape_html(key),
                escape_html(&value)
            );
            let _ = writeln!(text, "{key}: {value}");
        }
        body.push_str("</table>");
    }

    let subject = format!("[Reunion admin] {subject}");
    Rendered {
        html: layout(&subject, &body),
        subject,
        text,
    }
}

pub fn bulk(subject: &str, message: &str) -> Rendered {
    Rendered {
        subject: subject.to_string(),
        html: layout(subject, &paragraphs(message)),
        text: message.to_string(),
    }
}
