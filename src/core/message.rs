//! Notification text for a single pairing.
//!
//! The message names only the receiver. Nothing identifying who gives to the
//! recipient is ever rendered.

use crate::config::ExchangeDetails;
use crate::domain::model::{OutgoingMessage, Pairing};

pub fn subject(details: &ExchangeDetails) -> String {
    format!("{} {}!", details.exchange_name, details.year)
}

pub fn render(details: &ExchangeDetails, pairing: &Pairing) -> OutgoingMessage {
    OutgoingMessage {
        recipient_name: pairing.giver.name.clone(),
        from: details.sender.clone(),
        to: pairing.giver.email.clone(),
        reply_to: details.reply_to.clone(),
        subject: subject(details),
        text_body: plain_text(details, pairing),
        html_body: html(details, pairing),
    }
}

fn guidelines(details: &ExchangeDetails) -> [String; 3] {
    [
        format!("Please keep your gift under {}", details.budget),
        "Gifts should be non-perishable (people may be traveling with them)".to_string(),
        "Be creative!".to_string(),
    ]
}

fn contact(details: &ExchangeDetails) -> &str {
    details.reply_to.as_deref().unwrap_or(&details.sender)
}

pub fn plain_text(details: &ExchangeDetails, pairing: &Pairing) -> String {
    let guidelines = guidelines(details)
        .iter()
        .map(|line| format!("    - {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Hi {name},

Thanks for taking part in the {year} {exchange}! The draw is fully automated, so nobody, not even the organizer, knows who got whom.

You will be getting a gift for {receiver}. Don't tell them!

A few guidelines for your gift:
{guidelines}

If you have ideas for your own secret santa, add them to the wish list: {wish_list}
Questions? Just send an email to {contact}.

Thanks!

This is an automated message sent by the {exchange}.
",
        name = pairing.giver.name,
        year = details.year,
        exchange = details.exchange_name,
        receiver = pairing.receiver.name,
        guidelines = guidelines,
        wish_list = details.wish_list,
        contact = contact(details),
    )
}

pub fn html(details: &ExchangeDetails, pairing: &Pairing) -> String {
    let guidelines = guidelines(details)
        .iter()
        .map(|line| format!("            <li>{}</li>", escape_html(line)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<html>
    <head></head>
    <body>
        <p>Hi {name},</p>
        <p>Thanks for taking part in the {year} {exchange}! The draw is fully
        automated, so nobody, not even the organizer, knows who got whom.</p>
        <p>You will be getting a gift for <b>{receiver}</b>. Don't tell them!</p>
        <p>A few guidelines for your gift:</p>
        <ul>
{guidelines}
        </ul>
        <p>If you have ideas for your own secret santa, add them to the
        <a href="{wish_list}">wish list</a>.
        Questions? Just send an email to {contact}.</p>
        <p>Thanks!</p>
        <p>This is an automated message sent by the {exchange}.</p>
    </body>
</html>
"#,
        name = escape_html(&pairing.giver.name),
        year = escape_html(&details.year),
        exchange = escape_html(&details.exchange_name),
        receiver = escape_html(&pairing.receiver.name),
        guidelines = guidelines,
        wish_list = escape_html(&details.wish_list),
        contact = escape_html(contact(details)),
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
