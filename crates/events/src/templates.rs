//! Plain-text email templates.

use workwear_core::confirmation::{ProtocolType, SnapshotItem};
use workwear_core::types::Timestamp;

use crate::delivery::EmailMessage;

/// Data for the "please confirm receipt" email.
#[derive(Debug, Clone)]
pub struct ConfirmationEmail<'a> {
    pub employee_name: &'a str,
    pub protocol_type: ProtocolType,
    pub items: &'a [SnapshotItem],
    pub link: &'a str,
    pub expires_at: Timestamp,
}

impl ConfirmationEmail<'_> {
    pub fn render(&self) -> EmailMessage {
        let subject = match self.protocol_type {
            ProtocolType::Single => "Please confirm receipt of your workwear",
            ProtocolType::BulkIssue => "Please confirm receipt of your workwear items",
            ProtocolType::BulkReturn => "Please confirm your workwear return",
        };

        let mut body = format!("Hello {},\n\n", self.employee_name);
        body.push_str("the following workwear was recorded for you:\n\n");
        for item in self.items {
            body.push_str(&format!(
                "  {} x {} (size {}, {})\n",
                item.quantity, item.name, item.size, item.category
            ));
        }
        body.push_str(&format!(
            "\nPlease confirm by opening this link:\n{}\n\nThe link is valid until {}.\n",
            self.link,
            self.expires_at.format("%Y-%m-%d %H:%M UTC")
        ));

        EmailMessage {
            subject: subject.to_string(),
            text_body: body,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use workwear_core::inventory::ItemCategory;

    use super::*;

    #[test]
    fn confirmation_email_lists_items_and_link() {
        let items = vec![SnapshotItem {
            name: "Softshell Jacket".to_string(),
            size: "L".to_string(),
            category: ItemCategory::Personalized,
            image_url: None,
            quantity: 2,
        }];
        let message = ConfirmationEmail {
            employee_name: "Anna Weber",
            protocol_type: ProtocolType::BulkIssue,
            items: &items,
            link: "https://ww.example.com/confirm/abc",
            expires_at: Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap(),
        }
        .render();

        assert_eq!(
            message.subject,
            "Please confirm receipt of your workwear items"
        );
        assert!(message.text_body.starts_with("Hello Anna Weber,"));
        assert!(message
            .text_body
            .contains("2 x Softshell Jacket (size L, PERSONALIZED)"));
        assert!(message
            .text_body
            .contains("https://ww.example.com/confirm/abc"));
        assert!(message.text_body.contains("2026-03-08 12:00 UTC"));
    }
}
