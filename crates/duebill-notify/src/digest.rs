//! Digest rendering: one message summarizing the matched bills.

use duebill_core::{Bill, Notification};

pub const DIGEST_TITLE: &str = "Upcoming Bills Reminder";

/// Render the digest: one line per bill, amounts fixed to two decimals.
pub fn render_digest(bills: &[Bill]) -> Notification {
    let body = bills
        .iter()
        .map(|bill| {
            format!(
                "{} to {} due on day {} for ${:.2}",
                bill.name, bill.recipient, bill.due_day, bill.amount
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    Notification::new(DIGEST_TITLE, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_digest_lines_and_title() {
        let bills = vec![
            Bill {
                id: 1,
                name: "Rent".into(),
                recipient: "Landlord".into(),
                due_day: 5,
                amount: Decimal::new(120000, 2),
                paid: false,
            },
            Bill {
                id: 2,
                name: "Water".into(),
                recipient: "City".into(),
                due_day: 12,
                amount: Decimal::new(435, 1),
                paid: false,
            },
        ];
        let note = render_digest(&bills);
        assert_eq!(note.title, "Upcoming Bills Reminder");
        assert_eq!(
            note.body,
            "Rent to Landlord due on day 5 for $1200.00\nWater to City due on day 12 for $43.50"
        );
    }

    #[test]
    fn test_empty_digest_has_empty_body() {
        let note = render_digest(&[]);
        assert!(note.body.is_empty());
    }
}
