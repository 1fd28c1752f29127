//! Terminal table rendering for bills.

use duebill_core::Bill;

const HEADERS: [&str; 6] = ["ID", "Name", "Recipient", "Due Day", "Amount", "Paid"];

/// Print bills as an aligned text table.
pub fn print_bills_table(bills: &[Bill]) {
    let rows: Vec<[String; 6]> = bills
        .iter()
        .map(|bill| {
            [
                bill.id.to_string(),
                bill.name.clone(),
                bill.recipient.clone(),
                bill.due_day.to_string(),
                format!("${:.2}", bill.amount),
                if bill.paid { "✅".into() } else { "❌".into() },
            ]
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    print_row(&HEADERS.map(String::from), &widths);
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &rows {
        print_row(row, &widths);
    }
}

fn print_row(cells: &[String; 6], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("{}", line.trim_end());
}
