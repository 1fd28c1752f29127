//! Recurring due-day matching over a fixed 1-31 day ring.

use duebill_core::Bill;

/// Day-of-month values covered by a lookahead window starting today.
///
/// Day arithmetic runs on a fixed 1..31 ring, not the real calendar:
/// crossing a month boundary neither resets nor adjusts the count, so a
/// bill with `due_day` 31 can match while the current month has 30 days.
/// The window always contains at least today's day, even for a
/// non-positive lookahead.
pub fn due_day_window(today_day: u8, lookahead_days: i64) -> Vec<u8> {
    // One full ring covers every day; more steps would only repeat.
    let span = lookahead_days.clamp(1, 31);
    let mut days = Vec::with_capacity(span as usize);
    for i in 0..span {
        let day = ((i64::from(today_day) + i - 1) % 31 + 1) as u8;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    days
}

/// Unpaid bills whose due day falls inside the lookahead window, kept in
/// the order given (store order, not proximity).
pub fn due_soon(bills: &[Bill], today_day: u8, lookahead_days: i64) -> Vec<Bill> {
    let window = due_day_window(today_day, lookahead_days);
    bills
        .iter()
        .filter(|bill| !bill.paid && window.contains(&bill.due_day))
        .cloned()
        .collect()
}
