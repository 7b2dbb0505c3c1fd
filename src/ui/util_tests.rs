#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_keeps_short_text() {
    assert_eq!(truncate("Groceries", 12), "Groceries");
    assert_eq!(truncate("Groceries", 9), "Groceries");
}

#[test]
fn test_truncate_adds_ellipsis() {
    assert_eq!(truncate("Electricity bill for May", 11), "Electricit…");
}

#[test]
fn test_truncate_edge_widths() {
    assert_eq!(truncate("anything", 0), "");
    assert_eq!(truncate("anything", 1), "…");
    assert_eq!(truncate("", 4), "");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("चाय और नाश्ता", 4), "चाय…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_rupees() {
    assert_eq!(format_amount(dec!(850)), "₹850.00");
    assert_eq!(format_amount(dec!(1234.5)), "₹1,234.50");
    assert_eq!(format_amount(dec!(12345)), "₹12,345.00");
}

#[test]
fn test_format_amount_groups_lakh_and_crore() {
    assert_eq!(format_amount(dec!(150000)), "₹1,50,000.00");
    assert_eq!(format_amount(dec!(1234567.89)), "₹12,34,567.89");
    assert_eq!(format_amount(dec!(10000000)), "₹1,00,00,000.00");
    assert_eq!(format_amount(dec!(-250000.5)), "-₹2,50,000.50");
}

#[test]
fn test_format_amount_zero_and_negative() {
    assert_eq!(format_amount(dec!(0)), "₹0.00");
    assert_eq!(format_amount(dec!(-150)), "-₹150.00");
}

// ── progress_bar ──────────────────────────────────────────────

#[test]
fn test_progress_bar_fill() {
    assert_eq!(progress_bar(0.0, 4), "[░░░░]");
    assert_eq!(progress_bar(0.5, 4), "[██░░]");
    assert_eq!(progress_bar(1.0, 4), "[████]");
}

#[test]
fn test_progress_bar_clamps() {
    assert_eq!(progress_bar(3.2, 4), "[████]");
    assert_eq!(progress_bar(-1.0, 4), "[░░░░]");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 5);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_ends() {
    let (mut index, mut scroll) = (4, 2);
    scroll_to_bottom(&mut index, &mut scroll, 20, 5);
    assert_eq!((index, scroll), (19, 15));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}
