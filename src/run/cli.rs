use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;

use crate::analytics;
use crate::db::{Database, ExpenseFilter};
use crate::error::TrackerError;
use crate::models::{parse_amount, Expense, ExpenseCategory, SpendingLimit};
use crate::notifier::{MonthKey, Notifier, NotifierEvent};
use crate::ui::util::{format_amount, truncate};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "login" => cli_login(&args[2..], db),
        "logout" => cli_logout(db),
        "add" | "a" => cli_add(&args[2..], db),
        "edit" => cli_edit(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "list" | "ls" => cli_list(&args[2..], db),
        "limit" => cli_limit(&args[2..], db),
        "status" => cli_status(db, false),
        "check" => cli_status(db, true),
        "dismiss" => cli_dismiss(db),
        "summary" | "s" => cli_summary(db),
        "export" => cli_export(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendwatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SpendWatch - personal expense tracker with spending-limit warnings");
    println!();
    println!("Usage: spendwatch [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Launch interactive TUI");
    println!("  login <name>                    Start a session for a profile");
    println!("  logout                          End the session and reset warnings");
    println!("  add <amount> <category> <desc>  Record an expense");
    println!("    --date <YYYY-MM-DD>           Expense date (default: today)");
    println!("  edit <id>                       Change an expense");
    println!("    --amount, --category, --description, --date");
    println!("  delete <id>                     Delete an expense");
    println!("  list                            List expenses, newest first");
    println!("    --category <c> --from <date> --to <date>");
    println!("  limit [<amount> | clear]        Show, set or clear the monthly limit");
    println!("  status                          Show this month's spend and warnings");
    println!("  check                           Check spending against the limit now");
    println!("  dismiss                         Dismiss the 80% warning for 24 hours");
    println!("  summary                         Spending by month and category");
    println!("  export [path]                   Export expenses to CSV");
    println!("    --month <YYYY-MM>             Only this month");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
    println!();
    println!("Categories: {}", category_names());
}

// ── Argument helpers ─────────────────────────────────────────

const VALUE_FLAGS: &[&str] = &[
    "--date",
    "--amount",
    "--category",
    "--description",
    "--from",
    "--to",
    "--month",
];

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

fn category_names() -> String {
    ExpenseCategory::all()
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_category(s: &str) -> Result<ExpenseCategory> {
    ExpenseCategory::lookup(s).ok_or_else(|| {
        TrackerError::Validation(format!(
            "unknown category '{s}' (expected one of: {})",
            category_names()
        ))
        .into()
    })
}

fn parse_id(args: &[String]) -> Result<i64> {
    let raw = positionals(args)
        .first()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Missing expense ID"))?;
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Invalid expense ID: {raw}"))
}

fn require_session(db: &Database) -> Result<String> {
    db.session_user()?.ok_or_else(|| {
        TrackerError::Auth("no active session, run `spendwatch login <name>`".into()).into()
    })
}

fn today() -> String {
    Local::now().format(crate::models::DATE_FORMAT).to_string()
}

/// Run one notifier cycle and print whatever it emits.
fn refresh_and_report(db: &Database) -> Result<Notifier> {
    let mut notifier = Notifier::new();
    match notifier.refresh(db, db, Local::now()) {
        Ok(events) => {
            for event in &events {
                print_event(event);
            }
            Ok(notifier)
        }
        Err(e) => {
            print_event(&NotifierEvent::fetch_failed(&e));
            Err(e.into())
        }
    }
}

fn print_event(event: &NotifierEvent) {
    if event.is_error() {
        eprintln!("✖ {event}");
    } else if matches!(event, NotifierEvent::LimitApproachingEntered { .. }) {
        eprintln!("⚠ {event}");
    } else {
        println!("{event}");
    }
}

// ── Session ──────────────────────────────────────────────────

fn cli_login(args: &[String], db: &mut Database) -> Result<()> {
    let name = args.join(" ");
    if name.trim().is_empty() {
        anyhow::bail!("Usage: spendwatch login <name>");
    }
    db.start_session(&name)?;
    println!("Signed in as {}", name.trim());
    refresh_and_report(db)?;
    Ok(())
}

fn cli_logout(db: &mut Database) -> Result<()> {
    let mut notifier = Notifier::new();
    if let Err(e) = notifier.sign_out(db, Local::now()) {
        tracing::warn!(error = %e, "could not clear warning state on sign-out");
        eprintln!("Warning: {e}");
    }
    db.end_session()?;
    println!("You have been signed out.");
    Ok(())
}

// ── Expenses ─────────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    require_session(db)?;
    let pos = positionals(args);
    if pos.len() < 3 {
        anyhow::bail!("Usage: spendwatch add <amount> <category> <description> [--date YYYY-MM-DD]");
    }

    let amount = parse_amount(pos[0])?;
    let category = parse_category(pos[1])?;
    let description = pos[2..].join(" ");
    let date = flag_value(args, "--date")
        .map(str::to_string)
        .unwrap_or_else(today);

    let expense = Expense::new(description, amount, category, date);
    let id = db.insert_expense(&expense)?;
    println!(
        "Added #{id}: {} {} ({}) on {}",
        format_amount(expense.amount),
        expense.description.trim(),
        expense.category,
        expense.date
    );
    refresh_and_report(db)?;
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database) -> Result<()> {
    require_session(db)?;
    let id = parse_id(args)?;
    let mut expense = db
        .get_expense_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {id} not found"))?;

    if let Some(amount) = flag_value(args, "--amount") {
        expense.amount = parse_amount(amount)?;
    }
    if let Some(category) = flag_value(args, "--category") {
        expense.category = parse_category(category)?;
    }
    if let Some(description) = flag_value(args, "--description") {
        expense.description = description.to_string();
    }
    if let Some(date) = flag_value(args, "--date") {
        expense.date = date.to_string();
    }

    db.update_expense(&expense)?;
    println!("Updated #{id}");
    refresh_and_report(db)?;
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    require_session(db)?;
    let id = parse_id(args)?;
    if !db.delete_expense(id)? {
        anyhow::bail!("Expense {id} not found");
    }
    println!("Deleted #{id}");
    refresh_and_report(db)?;
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    require_session(db)?;
    let filter = ExpenseFilter {
        category: flag_value(args, "--category")
            .map(parse_category)
            .transpose()?,
        from: flag_value(args, "--from").map(str::to_string),
        to: flag_value(args, "--to").map(str::to_string),
        month: None,
    };
    let expenses = db.get_expenses(&filter)?;
    if expenses.is_empty() {
        println!("No expenses found for the selected filters.");
        return Ok(());
    }

    println!(
        "{:<5} {:<10} {:<28} {:<14} {:>12}",
        "ID", "Date", "Description", "Category", "Amount"
    );
    println!("{}", "─".repeat(73));
    for exp in &expenses {
        println!(
            "{:<5} {:<10} {:<28} {:<14} {:>12}",
            exp.id.unwrap_or(0),
            truncate(&exp.date, 10),
            truncate(&exp.description, 28),
            exp.category,
            format_amount(exp.amount),
        );
    }
    println!("{}", "─".repeat(73));
    println!(
        "{} expenses, total {}",
        expenses.len(),
        format_amount(analytics::total_spend(&expenses))
    );
    Ok(())
}

// ── Limit & warnings ─────────────────────────────────────────

fn cli_limit(args: &[String], db: &mut Database) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {
            match db.get_spending_limit()? {
                Some(limit) => println!("Monthly limit: {}", format_amount(limit)),
                None => println!("No spending limit set yet."),
            }
            Ok(())
        }
        Some("clear") => {
            db.clear_spending_limit()?;
            println!("Spending limit cleared.");
            Ok(())
        }
        Some(raw) => {
            let limit = SpendingLimit::new(parse_amount(raw)?)?;
            db.set_spending_limit(limit)?;
            println!("Spending limit set to {}", format_amount(limit.amount()));
            if db.session_user()?.is_some() {
                refresh_and_report(db)?;
            }
            Ok(())
        }
    }
}

fn cli_status(db: &mut Database, check: bool) -> Result<()> {
    let user = require_session(db)?;
    let notifier = refresh_and_report(db)?;
    let spend = notifier.current_month_spend();
    let warnings = notifier.warnings();

    println!("SpendWatch - {user} - {}", MonthKey::from_local(Local::now()));
    println!("{}", "─".repeat(40));
    println!("  Spent this month: {}", format_amount(spend));
    match notifier.limit().map(SpendingLimit::new).and_then(Result::ok) {
        Some(limit) => {
            println!("  Limit:            {}", format_amount(limit.amount()));
            println!("  Remaining:        {}", format_amount(limit.remaining(spend)));
            println!(
                "  Used:             {:.0}%",
                analytics::limit_ratio(spend, Some(limit.amount())) * 100.0
            );
        }
        None => println!("  Limit:            not set"),
    }

    if check {
        println!();
        if warnings.exceeded {
            println!("Spending limit exceeded!");
        } else {
            println!("Spending is within your set limit.");
        }
    } else if warnings.exceeded {
        println!();
        println!("  ✖ Limit exceeded");
    } else if warnings.approaching {
        println!();
        println!("  ⚠ Over 80% of your limit (dismiss with `spendwatch dismiss`)");
    }
    Ok(())
}

fn cli_dismiss(db: &mut Database) -> Result<()> {
    require_session(db)?;
    let mut notifier = refresh_and_report(db)?;
    match notifier.dismiss(db, Local::now()) {
        Ok(event) => print_event(&event),
        Err(e) => eprintln!("Warning: dismissal was not saved: {e}"),
    }
    Ok(())
}

// ── Analytics & export ───────────────────────────────────────

fn cli_summary(db: &mut Database) -> Result<()> {
    require_session(db)?;
    let expenses = db.get_all_expenses()?;
    if expenses.is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }

    println!("Total spending: {}", format_amount(analytics::total_spend(&expenses)));
    println!();
    println!("By month:");
    for (month, amount) in analytics::spending_by_month(&expenses) {
        println!("  {month:<10} {:>14}", format_amount(amount));
    }
    println!();
    println!("By category:");
    for (category, amount) in analytics::spending_by_category(&expenses) {
        println!("  {:<14} {:>14}", category.as_str(), format_amount(amount));
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    require_session(db)?;
    let month = flag_value(args, "--month").map(str::to_string);
    if let Some(m) = &month {
        if MonthKey::parse(m).is_none() {
            return Err(TrackerError::Validation(format!("'{m}' is not a YYYY-MM month")).into());
        }
    }

    let output_path = positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let suffix = month.as_deref().unwrap_or("all");
            format!("{home}/spendwatch-export-{suffix}.csv")
        });

    let filter = ExpenseFilter {
        month: month.clone(),
        ..Default::default()
    };
    let expenses = db.get_expenses(&filter)?;
    let count = crate::export::write_csv(&PathBuf::from(&output_path), &expenses)?;
    if count == 0 {
        println!("No expenses to export (wrote header only to {output_path})");
    } else {
        println!("Exported {count} expenses to {output_path}");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
