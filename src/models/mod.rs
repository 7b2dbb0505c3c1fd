mod category;
mod expense;
mod limit;

pub use category::ExpenseCategory;
pub use expense::{parse_amount, Expense, DATE_FORMAT};
pub use limit::SpendingLimit;
