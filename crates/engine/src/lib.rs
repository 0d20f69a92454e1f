pub use categories::Category;
pub use commands::{
    ExpenseCmd, GoalCmd, IncomeCmd, SplitCmd, UpdateExpenseCmd, UpdateGoalCmd, UpdateIncomeCmd,
};
pub use error::EngineError;
pub use incomes::Income;
pub use ops::{
    CategoryTotal, Engine, EngineBuilder, ExpenseListFilter, FriendLink, FriendshipStatus,
    IncomeListFilter, MonthlySummary, SettlementOverview, SplitExpenseView,
};
pub use savings_goals::SavingsGoal;
pub use split_expenses::SplitExpense;
pub use split_participants::{ParticipantStatus, SplitParticipant};
pub use transactions::Transaction;

mod categories;
mod commands;
mod error;
mod friendships;
mod incomes;
mod ops;
pub mod report;
mod savings_goals;
mod split_expenses;
mod split_participants;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
