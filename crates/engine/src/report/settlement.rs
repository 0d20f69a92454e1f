//! Settlement math over split expenses and their participant shares.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::split_participants::{ParticipantStatus, SplitParticipant};
use crate::SplitExpense;

use super::Diagnostics;

/// Total the given user still owes to other people's split expenses.
///
/// Only expenses created by someone else are considered, and only the
/// user's own share rows count. Shares settle once marked `Paid`, and
/// `Declined` shares are not debt either, so both are excluded.
pub fn total_owed_by_user(
    user_id: &str,
    split_expenses: &[SplitExpense],
    participants_by_expense: &HashMap<Uuid, Vec<SplitParticipant>>,
) -> (i64, Diagnostics) {
    let mut diagnostics = base_diagnostics(split_expenses, participants_by_expense);
    let mut owed_minor = 0;

    for expense in split_expenses {
        if expense.creator_id == user_id {
            continue;
        }
        let Some(participants) = participants_by_expense.get(&expense.id) else {
            continue;
        };
        for participant in participants.iter().filter(|p| p.user_id == user_id) {
            if participant.amount_due_minor <= 0 {
                diagnostics.malformed_records += 1;
                continue;
            }
            if participant.status.counts_toward_balance() {
                owed_minor += participant.amount_due_minor;
            }
        }
    }

    (owed_minor, diagnostics)
}

/// Total still owed to the given user across the split expenses they created.
///
/// Sums every share row of those expenses that has not settled, applying the
/// same `Paid`/`Declined` exclusions as [`total_owed_by_user`]. An expense
/// with no participant rows contributes nothing.
pub fn total_owed_to_user(
    user_id: &str,
    split_expenses: &[SplitExpense],
    participants_by_expense: &HashMap<Uuid, Vec<SplitParticipant>>,
) -> (i64, Diagnostics) {
    let mut diagnostics = base_diagnostics(split_expenses, participants_by_expense);
    let mut owed_minor = 0;

    for expense in split_expenses {
        if expense.creator_id != user_id {
            continue;
        }
        let Some(participants) = participants_by_expense.get(&expense.id) else {
            continue;
        };
        for participant in participants {
            if participant.amount_due_minor <= 0 {
                diagnostics.malformed_records += 1;
                continue;
            }
            if participant.status.counts_toward_balance() {
                owed_minor += participant.amount_due_minor;
            }
        }
    }

    (owed_minor, diagnostics)
}

/// Participants of one expense that have not paid yet.
///
/// Filters strictly on `status != Paid`, so declined shares still show up
/// here even though the owed totals ignore them. The returned iterator
/// borrows its input and can be cloned to walk the same rows again.
pub fn unpaid_participants(
    expense_id: Uuid,
    participants: &[SplitParticipant],
) -> impl Iterator<Item = &SplitParticipant> + Clone {
    participants
        .iter()
        .filter(move |p| p.split_expense_id == expense_id && p.status != ParticipantStatus::Paid)
}

/// Participant rows pointing at an expense id that does not exist.
pub fn orphaned_participant_count(
    split_expenses: &[SplitExpense],
    participants_by_expense: &HashMap<Uuid, Vec<SplitParticipant>>,
) -> u64 {
    let known: HashSet<Uuid> = split_expenses.iter().map(|e| e.id).collect();
    participants_by_expense
        .values()
        .flatten()
        .filter(|p| !known.contains(&p.split_expense_id))
        .count() as u64
}

fn base_diagnostics(
    split_expenses: &[SplitExpense],
    participants_by_expense: &HashMap<Uuid, Vec<SplitParticipant>>,
) -> Diagnostics {
    Diagnostics {
        orphaned_participants: orphaned_participant_count(split_expenses, participants_by_expense),
        ..Diagnostics::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn split(creator: &str, total_minor: i64) -> SplitExpense {
        SplitExpense {
            id: Uuid::new_v4(),
            creator_id: creator.to_string(),
            total_amount_minor: total_minor,
            description: Some("dinner".to_string()),
            created_at: Utc::now(),
        }
    }

    fn share(
        expense_id: Uuid,
        user: &str,
        amount_minor: i64,
        status: ParticipantStatus,
    ) -> SplitParticipant {
        SplitParticipant {
            id: Uuid::new_v4(),
            split_expense_id: expense_id,
            user_id: user.to_string(),
            amount_due_minor: amount_minor,
            status,
        }
    }

    fn three_way_dinner() -> (SplitExpense, HashMap<Uuid, Vec<SplitParticipant>>) {
        let expense = split("u1", 90);
        let participants = vec![
            share(expense.id, "u1", 30, ParticipantStatus::Paid),
            share(expense.id, "u2", 30, ParticipantStatus::Pending),
            share(expense.id, "u3", 30, ParticipantStatus::Pending),
        ];
        let mut by_expense = HashMap::new();
        by_expense.insert(expense.id, participants);
        (expense, by_expense)
    }

    #[test]
    fn creator_is_owed_the_unpaid_shares() {
        let (expense, by_expense) = three_way_dinner();
        let expenses = vec![expense];

        let (owed_to, diagnostics) = total_owed_to_user("u1", &expenses, &by_expense);
        assert_eq!(owed_to, 60);
        assert!(diagnostics.is_clean());

        let (owed_by_u2, _) = total_owed_by_user("u2", &expenses, &by_expense);
        assert_eq!(owed_by_u2, 30);

        let (owed_by_u1, _) = total_owed_by_user("u1", &expenses, &by_expense);
        assert_eq!(owed_by_u1, 0);
    }

    #[test]
    fn declined_shares_drop_out_of_both_totals() {
        let (expense, mut by_expense) = three_way_dinner();
        by_expense
            .get_mut(&expense.id)
            .unwrap()
            .iter_mut()
            .find(|p| p.user_id == "u2")
            .unwrap()
            .status = ParticipantStatus::Declined;
        let expenses = vec![expense];

        let (owed_to, _) = total_owed_to_user("u1", &expenses, &by_expense);
        assert_eq!(owed_to, 30);

        let (owed_by_u2, _) = total_owed_by_user("u2", &expenses, &by_expense);
        assert_eq!(owed_by_u2, 0);
    }

    #[test]
    fn accepted_shares_still_count_as_debt() {
        let (expense, mut by_expense) = three_way_dinner();
        by_expense
            .get_mut(&expense.id)
            .unwrap()
            .iter_mut()
            .find(|p| p.user_id == "u3")
            .unwrap()
            .status = ParticipantStatus::Accepted;
        let expenses = vec![expense];

        let (owed_to, _) = total_owed_to_user("u1", &expenses, &by_expense);
        assert_eq!(owed_to, 60);
        let (owed_by_u3, _) = total_owed_by_user("u3", &expenses, &by_expense);
        assert_eq!(owed_by_u3, 30);
    }

    #[test]
    fn expense_without_participants_contributes_zero() {
        let expense = split("u1", 120);
        let expenses = vec![expense];
        let by_expense = HashMap::new();

        let (owed_to, diagnostics) = total_owed_to_user("u1", &expenses, &by_expense);
        assert_eq!(owed_to, 0);
        assert!(diagnostics.is_clean());
    }

    #[test]
    fn orphaned_participant_is_a_diagnostic_not_a_debt() {
        let (expense, mut by_expense) = three_way_dinner();
        let ghost = Uuid::new_v4();
        by_expense.insert(
            ghost,
            vec![share(ghost, "u2", 500, ParticipantStatus::Pending)],
        );
        let expenses = vec![expense];

        let (owed_by_u2, diagnostics) = total_owed_by_user("u2", &expenses, &by_expense);
        assert_eq!(owed_by_u2, 30);
        assert_eq!(diagnostics.orphaned_participants, 1);

        let (owed_to_u1, diagnostics) = total_owed_to_user("u1", &expenses, &by_expense);
        assert_eq!(owed_to_u1, 60);
        assert_eq!(diagnostics.orphaned_participants, 1);
    }

    #[test]
    fn non_positive_share_is_malformed() {
        let expense = split("u1", 90);
        let mut by_expense = HashMap::new();
        by_expense.insert(
            expense.id,
            vec![
                share(expense.id, "u2", -30, ParticipantStatus::Pending),
                share(expense.id, "u3", 30, ParticipantStatus::Pending),
            ],
        );
        let expenses = vec![expense];

        let (owed_to, diagnostics) = total_owed_to_user("u1", &expenses, &by_expense);
        assert_eq!(owed_to, 30);
        assert_eq!(diagnostics.malformed_records, 1);
    }

    #[test]
    fn unpaid_filter_keeps_everything_but_paid_and_restarts_cleanly() {
        let (expense, by_expense) = three_way_dinner();
        let mut participants = by_expense[&expense.id].clone();
        participants
            .iter_mut()
            .find(|p| p.user_id == "u3")
            .unwrap()
            .status = ParticipantStatus::Declined;
        // A row from some other expense must not slip in.
        participants.push(share(Uuid::new_v4(), "u4", 10, ParticipantStatus::Pending));

        let unpaid = unpaid_participants(expense.id, &participants);
        let second_pass = unpaid.clone();

        let users: Vec<&str> = unpaid.map(|p| p.user_id.as_str()).collect();
        assert_eq!(users, vec!["u2", "u3"]);
        assert_eq!(second_pass.count(), 2);
    }
}
