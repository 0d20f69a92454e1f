//! Friendships as a symmetric relation.
//!
//! One row per unordered pair, keyed by the lexicographically ordered
//! `(user_lo, user_hi)`, so "is A a friend of B" is a single lookup and the
//! two directions can never disagree. `requested_by` records who asked;
//! `accepted` flips when the other side confirms.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "friendships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_lo: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_hi: String,
    pub requested_by: String,
    pub accepted: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Canonical key for an unordered user pair.
pub(crate) fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::canonical_pair;

    #[test]
    fn pair_is_order_independent() {
        assert_eq!(canonical_pair("alice", "bob"), ("alice", "bob"));
        assert_eq!(canonical_pair("bob", "alice"), ("alice", "bob"));
    }
}
