//! Validated cap table snapshot.
//!
//! `CapTable` freezes a set of share classes and transactions after checking
//! every numeric field and resolving every transaction's class name. The
//! waterfall engine only ever sees a `CapTable`, so the records it reads are
//! known to be well formed and are never mutated.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::types::{CapTableError, ShareClass, Transaction};

/// What to do with transactions naming a share class that does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ReferencePolicy {
    /// Reject the cap table with `UnknownShareClassReference`
    #[default]
    Strict,
    /// Keep the transaction and log a warning.
    ///
    /// Its shares still count toward total shares (diluting every class's
    /// ownership fraction) but it never receives a payout.
    Lenient,
}

impl ReferencePolicy {
    /// Get the name of this policy.
    pub fn name(&self) -> &'static str {
        match self {
            ReferencePolicy::Strict => "strict",
            ReferencePolicy::Lenient => "lenient",
        }
    }
}

/// Aggregate position of one share class across its transactions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClassHoldings {
    /// Total shares held
    pub shares: f64,
    /// Total dollars invested
    pub investment: f64,
    /// Number of transactions in the class
    pub transaction_count: usize,
}

impl ClassHoldings {
    /// Returns true if at least one transaction references the class.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.transaction_count > 0
    }
}

/// Ownership fractions keyed by the class name each transaction references.
///
/// Names appear in the order they are first referenced. Orphaned names are
/// included, so under the lenient policy known classes sum to less than one.
#[derive(Clone, Debug, PartialEq)]
pub struct Ownership {
    entries: Vec<(String, f64)>,
}

impl Ownership {
    /// Fraction held by `name`; zero if the name holds nothing.
    pub fn fraction(&self, name: &str) -> f64 {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Iterate over `(name, fraction)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), *f))
    }

    /// Sum of all fractions (one, up to rounding).
    pub fn total(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, (_, f)| acc + f)
    }

    /// Number of named holders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable, validated set of share classes and transactions.
///
/// # Examples
///
/// ```
/// use captable_core::{CapTable, CapTableError, ShareClass, Transaction};
///
/// let classes = vec![ShareClass::common(1, "Common", 1)];
/// let orphan = vec![Transaction::new(1, "Series Z", 100.0, 0.0)];
///
/// let err = CapTable::new(classes, orphan).unwrap_err();
/// assert!(matches!(err, CapTableError::UnknownShareClassReference { .. }));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CapTable {
    share_classes: Vec<ShareClass>,
    transactions: Vec<Transaction>,
    class_index: HashMap<String, usize>,
    orphaned: Vec<usize>,
    policy: ReferencePolicy,
}

impl CapTable {
    /// Validates the records under the strict reference policy.
    pub fn new(
        share_classes: Vec<ShareClass>,
        transactions: Vec<Transaction>,
    ) -> Result<Self, CapTableError> {
        Self::with_policy(share_classes, transactions, ReferencePolicy::Strict)
    }

    /// Validates the records under the given reference policy.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for negative or non-finite shares, investment,
    ///   preference multiples or caps
    /// - `EmptyShareClassName`, `DuplicateShareClassId`,
    ///   `DuplicateShareClassName`, `DuplicateTransactionId`
    /// - `UnknownShareClassReference` under `ReferencePolicy::Strict`
    pub fn with_policy(
        share_classes: Vec<ShareClass>,
        transactions: Vec<Transaction>,
        policy: ReferencePolicy,
    ) -> Result<Self, CapTableError> {
        let mut class_index = HashMap::with_capacity(share_classes.len());
        let mut class_ids = HashSet::with_capacity(share_classes.len());
        for (idx, sc) in share_classes.iter().enumerate() {
            sc.validate()?;
            if !class_ids.insert(sc.id) {
                return Err(CapTableError::DuplicateShareClassId(sc.id));
            }
            if class_index.insert(sc.name.clone(), idx).is_some() {
                return Err(CapTableError::DuplicateShareClassName(sc.name.clone()));
            }
        }

        let mut tx_ids = HashSet::with_capacity(transactions.len());
        let mut orphaned = Vec::new();
        for (idx, tx) in transactions.iter().enumerate() {
            tx.validate()?;
            if !tx_ids.insert(tx.id) {
                return Err(CapTableError::DuplicateTransactionId(tx.id));
            }
            if class_index.contains_key(&tx.share_class) {
                continue;
            }
            match policy {
                ReferencePolicy::Strict => {
                    return Err(CapTableError::UnknownShareClassReference {
                        transaction: tx.id,
                        share_class: tx.share_class.clone(),
                    });
                }
                ReferencePolicy::Lenient => {
                    warn!(
                        transaction = %tx.id,
                        share_class = %tx.share_class,
                        shares = tx.shares,
                        "transaction references unknown share class; shares dilute ownership but receive no payout"
                    );
                    orphaned.push(idx);
                }
            }
        }

        Ok(Self {
            share_classes,
            transactions,
            class_index,
            orphaned,
            policy,
        })
    }

    /// All share classes in declaration order.
    pub fn share_classes(&self) -> &[ShareClass] {
        &self.share_classes
    }

    /// All transactions in declaration order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The reference policy the table was validated under.
    pub fn policy(&self) -> ReferencePolicy {
        self.policy
    }

    /// Returns true if there are no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Looks up a share class by name.
    pub fn find_class(&self, name: &str) -> Option<&ShareClass> {
        self.class_index.get(name).map(|&idx| &self.share_classes[idx])
    }

    /// Per-class holdings, indexed parallel to [`share_classes`](Self::share_classes).
    ///
    /// Computed in a single pass over the transactions.
    pub fn holdings(&self) -> Vec<ClassHoldings> {
        let mut holdings = vec![ClassHoldings::default(); self.share_classes.len()];
        for tx in &self.transactions {
            if let Some(&idx) = self.class_index.get(&tx.share_class) {
                let h = &mut holdings[idx];
                h.shares += tx.shares;
                h.investment += tx.investment;
                h.transaction_count += 1;
            }
        }
        holdings
    }

    /// Holdings of a single class; zero if the class is unknown or unused.
    pub fn class_holdings(&self, name: &str) -> ClassHoldings {
        self.transactions
            .iter()
            .filter(|tx| tx.share_class == name)
            .fold(ClassHoldings::default(), |mut acc, tx| {
                acc.shares += tx.shares;
                acc.investment += tx.investment;
                acc.transaction_count += 1;
                acc
            })
    }

    /// Share classes referenced by at least one transaction, in declaration order.
    pub fn active_share_classes(&self) -> impl Iterator<Item = &ShareClass> {
        self.share_classes
            .iter()
            .filter(move |sc| self.transactions.iter().any(|tx| tx.share_class == sc.name))
    }

    /// Sum of shares across every transaction, orphaned ones included.
    pub fn total_shares(&self) -> f64 {
        self.transactions.iter().fold(0.0, |acc, tx| acc + tx.shares)
    }

    /// Ownership fractions, or `None` when total shares are zero.
    pub fn ownership(&self) -> Option<Ownership> {
        let total = self.total_shares();
        if total <= 0.0 {
            return None;
        }
        let mut entries: Vec<(String, f64)> = Vec::new();
        for tx in &self.transactions {
            let fraction = tx.shares / total;
            match entries.iter_mut().find(|(n, _)| *n == tx.share_class) {
                Some((_, f)) => *f += fraction,
                None => entries.push((tx.share_class.clone(), fraction)),
            }
        }
        Some(Ownership { entries })
    }

    /// Transactions whose class name did not resolve (lenient policy only).
    pub fn orphaned_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.orphaned.iter().map(move |&idx| &self.transactions[idx])
    }

    /// Consumes the table, returning the raw records.
    pub fn into_parts(self) -> (Vec<ShareClass>, Vec<Transaction>) {
        (self.share_classes, self.transactions)
    }
}
