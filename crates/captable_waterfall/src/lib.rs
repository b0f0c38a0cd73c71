//! # Captable Waterfall (Engine Layer)
//!
//! Distributes exit proceeds across share classes according to liquidation
//! preferences, participation rights and caps.
//!
//! This crate provides:
//! - The three-phase allocation engine producing an auditable step list
//! - Per-class payout summaries bucketed by distribution type
//! - Exit-value sweeps for charting, evaluated in parallel with Rayon
//! - Priced round modelling (pre/post-money, dilution, new share issuance)
//! - Transport-agnostic request/response records for the outer service
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        captable_waterfall (Engine)      │
//! ├─────────────────────────────────────────┤
//! │  engine/   - preference, participation, │
//! │              residual phases            │
//! │  summary/  - per-class rollup           │
//! │  sweep/    - exit-value grid            │
//! │  round/    - priced round modelling     │
//! │  api/      - request/response records   │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │          captable_core (Core)           │
//! │  ShareClass, Transaction, CapTable      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use captable_core::presets::default_cap_table;
//! use captable_core::ExitAmount;
//! use captable_waterfall::{compute_detailed_waterfall, compute_summary_waterfall};
//!
//! let table = default_cap_table().unwrap();
//! let exit = ExitAmount::new(10_000_000.0).unwrap();
//!
//! let steps = compute_detailed_waterfall(&table, exit);
//! assert!(steps[0].is_starting);
//! assert_eq!(steps[1].label, "Series A (Liquidation Preference)");
//!
//! let summary = compute_summary_waterfall(&table, exit);
//! assert!((summary.total_payout() - 10_000_000.0).abs() < 1e-6);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod round;
pub mod step;
pub mod summary;
pub mod sweep;

// Re-export commonly used types
pub use config::{EngineConfig, ParticipationMode, SeniorityOrder};
pub use engine::{compute_detailed_waterfall, WaterfallEngine};
pub use error::WaterfallError;
pub use round::{issue_round, price_round, IssuedRound, RoundPricing, RoundTerms};
pub use step::{StepKind, WaterfallStep, RETAINED_BY_COMPANY};
pub use summary::{compute_summary_waterfall, PayoutComponents, SummaryEntry, WaterfallSummary};
pub use sweep::{compute_exit_distribution, exit_grid, ExitDistributionSweep, SweepConfig};
