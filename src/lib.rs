//! # Lattice AMM
//!
//! Bin-based automated market maker engine: liquidity is partitioned into
//! discrete price bins instead of a single continuous curve. Swaps
//! execute against one *active* bin at a time; liquidity providers
//! deposit into specific bins and hold proportional LP shares per bin.
//!
//! The crate is a pure library — no runtime, no I/O. The host
//! environment owns the engine value, supplies caller identities and a
//! monotonic logical clock, and implements the
//! [`TokenLedger`](ledger::TokenLedger) seam for actual asset custody.
//!
//! # Quick Start
//!
//! ```rust
//! use lattice_amm::domain::{AccountId, Amount, BinId, Shares, TokenId};
//! use lattice_amm::engine::DlmmCore;
//! use lattice_amm::ledger::InMemoryLedger;
//! use lattice_amm::pool::PoolParams;
//! use lattice_amm::registry::FactorTable;
//!
//! let admin = AccountId::from_bytes([1u8; 32]);
//! let trader = AccountId::from_bytes([2u8; 32]);
//! let x = TokenId::from_bytes([10u8; 32]);
//! let y = TokenId::from_bytes([11u8; 32]);
//!
//! // 1. Register a bin step and fund the participants.
//! let mut core = DlmmCore::new(admin);
//! let table = FactorTable::uniform_step(25).expect("valid step");
//! core.registry_mut().add_bin_step(admin, 25, table).expect("registered");
//!
//! let mut ledger = InMemoryLedger::new();
//! ledger.mint(x, admin, Amount::new(10_000_000));
//! ledger.mint(y, admin, Amount::new(5_000_000_000));
//! ledger.mint(x, trader, Amount::new(1_000_000));
//!
//! // 2. Create a pool seeded at bin 0.
//! let params = PoolParams {
//!     x_token: x,
//!     y_token: y,
//!     x_seed: Amount::new(10_000_000),
//!     y_seed: Amount::new(5_000_000_000),
//!     burn_amount: Shares::new(1_000),
//!     x_protocol_fee: 1_000,
//!     x_provider_fee: 3_000,
//!     y_protocol_fee: 1_000,
//!     y_provider_fee: 3_000,
//!     bin_step: 25,
//!     variable_fees_cooldown: 900,
//!     freeze_variable_fees_manager: false,
//!     fee_address: admin,
//!     enabled: true,
//! };
//! let pool_id = core.create_pool(admin, params, 0, &mut ledger).expect("created");
//!
//! // 3. Swap against the active bin.
//! let outcome = core
//!     .swap_x_for_y(pool_id, x, y, BinId::ZERO, Amount::new(1_000_000), trader, &mut ledger)
//!     .expect("swap succeeded");
//! assert!(outcome.amount_out().get() > 0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │     Host      │  owns DlmmCore, supplies caller + clock + ledger
//! └──────┬───────┘
//!        │ operations (swap, add, withdraw, move, claim, setters)
//!        ▼
//! ┌──────────────┐     ┌──────────────┐
//! │    Engine     │────▶│   Registry    │  factor tables, admins, policy
//! └──────┬───────┘     └──────────────┘
//!        │ mutates                ▲
//!        ▼                        │ prices via math::bin_price
//! ┌──────────────┐     ┌──────────────┐
//! │  Bin Ledger   │     │     Math      │  div_round, mul_div, valuation
//! └──────────────┘     └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`BinId`](domain::BinId), [`Shares`](domain::Shares), … |
//! | [`math`] | Rounding-aware arithmetic and the bin price/valuation formulas |
//! | [`registry`] | Shared store: factor tables, admins, creation policy |
//! | [`pool`] | The bin ledger: reserves, positions, fee configuration |
//! | [`engine`] | [`DlmmCore`](engine::DlmmCore) and all state-transition operations |
//! | [`ledger`] | [`TokenLedger`](ledger::TokenLedger) seam to external asset custody |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod registry;
