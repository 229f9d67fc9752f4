//! Test harness for lithophane panel generation.
//!
//! Provides synthetic images, a scripted end-to-end run and verification
//! oracles that report pass/fail verdicts instead of panicking.
//!
//! # Key Components
//!
//! - [`PanelRun`] — image → grid → mesh → STL in one call, with checks
//! - [`oracle`] — verification functions returning pass/fail verdicts
//! - [`report`] — plain-text summary of a finished run
//! - [`helpers`] — synthetic RGBA images and edge bookkeeping

pub mod helpers;
pub mod oracle;
pub mod report;
pub mod workflow;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::PanelReport;
pub use workflow::PanelRun;
