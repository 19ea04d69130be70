// [crates/windi-guard/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WINDI GOVERNANCE GUARD (COMPONENT F)
 * CLASIFICACIÓN: SUPERVISORY DAEMON
 * RESPONSABILIDAD: HEALTH, CHAIN, ISP, AND FLOW PROBES
 *
 * Six sub-modules, six independent intervals, one shared relational
 * store. A failing probe is logged at its own boundary; the others keep
 * ticking regardless (§5 — "sub-modules never block each other").
 * =================================================================
 */

pub mod alert_engine;
pub mod chain_watcher;
pub mod error;
pub mod flow_monitor;
pub mod guard;
pub mod hash_chain;
pub mod health_probe;
pub mod isp_scanner;
pub mod models;
pub mod report_builder;
pub mod storage;

pub use alert_engine::AlertEngine;
pub use chain_watcher::ChainWatcher;
pub use error::{GuardError, Result};
pub use flow_monitor::FlowMonitor;
pub use guard::{FlowSource, Guard, IspProfileSource};
pub use health_probe::HealthProbe;
pub use isp_scanner::{IspProfile, IspScanner};
pub use report_builder::ReportBuilder;
pub use storage::{GuardDb, GuardRepository};
