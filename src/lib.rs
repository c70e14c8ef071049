//! DTC Object Manager
//!
//! Typed client-side mapper for the WAPI configuration store. Callers describe
//! DTC pools, DTC servers and forward zones by human-readable names; the
//! manager resolves those names into store references, assembles wire objects
//! and hands them to a [`Connector`] for the actual round trip.
//!
//! # Flow
//!
//! ```text
//! ObjectManager operation
//!        │  validate mandatory-field combinations
//!        ▼
//! Nested-field normalizer ──► ReferenceResolver ──► Connector::get_object
//!        │
//!        ▼
//! Object builders (pure) ──► Connector::create/update/delete_object
//! ```
//!
//! Nothing above the connector holds state across calls. Every operation
//! resolves references fresh and performs at most one write per object.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use dtc_object_manager::{ObjectManager, PoolSpec, LbMethod, WapiConfig, WapiConnector};
//!
//! let config = WapiConfig::from_file("config/wapi.yaml")?;
//! let manager = ObjectManager::new(Arc::new(WapiConnector::new(&config)?));
//!
//! let pool = manager
//!     .create_dtc_pool(PoolSpec::new("dtc_pool_20", LbMethod::RoundRobin).with_ttl(70))
//!     .await?;
//! ```

pub mod codec;
pub mod config;
pub mod connector;
pub mod error;
pub mod manager;
pub mod normalize;
pub mod objects;
pub mod resolver;

pub use codec::{CollectionState, ExtAttrs, NullableCollection};
pub use config::WapiConfig;
pub use connector::{http::WapiConnector, Connector, ConnectorError, QueryParams};
pub use error::{ObjectManagerError, Operation, ValidationError};
pub use manager::{ObjectManager, PoolSpec, ServerSpec, ZoneForwardSpec, ZoneForwardUpdate};
pub use normalize::{ConsolidatedMonitorInput, DynamicRatioInput, ServerMonitorInput};
pub use objects::{
    Availability, DtcHealth, DtcMonitor, DtcPool, DtcPoolConsolidatedMonitorHealth, DtcServer,
    DtcServerLink, DtcServerMonitor, DynamicRatioMethod, ForwardingMemberServer, LbMethod,
    MonitorWeighing, NameServer, SettingDynamicRatio, ZoneForward,
};
pub use resolver::{MonitorKind, MonitorName, ObjectCategory, ReferenceResolver};
