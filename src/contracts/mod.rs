//! Shared contract types exchanged between the client and the API.
//!
//! Everything here serializes to the camelCase wire format the backend
//! expects.

mod query;
mod result;
mod sensor;
mod trail;

pub use query::{parse_query_options, QueryOptions, SortOrder};
pub use result::{ApiResult, ErrorResult, ResultMeta};
pub use sensor::{Clue, PendingScan, ScanEvent, ScanRequest, SensorApplication};
pub use trail::{Spot, Trail, TrailOptions, DEFAULT_DISCOVERY_RADIUS, DEFAULT_SCANNER_RADIUS};
