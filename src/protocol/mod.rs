//! Wire protocol of the analysis service.
//!
//! ## Endpoints
//!
//! | Method | Path                         | Body / Result                    |
//! |--------|------------------------------|----------------------------------|
//! | POST   | `/api/analyze`               | compressed [`AnalyzeRequest`]    |
//! | GET    | `/api/resultformat`          | `[ResultFormat]`                 |
//! | GET    | `/api/resultformat/default`  | [`ResultFormat`]                 |
//! | GET    | `/api/target`                | `[TargetEntry]`                  |
//! | GET    | `AnalyzeResponse::result_url`| report bytes                     |
//!
//! ## Submission flow
//!
//! ```text
//! Client                             Service
//!    |                                  |
//!    |--- POST /api/analyze (gzip) ---->|
//!    |<-- 202 Accepted, Retry-After ----|   analysis still running
//!    |        (wait Retry-After)        |
//!    |--- POST /api/analyze (same) ---->|
//!    |<-- 200 OK {AnalyzeResponse} -----|   done
//!    |                                  |
//!    |--- GET result_url -------------->|   Authorization: Bearer <token>
//!    |<-- 200 OK <report bytes> --------|   Content-Type: <mime>
//! ```
//!
//! Every response may carry an `Endpoint-Status` header; see [`EndpointStatus`].

mod request;
mod response;
mod status;

pub use request::{AnalyzeRequest, AnalyzeRequestBuilder, AssemblyInfo, RequestFlags};
pub use response::{AnalyzeResponse, Report, ResultFormat, TargetEntry, TargetInfo};
pub use status::{EndpointStatus, RetryDirective};

/// Version tag carried in every [`AnalyzeRequest`]
pub const REQUEST_VERSION: u32 = 2;

/// Submission endpoint
pub const ANALYZE_PATH: &str = "api/analyze";

/// Result format listing endpoint
pub const RESULT_FORMATS_PATH: &str = "api/resultformat";

/// Default result format endpoint
pub const DEFAULT_RESULT_FORMAT_PATH: &str = "api/resultformat/default";

/// Target platform listing endpoint
pub const TARGETS_PATH: &str = "api/target";

/// Request header naming the client implementation
pub const CLIENT_TYPE_HEADER: &str = "client-type";

/// Request header carrying the client version
pub const CLIENT_VERSION_HEADER: &str = "client-version";

/// Response header carrying [`EndpointStatus`]
pub const ENDPOINT_STATUS_HEADER: &str = "endpoint-status";

/// Response header carrying the poll delay on `202 Accepted`
pub const RETRY_AFTER_HEADER: &str = "retry-after";
