//! Request and Response models for the daemon API
//!
//! This module defines the DTOs (Data Transfer Objects) shared by the
//! daemon's handlers and the remote engine client.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    AcquireRequest, ExpireRequest, PutRequest, ReleaseRequest, RemoveIfRequest, ScanParams,
    MAX_KEY_LENGTH,
};
pub use responses::{
    AckResponse, EntryResponse, ExistsResponse, HealthResponse, KeysResponse, LockResponse,
    ReleasedResponse, RemovedResponse, TtlResponse,
};
