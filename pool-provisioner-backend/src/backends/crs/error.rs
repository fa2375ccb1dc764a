//! CRS error mapping.

use crate::traits::BackendErrorMapper;

use super::CrsBackend;

/// CRS distinguishes errors by HTTP status rather than embedded error codes,
/// so the default status mapping (401 → credentials, 403 → permission)
/// applies unchanged.
impl BackendErrorMapper for CrsBackend {
    fn backend_name(&self) -> &'static str {
        "crs"
    }
}
