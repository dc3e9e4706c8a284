use serde::Serialize;
use utoipa::ToSchema;

/// Payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service condition, `"ok"` or `"degraded"`.
    #[schema(value_type = String)]
    pub status: ServiceStatus,
}

/// Coarse service condition derived from storage connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Storage is reachable and all operations are live.
    Ok,
    /// Running without storage; mutating operations are rejected.
    Degraded,
}

impl HealthResponse {
    /// Build the payload from the degraded-mode flag.
    pub fn from_degraded(degraded: bool) -> Self {
        let status = if degraded {
            ServiceStatus::Degraded
        } else {
            ServiceStatus::Ok
        };
        Self { status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_flag_maps_to_the_wire_status() {
        let healthy = serde_json::to_value(HealthResponse::from_degraded(false)).unwrap();
        assert_eq!(healthy["status"], "ok");

        let degraded = serde_json::to_value(HealthResponse::from_degraded(true)).unwrap();
        assert_eq!(degraded["status"], "degraded");
    }
}
