//! Response DTOs for the order API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::pipeline::IngestSnapshot;

/// Cache half of the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsBody {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_entries: usize,
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsBody {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            capacity: stats.capacity,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStatsBody,
    pub ingestion: IngestSnapshot,
}

impl StatsResponse {
    pub fn new(cache: CacheStats, ingestion: IngestSnapshot) -> Self {
        Self {
            cache: cache.into(),
            ingestion,
        }
    }
}

/// Response body for POST /api/orders
#[derive(Debug, Clone, Serialize)]
pub struct PublishResponse {
    /// Stream offset assigned to the published record
    pub offset: u64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_hit_rate() {
        let mut cache = CacheStats::new(10);
        for _ in 0..8 {
            cache.record_hit();
        }
        cache.record_miss();
        cache.record_miss();

        let resp = StatsResponse::new(cache, IngestSnapshot::default());
        assert!((resp.cache.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.cache.capacity, 10);
    }

    #[test]
    fn test_stats_response_serialize() {
        let resp = StatsResponse::new(CacheStats::new(2), IngestSnapshot::default());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["cache"]["hit_rate"], 0.0);
        assert_eq!(json["ingestion"]["stored"], 0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"error\":\"Something went wrong\""));
    }
}
