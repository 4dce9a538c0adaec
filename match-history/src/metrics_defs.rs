//! Metrics definitions for the match history pipeline.

use shared::metrics_defs::{MetricDef, MetricType};

pub const CACHE_HIT: MetricDef = MetricDef {
    name: "cache.hit",
    metric_type: MetricType::Counter,
    description: "Number of upstream calls served from the cache, labelled by call",
};

pub const CACHE_MISS: MetricDef = MetricDef {
    name: "cache.miss",
    metric_type: MetricType::Counter,
    description: "Number of upstream calls that populated the cache, labelled by call",
};

pub const UPSTREAM_REQUEST_DURATION: MetricDef = MetricDef {
    name: "upstream.request.duration",
    metric_type: MetricType::Histogram,
    description: "Time to complete an upstream request in seconds, labelled by call",
};

pub const UPSTREAM_REQUEST_ERROR: MetricDef = MetricDef {
    name: "upstream.request.error",
    metric_type: MetricType::Counter,
    description: "Number of failed upstream requests, labelled by call",
};

pub const SUMMARY_DEGRADED: MetricDef = MetricDef {
    name: "summary.degraded",
    metric_type: MetricType::Counter,
    description: "Number of matches summarized as a default entry",
};

pub const HISTORY_REQUEST_DURATION: MetricDef = MetricDef {
    name: "history.request.duration",
    metric_type: MetricType::Histogram,
    description: "Time to aggregate one match history in seconds",
};

pub const ALL_METRICS: &[MetricDef] = &[
    CACHE_HIT,
    CACHE_MISS,
    UPSTREAM_REQUEST_DURATION,
    UPSTREAM_REQUEST_ERROR,
    SUMMARY_DEGRADED,
    HISTORY_REQUEST_DURATION,
];
