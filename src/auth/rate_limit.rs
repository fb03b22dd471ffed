use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

const MAX_REQUESTS: usize = 120;
const WINDOW_SECS: u64 = 60;

/// Flat per-IP request-count throttle applied at the HTTP boundary.
/// Not per-resource; just a lid on total request volume.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a request for the given IP and report whether it pushed the
    /// IP over the window limit. Stale entries for the IP are pruned here.
    pub fn record(&self, ip: IpAddr) -> bool {
        let mut map = self.requests.lock().unwrap_or_else(|e| e.into_inner());
        let cutoff = Instant::now() - std::time::Duration::from_secs(WINDOW_SECS);

        let timestamps = map.entry(ip).or_default();
        timestamps.retain(|t| *t > cutoff);
        if timestamps.len() >= MAX_REQUESTS {
            return true;
        }
        timestamps.push(Instant::now());
        false
    }
}

/// Middleware function wrapping the limiter around every route.
pub async fn throttle(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if let Some(limiter) = req.app_data::<web::Data<RateLimiter>>() {
        let ip = req
            .peer_addr()
            .map(|addr| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        if limiter.record(ip) {
            let body = serde_json::json!({
                "success": false,
                "message": "Too many requests, please try again later",
            });
            let response = HttpResponse::TooManyRequests().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
