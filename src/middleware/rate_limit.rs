// Rate limiting for the login endpoint
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::IntoResponse, Extension};

use crate::{
    error::{ErrorMessage, HttpError},
    AppState,
};

/// Sliding-window request counter keyed by client.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        self.is_allowed_at(key, Instant::now())
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        match self.requests.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn is_allowed_at(&self, key: &str, now: Instant) -> bool {
        // A poisoned lock still holds usable counters.
        let mut requests = match self.requests.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Remove old requests outside the window, and clients with none left
        for timestamps in requests.values_mut() {
            timestamps.retain(|&timestamp| now.duration_since(timestamp) < self.window);
        }
        requests.retain(|_, timestamps| !timestamps.is_empty());

        let entry = requests.entry(key.to_string()).or_default();
        if entry.len() < self.max_requests {
            entry.push(now);
            true
        } else {
            false
        }
    }
}

fn get_client_id(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn login_rate_limit(
    Extension(app_state): Extension<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let client_id = get_client_id(&request);

    if !app_state.login_limiter.is_allowed(&client_id) {
        tracing::warn!("Login rate limit hit for {}", client_id);
        return Err(HttpError::too_many_requests(ErrorMessage::TooManyAttempts.to_string()));
    }

    Ok(next.run(request).await)
}

pub fn login_rate_limiter() -> RateLimiter {
    RateLimiter::new(5, Duration::from_secs(60)) // 5 attempts per minute
}
