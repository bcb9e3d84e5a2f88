use chrono::{DateTime, Duration, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Next modification timestamp: `candidate` unless that would not move
/// strictly past `previous`, in which case one microsecond after it.
pub fn advance(previous: DateTime<Utc>, candidate: DateTime<Utc>) -> DateTime<Utc> {
    if candidate > previous {
        candidate
    } else {
        previous + Duration::microseconds(1)
    }
}
