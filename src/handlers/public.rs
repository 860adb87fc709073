use crate::config;

/// GET / - plain-text greeting; enthusiasm is configurable.
pub async fn greeting() -> &'static str {
    if config::config().server.excited {
        "Hello!!!!!"
    } else {
        "Hello"
    }
}

/// GET /coolkids - plain-text easter egg.
pub async fn coolkids() -> &'static str {
    "Be cool, man, be coooool!"
}
