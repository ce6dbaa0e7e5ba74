//! Execution environment as seen by the AR pipeline: origin + user agent.

/// AR runtime family, derived from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Scene Viewer via intent fallback.
    Android,
    /// Quick Look via the USDZ source.
    Ios,
    /// Desktop or unknown; only WebXR is possible.
    Other,
}

impl Platform {
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains("Android") {
            Platform::Android
        } else if ["iPhone", "iPad", "iPod"]
            .iter()
            .any(|device| user_agent.contains(device))
        {
            Platform::Ios
        } else {
            Platform::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// e.g. `https://food.test`, without a trailing slash.
    pub origin: String,
    pub user_agent: String,
}

impl Environment {
    pub fn new(origin: &str, user_agent: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::from_user_agent(&self.user_agent)
    }
}

/// User agent string for the host this binary runs on.
pub fn native_user_agent() -> String {
    let os = if cfg!(target_os = "android") {
        "Linux; Android"
    } else if cfg!(target_os = "ios") {
        "iPhone; CPU iPhone OS like Mac OS X"
    } else if cfg!(target_os = "macos") {
        "Macintosh"
    } else if cfg!(target_os = "windows") {
        "Windows NT 10.0"
    } else {
        "X11; Linux"
    };
    format!(
        "Mozilla/5.0 ({}) ar-gallery/{}",
        os,
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_platforms() {
        let android = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120 Mobile";
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
        let ipad = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X)";
        let desktop = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120";
        assert_eq!(Platform::from_user_agent(android), Platform::Android);
        assert_eq!(Platform::from_user_agent(iphone), Platform::Ios);
        assert_eq!(Platform::from_user_agent(ipad), Platform::Ios);
        assert_eq!(Platform::from_user_agent(desktop), Platform::Other);
    }

    #[test]
    fn origin_loses_trailing_slash() {
        let env = Environment::new("https://x.test/", "");
        assert_eq!(env.origin, "https://x.test");
    }
}
