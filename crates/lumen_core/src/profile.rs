use std::time::Instant;

/// Scope timer. Logs the elapsed wall-clock time when dropped.
///
/// ```ignore
/// let _profile = Profile::new("Build BVH");
/// // ... work ...
/// // logs: Profile "Build BVH": 12 ms
/// ```
pub struct Profile {
    name: String,
    start: Instant,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Drop for Profile {
    fn drop(&mut self) {
        log::info!("Profile \"{}\": {} ms", self.name, self.elapsed_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_monotonic() {
        let profile = Profile::new("test");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(profile.elapsed_ms() >= 5);
    }
}
