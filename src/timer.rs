use log::debug;
use std::time::Instant;

/// Logs how long a named block took once it goes out of scope.
pub struct Timer {
    name: &'static str,
    started: Instant,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        debug!("   call: {name}");
        Self {
            name,
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("   time: {} took {} ms", self.name, self.elapsed_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_elapsed_increases() {
        let timer = Timer::start("test");
        let first = timer.elapsed_ms();
        std::thread::sleep(Duration::from_millis(20));
        assert!(timer.elapsed_ms() > first);
    }
}
