use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use signal_hook::{consts::signal::*, low_level};

/// Counts received SIGINT/SIGTERM. The first one asks long running loops to stop at
/// their next checkpoint, the third one falls back to the default handler.
#[derive(Clone, Debug)]
pub struct Cookie {
    count: Arc<AtomicUsize>,
}

impl Cookie {
    pub fn new() -> Result<Self, std::io::Error> {
        let cookie = Self::detached();

        for flag in [SIGINT, SIGTERM] {
            let count = Arc::clone(&cookie.count);
            // SAFETY: this only uses atomic stuff and functions the crate itself is using
            // in signal handlers
            unsafe {
                low_level::register(flag, move || {
                    let prev = count.fetch_add(1, Ordering::SeqCst);
                    if prev >= 2 {
                        let _ = low_level::emulate_default_handler(flag);
                    }
                })?;
            };
        }

        Ok(cookie)
    }

    /// A cookie that isn't connected to any signal, only to [`Cookie::terminate`].
    pub fn detached() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn terminate(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_terminating(&self) -> bool {
        self.count.load(Ordering::SeqCst) >= 1
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detached_terminates_on_request() {
        let cookie = Cookie::detached();
        let clone = cookie.clone();
        assert!(!cookie.is_terminating());
        clone.terminate();
        assert!(cookie.is_terminating());
    }
}
