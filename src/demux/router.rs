/// Where a single line should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Primary,
    Secondary,
    /// The line is the sentinel that triggered the switch; write it nowhere
    Drop,
}

/// One-way routing latch for a single producer invocation.
///
/// Starts on the primary sink and switches to the secondary sink the first
/// time the sentinel line is seen. It never switches back, so any later
/// sentinel line is routed to the secondary sink like ordinary output.
#[derive(Debug, Clone)]
pub struct SentinelRouter<'a> {
    sentinel: &'a str,
    use_primary: bool,
}

impl<'a> SentinelRouter<'a> {
    pub fn new(sentinel: &'a str) -> Self {
        Self {
            sentinel,
            use_primary: true,
        }
    }

    pub fn route(&mut self, line: &str) -> Route {
        if !self.use_primary {
            return Route::Secondary;
        }
        if line == self.sentinel {
            self.use_primary = false;
            return Route::Drop;
        }
        Route::Primary
    }

    pub fn is_primary(&self) -> bool {
        self.use_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demux::SENTINEL;

    #[test]
    fn test_starts_on_primary() {
        let mut router = SentinelRouter::new(SENTINEL);
        assert!(router.is_primary());
        assert_eq!(router.route("hello"), Route::Primary);
        assert_eq!(router.route(""), Route::Primary);
    }

    #[test]
    fn test_latches_on_first_sentinel() {
        let mut router = SentinelRouter::new(SENTINEL);
        assert_eq!(router.route("Start MLFT"), Route::Drop);
        assert!(!router.is_primary());
        assert_eq!(router.route("after"), Route::Secondary);
        assert_eq!(router.route("Start MLFT"), Route::Secondary);
        assert!(!router.is_primary());
    }

    #[test]
    fn test_requires_exact_match() {
        let mut router = SentinelRouter::new(SENTINEL);
        assert_eq!(router.route("Start MLFT "), Route::Primary);
        assert_eq!(router.route(" Start MLFT"), Route::Primary);
        assert_eq!(router.route("start mlft"), Route::Primary);
        assert!(router.is_primary());
    }

    #[test]
    fn test_custom_sentinel() {
        let mut router = SentinelRouter::new("---");
        assert_eq!(router.route("Start MLFT"), Route::Primary);
        assert_eq!(router.route("---"), Route::Drop);
        assert_eq!(router.route("x"), Route::Secondary);
    }
}
