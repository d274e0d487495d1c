/// Holds a busy flag up for as long as it lives.
///
/// The flag is cleared in `Drop`, so an early return, a `?`, or a dropped
/// future all leave the session idle again.
pub(crate) struct BusyGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_set_while_held_and_cleared_on_drop() {
        let mut flag = false;
        {
            let guard = BusyGuard::engage(&mut flag);
            assert!(*guard.flag);
        }
        assert!(!flag);
    }

    #[test]
    fn flag_is_cleared_on_early_return() {
        fn fails(flag: &mut bool) -> Result<(), ()> {
            let _busy = BusyGuard::engage(flag);
            Err(())
        }

        let mut flag = false;
        assert!(fails(&mut flag).is_err());
        assert!(!flag);
    }
}
