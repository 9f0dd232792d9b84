use crate::Result;
use tracing::error;

/// Run a user-action callback, logging any error instead of propagating it.
///
/// One misbehaving click handler must never take down the whole shell.
pub fn run_action<F>(name: &str, action: F)
where
    F: FnOnce() -> Result<()>,
{
    if let Err(e) = action() {
        error!("action '{name}' failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RibbonError;

    #[test]
    fn successful_action_runs() {
        let mut ran = false;
        run_action("test", || {
            ran = true;
            Ok(())
        });
        assert!(ran);
    }

    #[test]
    fn failing_action_does_not_propagate() {
        run_action("test", || Err(RibbonError::Widget("boom".into())));
        // reaching this line is the assertion
    }
}
