//! Consumer contract for the single rendering subscriber.

use crate::model::fragment::Fragment;
use std::sync::Arc;

/// The one live subscriber that receives fragments once attached.
///
/// Implementations must accept every well-formed fragment. They are invoked
/// while the registry state lock is held, so they must not call back into the
/// registry they are attached to.
pub trait FragmentConsumer: Send {
    fn accept(&mut self, fragment: Arc<Fragment>);
}

impl<F> FragmentConsumer for F
where
    F: FnMut(Arc<Fragment>) + Send,
{
    fn accept(&mut self, fragment: Arc<Fragment>) {
        self(fragment)
    }
}
