use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::naming::is_builtin;
use crate::Error;

/// Remembers which metric descriptors exist in Cloud Monitoring.
///
/// Each metric name maps to a cell that is initialized once its descriptor
/// was created. The map lock is only held to look up the cell; the cell
/// itself serializes creation so that at most one create call per name is in
/// flight and none is made after one succeeded. A failed create leaves the
/// cell empty so a later export retries.
#[derive(Debug, Default)]
pub(crate) struct DescriptorCache {
    created: Mutex<HashMap<String, Arc<OnceCell<()>>>>,
    skip: bool,
}

impl DescriptorCache {
    pub(crate) fn new(skip: bool) -> Self {
        DescriptorCache {
            created: Mutex::default(),
            skip,
        }
    }

    fn cell(&self, name: &str) -> Arc<OnceCell<()>> {
        let mut created = match self.created.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        created.entry(name.to_owned()).or_default().clone()
    }

    /// Makes sure the descriptor of metric `name` exists, calling `create`
    /// unless it is known to exist already.
    pub(crate) async fn ensure_registered<F, Fut>(
        &self,
        name: &str,
        metric_type: &str,
        create: F,
    ) -> Result<(), Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), Error>>,
    {
        if self.skip {
            return Ok(());
        }

        let cell = self.cell(name);
        if cell.initialized() {
            return Ok(());
        }
        if is_builtin(metric_type) {
            let _ = cell.set(());
            return Ok(());
        }

        cell.get_or_try_init(create).await.map(|_| ())
    }

    #[cfg(test)]
    pub(crate) fn is_registered(&self, name: &str) -> bool {
        self.cell(name).initialized()
    }
}
