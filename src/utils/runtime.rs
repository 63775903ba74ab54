use anyhow::Result;

/// Every host callback runs on this one thread, so timer state never needs locking.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
