/// delete every cached response whose key matches the given pattern.
/// used by writers to drop derived views that just went stale.
macro_rules! clear_cache_pattern {
    ($r_conn:expr, $pattern:expr, $target:expr) => {
        match Redis::keys::<String>($r_conn, $pattern.to_string()) {
            Ok(keys) => {
                for key in keys {
                    match Redis::delete($r_conn, &key) {
                        Ok(_) => {}
                        Err(error) => {
                            log::error!(target:$target, "Error while deleting key: {}", error);
                        }
                    };
                }
            }
            Err(error) => {
                log::error!(target:$target, "Error while listing keys: {}", error);
            }
        }
    };
}

pub(crate) use clear_cache_pattern;
