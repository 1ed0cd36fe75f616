/// check if a response for this request is in the cache, if it is, return it.
/// else follow the normal flow. the key is the full uri including the query
/// string since the feed and leaderboard responses vary by query.
///
/// a cache outage only loses the cache, the request is still served.
/// does nothing when debug enabled
macro_rules! read_cache_request {
    ( $origin:expr ) => {
        if !cfg!(debug_assertions) {
            let uri = $origin.to_string();
            match &mut Redis::connect() {
                Ok(r_conn) => {
                    if let Ok(true) = Redis::has_data::<String>(r_conn, uri.clone()) {
                        if let Ok(data) = Redis::get_data::<String, String>(r_conn, uri) {
                            if let Ok(cached) = serde_json::from_str(&data) {
                                return Ok(Json(cached));
                            }
                        }
                    }
                }
                Err(error) => {
                    log::error!(target:"macros/request_caching:read", "Error connecting to redis: {}", error);
                }
            }
        }
    };
}

/// add the response for this request to the cache and then return it.
/// the two-argument form stores the key forever and relies on the writer side
/// clearing it, the three-argument form sets an expiry in seconds for
/// responses nothing ever invalidates.
///
/// if debug is enabled we wont add to cache.
macro_rules! cache_response {
    ( $origin:expr, $data:expr ) => {{
        if !cfg!(debug_assertions) {
            let uri = $origin.to_string();
            match &mut Redis::connect() {
                Ok(r_conn) => {
                    if let Ok(json) = serde_json::to_string(&$data) {
                        let _ = Redis::set_data::<String, String>(r_conn, uri, json);
                    }
                }
                Err(error) => {
                    log::error!(target:"macros/request_caching:write", "Error connecting to redis: {}", error);
                }
            }
        }

        return Ok(Json($data));
    }};
    ( $origin:expr, $data:expr, $ttl_seconds:expr ) => {{
        if !cfg!(debug_assertions) {
            let uri = $origin.to_string();
            match &mut Redis::connect() {
                Ok(r_conn) => {
                    if let Ok(json) = serde_json::to_string(&$data) {
                        let _ = Redis::set_data_ex::<String, String>(r_conn, uri, json, $ttl_seconds);
                    }
                }
                Err(error) => {
                    log::error!(target:"macros/request_caching:write", "Error connecting to redis: {}", error);
                }
            }
        }

        return Ok(Json($data));
    }};
}

pub(crate) use cache_response;
pub(crate) use read_cache_request;
