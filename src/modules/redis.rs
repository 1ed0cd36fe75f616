use std::env;

use dotenvy::dotenv;
use redis::{Client, Commands, Connection, FromRedisValue, RedisResult, ToRedisArgs};

pub struct Redis {}

impl Redis {
    pub fn connect() -> RedisResult<Connection> {
        dotenv().ok();

        let redis_url = env::var("REDIS_URL").expect("REDIS_URL must be set");
        Client::open(redis_url)?.get_connection()
    }

    pub fn set_data<K: ToRedisArgs, D: ToRedisArgs>(
        conn: &mut Connection,
        key: K,
        data: D,
    ) -> RedisResult<()> {
        conn.set::<K, D, ()>(key, data)
    }

    /// set with an expiry, for keys that have no writer clearing them.
    pub fn set_data_ex<K: ToRedisArgs, D: ToRedisArgs>(
        conn: &mut Connection,
        key: K,
        data: D,
        seconds: usize,
    ) -> RedisResult<()> {
        conn.set_ex::<K, D, ()>(key, data, seconds)
    }

    pub fn get_data<K: ToRedisArgs, D: FromRedisValue>(
        conn: &mut Connection,
        key: K,
    ) -> RedisResult<D> {
        conn.get::<K, D>(key)
    }

    pub fn delete<K: ToRedisArgs>(conn: &mut Connection, key: K) -> RedisResult<i32> {
        conn.del::<K, i32>(key)
    }

    pub fn has_data<K: ToRedisArgs>(conn: &mut Connection, key: K) -> RedisResult<bool> {
        conn.exists(key)
    }

    pub fn keys<K: ToRedisArgs>(conn: &mut Connection, partial: K) -> RedisResult<Vec<String>> {
        conn.keys(partial)
    }
}
