use crate::ports::SecureStore;

/// Secure store with a fixed key list for every SID.
pub struct StaticSecureStore {
    keys: Vec<String>,
}

impl StaticSecureStore {
    pub fn new(keys: &[&str]) -> Self {
        Self { keys: keys.iter().map(|k| k.to_string()).collect() }
    }
}

impl SecureStore for StaticSecureStore {
    fn keys(&self, _sid: &str) -> Vec<String> {
        self.keys.clone()
    }
}
