/// Port for querying the HANA secure user store.
pub trait SecureStore {
    /// Keys currently registered for the given SID. Empty when the query fails.
    fn keys(&self, sid: &str) -> Vec<String>;
}
