//! Generic key/value configuration port

/// Read access to dotted configuration keys such as `scaffolder.defaultAuthor.name`
pub trait ConfigReader: Send + Sync + 'static {
    fn get_optional_string(&self, key: &str) -> Option<String>;
}
