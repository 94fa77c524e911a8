//! Service code to display name lookup.

use std::collections::HashMap;

/// Finite map from carrier service code to display name.
///
/// Codes not in the table resolve to the fallback name, or to
/// `"Service <code>"` when no fallback is set.
#[derive(Debug, Clone, Default)]
pub struct ServiceNameTable {
    names: HashMap<String, String>,
    fallback: Option<String>,
}

impl ServiceNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names for ground-saver quotes.
    pub fn ground_saver() -> Self {
        Self::new()
            .with_name("93", "Ground Saver")
            .with_fallback("Ground Saver (Under 1lb)")
    }

    /// Names for the standard shop services.
    pub fn standard() -> Self {
        [
            ("01", "Next Day Air"),
            ("02", "2nd Day Air"),
            ("03", "Ground"),
            ("12", "3 Day Select"),
            ("13", "Next Day Air Saver"),
            ("14", "Next Day Air Early"),
            ("59", "2nd Day Air A.M."),
            ("65", "Saver"),
            ("92", "Ground Saver (Under 1lb)"),
            ("93", "Ground Saver"),
        ]
        .into_iter()
        .fold(Self::new(), |table, (code, name)| table.with_name(code, name))
    }

    #[must_use]
    pub fn with_name(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(code.into(), name.into());
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, name: impl Into<String>) -> Self {
        self.fallback = Some(name.into());
        self
    }

    pub fn resolve(&self, code: &str) -> String {
        match (self.names.get(code.trim()), &self.fallback) {
            (Some(name), _) => name.clone(),
            (None, Some(fallback)) => fallback.clone(),
            (None, None) => format!("Service {}", code.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_saver_names() {
        let table = ServiceNameTable::ground_saver();
        assert_eq!(table.resolve("93"), "Ground Saver");
        assert_eq!(table.resolve("92"), "Ground Saver (Under 1lb)");
        assert_eq!(table.resolve("anything"), "Ground Saver (Under 1lb)");
    }

    #[test]
    fn test_standard_names_and_unknown_code() {
        let table = ServiceNameTable::standard();
        assert_eq!(table.resolve("03"), "Ground");
        assert_eq!(table.resolve("65"), "Saver");
        assert_eq!(table.resolve("96"), "Service 96");
    }

    #[test]
    fn test_table_is_extensible() {
        let table = ServiceNameTable::ground_saver().with_name("92", "Light Ground Saver");
        assert_eq!(table.resolve("92"), "Light Ground Saver");
    }
}
